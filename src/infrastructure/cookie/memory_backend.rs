use crate::domain::models::cookie_models::{EntryId, Record};
use crate::domain::traits::cookie_traits::CookieStore;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;
use tracing::{debug, trace};

/// Thread-safe in-memory [`CookieStore`] with deterministic result ordering.
///
/// Records are partitioned by their key (registrable domain) and, inside a
/// partition, by identity. A single lock guards the whole map, so every
/// operation is atomic, including the sweep, select and touch done by
/// [`CookieStore::entries`].
#[derive(Default)]
pub struct InMemoryCookieStore {
    inner: Mutex<InnerStore>,
}

#[derive(Default)]
struct InnerStore {
    partitions: HashMap<String, HashMap<EntryId, StoredEntry>>,
    // Handed to each newly created record. Breaks ordering ties between
    // records with equal path length and creation time.
    next_seq: u64,
}

struct StoredEntry {
    record: Record,
    seq: u64,
}

impl InnerStore {
    fn save(&mut self, mut entry: Record) {
        let partition = self.partitions.entry(entry.key.clone()).or_default();

        let seq = match partition.get(&entry.id) {
            Some(old) => {
                entry.creation = old.record.creation;
                old.seq
            }
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                seq
            }
        };

        partition.insert(entry.id.clone(), StoredEntry { record: entry, seq });
    }
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every mutation leaves the map consistent, so a poisoned lock is safe to
    // keep using.
    fn lock(&self) -> MutexGuard<'_, InnerStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies of every stored record, ordered by partition key and then
    /// insertion order.
    pub fn dump(&self) -> Vec<Record> {
        let store = self.lock();

        let mut entries: Vec<(&str, u64, &Record)> = store
            .partitions
            .iter()
            .flat_map(|(key, partition)| {
                partition
                    .values()
                    .map(move |e| (key.as_str(), e.seq, &e.record))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));

        entries.into_iter().map(|(_, _, r)| r.clone()).collect()
    }

    /// Saves every record in order, with the same identity rules as
    /// [`CookieStore::save_entry`].
    pub fn restore(&self, entries: Vec<Record>) {
        let mut store = self.lock();
        let count = entries.len();
        for entry in entries {
            store.save(entry);
        }
        debug!(count, "restored cookie records");
    }

    pub fn clear(&self) {
        let mut store = self.lock();
        store.partitions.clear();
    }

    /// Number of stored records, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.lock().partitions.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-empty partitions.
    pub fn partition_count(&self) -> usize {
        self.lock().partitions.len()
    }
}

impl CookieStore for InMemoryCookieStore {
    fn save_entry(&self, entry: Record) {
        self.lock().save(entry);
    }

    fn remove_entry(&self, key: &str, id: &EntryId) {
        let mut store = self.lock();

        if let Some(partition) = store.partitions.get_mut(key) {
            if partition.remove(id).is_some() && partition.is_empty() {
                store.partitions.remove(key);
            }
        }
    }

    fn entries(
        &self,
        https: bool,
        host: &str,
        path: &str,
        key: &str,
        now: SystemTime,
    ) -> Vec<Record> {
        let mut store = self.lock();

        let Some(partition) = store.partitions.get_mut(key) else {
            return Vec::new();
        };

        let before = partition.len();
        partition.retain(|_, e| !e.record.is_expired(now));
        let evicted = before - partition.len();
        if evicted > 0 {
            trace!(key, evicted, "swept expired cookie records");
        }

        let mut selected: Vec<(u64, Record)> = Vec::new();
        for entry in partition.values_mut() {
            if !entry.record.should_send(https, host, path) {
                continue;
            }
            entry.record.last_access = now;
            selected.push((entry.seq, entry.record.clone()));
        }

        if partition.is_empty() {
            store.partitions.remove(key);
        }

        // RFC 6265 section 5.4 point 2: longest path first, then earliest
        // creation time.
        selected.sort_by(|(seq_a, a), (seq_b, b)| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then(a.creation.cmp(&b.creation))
                .then(seq_a.cmp(seq_b))
        });

        selected.into_iter().map(|(_, record)| record).collect()
    }
}
