use crate::domain::models::cookie_models::{EntryId, Record};
use std::time::SystemTime;

/// Pluggable storage for cookie records.
///
/// Implementations must be safe for concurrent use. Every call is expected to
/// be atomic with respect to every other call on the same store.
pub trait CookieStore: Send + Sync + 'static {
    /// Upserts `entry` under `(entry.key, entry.id)`.
    ///
    /// When a record with the same identity already exists, its creation time
    /// and insertion order are kept.
    fn save_entry(&self, entry: Record);

    /// Removes the record `id` from the partition `key`, if present.
    fn remove_entry(&self, key: &str, id: &EntryId);

    /// Returns the records of partition `key` that should be sent to
    /// `host`/`path`.
    ///
    /// Expired persistent records in the partition are evicted, and every
    /// returned record has its last access set to `now`. Results are ordered
    /// by path length (longest first), then creation time (oldest first),
    /// then insertion order.
    fn entries(
        &self,
        https: bool,
        host: &str,
        path: &str,
        key: &str,
        now: SystemTime,
    ) -> Vec<Record>;
}
