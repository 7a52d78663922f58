use crate::domain::models::cookie_models::Record;
use crate::domain::traits::cookie_traits::CookieStore;
use crate::domain::traits::host_traits::HostNormalizer;
use crate::domain::traits::suffix_traits::PublicSuffixList;
use std::fmt;
use std::sync::Arc;

pub struct JarConfig {
    /// Decides whether a server may set a cookie for a domain, and how
    /// storage is partitioned.
    ///
    /// `None` is valid and handy for tests but not secure: the server for
    /// `foo.co.uk` can then set a cookie for `bar.co.uk`.
    pub public_suffix_list: Option<Arc<dyn PublicSuffixList>>,
    /// Defaults to a fresh `InMemoryCookieStore`.
    pub store: Option<Arc<dyn CookieStore>>,
    /// Defaults to `IdnaNormalizer`.
    pub normalizer: Option<Arc<dyn HostNormalizer>>,
    /// Records saved into the store when the jar is created.
    pub initial_entries: Option<Vec<Record>>,
}

impl Default for JarConfig {
    fn default() -> Self {
        Self {
            public_suffix_list: None,
            store: None,
            normalizer: None,
            initial_entries: None,
        }
    }
}

impl fmt::Debug for JarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JarConfig")
            .field(
                "public_suffix_list",
                &self.public_suffix_list.as_ref().map(|l| l.description()),
            )
            .field("store", &self.store.is_some())
            .field("normalizer", &self.normalizer.is_some())
            .field(
                "initial_entries",
                &self.initial_entries.as_ref().map(Vec::len),
            )
            .finish()
    }
}
