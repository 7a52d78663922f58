use crate::domain::models::cookie_models::{CookieError, ReceivedCookie, Record, RequestCookie};
use crate::domain::policy::entry_builder::{BuiltEntry, EntryContext, build_entry};
use crate::domain::traits::cookie_traits::CookieStore;
use crate::domain::traits::host_traits::HostNormalizer;
use crate::domain::traits::suffix_traits::PublicSuffixList;
use crate::infrastructure::cookie::memory_backend::InMemoryCookieStore;
use crate::infrastructure::host::idna_backend::IdnaNormalizer;
use crate::service::config::JarConfig;
use crate::utils::partition_key::partition_key;
use crate::utils::url_component::{canonical_host, default_path};
use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};
use url::{Position, Url};

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// RFC 6265 cookie jar for an HTTP client.
///
/// Decides which stored cookies go out with a request and which received
/// cookies are kept. Safe to share between threads; all state lives in the
/// configured [`CookieStore`].
pub struct CookieJar {
    store: Arc<dyn CookieStore>,
    suffix_list: Option<Arc<dyn PublicSuffixList>>,
    normalizer: Arc<dyn HostNormalizer>,
}

impl CookieJar {
    pub fn new(config: JarConfig) -> Result<Self, InitError> {
        let store: Arc<dyn CookieStore> = match config.store {
            Some(store) => store,
            None => Arc::new(InMemoryCookieStore::new()),
        };
        let normalizer: Arc<dyn HostNormalizer> = match config.normalizer {
            Some(normalizer) => normalizer,
            None => Arc::new(IdnaNormalizer),
        };

        if let Some(entries) = config.initial_entries {
            let entries = entries
                .into_iter()
                .map(Self::check_seed)
                .collect::<Result<Vec<_>, _>>()?;
            debug!(count = entries.len(), "seeding cookie store");
            for entry in entries {
                store.save_entry(entry);
            }
        }

        Ok(Self {
            store,
            suffix_list: config.public_suffix_list,
            normalizer,
        })
    }

    fn check_seed(mut entry: Record) -> Result<Record, InitError> {
        if entry.domain.is_empty() || entry.key.is_empty() {
            return Err(InitError::Configuration(format!(
                "initial cookie {:?} has no domain or partition key",
                entry.name
            )));
        }
        if !entry.path.starts_with('/') {
            return Err(InitError::Configuration(format!(
                "initial cookie {:?} has path {:?}",
                entry.name, entry.path
            )));
        }

        entry.refresh_id();
        Ok(entry)
    }

    pub fn store(&self) -> &Arc<dyn CookieStore> {
        &self.store
    }

    /// Description of the configured public suffix list, if any.
    pub fn suffix_list_description(&self) -> Option<String> {
        self.suffix_list.as_ref().map(|list| list.description())
    }

    /// Cookies to send with a request to `url`.
    pub fn cookies(&self, url: &Url) -> Vec<RequestCookie> {
        self.cookies_at(url, SystemTime::now())
    }

    /// Like [`cookies`](Self::cookies) with an explicit current time.
    ///
    /// Returns nothing unless the scheme is `http` or `https`.
    pub fn cookies_at(&self, url: &Url, now: SystemTime) -> Vec<RequestCookie> {
        let https = match url.scheme() {
            "https" => true,
            "http" => false,
            _ => return Vec::new(),
        };

        let Ok(host) = self.canonical_host(url) else {
            return Vec::new();
        };
        let key = partition_key(&host, self.suffix_list.as_deref());

        let path = request_path(url);
        let path = match path.as_ref() {
            "" => "/",
            path => path,
        };

        self.store
            .entries(https, &host, path, &key, now)
            .into_iter()
            .map(|record| RequestCookie {
                name: record.name,
                value: record.value,
            })
            .collect()
    }

    /// Handles cookies received in a response from `url`.
    pub fn set_cookies(&self, url: &Url, cookies: &[ReceivedCookie]) {
        self.set_cookies_at(url, cookies, SystemTime::now())
    }

    /// Like [`set_cookies`](Self::set_cookies) with an explicit current time.
    ///
    /// Does nothing unless the scheme is `http` or `https`. A cookie that
    /// fails validation is dropped without affecting the others.
    pub fn set_cookies_at(&self, url: &Url, cookies: &[ReceivedCookie], now: SystemTime) {
        if cookies.is_empty() || !matches!(url.scheme(), "http" | "https") {
            return;
        }

        let Ok(host) = self.canonical_host(url) else {
            return;
        };
        let key = partition_key(&host, self.suffix_list.as_deref());
        let path = request_path(url);

        let ctx = EntryContext {
            now,
            default_path: default_path(&path),
            host: &host,
            key: &key,
            suffix_list: self.suffix_list.as_deref(),
            normalizer: &*self.normalizer,
        };

        for cookie in cookies {
            match build_entry(cookie, &ctx) {
                Ok(BuiltEntry::Store(mut record)) => {
                    record.last_access = now;
                    self.store.save_entry(record);
                }
                Ok(BuiltEntry::Remove(record)) => {
                    trace!(key = %record.key, id = %record.id, "removing cookie");
                    self.store.remove_entry(&record.key, &record.id);
                }
                Err(err) => {
                    debug!(host = %host, name = %cookie.name, error = %err, "rejected cookie");
                }
            }
        }
    }

    /// Stores the cookies of a `reqwest` response, keyed by the response URL.
    pub fn ingest_response(&self, response: &reqwest::Response) {
        let cookies: Vec<ReceivedCookie> = response
            .cookies()
            .map(|cookie| ReceivedCookie::from(&cookie))
            .collect();
        self.set_cookies(response.url(), &cookies);
    }

    fn canonical_host(&self, url: &Url) -> Result<String, CookieError> {
        let authority = &url[Position::BeforeHost..Position::AfterPort];
        canonical_host(authority, &*self.normalizer).inspect_err(|err| {
            debug!(host = authority, error = %err, "cannot canonicalize host");
        })
    }
}

// Cookie paths are compared against the decoded request path, so
// "/%7Efoo" matches a cookie set for "/~foo".
fn request_path(url: &Url) -> Cow<'_, str> {
    percent_decode_str(url.path()).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::{CookieJar, InitError};
    use crate::domain::models::cookie_models::{
        EntryId, ReceivedCookie, Record, RequestCookie, end_of_time,
    };
    use crate::domain::traits::suffix_traits::PublicSuffixList;
    use crate::infrastructure::cookie::memory_backend::InMemoryCookieStore;
    use crate::infrastructure::host::suffix_backend::ListedSuffixList;
    use crate::service::config::JarConfig;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};
    use url::Url;

    fn now() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn jar_with_store() -> (CookieJar, Arc<InMemoryCookieStore>) {
        let store = Arc::new(InMemoryCookieStore::new());
        let jar = CookieJar::new(JarConfig {
            store: Some(store.clone()),
            ..Default::default()
        })
        .unwrap();
        (jar, store)
    }

    fn pairs(cookies: &[RequestCookie]) -> Vec<String> {
        cookies.iter().map(|c| format!("{}={}", c.name, c.value)).collect()
    }

    #[test]
    fn test_round_trip_through_jar() {
        let (jar, _) = jar_with_store();
        let u = url("http://www.example.com/a/b");
        jar.set_cookies_at(
            &u,
            &[ReceivedCookie::new("a", "1"), ReceivedCookie::new("b", "2")],
            now(),
        );

        assert_eq!(pairs(&jar.cookies_at(&u, now())), vec!["a=1", "b=2"]);
        // Default path is "/a", so "/other" does not see them.
        assert!(jar.cookies_at(&url("http://www.example.com/other"), now()).is_empty());
    }

    #[test]
    fn test_escaped_request_path_is_decoded() {
        let (jar, store) = jar_with_store();
        jar.set_cookies_at(
            &url("http://example.com/"),
            &[ReceivedCookie::new("t", "1").with_path("/~foo")],
            now(),
        );
        let escaped = jar.cookies_at(&url("http://example.com/%7Efoo/x"), now());
        assert_eq!(pairs(&escaped), vec!["t=1"]);

        // The default path comes from the decoded path too.
        jar.set_cookies_at(
            &url("http://example.com/%7Ebar/page"),
            &[ReceivedCookie::new("d", "2")],
            now(),
        );
        let d = store.dump().into_iter().find(|r| r.name == "d").unwrap();
        assert_eq!(d.path, "/~bar");
        let plain = jar.cookies_at(&url("http://example.com/~bar/x"), now());
        assert_eq!(pairs(&plain), vec!["d=2"]);
    }

    #[test]
    fn test_non_http_schemes_are_ignored() {
        let (jar, store) = jar_with_store();
        jar.set_cookies_at(&url("ftp://example.com/"), &[ReceivedCookie::new("a", "1")], now());
        assert!(store.is_empty());

        jar.set_cookies_at(&url("http://example.com/"), &[ReceivedCookie::new("a", "1")], now());
        assert!(jar.cookies_at(&url("ws://example.com/"), now()).is_empty());
        assert_eq!(jar.cookies_at(&url("https://example.com/"), now()).len(), 1);
    }

    #[test]
    fn test_bad_cookie_does_not_block_siblings() {
        let (jar, store) = jar_with_store();
        let u = url("https://www.example.com/");
        jar.set_cookies_at(
            &u,
            &[
                ReceivedCookie::new("good1", "1"),
                ReceivedCookie::new("bad", "x").with_domain("example.org"),
                ReceivedCookie::new("bad2", "x").with_domain(".."),
                ReceivedCookie::new("good2", "2").with_domain("example.com"),
            ],
            now(),
        );

        assert_eq!(store.len(), 2);
        assert_eq!(pairs(&jar.cookies_at(&u, now())), vec!["good1=1", "good2=2"]);
    }

    #[test]
    fn test_delete_by_negative_max_age() {
        let (jar, store) = jar_with_store();
        let u = url("https://www.example.com/");
        jar.set_cookies_at(&u, &[ReceivedCookie::new("a", "1").with_path("/")], now());
        assert_eq!(store.len(), 1);

        let delete = ReceivedCookie::new("a", "").with_path("/").with_max_age(-1);
        jar.set_cookies_at(&u, &[delete], now());
        assert!(store.is_empty());
        assert_eq!(store.partition_count(), 0);
    }

    #[test]
    fn test_save_stamps_last_access() {
        let (jar, store) = jar_with_store();
        jar.set_cookies_at(&url("http://example.com/"), &[ReceivedCookie::new("a", "1")], now());
        let dumped = store.dump();
        assert_eq!(dumped[0].last_access, now());
        assert_eq!(dumped[0].creation, now());
    }

    #[test]
    fn test_port_and_case_do_not_matter() {
        let (jar, _) = jar_with_store();
        jar.set_cookies_at(
            &url("http://WWW.Example.com:8080/"),
            &[ReceivedCookie::new("a", "1")],
            now(),
        );
        assert_eq!(jar.cookies_at(&url("http://www.example.com/"), now()).len(), 1);
        assert_eq!(jar.cookies_at(&url("http://www.example.com.:9090/"), now()).len(), 1);
    }

    #[test]
    fn test_suffix_list_partitions_and_guards() {
        let list: Arc<dyn PublicSuffixList> =
            Arc::new(ListedSuffixList::new("test", ["com", "uk", "co.uk"]));
        let store = Arc::new(InMemoryCookieStore::new());
        let jar = CookieJar::new(JarConfig {
            public_suffix_list: Some(list),
            store: Some(store.clone()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(jar.suffix_list_description().as_deref(), Some("test (3 rules)"));

        let u = url("https://www.foo.co.uk/");
        jar.set_cookies_at(
            &u,
            &[
                ReceivedCookie::new("site", "1").with_domain("foo.co.uk"),
                ReceivedCookie::new("suffix", "x").with_domain("co.uk"),
            ],
            now(),
        );

        let dumped = store.dump();
        assert_eq!(dumped.len(), 1);
        assert_eq!(dumped[0].key, "foo.co.uk");
        assert_eq!(pairs(&jar.cookies_at(&url("https://bar.foo.co.uk/"), now())), vec!["site=1"]);
        assert!(jar.cookies_at(&url("https://bar.co.uk/"), now()).is_empty());
    }

    #[test]
    fn test_initial_entries_are_seeded() {
        let seed = Record {
            name: "seed".to_string(),
            value: "v".to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            same_site: None,
            key: "example.com".to_string(),
            id: EntryId::new("stale", "/", "seed"),
            secure: false,
            http_only: false,
            persistent: false,
            host_only: false,
            expires: end_of_time(),
            creation: now(),
            last_access: now(),
        };

        let jar = CookieJar::new(JarConfig {
            initial_entries: Some(vec![seed.clone()]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(pairs(&jar.cookies_at(&url("http://www.example.com/"), now())), vec!["seed=v"]);

        let bad = Record {
            path: "nope".to_string(),
            ..seed
        };
        let err = CookieJar::new(JarConfig {
            initial_entries: Some(vec![bad]),
            ..Default::default()
        });
        assert!(matches!(err, Err(InitError::Configuration(_))));
    }
}
