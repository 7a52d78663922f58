use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const END_OF_TIME_SECS: u64 = 253_402_300_799;

/// Expiry given to session cookies: 9999-12-31T23:59:59Z.
///
/// Far enough out that no real `now` reaches it, and representable as a
/// `SystemTime` on every supported platform.
pub fn end_of_time() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(END_OF_TIME_SECS)
}

/// Identity of a stored cookie, derived from its domain, path and name.
///
/// Two records with the same identity inside the same partition are the same
/// logical cookie.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(domain: &str, path: &str, name: &str) -> Self {
        Self(format!("{};{};{}", domain, path, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SameSite mode kept on a stored record.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SameSite {
    Default,
    Strict,
    Lax,
}

/// SameSite attribute as it arrives from the transport layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SameSiteAttribute {
    Default,
    Strict,
    Lax,
    None,
}

impl SameSiteAttribute {
    /// Maps the received attribute onto a stored mode. `None` is not
    /// recognized and leaves the record without a mode.
    pub fn stored_mode(self) -> Option<SameSite> {
        match self {
            SameSiteAttribute::Default => Some(SameSite::Default),
            SameSiteAttribute::Strict => Some(SameSite::Strict),
            SameSiteAttribute::Lax => Some(SameSite::Lax),
            SameSiteAttribute::None => None,
        }
    }
}

/// A cookie received in a response, already split into its attributes.
///
/// `max_age` follows the usual client convention: `0` means the attribute was
/// absent, a negative value means "delete now", a positive value is a
/// lifetime in seconds. An empty `domain` or `path` means the attribute was
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceivedCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    pub expires: Option<SystemTime>,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSiteAttribute>,
}

impl ReceivedCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = seconds;
        self
    }

    pub fn with_expires(mut self, expires: SystemTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn with_same_site(mut self, same_site: SameSiteAttribute) -> Self {
        self.same_site = Some(same_site);
        self
    }
}

/// Name/value pair handed back for an outgoing request.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestCookie {
    pub name: String,
    pub value: String,
}

/// A stored cookie entry.
///
/// Records handed out by a [`CookieStore`](crate::domain::traits::cookie_traits::CookieStore)
/// are copies; changing them has no effect on the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub value: String,
    /// Canonical domain, never with a leading dot.
    pub domain: String,
    pub path: String,
    pub same_site: Option<SameSite>,
    /// Partition key (registrable domain of the host that set the cookie).
    pub key: String,
    pub id: EntryId,
    pub secure: bool,
    pub http_only: bool,
    pub persistent: bool,
    pub host_only: bool,
    pub expires: SystemTime,
    pub creation: SystemTime,
    pub last_access: SystemTime,
}

impl Record {
    /// Session records never expire through the sweep.
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.persistent && self.expires <= now
    }

    pub fn refresh_id(&mut self) {
        self.id = EntryId::new(&self.domain, &self.path, &self.name);
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CookieError {
    #[error("invalid host: {0}")]
    InvalidHost(String),
    #[error("malformed cookie domain attribute")]
    MalformedDomain,
    #[error("no host name available (IP only)")]
    NoHostname,
    #[error("illegal cookie domain attribute")]
    IllegalDomain,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(persistent: bool, expires: SystemTime) -> Record {
        Record {
            name: "n".to_string(),
            value: "v".to_string(),
            domain: "example.com".to_string(),
            path: "/".to_string(),
            same_site: None,
            key: "example.com".to_string(),
            id: EntryId::new("example.com", "/", "n"),
            secure: false,
            http_only: false,
            persistent,
            host_only: true,
            expires,
            creation: UNIX_EPOCH,
            last_access: UNIX_EPOCH,
        }
    }

    #[test]
    fn test_entry_id_is_ordered_concatenation() {
        let id = EntryId::new("example.com", "/a", "sid");
        assert_eq!(id.as_str(), "example.com;/a;sid");
        assert_ne!(id, EntryId::new("example.com", "/a", "other"));
    }

    #[test]
    fn test_end_of_time_is_year_9999() {
        let secs = end_of_time().duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert_eq!(secs, 253_402_300_799);
        assert!(end_of_time() > SystemTime::now());
    }

    #[test]
    fn test_session_record_never_expires() {
        let r = record(false, UNIX_EPOCH);
        assert!(!r.is_expired(end_of_time()));
    }

    #[test]
    fn test_persistent_record_expires_at_boundary() {
        let at = UNIX_EPOCH + Duration::from_secs(100);
        let r = record(true, at);
        assert!(!r.is_expired(at - Duration::from_secs(1)));
        assert!(r.is_expired(at));
        assert!(r.is_expired(at + Duration::from_secs(1)));
    }

    #[test]
    fn test_same_site_none_is_unrecognized() {
        assert_eq!(SameSiteAttribute::None.stored_mode(), None);
        assert_eq!(SameSiteAttribute::Lax.stored_mode(), Some(SameSite::Lax));
        assert_eq!(SameSiteAttribute::Strict.stored_mode(), Some(SameSite::Strict));
        assert_eq!(SameSiteAttribute::Default.stored_mode(), Some(SameSite::Default));
    }
}
