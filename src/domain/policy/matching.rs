//! Request matching rules for stored records (RFC 6265 sections 5.1.3, 5.1.4
//! and 5.4).
//!
//! Matching is time-agnostic: callers drop expired records before asking.

use crate::domain::models::cookie_models::Record;
use crate::utils::url_component::has_dot_suffix;

impl Record {
    /// Whether this record goes out with a request to `host`/`path`.
    pub fn should_send(&self, https: bool, host: &str, path: &str) -> bool {
        self.domain_match(host) && self.path_match(path) && (https || !self.secure)
    }

    /// "domain-match". Host-only records match their exact domain only.
    pub fn domain_match(&self, host: &str) -> bool {
        if self.domain == host {
            return true;
        }
        !self.host_only && has_dot_suffix(host, &self.domain)
    }

    /// "path-match".
    pub fn path_match(&self, request_path: &str) -> bool {
        if request_path == self.path {
            return true;
        }

        match request_path.strip_prefix(self.path.as_str()) {
            // "/any/" matches "/any/path"; "/any" matches "/any/path".
            Some(rest) => self.path.ends_with('/') || rest.starts_with('/'),
            None => false,
        }
    }
}
