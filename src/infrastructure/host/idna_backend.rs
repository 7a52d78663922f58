use crate::domain::models::cookie_models::CookieError;
use crate::domain::traits::host_traits::HostNormalizer;

/// Host normalizer backed by the `idna` crate (UTS #46 processing).
///
/// Pure ASCII hosts are passed through untouched so that IP literals and
/// names with characters UTS #46 would reject still reach the cookie rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdnaNormalizer;

impl HostNormalizer for IdnaNormalizer {
    fn to_ascii(&self, host: &str) -> Result<String, CookieError> {
        if host.is_ascii() {
            return Ok(host.to_string());
        }

        idna::domain_to_ascii(host).map_err(|_| CookieError::InvalidHost(host.to_string()))
    }

    fn to_lower(&self, value: &str) -> (String, bool) {
        if value.is_ascii() {
            (value.to_ascii_lowercase(), true)
        } else {
            (value.to_string(), false)
        }
    }
}
