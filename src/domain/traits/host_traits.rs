use crate::domain::models::cookie_models::CookieError;

/// Turns host names into their ASCII form.
pub trait HostNormalizer: Send + Sync + 'static {
    /// Converts a possibly Unicode host to its ASCII (punycode) form.
    fn to_ascii(&self, host: &str) -> Result<String, CookieError>;

    /// Lowercases `value`. The flag reports whether `value` was pure ASCII;
    /// when it was not, the returned string must not be relied upon.
    fn to_lower(&self, value: &str) -> (String, bool);
}
