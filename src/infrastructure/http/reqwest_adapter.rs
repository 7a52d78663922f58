//! Conversion from cookies already parsed by `reqwest`.

use crate::domain::models::cookie_models::{ReceivedCookie, SameSiteAttribute};
use std::time::Duration;

impl From<&reqwest::cookie::Cookie<'_>> for ReceivedCookie {
    fn from(cookie: &reqwest::cookie::Cookie<'_>) -> Self {
        Self {
            name: cookie.name().to_string(),
            value: cookie.value().to_string(),
            path: cookie.path().unwrap_or_default().to_string(),
            domain: cookie.domain().unwrap_or_default().to_string(),
            expires: cookie.expires(),
            max_age: max_age_seconds(cookie.max_age()),
            secure: cookie.secure(),
            http_only: cookie.http_only(),
            same_site: same_site(cookie.same_site_strict(), cookie.same_site_lax()),
        }
    }
}

/// `reqwest` clamps non-positive Max-Age values to zero; zero means "delete
/// now" and maps to a negative value.
fn max_age_seconds(max_age: Option<Duration>) -> i64 {
    match max_age {
        None => 0,
        Some(age) => match age.as_secs() {
            0 => -1,
            secs => i64::try_from(secs).unwrap_or(i64::MAX),
        },
    }
}

fn same_site(strict: bool, lax: bool) -> Option<SameSiteAttribute> {
    if strict {
        Some(SameSiteAttribute::Strict)
    } else if lax {
        Some(SameSiteAttribute::Lax)
    } else {
        None
    }
}
