//! Turns a received cookie into a storable [`Record`] (RFC 6265 section 5.3).

use crate::domain::models::cookie_models::{
    CookieError, EntryId, ReceivedCookie, Record, SameSiteAttribute, end_of_time,
};
use crate::domain::traits::host_traits::HostNormalizer;
use crate::domain::traits::suffix_traits::PublicSuffixList;
use crate::utils::url_component::{has_dot_suffix, is_ip_literal};
use std::time::{Duration, SystemTime};

/// Everything about the response a cookie arrived in that the rules need.
#[derive(Clone, Copy)]
pub struct EntryContext<'a> {
    pub now: SystemTime,
    /// Default path of the request URL, see
    /// [`default_path`](crate::utils::url_component::default_path).
    pub default_path: &'a str,
    /// Canonical request host.
    pub host: &'a str,
    /// Partition key derived from `host`.
    pub key: &'a str,
    pub suffix_list: Option<&'a dyn PublicSuffixList>,
    pub normalizer: &'a dyn HostNormalizer,
}

/// Outcome of building an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltEntry {
    /// Save the record, replacing any record with the same identity.
    Store(Record),
    /// The cookie is already expired. Only the identity fields (`key`, `id`,
    /// `domain`, `path`, `name`) of the record are meaningful.
    Remove(Record),
}

#[derive(Clone, Copy)]
enum Lifetime {
    Delete,
    Session,
    Until(SystemTime),
}

/// Validates `cookie` against the request it came with and builds the record
/// to store, or the identity to remove.
pub fn build_entry(
    cookie: &ReceivedCookie,
    ctx: &EntryContext<'_>,
) -> Result<BuiltEntry, CookieError> {
    let path = if cookie.path.starts_with('/') {
        cookie.path.clone()
    } else {
        ctx.default_path.to_string()
    };

    let (domain, host_only) =
        domain_and_type(ctx.host, &cookie.domain, ctx.suffix_list, ctx.normalizer)?;

    let lifetime = lifetime(cookie, ctx.now);
    let (expires, persistent) = match lifetime {
        Lifetime::Delete => (ctx.now, false),
        Lifetime::Session => (end_of_time(), false),
        Lifetime::Until(at) => (at, true),
    };

    let id = EntryId::new(&domain, &path, &cookie.name);
    let record = Record {
        name: cookie.name.clone(),
        value: cookie.value.clone(),
        domain,
        path,
        same_site: cookie.same_site.and_then(SameSiteAttribute::stored_mode),
        key: ctx.key.to_string(),
        id,
        secure: cookie.secure,
        http_only: cookie.http_only,
        persistent,
        host_only,
        expires,
        creation: ctx.now,
        last_access: ctx.now,
    };

    match lifetime {
        Lifetime::Delete => Ok(BuiltEntry::Remove(record)),
        _ => Ok(BuiltEntry::Store(record)),
    }
}

// Max-Age wins over Expires.
fn lifetime(cookie: &ReceivedCookie, now: SystemTime) -> Lifetime {
    if cookie.max_age < 0 {
        return Lifetime::Delete;
    }

    if cookie.max_age > 0 {
        let at = now
            .checked_add(Duration::from_secs(cookie.max_age.unsigned_abs()))
            .unwrap_or_else(end_of_time);
        return Lifetime::Until(at);
    }

    match cookie.expires {
        None => Lifetime::Session,
        Some(at) if at <= now => Lifetime::Delete,
        Some(at) => Lifetime::Until(at),
    }
}

/// Resolves the domain a cookie is stored under and whether it is host-only.
///
/// `host` must be canonical. An empty `domain` means the Domain attribute was
/// absent.
pub fn domain_and_type(
    host: &str,
    domain: &str,
    suffix_list: Option<&dyn PublicSuffixList>,
    normalizer: &dyn HostNormalizer,
) -> Result<(String, bool), CookieError> {
    if domain.is_empty() {
        return Ok((host.to_string(), true));
    }

    if is_ip_literal(host) {
        return Err(CookieError::NoHostname);
    }

    let domain = domain.strip_prefix('.').unwrap_or(domain);
    if domain.is_empty() || domain.starts_with('.') {
        // "Domain=." or "Domain=..example.com"
        return Err(CookieError::MalformedDomain);
    }

    let (domain, ascii) = normalizer.to_lower(domain);
    if !ascii || domain.ends_with('.') {
        return Err(CookieError::MalformedDomain);
    }

    if let Some(list) = suffix_list {
        let suffix = list.public_suffix(&domain);
        if !suffix.is_empty() && !has_dot_suffix(&domain, &suffix) {
            // A cookie for a public suffix is only kept as a host cookie of
            // that very host.
            if host == domain {
                return Ok((host.to_string(), true));
            }
            return Err(CookieError::IllegalDomain);
        }
    }

    if host != domain && !has_dot_suffix(host, &domain) {
        return Err(CookieError::IllegalDomain);
    }

    Ok((domain, false))
}
