use crate::domain::models::cookie_models::CookieError;
use crate::domain::traits::host_traits::HostNormalizer;
use std::net::IpAddr;

/// Strips the port and a trailing dot from `host`, then converts it to
/// lowercase ASCII.
///
/// Bracketed IPv6 literals lose their brackets, so `[::1]:8080` and `[::1]`
/// both become `::1`.
pub fn canonical_host(host: &str, normalizer: &dyn HostNormalizer) -> Result<String, CookieError> {
    let mut host = if has_port(host) {
        split_host_port(host)?
    } else {
        host
    };

    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        host = inner;
    }

    let host = host.strip_suffix('.').unwrap_or(host);

    let encoded = normalizer.to_ascii(host)?;
    let (lower, _) = normalizer.to_lower(&encoded);
    Ok(lower)
}

/// Reports whether `host` carries a port. `host` may be a host name, an IPv4
/// address or a bracketed IPv6 address.
pub fn has_port(host: &str) -> bool {
    match host.matches(':').count() {
        0 => false,
        1 => true,
        _ => host.starts_with('[') && host.contains("]:"),
    }
}

fn split_host_port(host: &str) -> Result<&str, CookieError> {
    let invalid = || CookieError::InvalidHost(host.to_string());

    if let Some(rest) = host.strip_prefix('[') {
        let (inner, tail) = rest.split_once(']').ok_or_else(invalid)?;
        if !tail.starts_with(':') || tail[1..].contains([':', '[', ']']) {
            return Err(invalid());
        }
        return Ok(inner);
    }

    let (name, _) = host.rsplit_once(':').ok_or_else(invalid)?;
    if name.contains(['[', ']']) {
        return Err(invalid());
    }
    Ok(name)
}

pub fn is_ip_literal(host: &str) -> bool {
    host.parse::<IpAddr>().is_ok()
}

/// Reports whether `s` ends in `"." + suffix`. Equal strings do not match.
pub fn has_dot_suffix(s: &str, suffix: &str) -> bool {
    s.len() > suffix.len()
        && s.ends_with(suffix)
        && s.as_bytes()[s.len() - suffix.len() - 1] == b'.'
}

/// Directory part of a request path, used when a cookie has no usable Path
/// attribute.
pub fn default_path(path: &str) -> &str {
    if !path.starts_with('/') {
        return "/";
    }

    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}
