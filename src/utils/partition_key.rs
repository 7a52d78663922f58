use crate::domain::traits::suffix_traits::PublicSuffixList;
use crate::utils::url_component::is_ip_literal;

/// Returns the partition key for a canonical `host`: its registrable domain
/// (eTLD+1), or the host itself where no registrable domain can be trusted.
///
/// Without a suffix list the last two labels are used.
pub fn partition_key(host: &str, suffix_list: Option<&dyn PublicSuffixList>) -> String {
    if is_ip_literal(host) {
        return host.to_string();
    }

    // Index of the dot in front of the public suffix.
    let dot = match suffix_list {
        None => match host.rfind('.') {
            Some(i) if i > 0 => i,
            _ => return host.to_string(),
        },
        Some(list) => {
            let suffix = list.public_suffix(host);
            if suffix == host {
                return host.to_string();
            }

            // Only the suffix length is trusted from here on. A list that
            // answers with something not preceded by a dot is broken, and
            // keying by host keeps unrelated sites apart.
            match host.len().checked_sub(suffix.len()) {
                Some(i) if i > 0 && host.as_bytes()[i - 1] == b'.' => i - 1,
                _ => return host.to_string(),
            }
        }
    };

    let start = host[..dot].rfind('.').map_or(0, |i| i + 1);
    host[start..].to_string()
}
