use crate::domain::traits::suffix_traits::PublicSuffixList;
use std::collections::HashSet;

/// Public suffix list built from a caller-provided set of rules.
///
/// Rules use the publicsuffix.org notation: `co.uk`, `*.ck` (every label
/// directly under `ck` is a suffix) and `!www.ck` (exception to a wildcard).
/// A domain no rule matches has its last label as public suffix.
#[derive(Debug, Clone, Default)]
pub struct ListedSuffixList {
    source: String,
    exact: HashSet<String>,
    wildcards: HashSet<String>,
    exceptions: HashSet<String>,
}

impl ListedSuffixList {
    pub fn new<I, S>(source: impl Into<String>, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self {
            source: source.into(),
            ..Default::default()
        };

        for rule in rules {
            let rule = rule.as_ref().trim().trim_matches('.').to_ascii_lowercase();
            if rule.is_empty() || rule.starts_with("//") {
                continue;
            }

            if let Some(parent) = rule.strip_prefix("*.") {
                list.wildcards.insert(parent.to_string());
            } else if let Some(exception) = rule.strip_prefix('!') {
                list.exceptions.insert(exception.to_string());
            } else {
                list.exact.insert(rule);
            }
        }

        list
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len() + self.exceptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PublicSuffixList for ListedSuffixList {
    fn public_suffix(&self, domain: &str) -> String {
        let labels: Vec<&str> = domain.split('.').collect();

        // Longest candidate first, so the first hit is the longest rule.
        for i in 0..labels.len() {
            let candidate = labels[i..].join(".");

            if self.exceptions.contains(&candidate) {
                return labels[i + 1..].join(".");
            }
            if self.exact.contains(&candidate) {
                return candidate;
            }
            if i + 1 < labels.len() && self.wildcards.contains(&labels[i + 1..].join(".")) {
                return candidate;
            }
        }

        labels.last().map(|label| label.to_string()).unwrap_or_default()
    }

    fn description(&self) -> String {
        format!("{} ({} rules)", self.source, self.len())
    }
}
