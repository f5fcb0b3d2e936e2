//! Small tokenizers shared by the probe parsers.
//!
//! Every source here prints `Key: value` lines of some flavor. Lines that
//! do not fit are skipped by the callers, never fatal.

use crate::error::{ProbeError, Result};

/// Split a `Key: value` line at the first colon.
/// Both sides are trimmed; an empty key or value is a mismatch.
pub fn split_key_value<'a>(probe: &str, line: &'a str) -> Result<(&'a str, &'a str)> {
    let (key, value) = line
        .split_once(':')
        .ok_or_else(|| ProbeError::mismatch(probe, line))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return Err(ProbeError::mismatch(probe, line));
    }
    Ok((key, value))
}

/// Ordered `Key: value` pairs of one dump, in print order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues {
    pairs: Vec<(String, String)>,
}

impl KeyValues {
    /// Tokenize a dump, skipping lines that are not `Key: value`.
    pub fn parse<S: AsRef<str>>(probe: &str, lines: &[S]) -> Self {
        let pairs = lines
            .iter()
            .filter_map(|line| split_key_value(probe, line.as_ref()).ok())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { pairs }
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First value for `key` parsed as a count.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(parse_count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Parse a non-negative integer such as "4" or " 144 ".
pub fn parse_count(s: &str) -> Option<usize> {
    s.trim().parse().ok()
}

/// Number of CPUs in a list like "0-7,16-23" or "0,2,4".
pub fn cpu_list_len(list: &str) -> Option<usize> {
    let mut total = 0usize;
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((lo, hi)) => {
                let (lo, hi) = (parse_count(lo)?, parse_count(hi)?);
                if hi < lo {
                    return None;
                }
                total = total.checked_add((hi - lo).checked_add(1)?)?;
            }
            None => {
                parse_count(part)?;
                total = total.checked_add(1)?;
            }
        }
    }
    Some(total)
}

/// Attribute name for a free-form label: lowercase, spaces to underscores.
pub fn attribute_name(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key_value() {
        assert_eq!(
            split_key_value("lscpu", "Model name:          Cortex-A57").unwrap(),
            ("Model name", "Cortex-A57")
        );
        // Only the first colon splits
        assert_eq!(
            split_key_value("auxv", "AT_EXECFN:  /bin/true:x").unwrap(),
            ("AT_EXECFN", "/bin/true:x")
        );
        assert!(split_key_value("lscpu", "Caches (sum of all):").is_err());
        assert!(split_key_value("lscpu", "no colon here").is_err());
    }

    #[test]
    fn test_key_values_keep_order() {
        let kv = KeyValues::parse(
            "lscpu",
            &["Architecture: x86_64", "garbage", "CPU(s): 4", "Model: 85", "Model: 86"],
        );
        let keys: Vec<&str> = kv.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Architecture", "CPU(s)", "Model", "Model"]);
        assert_eq!(kv.get("Model"), Some("85"));
        assert_eq!(kv.count("CPU(s)"), Some(4));
        assert_eq!(kv.count("Architecture"), None);
    }

    #[test]
    fn test_cpu_list_len() {
        assert_eq!(cpu_list_len("0-7"), Some(8));
        assert_eq!(cpu_list_len("0-71"), Some(72));
        assert_eq!(cpu_list_len("0-3,8-11"), Some(8));
        assert_eq!(cpu_list_len("0,2,4"), Some(3));
        assert_eq!(cpu_list_len("0x000000ff"), None);
        assert_eq!(cpu_list_len("7-3"), None);
        assert_eq!(cpu_list_len(&format!("0-{}", usize::MAX)), None);
        assert_eq!(cpu_list_len(&format!("0-{},5", usize::MAX - 1)), None);
    }

    #[test]
    fn test_attribute_name() {
        assert_eq!(attribute_name("Autonegotiate"), "autonegotiate");
        assert_eq!(attribute_name(" RX negotiated "), "rx_negotiated");
    }
}
