//! Placeholder serial replacement.
//!
//! Some vendors ship boards whose SMBIOS serial is a factory default. The
//! `("system", "product", "serial")` fact is patched in place with the
//! first usable fallback identifier.

use crate::facts::FactStore;
use tracing::{debug, info};

/// Vendor default seen in the field next to the all-zero variants.
const SEQUENTIAL_PLACEHOLDER: &str = "0123456789";

/// Whether a serial is a known factory placeholder: after trimming, a
/// non-empty run of `0` of any length, or `0123456789`.
pub fn is_placeholder_serial(serial: &str) -> bool {
    let serial = serial.trim();
    if serial == SEQUENTIAL_PLACEHOLDER {
        return true;
    }
    !serial.is_empty() && serial.chars().all(|c| c == '0')
}

/// Replacement candidates, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialFallbacks {
    pub chassis_uuid: Option<String>,
    pub motherboard: Option<String>,
    pub other: Option<String>,
}

impl SerialFallbacks {
    /// Chassis uuid, motherboard serial, then the first network serial.
    pub fn from_store(store: &FactStore) -> Self {
        Self {
            chassis_uuid: store.find("system", "product", "uuid").map(String::from),
            motherboard: store.find("bus", "core", "serial").map(String::from),
            other: store
                .iter()
                .find(|f| f.category == "network" && f.attribute == "serial")
                .map(|f| f.value.clone()),
        }
    }

    /// First candidate that is not blank.
    pub fn first(&self) -> Option<&str> {
        [&self.chassis_uuid, &self.motherboard, &self.other]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialOutcome {
    /// No product serial in the store
    NotFound,
    /// Serial is genuine
    Kept,
    Replaced { from: String, to: String },
    /// Placeholder, but every fallback is blank
    NoFallback,
}

/// Replace a placeholder product serial in place.
pub fn fix_bad_serial(store: &mut FactStore, fallbacks: &SerialFallbacks) -> SerialOutcome {
    let current = match store.find("system", "product", "serial") {
        Some(serial) => serial.to_string(),
        None => return SerialOutcome::NotFound,
    };
    if !is_placeholder_serial(&current) {
        return SerialOutcome::Kept;
    }

    match fallbacks.first() {
        Some(replacement) => {
            let replacement = replacement.to_string();
            store.replace("system", "product", "serial", replacement.as_str());
            info!("Replaced placeholder serial {:?} with {:?}", current, replacement);
            SerialOutcome::Replaced {
                from: current,
                to: replacement,
            }
        }
        None => {
            debug!("Placeholder serial {:?} kept, no fallback", current);
            SerialOutcome::NoFallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_pattern() {
        assert!(is_placeholder_serial("0000000000"));
        assert!(is_placeholder_serial("0"));
        assert!(is_placeholder_serial(" 000000000000 "));
        assert!(is_placeholder_serial("0123456789"));
        assert!(!is_placeholder_serial(""));
        assert!(!is_placeholder_serial("   "));
        assert!(!is_placeholder_serial("CZJ31402CD"));
        assert!(!is_placeholder_serial("1111111111"));
        assert!(!is_placeholder_serial("00000000001"));
    }

    #[test]
    fn test_fallback_priority_skips_blank() {
        let fb = SerialFallbacks {
            chassis_uuid: Some("  ".to_string()),
            motherboard: None,
            other: Some("d8:9d:67:1a:2b:3c".to_string()),
        };
        assert_eq!(fb.first(), Some("d8:9d:67:1a:2b:3c"));
        assert_eq!(SerialFallbacks::default().first(), None);
    }

    #[test]
    fn test_missing_serial_is_noop() {
        let mut store = FactStore::new();
        store.append(("system", "product", "vendor", "HP"));
        let fb = SerialFallbacks {
            chassis_uuid: Some("uuid".to_string()),
            ..Default::default()
        };
        assert_eq!(fix_bad_serial(&mut store, &fb), SerialOutcome::NotFound);
        assert_eq!(store.len(), 1);
    }
}
