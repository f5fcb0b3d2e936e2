//! Placeholder serial replacement.

use hwfacts::detect::{fix_bad_serial, SerialFallbacks, SerialOutcome};
use hwfacts::FactStore;

fn store_with_serial(serial: &str) -> FactStore {
    let mut store = FactStore::new();
    store.append(("system", "product", "vendor", "Supermicro"));
    store.append(("system", "product", "serial", serial));
    store.append(("system", "product", "uuid", "00000000-0000-0000-0000-0cc47a1b2c3d"));
    store
}

fn fallbacks(uuid: &str, mobo: &str, other: &str) -> SerialFallbacks {
    let opt = |s: &str| Some(s.to_string());
    SerialFallbacks {
        chassis_uuid: opt(uuid),
        motherboard: opt(mobo),
        other: opt(other),
    }
}

#[test]
fn test_zero_serial_takes_uuid() {
    let mut store = FactStore::new();
    store.append(("system", "product", "serial", "0000000000"));
    let outcome = fix_bad_serial(&mut store, &fallbacks("uuid", "", ""));
    assert_eq!(
        outcome,
        SerialOutcome::Replaced {
            from: "0000000000".to_string(),
            to: "uuid".to_string()
        }
    );
    assert_eq!(store.find("system", "product", "serial"), Some("uuid"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_sequential_serial_takes_motherboard() {
    let mut store = FactStore::new();
    store.append(("system", "product", "serial", "0123456789"));
    fix_bad_serial(&mut store, &fallbacks("", "mobo", ""));
    assert_eq!(store.find("system", "product", "serial"), Some("mobo"));
}

#[test]
fn test_other_is_last_resort() {
    let mut store = store_with_serial("000000000000");
    fix_bad_serial(&mut store, &fallbacks("", "", "b8:ca:3a:5c:1d:60"));
    assert_eq!(store.find("system", "product", "serial"), Some("b8:ca:3a:5c:1d:60"));
}

#[test]
fn test_genuine_serial_untouched() {
    let mut store = store_with_serial("CZJ31402CD");
    let before = store.clone();
    let outcome = fix_bad_serial(&mut store, &fallbacks("uuid", "mobo", "other"));
    assert_eq!(outcome, SerialOutcome::Kept);
    assert_eq!(store, before);
}

#[test]
fn test_no_fallback_keeps_placeholder() {
    let mut store = store_with_serial("0000000000");
    let outcome = fix_bad_serial(&mut store, &fallbacks("", " ", ""));
    assert_eq!(outcome, SerialOutcome::NoFallback);
    assert_eq!(store.find("system", "product", "serial"), Some("0000000000"));
}

#[test]
fn test_replacement_is_in_place() {
    let mut store = store_with_serial("0000000000");
    fix_bad_serial(&mut store, &fallbacks("uuid", "", ""));
    let attrs: Vec<&str> = store.iter().map(|f| f.attribute.as_str()).collect();
    assert_eq!(attrs, vec!["vendor", "serial", "uuid"]);
    assert_eq!(store.iter().filter(|f| f.attribute == "serial").count(), 1);
}

#[test]
fn test_idempotent() {
    let fb = fallbacks("4c4c4544-0052-3610", "mobo", "");
    let mut store = store_with_serial("0000000000");
    fix_bad_serial(&mut store, &fb);
    let once = store.clone();
    assert_eq!(fix_bad_serial(&mut store, &fb), SerialOutcome::Kept);
    assert_eq!(store, once);
}

#[test]
fn test_fallbacks_from_store() {
    let mut store = FactStore::new();
    store.append(("system", "product", "serial", "0000000000"));
    store.append(("system", "product", "uuid", "chassis-uuid"));
    store.append(("bus", "core", "serial", "mobo-serial"));
    store.append(("network", "network:0", "serial", "aa:bb:cc:dd:ee:01"));
    store.append(("network", "network:1", "serial", "aa:bb:cc:dd:ee:02"));

    let fb = SerialFallbacks::from_store(&store);
    assert_eq!(fb.chassis_uuid.as_deref(), Some("chassis-uuid"));
    assert_eq!(fb.motherboard.as_deref(), Some("mobo-serial"));
    assert_eq!(fb.other.as_deref(), Some("aa:bb:cc:dd:ee:01"));

    fix_bad_serial(&mut store, &fb);
    assert_eq!(store.find("system", "product", "serial"), Some("chassis-uuid"));
}
