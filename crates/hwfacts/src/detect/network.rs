//! Link-layer stage for the interfaces found by the inventory.

use crate::facts::FactStore;
use crate::parsers::{parse_ethtool, parse_ip_addr, parse_lldp};
use crate::probe::ProbeAdapter;
use tracing::{debug, info};

/// Interfaces named by `("network", _, "logical_name", iface)` facts, in
/// store order, without repeats.
pub fn interfaces(store: &FactStore) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for fact in store.iter() {
        if fact.category == "network"
            && fact.attribute == "logical_name"
            && !names.contains(&fact.value)
        {
            names.push(fact.value.clone());
        }
    }
    names
}

/// Append the IPv4 address facts of every known interface, asking
/// `<ip> -o -4 addr show <iface>`. Interfaces without an address, or a
/// missing `ip`, leave the facts out.
pub fn detect_addresses(store: &mut FactStore, probe: &dyn ProbeAdapter, ip: &str) -> usize {
    let before = store.len();

    for iface in interfaces(store) {
        match probe.run_command(&[ip, "-o", "-4", "addr", "show", iface.as_str()]) {
            Ok(lines) => store.extend(parse_ip_addr(&iface, &lines)),
            Err(e) => debug!("{}", e),
        }
    }

    let added = store.len() - before;
    debug!("Network: {} address facts", added);
    added
}

/// Append ethtool pause parameters and LLDP neighbor TLVs per interface.
/// Tools that are missing or print nothing just leave the facts out.
pub fn detect_links(store: &mut FactStore, probe: &dyn ProbeAdapter) -> usize {
    let before = store.len();

    for iface in interfaces(store) {
        match probe.get_ethtool_status(&iface) {
            Ok(lines) => store.extend(parse_ethtool(&iface, &lines)),
            Err(e) => debug!("{}", e),
        }
        match probe.get_lld_status(&iface) {
            Ok(lines) => store.extend(parse_lldp(&iface, &lines)),
            Err(e) => debug!("{}", e),
        }
    }

    let added = store.len() - before;
    info!("Network: {} link facts", added);
    added
}
