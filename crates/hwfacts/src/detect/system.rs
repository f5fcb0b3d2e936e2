//! System inventory stage: the lshw tree, chassis UUID, interface
//! addresses, OS and kernel identification, online processor count, then
//! the CPU topology.

use super::cpu::{detect_cpus, CpuTopology};
use super::network::detect_addresses;
use crate::config::Config;
use crate::error::Result;
use crate::facts::{Fact, FactStore};
use crate::parsers::{parse_count, parse_lshw};
use crate::probe::{first_line, ProbeAdapter};
use tracing::{debug, info};

/// What the inventory stage got from its two primary inputs.
///
/// The hardware tree and the CPU topology fail independently: a missing
/// or unreadable lshw document only leaves the tree facts out.
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Number of facts taken from the hardware tree
    pub tree: Result<usize>,
    pub cpu: Result<CpuTopology>,
}

impl Inventory {
    /// The first failure in stage order, or the CPU topology.
    pub fn into_result(self) -> Result<CpuTopology> {
        self.tree?;
        self.cpu
    }
}

/// Run `lshw -json` and build the inventory from it.
pub fn detect_system(store: &mut FactStore, probe: &dyn ProbeAdapter, config: &Config) -> Inventory {
    let tree = probe
        .run_command(&[config.commands.lshw.as_str(), "-json"])
        .map(|lines| lines.join("\n"));
    build_inventory(store, probe, config, tree)
}

/// Build the inventory from an already captured lshw document.
///
/// An unreadable document is a `ParseMismatch` in [`Inventory::tree`] and
/// contributes nothing. Auxiliary probes that are unavailable just omit
/// their fact. Errors from the CPU stage are kept unchanged.
pub fn detect_system_from_tree(
    store: &mut FactStore,
    probe: &dyn ProbeAdapter,
    config: &Config,
    tree: &str,
) -> Inventory {
    build_inventory(store, probe, config, Ok(tree.to_string()))
}

fn build_inventory(
    store: &mut FactStore,
    probe: &dyn ProbeAdapter,
    config: &Config,
    tree: Result<String>,
) -> Inventory {
    let tree = tree.and_then(|text| parse_lshw(&text)).map(|facts| {
        let count = facts.len();
        info!("Inventory: {} facts from hardware tree", count);
        store.extend(facts);
        count
    });
    if let Err(e) = &tree {
        debug!("Hardware tree skipped: {}", e);
    }

    // lshw already reports the uuid on most machines
    if store.find("system", "product", "uuid").is_none() {
        if let Some(uuid) = probe.get_uuid() {
            let uuid = uuid.trim();
            if !uuid.is_empty() {
                store.append(("system", "product", "uuid", uuid));
            }
        }
    }

    let cmds = &config.commands;
    detect_addresses(store, probe, &cmds.ip);

    if let Some(vendor) = command_line(probe, &[cmds.lsb_release.as_str(), "-is"]) {
        store.append(("system", "os", "vendor", vendor));
    }
    if let Some(version) = command_line(probe, &[cmds.lsb_release.as_str(), "-ds"]) {
        store.append(("system", "os", "version", version.trim_matches('"')));
    }
    if let Some(release) = command_line(probe, &[cmds.uname.as_str(), "-r"]) {
        store.append(("system", "kernel", "version", release));
    }
    if let Some(machine) = command_line(probe, &[cmds.uname.as_str(), "-m"]) {
        store.append(("system", "kernel", "arch", machine));
    }
    match probe.read_file("/proc/cmdline") {
        Ok(cmdline) if !cmdline.trim().is_empty() => {
            store.append(("system", "kernel", "cmdline", cmdline.trim()));
        }
        Ok(_) => {}
        Err(e) => debug!("{}", e),
    }

    if let Some(online) = command_line(probe, &[cmds.nproc.as_str()]) {
        match parse_count(&online) {
            Some(n) => store.append(Fact::new("cpu", "logical", "online", n.to_string())),
            None => debug!("Unexpected nproc output: {}", online),
        }
    }

    let cpu = detect_cpus(store, probe, config);
    Inventory { tree, cpu }
}

/// First line of an auxiliary command, `None` when it is unavailable.
fn command_line(probe: &dyn ProbeAdapter, argv: &[&str]) -> Option<String> {
    match probe.run_command(argv) {
        Ok(lines) => first_line(&lines),
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::probe::FakeProbeBuilder;

    #[test]
    fn test_invalid_tree_keeps_host_facts() {
        let fake = FakeProbeBuilder::new()
            .uuid("abc")
            .command("uname -r", "6.1.0-13-amd64")
            .command("lscpu", "CPU(s): 1")
            .build();
        let mut store = FactStore::new();
        let inventory = detect_system_from_tree(&mut store, &fake, &Config::default(), "{ not json");
        assert!(matches!(inventory.tree, Err(ProbeError::ParseMismatch { .. })));
        assert_eq!(inventory.cpu.map(|t| t.processors.len()), Ok(1));
        assert_eq!(store.find("system", "product", "uuid"), Some("abc"));
        assert_eq!(store.find("system", "kernel", "version"), Some("6.1.0-13-amd64"));
        assert_eq!(store.iter().filter(|f| f.category == "network").count(), 0);
    }

    #[test]
    fn test_uuid_from_adapter_only_when_absent() {
        let tree = r#"{"id": "h", "class": "system", "configuration": {"uuid": "from-lshw"}}"#;
        let fake = FakeProbeBuilder::new()
            .uuid("from-dmi")
            .command("lscpu", "CPU(s): 1")
            .build();
        let mut store = FactStore::new();
        detect_system_from_tree(&mut store, &fake, &Config::default(), tree)
            .into_result()
            .unwrap();
        assert_eq!(store.find("system", "product", "uuid"), Some("from-lshw"));
        assert_eq!(
            store.iter().filter(|f| f.attribute == "uuid").count(),
            1
        );
    }

    #[test]
    fn test_addresses_follow_tree_interfaces() {
        let tree = r#"{"id": "h", "class": "system", "children": [
            {"id": "network", "class": "network", "logicalname": "eno1"}]}"#;
        let fake = FakeProbeBuilder::new()
            .command("ip -o -4 addr show eno1", "2: eno1    inet 10.1.2.3/8 scope global eno1")
            .command("lscpu", "CPU(s): 1")
            .build();
        let mut store = FactStore::new();
        let inventory = detect_system_from_tree(&mut store, &fake, &Config::default(), tree);
        assert_eq!(inventory.tree, Ok(1));
        assert_eq!(store.find("network", "eno1", "ipv4"), Some("10.1.2.3"));
        assert_eq!(store.find("network", "eno1", "ipv4-netmask"), Some("255.0.0.0"));
        assert_eq!(store.find("network", "eno1", "ipv4-cidr"), Some("8"));
        assert_eq!(store.find("network", "eno1", "ipv4-network"), Some("10.0.0.0"));
    }

    #[test]
    fn test_os_version_quotes_stripped() {
        let fake = FakeProbeBuilder::new()
            .command("lsb_release -ds", "\"Ubuntu 22.04.3 LTS\"")
            .command("nproc", "garbage")
            .command("lscpu", "CPU(s): 1")
            .build();
        let mut store = FactStore::new();
        detect_system_from_tree(&mut store, &fake, &Config::default(), "[]")
            .into_result()
            .unwrap();
        assert_eq!(store.find("system", "os", "version"), Some("Ubuntu 22.04.3 LTS"));
        assert_eq!(store.find("system", "os", "vendor"), None);
        assert_eq!(store.find("cpu", "logical", "online"), None);
    }
}
