//! CPU topology stage.
//!
//! Runs `lscpu` and `lscpu -x` once each, then walks the cpufreq/smt sysfs
//! files. The number and order of sysfs reads depends only on the socket
//! and processor counts, never on which reads succeed:
//!
//! 1. `{root}/smt/control`
//! 2. `{root}/cpufreq/boost`, once per socket
//! 3. per logical processor N: `{root}/cpufreq/policy{N}/scaling_governor`
//!    then `{root}/cpu{N}/cpufreq/scaling_governor`

use crate::config::Config;
use crate::error::{ProbeError, Result};
use crate::facts::{Fact, FactStore};
use crate::parsers::lscpu::{self, Arch, NumaNode};
use crate::parsers::KeyValues;
use crate::probe::ProbeAdapter;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Socket,
    Processor,
}

/// One socket summary or one logical processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuRecord {
    pub arch: Arch,
    pub kind: RecordKind,
    pub index: usize,
    /// Attribute -> value in discovery order
    pub attributes: Vec<(String, String)>,
}

impl CpuRecord {
    pub fn resource(&self) -> String {
        match self.kind {
            RecordKind::Socket => format!("physical_{}", self.index),
            RecordKind::Processor => format!("logical_{}", self.index),
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == attribute)
            .map(|(_, v)| v.as_str())
    }

    fn facts(&self) -> Vec<Fact> {
        let resource = self.resource();
        self.attributes
            .iter()
            .map(|(attr, value)| Fact::new("cpu", resource.as_str(), attr.as_str(), value.as_str()))
            .collect()
    }
}

/// Everything the stage derived, returned alongside the appended facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuTopology {
    pub arch: Arch,
    pub sockets: Vec<CpuRecord>,
    pub processors: Vec<CpuRecord>,
    pub numa: Vec<NumaNode>,
}

/// Read a sysfs attribute; a missing file or an empty value yields `None`.
fn read_sysfs(probe: &dyn ProbeAdapter, path: &str) -> Option<String> {
    match probe.read_file(path) {
        Ok(content) => {
            let value = content.trim();
            (!value.is_empty()).then(|| value.to_string())
        }
        Err(e) => {
            debug!("{}", e);
            None
        }
    }
}

/// Detect CPU sockets, logical processors and NUMA layout.
///
/// `lscpu` is the primary input: if it is unavailable or prints no usable
/// `CPU(s)` count the stage fails with `SourceUnavailable` and appends
/// nothing. A missing `lscpu -x` only costs the NUMA masks.
pub fn detect_cpus(
    store: &mut FactStore,
    probe: &dyn ProbeAdapter,
    config: &Config,
) -> Result<CpuTopology> {
    let lscpu_cmd = config.commands.lscpu.as_str();
    let lines = probe.run_command(&[lscpu_cmd])?;
    let extended = match probe.run_command(&[lscpu_cmd, "-x"]) {
        Ok(lines) => KeyValues::parse("lscpu", &lines),
        Err(e) => {
            debug!("No extended CPU dump: {}", e);
            KeyValues::default()
        }
    };

    let dump = KeyValues::parse("lscpu", &lines);
    let processor_count = lscpu::logical_count(&dump)
        .ok_or_else(|| ProbeError::unavailable(lscpu_cmd, "no usable CPU(s) count"))?;
    let socket_count = lscpu::socket_count(&dump);
    let arch = Arch::from_dump(&dump);

    let root = config.sysfs_cpu_root.trim_end_matches('/');
    let smt = read_sysfs(probe, &format!("{}/smt/control", root));
    let boosts: Vec<Option<String>> = (0..socket_count)
        .map(|_| read_sysfs(probe, &format!("{}/cpufreq/boost", root)))
        .collect();
    let governors: Vec<Option<String>> = (0..processor_count)
        .map(|n| {
            let policy = read_sysfs(
                probe,
                &format!("{}/cpufreq/policy{}/scaling_governor", root, n),
            );
            let legacy = read_sysfs(
                probe,
                &format!("{}/cpu{}/cpufreq/scaling_governor", root, n),
            );
            policy.or(legacy)
        })
        .collect();

    let socket_attrs = lscpu::socket_attributes(&arch, &dump);
    let sockets: Vec<CpuRecord> = boosts
        .into_iter()
        .enumerate()
        .map(|(index, boost)| {
            let mut attributes = socket_attrs.clone();
            if let Some(boost) = boost {
                attributes.push(("boost".to_string(), boost));
            }
            CpuRecord {
                arch: arch.clone(),
                kind: RecordKind::Socket,
                index,
                attributes,
            }
        })
        .collect();

    let processors: Vec<CpuRecord> = governors
        .into_iter()
        .enumerate()
        .map(|(index, governor)| CpuRecord {
            arch: arch.clone(),
            kind: RecordKind::Processor,
            index,
            attributes: governor
                .map(|g| vec![("governor".to_string(), g)])
                .unwrap_or_default(),
        })
        .collect();

    let numa = lscpu::numa_nodes(&dump, &extended);

    let mut facts = vec![
        Fact::new("cpu", "physical", "number", socket_count.to_string()),
        Fact::new("cpu", "logical", "number", processor_count.to_string()),
    ];
    facts.extend(
        lscpu::hypervisor(&dump)
            .into_iter()
            .map(|(attr, value)| Fact::new("cpu", "hypervisor", attr, value)),
    );
    if let Some(smt) = smt {
        facts.push(Fact::new("cpu", "physical", "smt", smt));
    }
    facts.extend(sockets.iter().flat_map(CpuRecord::facts));
    facts.extend(processors.iter().flat_map(CpuRecord::facts));
    if let Some(count) = dump.get("NUMA node(s)") {
        facts.push(Fact::new("numa", "nodes", "count", count));
    }
    for node in &numa {
        let resource = format!("node_{}", node.id);
        if let Some(count) = node.cpu_count {
            facts.push(Fact::new("numa", resource.as_str(), "cpu_count", count.to_string()));
        }
        if let Some(mask) = &node.cpu_mask {
            facts.push(Fact::new("numa", resource.as_str(), "cpu_mask", mask.as_str()));
        }
    }

    info!(
        "CPU: {} ({} sockets, {} logical, {} facts)",
        arch.as_str(),
        socket_count,
        processor_count,
        facts.len()
    );
    store.extend(facts);

    Ok(CpuTopology {
        arch,
        sockets,
        processors,
        numa,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FakeProbeBuilder;

    const LSCPU_SMALL: &str = "Architecture:          x86_64
CPU(s):                2
Thread(s) per core:    1
Core(s) per socket:    1
Socket(s):             2
Vendor ID:             GenuineIntel
Model name:            Intel(R) Xeon(R) CPU E5-2630 v3 @ 2.40GHz";

    #[test]
    fn test_missing_cpu_count_appends_nothing() {
        let fake = FakeProbeBuilder::new()
            .command("lscpu", "Architecture: x86_64\nSocket(s): 1")
            .build();
        let mut store = FactStore::new();
        let err = detect_cpus(&mut store, &fake, &Config::default()).unwrap_err();
        assert!(matches!(err, ProbeError::SourceUnavailable { .. }));
        assert!(store.is_empty());
        assert!(fake.file_reads().is_empty());
    }

    #[test]
    fn test_sysfs_root_trailing_slash() {
        let fake = FakeProbeBuilder::new().command("lscpu", LSCPU_SMALL).build();
        let mut config = Config::default();
        config.sysfs_cpu_root = "/tmp/cpu/".to_string();
        let mut store = FactStore::new();
        detect_cpus(&mut store, &fake, &config).unwrap();
        assert_eq!(fake.file_reads()[0], "/tmp/cpu/smt/control");
    }

    #[test]
    fn test_records_and_resources() {
        let fake = FakeProbeBuilder::new()
            .command("lscpu", LSCPU_SMALL)
            .file("/sys/devices/system/cpu/cpu1/cpufreq/scaling_governor", "ondemand\n")
            .build();
        let mut store = FactStore::new();
        let topo = detect_cpus(&mut store, &fake, &Config::default()).unwrap();

        assert_eq!(topo.sockets.len(), 2);
        assert_eq!(topo.processors.len(), 2);
        assert_eq!(topo.sockets[1].resource(), "physical_1");
        assert_eq!(topo.processors[0].get("governor"), None);
        assert_eq!(topo.processors[1].get("governor"), Some("ondemand"));
        assert_eq!(store.find("cpu", "logical_1", "governor"), Some("ondemand"));
        assert_eq!(store.find("cpu", "physical_0", "vendor"), Some("GenuineIntel"));
        assert_eq!(store.find("cpu", "physical", "smt"), None);
    }
}
