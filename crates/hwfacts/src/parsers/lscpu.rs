//! Parser for `lscpu` and `lscpu -x` dumps.
//!
//! The labels lscpu prints depend on the architecture, so socket fields are
//! selected from a per-architecture table rather than probed one by one.

use super::atoms::{cpu_list_len, parse_count, KeyValues};
use std::collections::HashSet;

/// CPU architecture as reported by the `Architecture:` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    Aarch64,
    Ppc64le,
    Other(String),
}

impl Arch {
    pub fn from_dump(dump: &KeyValues) -> Self {
        match dump.get("Architecture") {
            Some("x86_64") => Arch::X86_64,
            Some("aarch64") => Arch::Aarch64,
            Some("ppc64le") => Arch::Ppc64le,
            Some(other) => Arch::Other(other.to_string()),
            None => Arch::Other("unknown".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Ppc64le => "ppc64le",
            Arch::Other(name) => name,
        }
    }

    /// Dump label -> attribute name for per-socket facts.
    pub fn socket_fields(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Arch::X86_64 => X86_64_FIELDS,
            Arch::Aarch64 => AARCH64_FIELDS,
            Arch::Ppc64le => PPC64LE_FIELDS,
            Arch::Other(_) => GENERIC_FIELDS,
        }
    }
}

const X86_64_FIELDS: &[(&str, &str)] = &[
    ("Vendor ID", "vendor"),
    ("Model name", "product"),
    ("CPU family", "family"),
    ("Model", "model"),
    ("Stepping", "stepping"),
    ("CPU MHz", "current_Mhz"),
    ("CPU min MHz", "min_Mhz"),
    ("CPU max MHz", "max_Mhz"),
    ("L1d cache", "l1d"),
    ("L1i cache", "l1i"),
    ("L2 cache", "l2"),
    ("L3 cache", "l3"),
    ("Flags", "flags"),
];

const AARCH64_FIELDS: &[(&str, &str)] = &[
    ("Vendor ID", "implementer"),
    ("Model name", "part"),
    ("Model", "model"),
    ("Stepping", "stepping"),
    ("CPU min MHz", "min_Mhz"),
    ("CPU max MHz", "max_Mhz"),
    ("BogoMIPS", "bogomips"),
    ("L1d cache", "l1d"),
    ("L1i cache", "l1i"),
    ("L2 cache", "l2"),
    ("L3 cache", "l3"),
    ("Flags", "flags"),
];

const PPC64LE_FIELDS: &[(&str, &str)] = &[
    ("Model name", "product"),
    ("Model", "model"),
    ("CPU min MHz", "min_Mhz"),
    ("CPU max MHz", "max_Mhz"),
    ("L1d cache", "l1d"),
    ("L1i cache", "l1i"),
    ("L2 cache", "l2"),
    ("L3 cache", "l3"),
];

const GENERIC_FIELDS: &[(&str, &str)] = &[
    ("Vendor ID", "vendor"),
    ("Model name", "product"),
    ("Flags", "flags"),
];

const CORE_KEYS: &[&str] = &["Core(s) per socket", "Core(s) per cluster"];

/// Per-socket attributes in the order lscpu printed them.
pub fn socket_attributes(arch: &Arch, dump: &KeyValues) -> Vec<(String, String)> {
    let fields = arch.socket_fields();
    let threads_per_core = dump.count("Thread(s) per core");
    let mut seen = HashSet::new();
    let mut attrs = Vec::new();

    for (key, value) in dump.iter() {
        if let Some((_, attr)) = fields.iter().find(|(label, _)| *label == key) {
            if seen.insert(*attr) {
                attrs.push((attr.to_string(), value.to_string()));
            }
        } else if CORE_KEYS.contains(&key) && seen.insert("cores") {
            attrs.push(("cores".to_string(), value.to_string()));
            let threads = parse_count(value)
                .zip(threads_per_core)
                .and_then(|(cores, tpc)| cores.checked_mul(tpc));
            if let Some(threads) = threads {
                attrs.push(("threads".to_string(), threads.to_string()));
            }
        }
    }

    attrs
}

/// Socket count: `Socket(s)`, then `Cluster(s)`, then 1.
pub fn socket_count(dump: &KeyValues) -> usize {
    ["Socket(s)", "Cluster(s)"]
        .iter()
        .filter_map(|key| dump.count(key))
        .find(|n| *n > 0)
        .unwrap_or(1)
}

/// Logical processor count from `CPU(s)`.
pub fn logical_count(dump: &KeyValues) -> Option<usize> {
    dump.count("CPU(s)")
}

/// `(vendor, type)` in virtualized contexts.
pub fn hypervisor(dump: &KeyValues) -> Vec<(String, String)> {
    [("Hypervisor vendor", "vendor"), ("Virtualization type", "type")]
        .iter()
        .filter_map(|(key, attr)| dump.get(key).map(|v| (attr.to_string(), v.to_string())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumaNode {
    /// Node number as printed; numbering may be sparse (0, 8, ...)
    pub id: String,
    pub cpu_count: Option<usize>,
    pub cpu_mask: Option<String>,
}

/// NUMA nodes from the list dump, with masks from the `-x` dump.
pub fn numa_nodes(dump: &KeyValues, extended: &KeyValues) -> Vec<NumaNode> {
    dump.iter()
        .filter_map(|(key, value)| {
            let id = key.strip_prefix("NUMA node")?.strip_suffix(" CPU(s)")?;
            if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
            Some(NumaNode {
                id: id.to_string(),
                cpu_count: cpu_list_len(value),
                cpu_mask: extended.get(key).map(String::from),
            })
        })
        .collect()
}
