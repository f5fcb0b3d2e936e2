//! Probe output parsers.
//!
//! Pure functions from raw probe text to facts or intermediate records.
//! Nothing in here touches the system; the stages in [`crate::detect`]
//! fetch the text through the probe adapter and hand it over.
//!
//! # Supported Probes
//!
//! - `lscpu` / `lscpu -x`: key/value dump, per-architecture field tables
//! - `dmesg`: device capability `flags:` announcements
//! - `lshw -json`: depth-first flattening of the hardware tree
//! - `LD_SHOW_AUXV=1` loader dump: auxiliary vector entries
//! - `ethtool -a` / `lldptool -t -n`: link-layer status
//! - `ip -o -4 addr show`: IPv4 address, netmask and network
//!
//! Malformed lines are skipped, never fatal. Only a document that cannot be
//! read at all (invalid lshw JSON) is an error.

pub mod atoms;
pub mod auxv;
pub mod dmesg;
pub mod link;
pub mod lscpu;
pub mod lshw;
pub mod net;

pub use atoms::{attribute_name, cpu_list_len, parse_count, split_key_value, KeyValues};
pub use auxv::{parse_auxv, AuxVectorRecord};
pub use dmesg::{parse_dmesg, parse_flags_line};
pub use link::{parse_ethtool, parse_lldp};
pub use lscpu::{Arch, NumaNode};
pub use lshw::parse_lshw;
pub use net::{cidr_to_netmask, netmask_to_cidr, parse_ip_addr};
