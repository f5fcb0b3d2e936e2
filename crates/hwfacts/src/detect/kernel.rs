//! Kernel ring-buffer stage.

use crate::config::Config;
use crate::error::Result;
use crate::facts::FactStore;
use crate::parsers::parse_dmesg;
use crate::probe::ProbeAdapter;
use tracing::info;

/// Append one `(driver, bus_address, "flags", tokens)` fact per device
/// capability line. Returns how many were found; zero is not an error.
pub fn detect_kernel_flags(
    store: &mut FactStore,
    probe: &dyn ProbeAdapter,
    config: &Config,
) -> Result<usize> {
    let lines = probe.run_command(&[config.commands.dmesg.as_str()])?;
    let facts = parse_dmesg(&lines);
    let count = facts.len();
    store.extend(facts);
    info!("Kernel log: {} device flag lines", count);
    Ok(count)
}
