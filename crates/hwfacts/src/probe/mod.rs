//! Probe adapter abstraction.
//!
//! Every command execution, file read and helper spawn performed during a
//! detection run goes through [`ProbeAdapter`]. Production code uses
//! [`SystemProbe`]; tests use [`FakeProbe`], which serves canned output and
//! records the exact order of calls.
//!
//! All calls are blocking and attempted once. Bounding latency is the
//! caller's business.

mod fake;
mod system;

pub use fake::{FakeProbe, FakeProbeBuilder, ProbeCall};
pub use system::SystemProbe;

use crate::error::Result;

pub trait ProbeAdapter {
    /// Run a command and return its stdout lines.
    /// Fails with `SourceUnavailable` when the binary is missing, exits
    /// nonzero, or prints nothing.
    fn run_command(&self, argv: &[&str]) -> Result<Vec<String>>;

    /// Read a text file. Fails with `SourceFileMissing`.
    fn read_file(&self, path: &str) -> Result<String>;

    /// Chassis UUID, if the platform exposes one.
    fn get_uuid(&self) -> Option<String>;

    /// Raw `ethtool` pause-parameter lines for an interface.
    fn get_ethtool_status(&self, interface: &str) -> Result<Vec<String>>;

    /// Raw LLDP neighbour TLV lines for an interface.
    fn get_lld_status(&self, interface: &str) -> Result<Vec<String>>;

    /// Whether `path` is an executable regular file.
    fn is_executable(&self, path: &str) -> bool;

    /// Spawn a short-lived helper with extra environment and return its
    /// combined output lines. Fails with `ChildProcessFailure`.
    fn spawn_helper(&self, argv: &[&str], env: &[(&str, &str)]) -> Result<Vec<String>>;
}

/// First non-blank line of a command's output, trimmed.
pub(crate) fn first_line(lines: &[String]) -> Option<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .map(String::from)
}
