//! Kernel ring-buffer parser.
//!
//! Picks out device capability announcements such as
//! `ahci 0000:00:1f.2: flags: 64bit ncq ...`.

use crate::error::{ProbeError, Result};
use crate::facts::Fact;
use once_cell::sync::Lazy;
use regex::Regex;

static FLAGS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\[[^\]]*\]\s*)?(\S+)\s+([0-9a-fA-F]{4}:[0-9a-fA-F]{2}:[0-9a-fA-F]{2}\.[0-7]:)\s+flags:\s+(.*\S)\s*$",
    )
    .expect("flags line regex is valid")
});

/// Parse one capability line into `(driver, bus_address, "flags", tokens)`.
pub fn parse_flags_line(line: &str) -> Result<Fact> {
    let caps = FLAGS_LINE
        .captures(line)
        .ok_or_else(|| ProbeError::mismatch("dmesg", line))?;
    let tokens = caps[3].split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(Fact::new(&caps[1], &caps[2], "flags", tokens))
}

/// All capability facts in print order; non-matching lines are skipped.
pub fn parse_dmesg<S: AsRef<str>>(lines: &[S]) -> Vec<Fact> {
    lines
        .iter()
        .filter_map(|line| parse_flags_line(line.as_ref()).ok())
        .collect()
}
