//! Parser for the loader's `LD_SHOW_AUXV=1` dump.
//!
//! ```text
//! AT_HWCAP:        bfebfbff
//! AT_PAGESZ:       4096
//! AT_PLATFORM:     x86_64
//! ```

use super::atoms::split_key_value;

/// Entries looked up on every architecture.
pub const MANDATORY_ENTRIES: &[(&str, &str)] = &[
    ("AT_HWCAP", "hwcap"),
    ("AT_HWCAP2", "hwcap2"),
    ("AT_PAGESZ", "pagesz"),
    ("AT_FLAGS", "flags"),
    ("AT_PLATFORM", "platform"),
];

/// Entries only some architectures print (e.g. POWER).
pub const OPTIONAL_ENTRIES: &[(&str, &str)] = &[("AT_BASE_PLATFORM", "base_platform")];

/// Recognized entries of one personality's dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxVectorRecord {
    pub personality: String,
    /// Short name -> raw value; mandatory entries first, then optional ones
    pub entries: Vec<(String, String)>,
}

impl AuxVectorRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a helper dump; unknown entries and malformed lines are skipped.
pub fn parse_auxv<S: AsRef<str>>(personality: &str, lines: &[S]) -> AuxVectorRecord {
    let raw: Vec<(&str, &str)> = lines
        .iter()
        .filter_map(|line| split_key_value("auxv", line.as_ref()).ok())
        .collect();

    let entries = MANDATORY_ENTRIES
        .iter()
        .chain(OPTIONAL_ENTRIES)
        .filter_map(|(at_name, short)| {
            raw.iter()
                .find(|(k, _)| k == at_name)
                .map(|(_, v)| (short.to_string(), v.to_string()))
        })
        .collect();

    AuxVectorRecord {
        personality: personality.to_string(),
        entries,
    }
}
