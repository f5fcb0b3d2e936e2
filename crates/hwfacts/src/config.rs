//! Configuration management for hwfacts.
//!
//! Loads settings from /etc/hwfacts/config.toml or uses defaults.
//! Every field has a default so a partial file is enough.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/hwfacts/config.toml";

/// External tool names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_lscpu")]
    pub lscpu: String,

    #[serde(default = "default_lshw")]
    pub lshw: String,

    #[serde(default = "default_dmesg")]
    pub dmesg: String,

    #[serde(default = "default_lsb_release")]
    pub lsb_release: String,

    #[serde(default = "default_uname")]
    pub uname: String,

    #[serde(default = "default_nproc")]
    pub nproc: String,

    #[serde(default = "default_ethtool")]
    pub ethtool: String,

    #[serde(default = "default_lldptool")]
    pub lldptool: String,

    #[serde(default = "default_dmidecode")]
    pub dmidecode: String,

    #[serde(default = "default_ip")]
    pub ip: String,
}

fn default_lscpu() -> String {
    "lscpu".to_string()
}

fn default_lshw() -> String {
    "lshw".to_string()
}

fn default_dmesg() -> String {
    "dmesg".to_string()
}

fn default_lsb_release() -> String {
    "lsb_release".to_string()
}

fn default_uname() -> String {
    "uname".to_string()
}

fn default_nproc() -> String {
    "nproc".to_string()
}

fn default_ethtool() -> String {
    "ethtool".to_string()
}

fn default_lldptool() -> String {
    "lldptool".to_string()
}

fn default_dmidecode() -> String {
    "dmidecode".to_string()
}

fn default_ip() -> String {
    "ip".to_string()
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            lscpu: default_lscpu(),
            lshw: default_lshw(),
            dmesg: default_dmesg(),
            lsb_release: default_lsb_release(),
            uname: default_uname(),
            nproc: default_nproc(),
            ethtool: default_ethtool(),
            lldptool: default_lldptool(),
            dmidecode: default_dmidecode(),
            ip: default_ip(),
        }
    }
}

/// Optional stages. Inventory (with CPU) and the serial fix always run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default = "default_true")]
    pub kernel_log: bool,

    #[serde(default = "default_true")]
    pub auxv: bool,

    #[serde(default = "default_true")]
    pub network: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            kernel_log: true,
            auxv: true,
            network: true,
        }
    }
}

/// An instruction-set flavor and the dynamic loader that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    pub interpreter: String,

    /// Program built for this personality; the loader exits nonzero on a
    /// binary of another ELF class. Falls back to `[auxv] helper`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper: Option<String>,
}

impl Personality {
    pub fn new(name: &str, interpreter: &str) -> Self {
        Self {
            name: name.to_string(),
            interpreter: interpreter.to_string(),
            helper: None,
        }
    }

    pub fn with_helper(mut self, helper: &str) -> Self {
        self.helper = Some(helper.to_string());
        self
    }
}

/// Auxiliary vector probing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxvConfig {
    /// Program the loader runs; it only has to exit 0
    #[serde(default = "default_auxv_helper")]
    pub helper: String,

    #[serde(default = "default_personalities")]
    pub personalities: Vec<Personality>,
}

fn default_auxv_helper() -> String {
    "/bin/true".to_string()
}

fn default_personalities() -> Vec<Personality> {
    vec![
        Personality::new("x86_64", "/lib64/ld-linux-x86-64.so.2"),
        Personality::new("i386", "/lib/ld-linux.so.2"),
        Personality::new("aarch64", "/lib/ld-linux-aarch64.so.1"),
        Personality::new("armhf", "/lib/ld-linux-armhf.so.3"),
        Personality::new("ppc64le", "/lib64/ld64.so.2"),
        Personality::new("ppc64", "/lib64/ld64.so.1"),
    ]
}

impl AuxvConfig {
    /// Helper program spawned under `personality`'s loader.
    pub fn helper_for<'a>(&'a self, personality: &'a Personality) -> &'a str {
        personality.helper.as_deref().unwrap_or(&self.helper)
    }
}

impl Default for AuxvConfig {
    fn default() -> Self {
        Self {
            helper: default_auxv_helper(),
            personalities: default_personalities(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Abort the run when a primary probe (lscpu, lshw, dmesg) is unavailable
    #[serde(default)]
    pub strict: bool,

    #[serde(default = "default_sysfs_cpu_root")]
    pub sysfs_cpu_root: String,

    #[serde(default = "default_dmi_uuid_path")]
    pub dmi_uuid_path: String,

    #[serde(default)]
    pub commands: CommandConfig,

    #[serde(default)]
    pub stages: StageConfig,

    #[serde(default)]
    pub auxv: AuxvConfig,
}

fn default_sysfs_cpu_root() -> String {
    "/sys/devices/system/cpu".to_string()
}

fn default_dmi_uuid_path() -> String {
    "/sys/class/dmi/id/product_uuid".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: false,
            sysfs_cpu_root: default_sysfs_cpu_root(),
            dmi_uuid_path: default_dmi_uuid_path(),
            commands: CommandConfig::default(),
            stages: StageConfig::default(),
            auxv: AuxvConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH).unwrap_or_else(|e| {
            warn!("Config not found, using defaults: {:#}", e);
            Config::default()
        })
    }

    /// Load config from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Render as TOML (for `hwfactsctl default-config`)
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
