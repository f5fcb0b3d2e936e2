//! Probe adapter backed by the running system.

use super::{first_line, ProbeAdapter};
use crate::config::Config;
use crate::error::{ProbeError, Result};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::process::Command;
use tracing::debug;

/// Runs real commands and reads the real filesystem.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    dmi_uuid_path: String,
    dmidecode: String,
    ethtool: String,
    lldptool: String,
}

impl SystemProbe {
    pub fn new(config: &Config) -> Self {
        Self {
            dmi_uuid_path: config.dmi_uuid_path.clone(),
            dmidecode: config.commands.dmidecode.clone(),
            ethtool: config.commands.ethtool.clone(),
            lldptool: config.commands.lldptool.clone(),
        }
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ProbeAdapter for SystemProbe {
    fn run_command(&self, argv: &[&str]) -> Result<Vec<String>> {
        let cmdline = argv.join(" ");
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProbeError::unavailable("", "empty command"))?;

        debug!("Running command: {}", cmdline);

        // Fixed locale keeps the "Key: value" labels stable
        let output = Command::new(program)
            .args(args)
            .env("LC_ALL", "C")
            .output()
            .map_err(|e| ProbeError::unavailable(&cmdline, e.to_string()))?;

        if !output.status.success() {
            return Err(ProbeError::unavailable(&cmdline, output.status.to_string()));
        }

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect();

        if lines.iter().all(|l| l.trim().is_empty()) {
            return Err(ProbeError::unavailable(&cmdline, "no output"));
        }

        Ok(lines)
    }

    fn read_file(&self, path: &str) -> Result<String> {
        fs::read_to_string(path).map_err(|e| {
            debug!("Cannot read {}: {}", path, e);
            ProbeError::file_missing(path)
        })
    }

    fn get_uuid(&self) -> Option<String> {
        if let Ok(content) = self.read_file(&self.dmi_uuid_path) {
            let uuid = content.trim();
            if !uuid.is_empty() {
                return Some(uuid.to_string());
            }
        }

        let lines = self
            .run_command(&[self.dmidecode.as_str(), "-s", "system-uuid"])
            .ok()?;
        let uuid_lines: Vec<String> = lines
            .into_iter()
            .filter(|l| !l.trim_start().starts_with('#'))
            .collect();
        first_line(&uuid_lines)
    }

    fn get_ethtool_status(&self, interface: &str) -> Result<Vec<String>> {
        self.run_command(&[self.ethtool.as_str(), "-a", interface])
    }

    fn get_lld_status(&self, interface: &str) -> Result<Vec<String>> {
        self.run_command(&[self.lldptool.as_str(), "-t", "-n", "-i", interface])
    }

    fn is_executable(&self, path: &str) -> bool {
        fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    fn spawn_helper(&self, argv: &[&str], env: &[(&str, &str)]) -> Result<Vec<String>> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProbeError::child_failure("", "empty command"))?;

        debug!("Spawning helper: {}", argv.join(" "));

        let output = Command::new(program)
            .args(args)
            .envs(env.iter().copied())
            .output()
            .map_err(|e| ProbeError::child_failure(*program, e.to_string()))?;

        if !output.status.success() {
            return Err(ProbeError::child_failure(*program, output.status.to_string()));
        }

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let text = String::from_utf8(combined)
            .map_err(|e| ProbeError::child_failure(*program, e.to_string()))?;

        Ok(text.lines().map(String::from).collect())
    }
}
