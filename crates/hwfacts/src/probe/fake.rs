//! Fake probe adapter for deterministic testing.
//!
//! Serves pre-configured outputs without touching the system and records
//! every call in order, so tests can assert the exact probe sequence.
//!
//! ```rust,ignore
//! let fake = FakeProbeBuilder::new()
//!     .command("lscpu", LSCPU)
//!     .file("/sys/devices/system/cpu/smt/control", "on")
//!     .build();
//! ```

use super::ProbeAdapter;
use crate::error::{ProbeError, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCall {
    Command(String),
    ReadFile(String),
    Uuid,
    Ethtool(String),
    Lldp(String),
    IsExecutable(String),
    /// Space-joined argv and the extra environment, in given order
    Helper {
        argv: String,
        env: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone)]
enum HelperResponse {
    Output(String),
    Failure(String),
}

pub struct FakeProbe {
    /// Space-joined argv -> stdout
    commands: HashMap<String, String>,
    files: HashMap<String, String>,
    uuid: Option<String>,
    ethtool: HashMap<String, String>,
    lldp: HashMap<String, String>,
    executables: HashSet<String>,
    /// Helper program (argv[0]) -> response
    helpers: HashMap<String, HelperResponse>,
    calls: Mutex<Vec<ProbeCall>>,
}

impl FakeProbe {
    /// A fake with nothing configured: every probe is unavailable.
    pub fn empty() -> Self {
        FakeProbeBuilder::new().build()
    }

    pub fn calls(&self) -> Vec<ProbeCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Paths passed to `read_file`, in call order.
    pub fn file_reads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProbeCall::ReadFile(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Command lines passed to `run_command`, in call order.
    pub fn commands_run(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ProbeCall::Command(cmd) => Some(cmd),
                _ => None,
            })
            .collect()
    }

    pub fn reset_calls(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: ProbeCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

fn to_lines(command: &str, output: Option<&String>) -> Result<Vec<String>> {
    let output = output.ok_or_else(|| ProbeError::unavailable(command, "not found"))?;
    let lines: Vec<String> = output.lines().map(String::from).collect();
    if lines.iter().all(|l| l.trim().is_empty()) {
        return Err(ProbeError::unavailable(command, "no output"));
    }
    Ok(lines)
}

impl ProbeAdapter for FakeProbe {
    fn run_command(&self, argv: &[&str]) -> Result<Vec<String>> {
        let cmdline = argv.join(" ");
        self.record(ProbeCall::Command(cmdline.clone()));
        to_lines(&cmdline, self.commands.get(&cmdline))
    }

    fn read_file(&self, path: &str) -> Result<String> {
        self.record(ProbeCall::ReadFile(path.to_string()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProbeError::file_missing(path))
    }

    fn get_uuid(&self) -> Option<String> {
        self.record(ProbeCall::Uuid);
        self.uuid.clone()
    }

    fn get_ethtool_status(&self, interface: &str) -> Result<Vec<String>> {
        self.record(ProbeCall::Ethtool(interface.to_string()));
        to_lines(&format!("ethtool -a {}", interface), self.ethtool.get(interface))
    }

    fn get_lld_status(&self, interface: &str) -> Result<Vec<String>> {
        self.record(ProbeCall::Lldp(interface.to_string()));
        to_lines(
            &format!("lldptool -t -n -i {}", interface),
            self.lldp.get(interface),
        )
    }

    fn is_executable(&self, path: &str) -> bool {
        self.record(ProbeCall::IsExecutable(path.to_string()));
        self.executables.contains(path)
    }

    fn spawn_helper(&self, argv: &[&str], env: &[(&str, &str)]) -> Result<Vec<String>> {
        self.record(ProbeCall::Helper {
            argv: argv.join(" "),
            env: env
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let program = argv.first().copied().unwrap_or_default();
        match self.helpers.get(program) {
            Some(HelperResponse::Output(out)) => Ok(out.lines().map(String::from).collect()),
            Some(HelperResponse::Failure(reason)) => {
                Err(ProbeError::child_failure(program, reason.clone()))
            }
            None => Err(ProbeError::child_failure(program, "No such file or directory")),
        }
    }
}

/// Builder for [`FakeProbe`].
#[derive(Default)]
pub struct FakeProbeBuilder {
    commands: HashMap<String, String>,
    files: HashMap<String, String>,
    uuid: Option<String>,
    ethtool: HashMap<String, String>,
    lldp: HashMap<String, String>,
    executables: HashSet<String>,
    helpers: HashMap<String, HelperResponse>,
}

impl FakeProbeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output for a command line, given as space-joined argv (e.g. `"lscpu -x"`).
    pub fn command(mut self, cmdline: &str, output: &str) -> Self {
        self.commands.insert(cmdline.to_string(), output.to_string());
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    pub fn ethtool(mut self, interface: &str, output: &str) -> Self {
        self.ethtool.insert(interface.to_string(), output.to_string());
        self
    }

    pub fn lldp(mut self, interface: &str, output: &str) -> Self {
        self.lldp.insert(interface.to_string(), output.to_string());
        self
    }

    pub fn executable(mut self, path: &str) -> Self {
        self.executables.insert(path.to_string());
        self
    }

    /// Helper output for a program (the helper's argv[0]).
    pub fn helper(mut self, program: &str, output: &str) -> Self {
        self.helpers
            .insert(program.to_string(), HelperResponse::Output(output.to_string()));
        self
    }

    pub fn failing_helper(mut self, program: &str, reason: &str) -> Self {
        self.helpers
            .insert(program.to_string(), HelperResponse::Failure(reason.to_string()));
        self
    }

    pub fn build(self) -> FakeProbe {
        FakeProbe {
            commands: self.commands,
            files: self.files,
            uuid: self.uuid,
            ethtool: self.ethtool,
            lldp: self.lldp,
            executables: self.executables,
            helpers: self.helpers,
            calls: Mutex::new(Vec::new()),
        }
    }
}
