//! Error types for hardware detection.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Source unavailable: {command}: {reason}")]
    SourceUnavailable { command: String, reason: String },

    #[error("Source file missing: {path}")]
    SourceFileMissing { path: String },

    #[error("Parse mismatch in {probe}: {line}")]
    ParseMismatch { probe: String, line: String },

    #[error("Child process failure ({program}): {reason}")]
    ChildProcessFailure { program: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    pub fn unavailable(command: impl Into<String>, reason: impl Into<String>) -> Self {
        ProbeError::SourceUnavailable {
            command: command.into(),
            reason: reason.into(),
        }
    }

    pub fn file_missing(path: impl Into<String>) -> Self {
        ProbeError::SourceFileMissing { path: path.into() }
    }

    pub fn mismatch(probe: impl Into<String>, line: impl Into<String>) -> Self {
        ProbeError::ParseMismatch {
            probe: probe.into(),
            line: line.into(),
        }
    }

    pub fn child_failure(program: impl Into<String>, reason: impl Into<String>) -> Self {
        ProbeError::ChildProcessFailure {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Whether a stage may swallow this error and just omit the affected facts.
    /// A primary input that is unavailable is the orchestrator's call.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProbeError::SourceUnavailable { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::SourceUnavailable { .. } => "source_unavailable",
            ProbeError::SourceFileMissing { .. } => "source_file_missing",
            ProbeError::ParseMismatch { .. } => "parse_mismatch",
            ProbeError::ChildProcessFailure { .. } => "child_process_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_policy() {
        assert!(!ProbeError::unavailable("lscpu", "not found").is_recoverable());
        assert!(ProbeError::file_missing("/sys/x").is_recoverable());
        assert!(ProbeError::mismatch("dmesg", "garbage").is_recoverable());
        assert!(ProbeError::child_failure("/lib/ld-linux.so.2", "exit status 127").is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = ProbeError::file_missing("/sys/devices/system/cpu/smt/control");
        assert_eq!(
            err.to_string(),
            "Source file missing: /sys/devices/system/cpu/smt/control"
        );
        assert_eq!(err.kind(), "source_file_missing");

        let err = ProbeError::child_failure("/lib/ld-linux.so.2", "exit status: 127");
        assert_eq!(
            err.to_string(),
            "Child process failure (/lib/ld-linux.so.2): exit status: 127"
        );
        assert!(matches!(err, ProbeError::ChildProcessFailure { ref program, .. } if program == "/lib/ld-linux.so.2"));
    }
}
