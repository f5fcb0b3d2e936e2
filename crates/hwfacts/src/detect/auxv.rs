//! Auxiliary vector stage.
//!
//! For every configured personality whose loader is installed, the loader
//! runs a trivial helper with `LD_SHOW_AUXV=1` and the dump is parsed into
//! `("hw", "auxv", name, value)` facts. Each personality is isolated: a
//! failing helper only loses that personality's facts.

use crate::config::AuxvConfig;
use crate::error::ProbeError;
use crate::facts::{Fact, FactStore};
use crate::parsers::parse_auxv;
use crate::probe::ProbeAdapter;
use tracing::{debug, info, warn};

const SHOW_AUXV_ENV: (&str, &str) = ("LD_SHOW_AUXV", "1");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxvOutcome {
    /// Number of facts appended
    Recorded(usize),
    Failed(ProbeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalityReport {
    pub personality: String,
    pub outcome: AuxvOutcome,
}

/// Per-personality results of one auxv stage run, in configured order.
/// Personalities whose loader is not installed are not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuxvReport {
    pub attempted: Vec<PersonalityReport>,
}

impl AuxvReport {
    pub fn recorded(&self) -> impl Iterator<Item = &str> {
        self.attempted
            .iter()
            .filter(|r| matches!(r.outcome, AuxvOutcome::Recorded(_)))
            .map(|r| r.personality.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &PersonalityReport> {
        self.attempted
            .iter()
            .filter(|r| matches!(r.outcome, AuxvOutcome::Failed(_)))
    }
}

pub fn detect_auxv(
    store: &mut FactStore,
    probe: &dyn ProbeAdapter,
    config: &AuxvConfig,
) -> AuxvReport {
    let mut report = AuxvReport::default();

    for personality in &config.personalities {
        if !probe.is_executable(&personality.interpreter) {
            debug!(
                "Personality {} unavailable: no loader at {}",
                personality.name, personality.interpreter
            );
            continue;
        }

        let argv = [
            personality.interpreter.as_str(),
            config.helper_for(personality),
        ];
        let outcome = match probe.spawn_helper(&argv, &[SHOW_AUXV_ENV]) {
            Ok(lines) => {
                let record = parse_auxv(&personality.name, &lines);
                let count = record.entries.len();
                store.extend(
                    record
                        .entries
                        .into_iter()
                        .map(|(name, value)| Fact::new("hw", "auxv", name, value)),
                );
                AuxvOutcome::Recorded(count)
            }
            Err(e) => {
                warn!("Auxv helper failed for {}: {}", personality.name, e);
                AuxvOutcome::Failed(e)
            }
        };

        report.attempted.push(PersonalityReport {
            personality: personality.name.clone(),
            outcome,
        });
    }

    info!(
        "Auxv: {} personalities recorded, {} failed",
        report.recorded().count(),
        report.failed().count()
    );
    report
}
