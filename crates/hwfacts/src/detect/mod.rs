//! Detection stages and the orchestrator that runs them.
//!
//! Stage order is fixed: system inventory (which ends with the CPU
//! topology), kernel log, auxiliary vector, network links, and the serial
//! fix last since it reads what the inventory wrote.
//!
//! A primary input that is unavailable (`lshw`, `lscpu`, `dmesg`) fails its
//! part of the run. In strict mode that aborts the run once the inventory
//! is complete; otherwise those facts are left out and the run goes on.
//! The hardware tree and the CPU topology are judged separately, so a
//! missing `lshw` never costs the CPU facts.

pub mod auxv;
pub mod cpu;
pub mod kernel;
pub mod network;
pub mod serial;
pub mod system;

pub use auxv::{detect_auxv, AuxvOutcome, AuxvReport, PersonalityReport};
pub use cpu::{detect_cpus, CpuRecord, CpuTopology, RecordKind};
pub use kernel::detect_kernel_flags;
pub use network::{detect_addresses, detect_links};
pub use serial::{fix_bad_serial, is_placeholder_serial, SerialFallbacks, SerialOutcome};
pub use system::{detect_system, detect_system_from_tree, Inventory};

use crate::config::Config;
use crate::error::Result;
use crate::facts::FactStore;
use crate::probe::ProbeAdapter;
use tracing::{info, warn};

/// Facts of one run plus what each stage reported.
#[derive(Debug, Clone)]
pub struct Detection {
    pub facts: FactStore,
    /// Facts taken from the hardware tree, `None` when lshw failed
    pub hardware_tree: Option<usize>,
    /// `None` when the CPU stage failed in lenient mode
    pub cpu: Option<CpuTopology>,
    pub kernel_flags: Option<usize>,
    pub auxv: Option<AuxvReport>,
    pub serial: SerialOutcome,
}

pub struct Detector<'a> {
    probe: &'a dyn ProbeAdapter,
    config: &'a Config,
}

impl<'a> Detector<'a> {
    pub fn new(probe: &'a dyn ProbeAdapter, config: &'a Config) -> Self {
        Self { probe, config }
    }

    /// Run every stage and return the ordered facts.
    pub fn run(&self) -> Result<FactStore> {
        Ok(self.detect()?.facts)
    }

    /// Run every stage and keep the per-stage results.
    pub fn detect(&self) -> Result<Detection> {
        let mut store = FactStore::new();

        let inventory = detect_system(&mut store, self.probe, self.config);
        let hardware_tree = self.stage("hardware_tree", inventory.tree)?;
        let cpu = self.stage("cpu", inventory.cpu)?;

        let kernel_flags = if self.config.stages.kernel_log {
            self.stage(
                "kernel_log",
                detect_kernel_flags(&mut store, self.probe, self.config),
            )?
        } else {
            None
        };

        let auxv = self
            .config
            .stages
            .auxv
            .then(|| detect_auxv(&mut store, self.probe, &self.config.auxv));

        if self.config.stages.network {
            detect_links(&mut store, self.probe);
        }

        let fallbacks = SerialFallbacks::from_store(&store);
        let serial = fix_bad_serial(&mut store, &fallbacks);

        info!("Detection complete: {} facts", store.len());
        Ok(Detection {
            facts: store,
            hardware_tree,
            cpu,
            kernel_flags,
            auxv,
            serial,
        })
    }

    /// Apply the strict/lenient policy to a stage result.
    fn stage<T>(&self, name: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if self.config.strict && !e.is_recoverable() => Err(e),
            Err(e) => {
                warn!("Stage {} skipped ({}): {}", name, e.kind(), e);
                Ok(None)
            }
        }
    }
}
