//! hwfacts - hardware fact normalization.
//!
//! Turns the raw output of local system probes (lscpu, dmesg, lshw, the
//! loader's auxiliary vector dump) into one ordered list of
//! `(category, resource, attribute, value)` facts.
//!
//! Probes go through [`ProbeAdapter`]; the stages in [`detect`] append to a
//! single [`FactStore`] owned by the caller for one run.

pub mod config;
pub mod detect;
pub mod error;
pub mod facts;
pub mod parsers;
pub mod probe;

pub use config::Config;
pub use detect::Detector;
pub use error::{ProbeError, Result};
pub use facts::{Fact, FactStore};
pub use probe::{FakeProbe, FakeProbeBuilder, ProbeAdapter, ProbeCall, SystemProbe};
