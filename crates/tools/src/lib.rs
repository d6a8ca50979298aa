//! Developer tooling: field inspector and step timing.
//!
//! # Invariants
//! - Tools only read the field.

mod inspector;
mod timer;

pub use inspector::{CellInfo, FieldInspector, FieldSummary};
pub use timer::{FrameSample, StepTimer};

pub fn crate_info() -> &'static str {
    "ripple-tools v0.1.0"
}
