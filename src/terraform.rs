//! Terraform state reading and drift detection against live resources.

mod diff;
mod state;

pub use diff::{DriftReport, diff};
pub use state::{StateEntry, StateError, TerraformState};
