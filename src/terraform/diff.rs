use std::collections::HashSet;

use super::state::{StateEntry, TerraformState};
use crate::resource::Resource;

/// Live resources compared against what Terraform manages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriftReport {
    /// Live resources absent from state: import candidates.
    pub unmanaged: Vec<Resource>,
    /// State entries with no live counterpart.
    pub missing: Vec<StateEntry>,
    pub managed: usize,
}

impl DriftReport {
    pub fn has_drift(&self) -> bool {
        !self.unmanaged.is_empty() || !self.missing.is_empty()
    }
}

/// ARM IDs are case-insensitive, so both sides compare lower-cased.
pub fn diff(state: &TerraformState, discovered: &[Resource]) -> DriftReport {
    let in_state: HashSet<String> = state
        .entries
        .iter()
        .map(|e| e.id.to_ascii_lowercase())
        .collect();
    let live: HashSet<String> = discovered
        .iter()
        .map(|r| r.resource_id.to_ascii_lowercase())
        .collect();

    let (managed, unmanaged): (Vec<&Resource>, Vec<&Resource>) = discovered
        .iter()
        .partition(|r| in_state.contains(&r.resource_id.to_ascii_lowercase()));

    let missing = state
        .entries
        .iter()
        .filter(|e| !live.contains(&e.id.to_ascii_lowercase()))
        .cloned()
        .collect();

    let report = DriftReport {
        unmanaged: unmanaged.into_iter().cloned().collect(),
        missing,
        managed: managed.len(),
    };

    tracing::debug!(
        managed = report.managed,
        unmanaged = report.unmanaged.len(),
        missing = report.missing.len(),
        "computed drift"
    );

    report
}
