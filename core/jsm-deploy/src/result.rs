use crate::error::DeployError;
use jsm_types::{Change, ElemId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
}

/// A failed change, keyed by its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeError {
    pub elem_id: ElemId,
    pub message: String,
    pub severity: Severity,
}

impl ChangeError {
    pub fn from_deploy_error(elem_id: ElemId, error: &DeployError) -> Self {
        Self {
            elem_id,
            message: error.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Outcome of deploying a batch: each change is either applied or errored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployResult {
    pub applied_changes: Vec<Change>,
    pub errors: Vec<ChangeError>,
}

impl DeployResult {
    pub fn is_empty(&self) -> bool {
        self.applied_changes.is_empty() && self.errors.is_empty()
    }

    /// Appends another result's outcomes after this one's.
    pub fn merge(&mut self, other: DeployResult) {
        self.applied_changes.extend(other.applied_changes);
        self.errors.extend(other.errors);
    }
}

/// What a deploy filter returns: its own outcomes plus the changes it did not claim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    pub deploy_result: DeployResult,
    pub leftover_changes: Vec<Change>,
}

impl FilterResult {
    /// Claims nothing; every change is passed on as-is.
    pub fn passthrough(changes: Vec<Change>) -> Self {
        Self {
            deploy_result: DeployResult::default(),
            leftover_changes: changes,
        }
    }
}
