use crate::error::FilterError;
use crate::filter::DeployFilter;
use crate::result::{DeployResult, FilterResult};
use jsm_types::Change;
use std::sync::Arc;
use tracing::debug;

/// Runs deploy filters in order, each on the previous filter's leftovers.
#[derive(Default)]
pub struct DeployFilterRunner {
    filters: Vec<Arc<dyn DeployFilter>>,
}

impl DeployFilterRunner {
    pub fn new(filters: Vec<Arc<dyn DeployFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Arc<dyn DeployFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Returns the merged outcomes and whatever no filter claimed.
    /// Stops at the first hard error.
    pub async fn deploy(&self, changes: Vec<Change>) -> Result<FilterResult, FilterError> {
        let mut combined = DeployResult::default();
        let mut remaining = changes;

        for filter in &self.filters {
            debug!("Running deploy filter {} on {} changes", filter.name(), remaining.len());
            let FilterResult {
                deploy_result,
                leftover_changes,
            } = filter.deploy(remaining).await?;
            combined.merge(deploy_result);
            remaining = leftover_changes;
        }

        Ok(FilterResult {
            deploy_result: combined,
            leftover_changes: remaining,
        })
    }
}
