//! The JSM deploy filter.

use crate::dispatch::{deploy_changes, plan_changes, DeployEngine, UrlVars};
use crate::error::FilterError;
use crate::partition::{partition_changes, Partition};
use crate::result::{ChangeError, DeployResult, FilterResult};
use crate::rewrite::replace_instance_type_for_deploy;
use crate::workspace::{WorkspaceResolver, WORKSPACE_ID_VAR};
use async_trait::async_trait;
use jsm_config::FilterConfig;
use jsm_types::{Change, InstanceChange};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One stage of a deploy pipeline.
///
/// A filter deploys the changes it owns and returns the rest untouched as
/// leftovers. Callers forward leftovers to the next filter and never
/// re-submit applied changes.
#[async_trait]
pub trait DeployFilter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deploy(&self, changes: Vec<Change>) -> Result<FilterResult, FilterError>;
}

/// Deploys JSM and Assets instance changes.
///
/// Holds no state between invocations.
pub struct JsmDeployFilter {
    config: FilterConfig,
    supported_types: BTreeSet<String>,
    engine: Arc<dyn DeployEngine>,
    workspace: Arc<dyn WorkspaceResolver>,
}

impl JsmDeployFilter {
    pub fn new(
        config: FilterConfig,
        engine: Arc<dyn DeployEngine>,
        workspace: Arc<dyn WorkspaceResolver>,
    ) -> Self {
        let supported_types = config.supported_type_names();
        Self {
            config,
            supported_types,
            engine,
            workspace,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn supported_types(&self) -> &BTreeSet<String> {
        &self.supported_types
    }
}

#[async_trait]
impl DeployFilter for JsmDeployFilter {
    fn name(&self) -> &'static str {
        "jsmDeployFilter"
    }

    async fn deploy(&self, changes: Vec<Change>) -> Result<FilterResult, FilterError> {
        let Some(definitions) = self.config.active_definitions() else {
            debug!("JSM deploy disabled, passing {} changes on", changes.len());
            return Ok(FilterResult::passthrough(changes));
        };

        let Partition { in_scope, leftover } = partition_changes(changes, &self.supported_types);

        let mut rewrite_errors = Vec::new();
        let mut type_fixed: Vec<InstanceChange> = Vec::with_capacity(in_scope.len());
        for change in in_scope {
            let elem_id = change.elem_id().clone();
            match change.try_map_instances(|instance| {
                replace_instance_type_for_deploy(instance, definitions)
            }) {
                Ok(change) => type_fixed.push(change),
                Err(error) => {
                    warn!("Cannot prepare {elem_id} for deploy: {error}");
                    rewrite_errors.push(ChangeError::from_deploy_error(elem_id, &error));
                }
            }
        }
        let plans = plan_changes(type_fixed, definitions)?;

        let url_vars: Option<UrlVars> = self
            .workspace
            .workspace_id()
            .await
            .map(|id| UrlVars::from([(WORKSPACE_ID_VAR.to_string(), id)]));

        let mut deploy_result = DeployResult {
            applied_changes: Vec::new(),
            errors: rewrite_errors,
        };
        if !plans.is_empty() {
            deploy_result.merge(deploy_changes(plans, self.engine.as_ref(), url_vars.as_ref()).await);
        }

        info!(
            "JSM deploy: {} applied, {} failed, {} left over",
            deploy_result.applied_changes.len(),
            deploy_result.errors.len(),
            leftover.len()
        );
        Ok(FilterResult {
            deploy_result,
            leftover_changes: leftover,
        })
    }
}
