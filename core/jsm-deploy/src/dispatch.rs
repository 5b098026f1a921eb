//! Per-change dispatch to the deploy engine.
//!
//! Planning resolves everything a change needs (type definition, ignored
//! fields, service id rule) before any call is made, so a configuration hole
//! fails the whole invocation instead of surfacing as one change's error.

use crate::error::{ChangeDeployResult, FilterError};
use crate::result::{ChangeError, DeployResult};
use crate::service_id::ServiceIdSetter;
use async_trait::async_trait;
use futures::future::join_all;
use jsm_config::{ApiDefinitions, TypeDefinition};
use jsm_types::InstanceChange;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// URL-level context variables (e.g. `workspaceId`).
pub type UrlVars = BTreeMap<String, String>;

/// Everything the engine gets for one change.
pub struct DeployContext<'a> {
    /// The change, exclusively borrowed so the engine can write the service id back.
    pub change: &'a mut InstanceChange,
    pub type_definition: &'a TypeDefinition,
    pub fields_to_ignore: &'a [String],
    pub url_vars: Option<&'a UrlVars>,
    pub service_id_setter: ServiceIdSetter,
}

/// Issues the underlying calls for a single change.
#[async_trait]
pub trait DeployEngine: Send + Sync {
    /// Deploys one change. An error marks only this change as failed.
    async fn deploy_change(&self, ctx: DeployContext<'_>) -> ChangeDeployResult<()>;
}

/// A change ready to dispatch.
#[derive(Debug)]
pub struct DeployPlan<'a> {
    pub change: InstanceChange,
    pub type_definition: &'a TypeDefinition,
    pub fields_to_ignore: Vec<String>,
    pub service_id_setter: ServiceIdSetter,
}

impl<'a> DeployPlan<'a> {
    /// Resolves the plan for one change.
    pub fn new(change: InstanceChange, definitions: &'a ApiDefinitions) -> Result<Self, FilterError> {
        let type_name = change.type_name();
        let type_definition = definitions.type_definition(type_name).ok_or_else(|| {
            FilterError::MissingTypeDefinition {
                type_name: type_name.to_string(),
                elem_id: change.elem_id().clone(),
            }
        })?;
        let fields_to_ignore = type_definition.fields_to_ignore(change.action()).to_vec();
        let service_id_setter = ServiceIdSetter::for_type(type_name);
        Ok(Self {
            change,
            type_definition,
            fields_to_ignore,
            service_id_setter,
        })
    }
}

/// Plans every change, failing on the first one without a type definition.
pub fn plan_changes(
    changes: Vec<InstanceChange>,
    definitions: &ApiDefinitions,
) -> Result<Vec<DeployPlan<'_>>, FilterError> {
    changes
        .into_iter()
        .map(|change| DeployPlan::new(change, definitions))
        .collect()
}

/// Deploys every plan and folds the outcomes, keeping input order.
///
/// All changes are polled on the caller's task; each future owns its change.
pub async fn deploy_changes(
    plans: Vec<DeployPlan<'_>>,
    engine: &dyn DeployEngine,
    url_vars: Option<&UrlVars>,
) -> DeployResult {
    let outcomes = join_all(
        plans
            .into_iter()
            .map(|plan| deploy_planned_change(plan, engine, url_vars)),
    )
    .await;

    let mut result = DeployResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(change) => result.applied_changes.push(change.into()),
            Err(error) => result.errors.push(error),
        }
    }
    result
}

async fn deploy_planned_change(
    mut plan: DeployPlan<'_>,
    engine: &dyn DeployEngine,
    url_vars: Option<&UrlVars>,
) -> Result<InstanceChange, ChangeError> {
    let ctx = DeployContext {
        change: &mut plan.change,
        type_definition: plan.type_definition,
        fields_to_ignore: &plan.fields_to_ignore,
        url_vars,
        service_id_setter: plan.service_id_setter,
    };
    match engine.deploy_change(ctx).await {
        Ok(()) => {
            debug!("Deployed {} ({})", plan.change.elem_id(), plan.change.action());
            Ok(plan.change)
        }
        Err(error) => {
            warn!("Failed to deploy {}: {}", plan.change.elem_id(), error);
            Err(ChangeError::from_deploy_error(
                plan.change.elem_id().clone(),
                &error,
            ))
        }
    }
}
