//! Standard REST deploy engine.
//!
//! Turns a change plus its request config into one HTTP call:
//! - add → body is the after-instance minus ignored fields; the service id is
//!   read back from the response
//! - modify → same body; skipped when nothing but ignored fields changed
//! - remove → no body

use crate::client::DeployClient;
use crate::dispatch::{DeployContext, DeployEngine, UrlVars};
use crate::error::{ChangeDeployResult, DeployError};
use async_trait::async_trait;
use jsm_config::DeployRequestConfig;
use jsm_types::{ChangeAction, Instance, InstanceChange};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Deploys changes through a [`DeployClient`].
pub struct StandardDeployEngine {
    client: Arc<dyn DeployClient>,
}

impl StandardDeployEngine {
    pub fn new(client: Arc<dyn DeployClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DeployEngine for StandardDeployEngine {
    async fn deploy_change(&self, ctx: DeployContext<'_>) -> ChangeDeployResult<()> {
        let action = ctx.change.action();
        let request = ctx
            .type_definition
            .deploy_request(action)
            .ok_or_else(|| DeployError::NoDeployRequest {
                type_name: ctx.change.type_name().to_string(),
                action,
            })?;

        if let InstanceChange::Modify { before, after } = &*ctx.change
            && strip_fields(before.value(), ctx.fields_to_ignore)
                == strip_fields(after.value(), ctx.fields_to_ignore)
        {
            debug!("Skipping {}: no deployable difference", after.elem_id());
            return Ok(());
        }

        let instance = ctx.change.data();
        let url = resolve_url(request, instance, ctx.url_vars)?;
        let body = match action {
            ChangeAction::Remove => None,
            ChangeAction::Add | ChangeAction::Modify => {
                Some(build_body(request, instance, ctx.fields_to_ignore))
            }
        };

        debug!("{} {} for {}", request.method, url, instance.elem_id());
        let response = self
            .client
            .request(request.method, &url, body.as_ref())
            .await?;

        if action == ChangeAction::Add {
            let field = ctx.type_definition.transformation.service_id_field();
            ctx.service_id_setter
                .apply(ctx.change.data_mut(), field, &response);
        }
        Ok(())
    }
}

fn strip_fields(value: &Map<String, Value>, fields_to_ignore: &[String]) -> Map<String, Value> {
    value
        .iter()
        .filter(|(key, _)| !fields_to_ignore.contains(*key))
        .map(|(key, v)| (key.clone(), v.clone()))
        .collect()
}

fn build_body(request: &DeployRequestConfig, instance: &Instance, fields_to_ignore: &[String]) -> Value {
    let body = Value::Object(strip_fields(instance.value(), fields_to_ignore));
    match &request.deploy_as_field {
        Some(field) => {
            let mut wrapped = Map::new();
            wrapped.insert(field.clone(), body);
            Value::Object(wrapped)
        }
        None => body,
    }
}

/// Fills `{param}` placeholders in the request URL.
///
/// Lookup order: URL variables, `urlParamsToFields` mapping, then the instance
/// field of the same name.
pub fn resolve_url(
    request: &DeployRequestConfig,
    instance: &Instance,
    url_vars: Option<&UrlVars>,
) -> ChangeDeployResult<String> {
    let template = request.url.as_str();
    let mut url = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let param = &rest[start + 1..start + len];
        url.push_str(&rest[..start]);
        let value = lookup_param(param, request, instance, url_vars).ok_or_else(|| {
            DeployError::MissingUrlParam {
                param: param.to_string(),
                url: template.to_string(),
            }
        })?;
        url.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    url.push_str(rest);
    Ok(url)
}

fn lookup_param(
    param: &str,
    request: &DeployRequestConfig,
    instance: &Instance,
    url_vars: Option<&UrlVars>,
) -> Option<String> {
    if let Some(value) = url_vars.and_then(|vars| vars.get(param)) {
        return Some(value.clone());
    }
    let field = request
        .url_params_to_fields
        .get(param)
        .map(String::as_str)
        .unwrap_or(param);
    match instance.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
