//! Shared fixtures for deploy filter tests.

#![allow(dead_code)]

use async_trait::async_trait;
use jsm_config::{
    ApiDefinitions, DeployRequestConfig, DeployRequests, HttpMethod, TransformationConfig,
    TypeDefinition,
};
use jsm_deploy::{ChangeDeployResult, DeployContext, DeployEngine, DeployError, ServiceIdSetter, UrlVars};
use jsm_types::{Change, ChangeAction, ElemId, Instance, ObjectType};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn object_type(type_name: &str) -> ObjectType {
    ObjectType::new("jira", type_name)
}

pub fn instance(type_name: &str, name: &str, value: Value) -> Instance {
    Instance::from_json(name, object_type(type_name), value)
}

/// A type definition with add/modify/remove requests under `base`.
pub fn crud_definition(base: &str, ignore: &[&str]) -> TypeDefinition {
    let request = |method, url: String| {
        DeployRequestConfig::new(method, url).with_fields_to_ignore(ignore.iter().copied())
    };
    TypeDefinition {
        transformation: TransformationConfig::default(),
        deploy_requests: Some(DeployRequests {
            add: Some(request(HttpMethod::Post, base.to_string())),
            modify: Some(request(HttpMethod::Put, format!("{base}/{{id}}"))),
            remove: Some(request(HttpMethod::Delete, format!("{base}/{{id}}"))),
        }),
    }
}

/// Definitions for Queue, Calendar and ObjectSchema.
pub fn sample_definitions() -> ApiDefinitions {
    ApiDefinitions::default()
        .with_type(
            "Queue",
            crud_definition("/rest/servicedeskapi/servicedesk/{projectKey}/queue", &["jql"]),
        )
        .with_type(
            "Calendar",
            crud_definition("/rest/workinghours/calendar", &["holidays"]),
        )
        .with_type(
            "ObjectSchema",
            crud_definition("/gateway/api/jsm/assets/workspace/{workspaceId}/v1/objectschema", &[]),
        )
}

/// One engine invocation as the engine saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineCall {
    pub elem_id: ElemId,
    pub action: ChangeAction,
    /// Declared type name of the payload at dispatch time.
    pub ref_type_name: String,
    pub fields_to_ignore: Vec<String>,
    pub url_vars: Option<UrlVars>,
    pub service_id_setter: ServiceIdSetter,
}

/// A [`DeployEngine`] that records every call and fails the configured changes.
#[derive(Default)]
pub struct RecordingEngine {
    calls: Mutex<Vec<EngineCall>>,
    failing: BTreeSet<String>,
    create_response: Option<Value>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every change whose element id renders as `elem_id`.
    pub fn failing(mut self, elem_id: &str) -> Self {
        self.failing.insert(elem_id.to_string());
        self
    }

    /// Treats `response` as the service's answer to every add.
    pub fn with_create_response(mut self, response: Value) -> Self {
        self.create_response = Some(response);
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeployEngine for RecordingEngine {
    async fn deploy_change(&self, ctx: DeployContext<'_>) -> ChangeDeployResult<()> {
        let elem_id = ctx.change.elem_id().clone();
        self.calls.lock().unwrap().push(EngineCall {
            elem_id: elem_id.clone(),
            action: ctx.change.action(),
            ref_type_name: ctx.change.data().ref_type().type_name().to_string(),
            fields_to_ignore: ctx.fields_to_ignore.to_vec(),
            url_vars: ctx.url_vars.cloned(),
            service_id_setter: ctx.service_id_setter,
        });

        if self.failing.contains(&elem_id.to_string()) {
            return Err(DeployError::Engine(format!("rejected {elem_id}")));
        }
        if ctx.change.action() == ChangeAction::Add
            && let Some(response) = &self.create_response
        {
            let field = ctx.type_definition.transformation.service_id_field();
            ctx.service_id_setter
                .apply(ctx.change.data_mut(), field, response);
        }
        Ok(())
    }
}

/// The element ids of `changes`, rendered.
pub fn elem_ids(changes: &[Change]) -> Vec<String> {
    changes.iter().map(|c| c.elem_id().to_string()).collect()
}
