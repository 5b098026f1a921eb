mod common;

use common::{crud_definition, init_tracing, instance};
use jsm_config::{DeployRequestConfig, DeployRequests, HttpMethod, TransformationConfig, TypeDefinition};
use jsm_deploy::client::mock::{MockDeployClient, RecordedRequest};
use jsm_deploy::engine::resolve_url;
use jsm_deploy::{
    ClientError, DeployContext, DeployEngine, DeployError, ServiceIdSetter, StandardDeployEngine,
    UrlVars,
};
use jsm_types::InstanceChange;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn engine_with(client: &Arc<MockDeployClient>) -> StandardDeployEngine {
    StandardDeployEngine::new(client.clone())
}

async fn deploy(
    engine: &StandardDeployEngine,
    change: &mut InstanceChange,
    definition: &TypeDefinition,
    url_vars: Option<&UrlVars>,
) -> Result<(), DeployError> {
    let fields_to_ignore = definition.fields_to_ignore(change.action()).to_vec();
    let service_id_setter = ServiceIdSetter::for_type(change.type_name());
    engine
        .deploy_change(DeployContext {
            change,
            type_definition: definition,
            fields_to_ignore: &fields_to_ignore,
            url_vars,
            service_id_setter,
        })
        .await
}

// ── Requests ────────────────────────────────────────────────────

#[tokio::test]
async fn add_posts_stripped_body_and_writes_id_back() {
    init_tracing();
    let client = Arc::new(MockDeployClient::new());
    client.respond(
        HttpMethod::Post,
        "/rest/servicedeskapi/servicedesk/SUP/queue",
        Ok(json!({"id": 12})),
    );
    let engine = engine_with(&client);
    let definition = crud_definition("/rest/servicedeskapi/servicedesk/{projectKey}/queue", &["jql"]);
    let mut change = InstanceChange::Add {
        after: instance("Queue", "q1", json!({"name": "Support", "jql": "x", "projectKey": "SUP"})),
    };

    deploy(&engine, &mut change, &definition, None).await.unwrap();

    assert_eq!(
        client.requests(),
        vec![RecordedRequest {
            method: HttpMethod::Post,
            url: "/rest/servicedeskapi/servicedesk/SUP/queue".into(),
            body: Some(json!({"name": "Support", "projectKey": "SUP"})),
        }]
    );
    assert_eq!(change.data().get("id"), Some(&json!("12")));
}

#[tokio::test]
async fn modify_puts_to_resolved_url() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = crud_definition("/rest/workinghours/calendar", &[]);
    let mut change = InstanceChange::Modify {
        before: instance("Calendar", "c1", json!({"id": 7, "name": "Old"})),
        after: instance("Calendar", "c1", json!({"id": 7, "name": "New"})),
    };

    deploy(&engine, &mut change, &definition, None).await.unwrap();

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Put);
    assert_eq!(requests[0].url, "/rest/workinghours/calendar/7");
    assert_eq!(requests[0].body, Some(json!({"id": 7, "name": "New"})));
}

#[tokio::test]
async fn modify_of_only_ignored_fields_is_skipped() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = crud_definition("/rest/workinghours/calendar", &["holidays"]);
    let mut change = InstanceChange::Modify {
        before: instance("Calendar", "c1", json!({"id": 7, "holidays": []})),
        after: instance("Calendar", "c1", json!({"id": 7, "holidays": ["2026-12-25"]})),
    };

    deploy(&engine, &mut change, &definition, None).await.unwrap();

    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn remove_sends_no_body() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = crud_definition("/rest/workinghours/calendar", &[]);
    let mut change = InstanceChange::Remove {
        before: instance("Calendar", "c1", json!({"id": "7"})),
    };

    deploy(&engine, &mut change, &definition, None).await.unwrap();

    let requests = client.requests();
    assert_eq!(requests[0].method, HttpMethod::Delete);
    assert_eq!(requests[0].url, "/rest/workinghours/calendar/7");
    assert_eq!(requests[0].body, None);
}

#[tokio::test]
async fn body_is_wrapped_under_deploy_as_field() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = TypeDefinition {
        transformation: TransformationConfig::default(),
        deploy_requests: Some(DeployRequests {
            add: Some(
                DeployRequestConfig::new(HttpMethod::Post, "/rest/servicedeskapi/portal/settings")
                    .with_deploy_as_field("settings"),
            ),
            ..Default::default()
        }),
    };
    let mut change = InstanceChange::Add {
        after: instance("PortalSettings", "p1", json!({"name": "Help"})),
    };

    deploy(&engine, &mut change, &definition, None).await.unwrap();

    assert_eq!(client.requests()[0].body, Some(json!({"settings": {"name": "Help"}})));
}

#[tokio::test]
async fn url_vars_fill_workspace_placeholder() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = crud_definition("/gateway/api/jsm/assets/workspace/{workspaceId}/v1/objectschema", &[]);
    let vars = UrlVars::from([("workspaceId".to_string(), "ws-9".to_string())]);
    let mut change = InstanceChange::Remove {
        before: instance("ObjectSchema", "s1", json!({"id": "3"})),
    };

    deploy(&engine, &mut change, &definition, Some(&vars)).await.unwrap();

    assert_eq!(
        client.requests()[0].url,
        "/gateway/api/jsm/assets/workspace/ws-9/v1/objectschema/3"
    );
}

// ── Failures ────────────────────────────────────────────────────

#[tokio::test]
async fn missing_request_for_action_is_reported() {
    let client = Arc::new(MockDeployClient::new());
    let engine = engine_with(&client);
    let definition = TypeDefinition::default();
    let mut change = InstanceChange::Add {
        after: instance("Form", "f1", json!({})),
    };

    let err = deploy(&engine, &mut change, &definition, None).await.unwrap_err();

    assert!(matches!(err, DeployError::NoDeployRequest { .. }));
    assert_eq!(err.to_string(), "no add deploy request configured for type Form");
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn client_status_error_is_propagated() {
    let client = Arc::new(MockDeployClient::new());
    client.respond(
        HttpMethod::Post,
        "/rest/workinghours/calendar",
        Err(ClientError::Status {
            status: 400,
            body: "bad".into(),
        }),
    );
    let engine = engine_with(&client);
    let definition = crud_definition("/rest/workinghours/calendar", &[]);
    let mut change = InstanceChange::Add {
        after: instance("Calendar", "c1", json!({"name": "Hours"})),
    };

    let err = deploy(&engine, &mut change, &definition, None).await.unwrap_err();

    assert!(matches!(err, DeployError::Client(ClientError::Status { status: 400, .. })));
    assert!(change.data().get("id").is_none());
}

// ── URL resolution ──────────────────────────────────────────────

#[test]
fn url_params_map_to_instance_fields() {
    let request = DeployRequestConfig::new(HttpMethod::Put, "/queue/{queueId}/order")
        .with_url_param("queueId", "id");
    let inst = instance("Queue", "q1", json!({"id": "5"}));

    assert_eq!(resolve_url(&request, &inst, None).unwrap(), "/queue/5/order");
}

#[test]
fn unresolvable_placeholder_is_an_error() {
    let request = DeployRequestConfig::new(HttpMethod::Delete, "/calendar/{id}");
    let inst = instance("Calendar", "c1", json!({"name": "no id"}));

    let err = resolve_url(&request, &inst, None).unwrap_err();

    assert!(matches!(err, DeployError::MissingUrlParam { ref param, .. } if param == "id"));
}

#[test]
fn url_without_placeholders_is_unchanged() {
    let request = DeployRequestConfig::new(HttpMethod::Post, "/rest/workinghours/calendar");
    let inst = instance("Calendar", "c1", json!({}));
    assert_eq!(resolve_url(&request, &inst, None).unwrap(), "/rest/workinghours/calendar");
}
