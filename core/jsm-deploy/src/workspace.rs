//! Assets workspace id resolution.
//!
//! Assets endpoints are scoped by a workspace id that is only known at run
//! time. Resolution is best effort: any failure means "no workspace", and the
//! deploy proceeds without the `workspaceId` URL variable.

use crate::client::DeployClient;
use async_trait::async_trait;
use jsm_config::HttpMethod;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// URL variable the resolved id is exposed as.
pub const WORKSPACE_ID_VAR: &str = "workspaceId";

/// Endpoint listing the site's Assets workspaces.
pub const WORKSPACE_URL: &str = "/rest/servicedeskapi/assets/workspace";

/// Resolves the workspace-scoped context identifier.
#[async_trait]
pub trait WorkspaceResolver: Send + Sync {
    async fn workspace_id(&self) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct WorkspaceResponse {
    values: Vec<WorkspaceEntry>,
}

#[derive(Debug, Deserialize)]
struct WorkspaceEntry {
    #[serde(rename = "workspaceId")]
    workspace_id: String,
}

/// Looks the workspace id up through the service API.
pub struct ClientWorkspaceResolver {
    client: Arc<dyn DeployClient>,
}

impl ClientWorkspaceResolver {
    pub fn new(client: Arc<dyn DeployClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WorkspaceResolver for ClientWorkspaceResolver {
    async fn workspace_id(&self) -> Option<String> {
        let response = match self.client.request(HttpMethod::Get, WORKSPACE_URL, None).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to get workspace id: {e}");
                return None;
            }
        };
        match serde_json::from_value::<WorkspaceResponse>(response) {
            Ok(parsed) => {
                let id = parsed.values.into_iter().next().map(|entry| entry.workspace_id);
                if id.is_none() {
                    debug!("Workspace response has no entries");
                }
                id
            }
            Err(e) => {
                debug!("Received invalid workspace response: {e}");
                None
            }
        }
    }
}

/// A fixed answer, for callers that already know the workspace (or that there is none).
#[derive(Debug, Clone, Default)]
pub struct StaticWorkspace(Option<String>);

impl StaticWorkspace {
    pub fn new(workspace_id: impl Into<String>) -> Self {
        Self(Some(workspace_id.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

#[async_trait]
impl WorkspaceResolver for StaticWorkspace {
    async fn workspace_id(&self) -> Option<String> {
        self.0.clone()
    }
}
