//! HTTP client abstraction.
//!
//! The deploy engine and the workspace resolver only need "send a JSON request,
//! get JSON back". [`HttpDeployClient`] does that over `reqwest`; the [`mock`]
//! module records calls and replays canned responses for tests.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use jsm_config::HttpMethod;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Sends JSON requests to the service.
#[async_trait]
pub trait DeployClient: Send + Sync {
    /// Sends `body` (if any) to `url` and returns the decoded response.
    /// An empty response body decodes to `Value::Null`.
    async fn request(&self, method: HttpMethod, url: &str, body: Option<&Value>)
        -> ClientResult<Value>;
}

/// Connection settings for [`HttpDeployClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Site base URL (e.g. `https://example.atlassian.net`).
    pub base_url: String,
    /// Account email for basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// API token for basic auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            user: None,
            api_token: None,
            timeout_secs: 60,
        }
    }
}

/// `reqwest`-backed client.
pub struct HttpDeployClient {
    config: HttpClientConfig,
    client: Client,
}

impl HttpDeployClient {
    pub fn new(config: HttpClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn full_url(&self, url: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), url)
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl DeployClient for HttpDeployClient {
    async fn request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let full_url = self.full_url(url);
        debug!("{} {}", method, full_url);

        let mut builder = self.client.request(to_reqwest_method(method), &full_url);
        if let Some(user) = &self.config.user {
            builder = builder.basic_auth(user, self.config.api_token.as_ref());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("{method} {url} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// A recording client for testing.
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// A request the mock received.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: HttpMethod,
        pub url: String,
        pub body: Option<Value>,
    }

    type Responses = HashMap<(HttpMethod, String), VecDeque<ClientResult<Value>>>;

    /// Replays queued responses per (method, url); unmatched requests get `null`.
    #[derive(Default)]
    pub struct MockDeployClient {
        responses: Mutex<Responses>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockDeployClient {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response for the next matching request.
        pub fn respond(&self, method: HttpMethod, url: impl Into<String>, response: ClientResult<Value>) {
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .entry((method, url.into()))
                .or_default()
                .push_back(response);
        }

        /// All requests received so far, in order.
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl DeployClient for MockDeployClient {
        async fn request(
            &self,
            method: HttpMethod,
            url: &str,
            body: Option<&Value>,
        ) -> ClientResult<Value> {
            self.requests
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(RecordedRequest {
                    method,
                    url: url.to_string(),
                    body: body.cloned(),
                });
            self.responses
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get_mut(&(method, url.to_string()))
                .and_then(VecDeque::pop_front)
                .unwrap_or(Ok(Value::Null))
        }
    }
}
