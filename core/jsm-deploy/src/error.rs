//! Error types for the deploy layer.

use jsm_types::{ChangeAction, ElemId};
use thiserror::Error;

/// Result type for a single change deployment.
pub type ChangeDeployResult<T> = Result<T, DeployError>;

/// Result type for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors from the HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client could not be built.
    #[error("client setup failed: {0}")]
    Setup(String),

    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why one change failed to deploy. Reported per change, never fatal to the batch.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The type has no request configured for this action.
    #[error("no {action} deploy request configured for type {type_name}")]
    NoDeployRequest {
        type_name: String,
        action: ChangeAction,
    },

    /// A URL placeholder could not be filled.
    #[error("missing value for url parameter '{param}' in {url}")]
    MissingUrlParam { param: String, url: String },

    /// A configured rename would overwrite a field the instance already has.
    #[error("renaming field '{from}' to '{to}' would overwrite an existing field")]
    RenameCollision { from: String, to: String },

    /// Failure raised by a custom engine.
    #[error("{0}")]
    Engine(String),
}

/// Hard failures that abort a whole filter invocation.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A claimed change has no entry in the type configuration table.
    #[error("no type definition for {type_name} (change {elem_id})")]
    MissingTypeDefinition { type_name: String, elem_id: ElemId },
}
