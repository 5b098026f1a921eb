//! Deploy configuration for JSM and Assets types.
//!
//! Two layers:
//! - [`ApiDefinitions`]: the per-type table, saying how an instance is reshaped for
//!   deploy ([`TransformationConfig`]) and which request each action maps to
//!   ([`DeployRequests`])
//! - [`FilterConfig`]: whether the JSM subsystem is enabled, its API
//!   definitions, and the two groups of type names it claims
//!
//! Everything here is read-only once loaded.

mod api;
mod filter;

pub use api::{
    ApiDefinitions, DeployRequestConfig, DeployRequests, HttpMethod, TransformationConfig,
    TypeDefinition, DEFAULT_SERVICE_ID_FIELD,
};
pub use filter::{
    FetchConfig, FilterConfig, ASSETS_SUPPORTED_TYPES, JSM_DUCKTYPE_SUPPORTED_TYPES,
    OBJECT_SCHEMA_STATUS_TYPE, OBJECT_SCHEMA_TYPE, OBJECT_TYPE_TYPE, QUEUE_TYPE,
};

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
