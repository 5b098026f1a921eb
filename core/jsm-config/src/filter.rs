use crate::{ApiDefinitions, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub const QUEUE_TYPE: &str = "Queue";
pub const OBJECT_SCHEMA_TYPE: &str = "ObjectSchema";
pub const OBJECT_SCHEMA_STATUS_TYPE: &str = "ObjectSchemaStatus";
pub const OBJECT_TYPE_TYPE: &str = "ObjectType";

/// Service desk types handled through the duck-typed JSM API definitions.
pub const JSM_DUCKTYPE_SUPPORTED_TYPES: &[&str] = &[
    "RequestType",
    "CustomerPermissions",
    QUEUE_TYPE,
    "Calendar",
    "PortalGroup",
    "PortalSettings",
    "SLA",
    "Form",
];

/// Assets object-schema types deployed through the same definitions.
pub const ASSETS_SUPPORTED_TYPES: &[&str] =
    &[OBJECT_SCHEMA_TYPE, OBJECT_SCHEMA_STATUS_TYPE, OBJECT_TYPE_TYPE];

/// Fetch-side switches that also gate deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchConfig {
    #[serde(default, rename = "enableJSM")]
    pub enable_jsm: bool,
}

/// Configuration consumed by the JSM deploy filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsm_api_definitions: Option<ApiDefinitions>,
    #[serde(default = "default_jsm_types")]
    pub jsm_supported_types: Vec<String>,
    #[serde(default = "default_assets_types")]
    pub assets_supported_types: Vec<String>,
}

fn default_jsm_types() -> Vec<String> {
    JSM_DUCKTYPE_SUPPORTED_TYPES
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_assets_types() -> Vec<String> {
    ASSETS_SUPPORTED_TYPES.iter().map(|s| (*s).to_string()).collect()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            jsm_api_definitions: None,
            jsm_supported_types: default_jsm_types(),
            assets_supported_types: default_assets_types(),
        }
    }
}

impl FilterConfig {
    /// An enabled config with the given definitions and the default type groups.
    pub fn enabled(definitions: ApiDefinitions) -> Self {
        Self {
            fetch: FetchConfig { enable_jsm: true },
            jsm_api_definitions: Some(definitions),
            ..Default::default()
        }
    }

    /// The API definitions, when JSM is enabled and configured.
    pub fn active_definitions(&self) -> Option<&ApiDefinitions> {
        if self.fetch.enable_jsm {
            self.jsm_api_definitions.as_ref()
        } else {
            None
        }
    }

    /// Union of the JSM and Assets type groups.
    pub fn supported_type_names(&self) -> BTreeSet<String> {
        self.jsm_supported_types
            .iter()
            .chain(self.assets_supported_types.iter())
            .cloned()
            .collect()
    }

    /// Parses and validates a JSON config.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: FilterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        debug!("Loading filter config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        match &self.jsm_api_definitions {
            Some(definitions) => definitions.validate(),
            None => Ok(()),
        }
    }
}
