use crate::{ConfigError, ConfigResult};
use jsm_types::ChangeAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Field read from a create response when a type does not name one.
pub const DEFAULT_SERVICE_ID_FIELD: &str = "id";

/// HTTP method of a deploy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One deploy request: where to send a change and what to leave out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequestConfig {
    /// URL template; `{name}` placeholders are filled from URL variables or
    /// instance values.
    pub url: String,
    pub method: HttpMethod,
    /// Top-level instance fields never sent to the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields_to_ignore: Vec<String>,
    /// Placeholder name → instance field holding its value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub url_params_to_fields: BTreeMap<String, String>,
    /// Wrap the request body under this key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_as_field: Option<String>,
}

impl DeployRequestConfig {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            fields_to_ignore: Vec::new(),
            url_params_to_fields: BTreeMap::new(),
            deploy_as_field: None,
        }
    }

    pub fn with_fields_to_ignore<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields_to_ignore = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_url_param(mut self, param: impl Into<String>, field: impl Into<String>) -> Self {
        self.url_params_to_fields.insert(param.into(), field.into());
        self
    }

    pub fn with_deploy_as_field(mut self, field: impl Into<String>) -> Self {
        self.deploy_as_field = Some(field.into());
        self
    }
}

/// Deploy requests keyed by change action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRequests {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<DeployRequestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify: Option<DeployRequestConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove: Option<DeployRequestConfig>,
}

impl DeployRequests {
    pub fn get(&self, action: ChangeAction) -> Option<&DeployRequestConfig> {
        match action {
            ChangeAction::Add => self.add.as_ref(),
            ChangeAction::Modify => self.modify.as_ref(),
            ChangeAction::Remove => self.remove.as_ref(),
        }
    }

    fn iter(&self) -> impl Iterator<Item = (ChangeAction, &DeployRequestConfig)> {
        [
            (ChangeAction::Add, self.add.as_ref()),
            (ChangeAction::Modify, self.modify.as_ref()),
            (ChangeAction::Remove, self.remove.as_ref()),
        ]
        .into_iter()
        .filter_map(|(action, request)| request.map(|r| (action, r)))
    }
}

/// How an instance of a type is reshaped before it is deployed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationConfig {
    /// Response field carrying the identifier the service assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id_field: Option<String>,
    /// Name of the type the deploy engine should see. Defaults to the
    /// instance's own type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_type_name: Option<String>,
    /// Top-level value keys renamed on the way to the deploy engine.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub deploy_field_renames: BTreeMap<String, String>,
}

impl TransformationConfig {
    pub fn service_id_field(&self) -> &str {
        self.service_id_field
            .as_deref()
            .unwrap_or(DEFAULT_SERVICE_ID_FIELD)
    }
}

/// Everything configured for one logical type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    #[serde(default)]
    pub transformation: TransformationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_requests: Option<DeployRequests>,
}

impl TypeDefinition {
    pub fn deploy_request(&self, action: ChangeAction) -> Option<&DeployRequestConfig> {
        self.deploy_requests.as_ref().and_then(|r| r.get(action))
    }

    /// Fields to leave out for `action`; empty when no request is configured.
    pub fn fields_to_ignore(&self, action: ChangeAction) -> &[String] {
        self.deploy_request(action)
            .map(|r| r.fields_to_ignore.as_slice())
            .unwrap_or(&[])
    }
}

/// The type configuration table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDefinitions {
    #[serde(default)]
    pub types: BTreeMap<String, TypeDefinition>,
}

impl ApiDefinitions {
    pub fn type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        self.types.get(type_name)
    }

    /// Adds a type definition, builder-style.
    pub fn with_type(mut self, type_name: impl Into<String>, definition: TypeDefinition) -> Self {
        self.types.insert(type_name.into(), definition);
        self
    }

    /// Checks that every configured request has a URL and that renames do not
    /// collapse two fields into one.
    pub fn validate(&self) -> ConfigResult<()> {
        for (type_name, definition) in &self.types {
            if let Some(requests) = &definition.deploy_requests {
                for (action, request) in requests.iter() {
                    if request.url.trim().is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "{type_name}: {action} request has an empty url"
                        )));
                    }
                }
            }
            let renames = &definition.transformation.deploy_field_renames;
            let mut targets: Vec<&String> = renames.values().collect();
            targets.sort();
            targets.dedup();
            if targets.len() != renames.len() {
                return Err(ConfigError::Invalid(format!(
                    "{type_name}: deployFieldRenames maps two fields to the same name"
                )));
            }
        }
        Ok(())
    }
}
