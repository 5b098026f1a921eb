//! Re-typing instances for deploy.
//!
//! JSM instances are fetched duck-typed, so their declared type is whatever
//! the fetch produced. Before deploy each instance gets a type generated from
//! its own values, named after the configured deploy type (or its own type
//! name when none is configured). The identifier is never touched.

use crate::error::{ChangeDeployResult, DeployError};
use jsm_config::{ApiDefinitions, TransformationConfig};
use jsm_types::{FieldType, Instance, ObjectType};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Returns `instance` with its declared type replaced by the deploy type.
///
/// Values are unchanged unless the type configures `deployFieldRenames`. A
/// rename onto a key the instance already holds (and that is not renamed away
/// itself) fails instead of dropping one of the two values.
pub fn replace_instance_type_for_deploy(
    instance: Instance,
    definitions: &ApiDefinitions,
) -> ChangeDeployResult<Instance> {
    let transformation = definitions
        .type_definition(instance.type_name())
        .map(|definition| &definition.transformation);

    let type_name = deploy_type_name(instance.type_name(), transformation);
    let value = match transformation {
        Some(t) if !t.deploy_field_renames.is_empty() => {
            rename_fields(instance.value(), &t.deploy_field_renames)?
        }
        _ => instance.value().clone(),
    };
    let deploy_type = generate_type(instance.elem_id().adapter(), &type_name, &value);
    Ok(instance.into_retyped(deploy_type, value))
}

fn deploy_type_name(type_name: &str, transformation: Option<&TransformationConfig>) -> String {
    transformation
        .and_then(|t| t.deploy_type_name.as_deref())
        .unwrap_or(type_name)
        .to_string()
}

fn rename_fields(
    value: &Map<String, Value>,
    renames: &BTreeMap<String, String>,
) -> ChangeDeployResult<Map<String, Value>> {
    for (from, to) in renames {
        if value.contains_key(from) && value.contains_key(to) && !renames.contains_key(to) {
            return Err(DeployError::RenameCollision {
                from: from.clone(),
                to: to.clone(),
            });
        }
    }
    Ok(value
        .iter()
        .map(|(key, v)| {
            let key = renames.get(key).unwrap_or(key);
            (key.clone(), v.clone())
        })
        .collect())
}

/// Builds an object type whose fields mirror the shapes found in `value`.
pub fn generate_type(adapter: &str, type_name: &str, value: &Map<String, Value>) -> ObjectType {
    value.iter().fold(ObjectType::new(adapter, type_name), |object_type, (name, v)| {
        object_type.with_field(name.clone(), infer_field_type(v))
    })
}

/// Infers a field shape from a value. Containers use their first element.
pub fn infer_field_type(value: &Value) -> FieldType {
    match value {
        Value::Null => FieldType::Unknown,
        Value::Bool(_) => FieldType::Boolean,
        Value::Number(_) => FieldType::Number,
        Value::String(_) => FieldType::String,
        Value::Array(items) => {
            FieldType::list(items.first().map_or(FieldType::Unknown, infer_field_type))
        }
        Value::Object(map) => {
            FieldType::map(map.values().next().map_or(FieldType::Unknown, infer_field_type))
        }
    }
}
