//! Writing server-assigned identifiers back onto deployed instances.

use jsm_config::QUEUE_TYPE;
use jsm_types::Instance;
use serde_json::{Number, Value};

/// Rule for copying the service id out of a create response.
///
/// Chosen once per change from the logical type name, before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceIdSetter {
    /// Copy the response field as-is.
    Default,
    /// Numbers become their string form; anything else is copied as-is.
    /// Queue ids are declared as strings but the API returns numbers.
    StringifyNumber,
}

impl ServiceIdSetter {
    pub fn for_type(type_name: &str) -> Self {
        match type_name {
            QUEUE_TYPE => ServiceIdSetter::StringifyNumber,
            _ => ServiceIdSetter::Default,
        }
    }

    /// Sets `instance[field]` from `response[field]`.
    ///
    /// A response without the field (or one that is not an object) clears it.
    pub fn apply(&self, instance: &mut Instance, field: &str, response: &Value) {
        let value = match (self, response.get(field)) {
            (ServiceIdSetter::StringifyNumber, Some(Value::Number(n))) => {
                Some(Value::String(number_to_string(n)))
            }
            (_, value) => value.cloned(),
        };
        match value {
            Some(value) => instance.set_value(field, value),
            None => {
                instance.remove_value(field);
            }
        }
    }
}

/// Canonical string form of a JSON number: shortest round-trip digits,
/// integral values without a fraction, exponent notation outside `[1e-6, 1e21)`.
pub fn number_to_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or_default();
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        let formatted = format!("{f:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    if f == 0.0 {
        return "0".to_string();
    }
    f.to_string()
}
