use crate::ElemId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The shape of a field on an [`ObjectType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    /// Shape could not be determined (null values, empty containers).
    Unknown,
    List(Box<FieldType>),
    Map(Box<FieldType>),
}

impl FieldType {
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn map(inner: FieldType) -> Self {
        FieldType::Map(Box::new(inner))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, FieldType::List(_) | FieldType::Map(_))
    }
}

/// A declared type: an identifier plus its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    pub elem_id: ElemId,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldType>,
}

impl ObjectType {
    /// Creates a type with no fields.
    pub fn new(adapter: &str, type_name: &str) -> Self {
        Self {
            elem_id: ElemId::new_type(adapter, type_name),
            fields: BTreeMap::new(),
        }
    }

    /// Adds a field, builder-style.
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    pub fn type_name(&self) -> &str {
        self.elem_id.type_name()
    }
}

/// A field element, as carried by field-level changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub parent: ElemId,
    pub name: String,
    pub field_type: FieldType,
}

impl Field {
    pub fn elem_id(&self) -> ElemId {
        ElemId::field(self.parent.adapter(), self.parent.type_name(), self.name.clone())
    }
}

/// A named value of a declared type.
///
/// The identifier is fixed at construction. The declared type can only be
/// swapped through [`Instance::into_retyped`], and values only written through
/// [`Instance::set_value`] / [`Instance::remove_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    elem_id: ElemId,
    ref_type: ObjectType,
    #[serde(default)]
    value: Map<String, Value>,
}

impl Instance {
    /// Creates an instance named `name` of `ref_type`.
    pub fn new(name: &str, ref_type: ObjectType, value: Map<String, Value>) -> Self {
        let elem_id = ElemId::instance(ref_type.elem_id.adapter(), ref_type.type_name(), name);
        Self {
            elem_id,
            ref_type,
            value,
        }
    }

    /// Creates an instance from a JSON object. Non-object values yield an empty map.
    pub fn from_json(name: &str, ref_type: ObjectType, value: Value) -> Self {
        let value = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(name, ref_type, value)
    }

    pub fn elem_id(&self) -> &ElemId {
        &self.elem_id
    }

    /// Logical type name, taken from the identifier rather than the declared type.
    pub fn type_name(&self) -> &str {
        self.elem_id.type_name()
    }

    pub fn ref_type(&self) -> &ObjectType {
        &self.ref_type
    }

    pub fn value(&self) -> &Map<String, Value> {
        &self.value
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: Value) {
        self.value.insert(field.into(), value);
    }

    pub fn remove_value(&mut self, field: &str) -> Option<Value> {
        self.value.remove(field)
    }

    /// Returns the same instance (same identifier) with a new declared type and value.
    #[must_use]
    pub fn into_retyped(self, ref_type: ObjectType, value: Map<String, Value>) -> Self {
        Self {
            elem_id: self.elem_id,
            ref_type,
            value,
        }
    }

    pub fn into_value(self) -> Map<String, Value> {
        self.value
    }
}

/// Anything a change can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "snake_case")]
pub enum Element {
    Instance(Instance),
    ObjectType(ObjectType),
    Field(Field),
}

impl Element {
    pub fn elem_id(&self) -> ElemId {
        match self {
            Element::Instance(instance) => instance.elem_id().clone(),
            Element::ObjectType(object_type) => object_type.elem_id.clone(),
            Element::Field(field) => field.elem_id(),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Element::Instance(instance) => instance.type_name(),
            Element::ObjectType(object_type) => object_type.type_name(),
            Element::Field(field) => field.parent.type_name(),
        }
    }

    pub fn is_instance(&self) -> bool {
        matches!(self, Element::Instance(_))
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Element::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

impl From<Instance> for Element {
    fn from(instance: Instance) -> Self {
        Element::Instance(instance)
    }
}

impl From<ObjectType> for Element {
    fn from(object_type: ObjectType) -> Self {
        Element::ObjectType(object_type)
    }
}

impl From<Field> for Element {
    fn from(field: Field) -> Self {
        Element::Field(field)
    }
}
