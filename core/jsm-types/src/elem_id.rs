//! Element identifiers.
//!
//! An [`ElemId`] names a type, an instance of a type, or a field of a type.
//! Its full name is dot-separated: `jira.Queue`, `jira.Queue.instance.support`,
//! `jira.Queue.field.name`.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of element an [`ElemId`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElemIdType {
    Type,
    Instance,
    Field,
}

impl ElemIdType {
    /// The segment used for this kind in a full name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElemIdType::Type => "type",
            ElemIdType::Instance => "instance",
            ElemIdType::Field => "field",
        }
    }
}

impl fmt::Display for ElemIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElemIdType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "type" => Ok(ElemIdType::Type),
            "instance" => Ok(ElemIdType::Instance),
            "field" => Ok(ElemIdType::Field),
            other => Err(Error::InvalidElemId(format!("unknown id type '{other}'"))),
        }
    }
}

/// Identity of an element. Never changes for the lifetime of a change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElemId {
    adapter: String,
    type_name: String,
    id_type: ElemIdType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    name_parts: Vec<String>,
}

impl ElemId {
    /// Identifier of a type.
    #[must_use]
    pub fn new_type(adapter: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            type_name: type_name.into(),
            id_type: ElemIdType::Type,
            name_parts: Vec::new(),
        }
    }

    /// Identifier of an instance of `type_name`.
    #[must_use]
    pub fn instance(
        adapter: impl Into<String>,
        type_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            type_name: type_name.into(),
            id_type: ElemIdType::Instance,
            name_parts: vec![name.into()],
        }
    }

    /// Identifier of a field of `type_name`.
    #[must_use]
    pub fn field(
        adapter: impl Into<String>,
        type_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self {
            adapter: adapter.into(),
            type_name: type_name.into(),
            id_type: ElemIdType::Field,
            name_parts: vec![field_name.into()],
        }
    }

    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id_type(&self) -> ElemIdType {
        self.id_type
    }

    /// The element's own name: the last name part, or the type name for types.
    pub fn name(&self) -> &str {
        self.name_parts
            .last()
            .map(String::as_str)
            .unwrap_or(&self.type_name)
    }

    /// The identifier of the type this element belongs to.
    #[must_use]
    pub fn type_id(&self) -> ElemId {
        ElemId::new_type(self.adapter.clone(), self.type_name.clone())
    }

    /// Parses a full name such as `jira.Queue.instance.support`.
    pub fn parse(s: &str) -> crate::Result<Self> {
        s.parse()
    }
}

impl fmt::Display for ElemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.adapter, self.type_name)?;
        if self.id_type != ElemIdType::Type {
            write!(f, ".{}", self.id_type)?;
            for part in &self.name_parts {
                write!(f, ".{part}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for ElemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(Error::InvalidElemId(s.to_string()));
        }
        match parts.as_slice() {
            [adapter, type_name] => Ok(ElemId::new_type(*adapter, *type_name)),
            [adapter, type_name, id_type, rest @ ..] if !rest.is_empty() => {
                let id_type: ElemIdType = id_type.parse()?;
                if id_type == ElemIdType::Type {
                    return Err(Error::InvalidElemId(s.to_string()));
                }
                Ok(Self {
                    adapter: (*adapter).to_string(),
                    type_name: (*type_name).to_string(),
                    id_type,
                    name_parts: rest.iter().map(|p| (*p).to_string()).collect(),
                })
            }
            _ => Err(Error::InvalidElemId(s.to_string())),
        }
    }
}
