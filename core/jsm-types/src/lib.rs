//! Core element and change model for JSM deployment.
//!
//! This crate defines the adapter-agnostic types the deploy pipeline works on:
//! - [`ElemId`]: the immutable identity of a type, instance or field
//! - [`ObjectType`] / [`FieldType`]: declared types and their field shapes
//! - [`Instance`]: a named value of a declared type
//! - [`Change`]: a pending add / modify / remove of any [`Element`]
//! - [`InstanceChange`]: the same change, narrowed to instance payloads
//!
//! Nothing here knows about HTTP, configuration tables or which types belong
//! to which subsystem. That lives in `jsm-config` and `jsm-deploy`.

mod change;
mod elem_id;
mod element;

pub use change::{Change, ChangeAction, InstanceChange};
pub use elem_id::{ElemId, ElemIdType};
pub use element::{Element, Field, FieldType, Instance, ObjectType};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in model operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid element id: {0}")]
    InvalidElemId(String),
}
