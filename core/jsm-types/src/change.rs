//! Pending changes.
//!
//! A [`Change`] is an add, modify or remove of an [`Element`]. Modify carries
//! both the before and the after payload. The identity of a change is the
//! identifier of its data (after for add/modify, before for remove) and does
//! not change while the change moves through a deploy pipeline.
//!
//! [`InstanceChange`] is the narrowed form used once a change is known to
//! carry only instances.

use crate::{ElemId, Element, Instance};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of operation a change performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Add,
    Modify,
    Remove,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Add => "add",
            ChangeAction::Modify => "modify",
            ChangeAction::Remove => "remove",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending change to any element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Change {
    Add { after: Element },
    Modify { before: Element, after: Element },
    Remove { before: Element },
}

impl Change {
    pub fn add(after: impl Into<Element>) -> Self {
        Change::Add {
            after: after.into(),
        }
    }

    pub fn modify(before: impl Into<Element>, after: impl Into<Element>) -> Self {
        Change::Modify {
            before: before.into(),
            after: after.into(),
        }
    }

    pub fn remove(before: impl Into<Element>) -> Self {
        Change::Remove {
            before: before.into(),
        }
    }

    pub fn action(&self) -> ChangeAction {
        match self {
            Change::Add { .. } => ChangeAction::Add,
            Change::Modify { .. } => ChangeAction::Modify,
            Change::Remove { .. } => ChangeAction::Remove,
        }
    }

    /// The element the change is about: after for add/modify, before for remove.
    pub fn data(&self) -> &Element {
        match self {
            Change::Add { after } | Change::Modify { after, .. } => after,
            Change::Remove { before } => before,
        }
    }

    pub fn elem_id(&self) -> ElemId {
        self.data().elem_id()
    }

    pub fn type_name(&self) -> &str {
        self.data().type_name()
    }

    /// True when every payload slot holds an instance.
    pub fn is_instance_change(&self) -> bool {
        match self {
            Change::Add { after } => after.is_instance(),
            Change::Modify { before, after } => before.is_instance() && after.is_instance(),
            Change::Remove { before } => before.is_instance(),
        }
    }

    /// Narrows to an [`InstanceChange`], handing the change back untouched if
    /// any payload is not an instance.
    pub fn into_instance_change(self) -> Result<InstanceChange, Change> {
        match self {
            Change::Add {
                after: Element::Instance(after),
            } => Ok(InstanceChange::Add { after }),
            Change::Modify {
                before: Element::Instance(before),
                after: Element::Instance(after),
            } => Ok(InstanceChange::Modify { before, after }),
            Change::Remove {
                before: Element::Instance(before),
            } => Ok(InstanceChange::Remove { before }),
            other => Err(other),
        }
    }
}

/// A pending change whose payloads are all instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InstanceChange {
    Add { after: Instance },
    Modify { before: Instance, after: Instance },
    Remove { before: Instance },
}

impl InstanceChange {
    pub fn action(&self) -> ChangeAction {
        match self {
            InstanceChange::Add { .. } => ChangeAction::Add,
            InstanceChange::Modify { .. } => ChangeAction::Modify,
            InstanceChange::Remove { .. } => ChangeAction::Remove,
        }
    }

    pub fn data(&self) -> &Instance {
        match self {
            InstanceChange::Add { after } | InstanceChange::Modify { after, .. } => after,
            InstanceChange::Remove { before } => before,
        }
    }

    pub fn data_mut(&mut self) -> &mut Instance {
        match self {
            InstanceChange::Add { after } | InstanceChange::Modify { after, .. } => after,
            InstanceChange::Remove { before } => before,
        }
    }

    pub fn before(&self) -> Option<&Instance> {
        match self {
            InstanceChange::Modify { before, .. } | InstanceChange::Remove { before } => {
                Some(before)
            }
            InstanceChange::Add { .. } => None,
        }
    }

    pub fn after(&self) -> Option<&Instance> {
        match self {
            InstanceChange::Add { after } | InstanceChange::Modify { after, .. } => Some(after),
            InstanceChange::Remove { .. } => None,
        }
    }

    pub fn elem_id(&self) -> &ElemId {
        self.data().elem_id()
    }

    pub fn type_name(&self) -> &str {
        self.data().type_name()
    }

    /// Applies `f` to every payload slot, keeping the action.
    #[must_use]
    pub fn map_instances<F>(self, mut f: F) -> Self
    where
        F: FnMut(Instance) -> Instance,
    {
        match self {
            InstanceChange::Add { after } => InstanceChange::Add { after: f(after) },
            InstanceChange::Modify { before, after } => InstanceChange::Modify {
                before: f(before),
                after: f(after),
            },
            InstanceChange::Remove { before } => InstanceChange::Remove { before: f(before) },
        }
    }

    /// Like [`InstanceChange::map_instances`], stopping at the first error.
    pub fn try_map_instances<F, E>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Instance) -> Result<Instance, E>,
    {
        Ok(match self {
            InstanceChange::Add { after } => InstanceChange::Add { after: f(after)? },
            InstanceChange::Modify { before, after } => InstanceChange::Modify {
                before: f(before)?,
                after: f(after)?,
            },
            InstanceChange::Remove { before } => InstanceChange::Remove { before: f(before)? },
        })
    }
}

impl From<InstanceChange> for Change {
    fn from(change: InstanceChange) -> Self {
        match change {
            InstanceChange::Add { after } => Change::Add {
                after: Element::Instance(after),
            },
            InstanceChange::Modify { before, after } => Change::Modify {
                before: Element::Instance(before),
                after: Element::Instance(after),
            },
            InstanceChange::Remove { before } => Change::Remove {
                before: Element::Instance(before),
            },
        }
    }
}
