//! Splitting a change batch into claimed and leftover work.

use jsm_types::{Change, InstanceChange};
use std::collections::BTreeSet;

/// The two channels a batch is split into. Both keep the input order.
#[derive(Debug, Default)]
pub struct Partition {
    /// Instance changes of a supported type.
    pub in_scope: Vec<InstanceChange>,
    /// Everything else, untouched.
    pub leftover: Vec<Change>,
}

/// Claims every change whose type name is in `supported` and whose payloads
/// are all instances.
pub fn partition_changes(changes: Vec<Change>, supported: &BTreeSet<String>) -> Partition {
    let mut partition = Partition::default();
    for change in changes {
        if !supported.contains(change.type_name()) {
            partition.leftover.push(change);
            continue;
        }
        match change.into_instance_change() {
            Ok(instance_change) => partition.in_scope.push(instance_change),
            Err(change) => partition.leftover.push(change),
        }
    }
    partition
}
