//! Translate an operator-supplied name or index into a cached record

use crate::error::{HvError, HvResult};
use crate::inventory::record::{CacheState, MachineRecord};
use tracing::warn;
use uuid::Uuid;

/// Find the record carrying ordinal `index`
pub fn by_index(state: &CacheState, index: usize) -> HvResult<&MachineRecord> {
    state
        .records
        .iter()
        .find(|r| r.index == index)
        .ok_or_else(|| HvError::NotFound(format!("no machine with index {}", index)))
}

/// Find the record with durable id `id`
pub fn by_id(state: &CacheState, id: Uuid) -> HvResult<&MachineRecord> {
    state
        .records
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| HvError::NotFound(format!("no machine with id {}", id)))
}

/// Find the first record, in stored order, whose name matches exactly
pub fn by_name<'a>(state: &'a CacheState, name: &str) -> HvResult<&'a MachineRecord> {
    let mut matches = state.records.iter().filter(|r| r.name == name);
    let first = matches
        .next()
        .ok_or_else(|| HvError::NotFound(format!("no machine named '{}'", name)))?;

    let others = matches.count();
    if others > 0 {
        warn!(
            "{} machines are named '{}'; using index {}",
            others + 1,
            name,
            first.index
        );
    }
    Ok(first)
}

/// Resolve exactly one of `name` or `index`.
///
/// An empty name and index 0 count as not supplied.
pub fn resolve<'a>(
    state: &'a CacheState,
    name: Option<&str>,
    index: Option<usize>,
) -> HvResult<&'a MachineRecord> {
    let name = name.filter(|n| !n.is_empty());
    let index = index.filter(|&i| i != 0);

    match (name, index) {
        (Some(name), None) => by_name(state, name),
        (None, Some(index)) => by_index(state, index),
        (None, None) => Err(HvError::InvalidArgument(
            "a machine index or name is required".to_string(),
        )),
        (Some(_), Some(_)) => Err(HvError::InvalidArgument(
            "give a machine index or a name, not both".to_string(),
        )),
    }
}
