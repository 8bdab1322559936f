//! Merge freshly fetched machines into the inventory cache
//!
//! Indices are preserved per machine id across merges and then compacted to
//! 1..N, so an operator's indices only move when machines appear or vanish.

use crate::error::{HvError, HvResult};
use crate::inventory::record::{CacheState, MachineRecord};
use crate::inventory::store::InventoryStore;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// How much of the inventory a fetched batch describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeScope {
    /// The batch is the whole inventory; anything missing from it is gone
    Full,
    /// The batch came from a name-filtered query; upsert only, never drop
    Filtered,
}

/// Merge `fetched` into `old` without touching disk
pub fn merge_records(
    old: &CacheState,
    fetched: Vec<MachineRecord>,
    scope: MergeScope,
    now: DateTime<Utc>,
) -> CacheState {
    let old_index: HashMap<Uuid, usize> = old.records.iter().map(|r| (r.id, r.index)).collect();
    let mut next_index = old.records.iter().map(|r| r.index).max().unwrap_or(0);

    // (assigned index, arrival order, record)
    let mut merged: Vec<(usize, usize, MachineRecord)> = Vec::with_capacity(fetched.len());
    let mut position: HashMap<Uuid, usize> = HashMap::with_capacity(fetched.len());

    for record in fetched {
        if let Some(&pos) = position.get(&record.id) {
            merged[pos].2 = record;
            continue;
        }
        let assigned = match old_index.get(&record.id) {
            Some(&index) => index,
            None => {
                next_index += 1;
                next_index
            }
        };
        position.insert(record.id, merged.len());
        let arrival = merged.len();
        merged.push((assigned, arrival, record));
    }

    let mut dropped = 0;
    if scope == MergeScope::Filtered {
        for record in &old.records {
            if !position.contains_key(&record.id) {
                let arrival = merged.len();
                merged.push((record.index, arrival, record.clone()));
            }
        }
    } else {
        dropped = old
            .records
            .iter()
            .filter(|r| !position.contains_key(&r.id))
            .count();
    }

    merged.sort_by_key(|(index, arrival, _)| (*index, *arrival));

    let records: Vec<MachineRecord> = merged
        .into_iter()
        .enumerate()
        .map(|(i, (_, _, mut record))| {
            record.index = i + 1;
            record
        })
        .collect();

    debug!(
        "Merged {} fetched machine(s) ({:?}), {} dropped, {} total",
        position.len(),
        scope,
        dropped,
        records.len()
    );

    CacheState {
        version: old.version,
        last_sync: match scope {
            MergeScope::Full => Some(now),
            MergeScope::Filtered => old.last_sync,
        },
        records,
    }
}

/// Applies merges and persists the result
#[derive(Debug, Clone)]
pub struct Reconciler {
    store: InventoryStore,
}

impl Reconciler {
    pub fn new(store: InventoryStore) -> Self {
        Self { store }
    }

    /// Merge and persist.
    ///
    /// When the save fails the returned `CachePersist` error carries the
    /// merged state in `unsaved`.
    pub fn merge(
        &self,
        old: &CacheState,
        fetched: Vec<MachineRecord>,
        scope: MergeScope,
        now: DateTime<Utc>,
    ) -> HvResult<CacheState> {
        let state = merge_records(old, fetched, scope, now);

        match self.store.save(&state) {
            Ok(()) => {
                info!("Inventory updated: {} machine(s)", state.records.len());
                Ok(state)
            }
            Err(HvError::CachePersist { path, source, .. }) => Err(HvError::CachePersist {
                path,
                source,
                unsaved: Some(Box::new(state)),
            }),
            Err(e) => Err(e),
        }
    }
}
