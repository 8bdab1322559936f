//! Local inventory cache
//!
//! Maps short-lived ordinal indices to durable machine identities:
//! - `store`: atomic on-disk persistence of the cache
//! - `staleness`: when cached data must be refreshed
//! - `reconcile`: merging fetched machines while keeping indices stable
//! - `resolve`: name/index lookups against a snapshot
//! - `sync`: the fetch-merge-resolve flow used by commands

pub mod reconcile;
pub mod record;
pub mod resolve;
pub mod staleness;
pub mod store;
mod sync;

pub use reconcile::{merge_records, MergeScope, Reconciler};
pub use record::{CacheState, MachineRecord, MachineState, CACHE_VERSION};
pub use staleness::{needs_sync, StalenessPolicy};
pub use store::InventoryStore;
pub use sync::Inventory;
