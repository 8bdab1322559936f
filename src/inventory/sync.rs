//! Fetch, merge and resolve against a loaded inventory

use crate::error::{HvError, HvResult};
use crate::hyperv::HypervisorClient;
use crate::inventory::reconcile::{MergeScope, Reconciler};
use crate::inventory::record::{CacheState, MachineRecord};
use crate::inventory::resolve;
use crate::inventory::staleness::StalenessPolicy;
use crate::inventory::store::InventoryStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A loaded cache together with the policy and reconciler that maintain it
#[derive(Debug)]
pub struct Inventory {
    reconciler: Reconciler,
    policy: StalenessPolicy,
    state: CacheState,
}

impl Inventory {
    /// Load the cache from `store`; unreadable or corrupt caches start empty
    pub fn open(store: InventoryStore, policy: StalenessPolicy) -> Self {
        let state = store.load_or_empty();
        debug!(
            "Loaded {} cached machine(s) from {}",
            state.records.len(),
            store.path().display()
        );
        Self {
            reconciler: Reconciler::new(store),
            policy,
            state,
        }
    }

    pub fn state(&self) -> &CacheState {
        &self.state
    }

    pub fn needs_sync(&self, now: DateTime<Utc>) -> bool {
        self.policy.needs_sync(&self.state, now)
    }

    /// Fetch from the host and merge.
    ///
    /// A name filter makes this a targeted upsert. A fetch failure leaves the
    /// cache untouched; a save failure is logged and the merged state kept.
    pub async fn refresh(
        &mut self,
        client: &dyn HypervisorClient,
        name_filter: Option<&str>,
        now: DateTime<Utc>,
    ) -> HvResult<()> {
        let scope = match name_filter {
            Some(_) => MergeScope::Filtered,
            None => MergeScope::Full,
        };
        info!("Fetching machines from {}", client.endpoint());
        let fetched = client.fetch_machines(name_filter).await?;
        self.apply(fetched, scope, now)
    }

    /// Re-read the machine with `id` and upsert it.
    ///
    /// A machine the host no longer has is left in the cache until the
    /// next full sync drops it. Returns the fresh record when there is one.
    pub async fn refresh_machine(
        &mut self,
        client: &dyn HypervisorClient,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> HvResult<Option<MachineRecord>> {
        let Some(fresh) = client.fetch_machine(id).await? else {
            debug!("{} is gone from the host", id);
            return Ok(None);
        };
        self.apply(vec![fresh], MergeScope::Filtered, now)?;
        Ok(resolve::by_id(&self.state, id).ok().cloned())
    }

    /// Merge and persist; a failed save is logged and the merged state kept
    fn apply(
        &mut self,
        fetched: Vec<MachineRecord>,
        scope: MergeScope,
        now: DateTime<Utc>,
    ) -> HvResult<()> {
        self.state = match self.reconciler.merge(&self.state, fetched, scope, now) {
            Ok(state) => state,
            Err(HvError::CachePersist {
                path,
                source,
                unsaved: Some(state),
            }) => {
                warn!(
                    "Could not save inventory cache to {}: {}",
                    path.display(),
                    source
                );
                *state
            }
            Err(e) => return Err(e),
        };
        Ok(())
    }

    /// Refresh when forced or stale; returns whether a fetch happened
    pub async fn sync_if_needed(
        &mut self,
        client: &dyn HypervisorClient,
        force: bool,
        name_filter: Option<&str>,
        now: DateTime<Utc>,
    ) -> HvResult<bool> {
        if !force && !self.needs_sync(now) {
            debug!("Inventory is fresh, skipping sync");
            return Ok(false);
        }
        self.refresh(client, name_filter, now).await?;
        Ok(true)
    }

    /// Resolve a target machine.
    ///
    /// Indices are looked up in the cache as-is. A name missing from the
    /// cache triggers a filtered fetch for that name before giving up.
    pub async fn resolve_target(
        &mut self,
        client: &dyn HypervisorClient,
        name: Option<&str>,
        index: Option<usize>,
        now: DateTime<Utc>,
    ) -> HvResult<MachineRecord> {
        let found = resolve::resolve(&self.state, name, index).cloned();
        match (found, name) {
            (Err(HvError::NotFound(_)), Some(name)) if !name.is_empty() && index.is_none() => {
                debug!("'{}' not cached, asking the host", name);
                self.refresh(client, Some(name), now).await?;
                resolve::by_name(&self.state, name).cloned()
            }
            (found, _) => found,
        }
    }
}
