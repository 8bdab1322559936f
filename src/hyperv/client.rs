//! Hypervisor client abstraction
//!
//! Lets the CLI and inventory refresh run against the SSH client in
//! production and an in-memory fake in tests. Operations address a
//! machine by its durable id, never by its display name.

use crate::error::HvResult;
use crate::hyperv::model::Snapshot;
use crate::inventory::MachineRecord;
use async_trait::async_trait;
use uuid::Uuid;

/// Operations the remote Hyper-V host must support
#[async_trait]
pub trait HypervisorClient: Send + Sync {
    /// List machines, optionally restricted to one name.
    ///
    /// Returned records carry no index; the reconciler assigns it.
    async fn fetch_machines(&self, name_filter: Option<&str>) -> HvResult<Vec<MachineRecord>>;

    /// The machine with `id`, or `None` if the host no longer has it
    async fn fetch_machine(&self, id: Uuid) -> HvResult<Option<MachineRecord>>;

    /// List snapshots (checkpoints) of a machine
    async fn fetch_snapshots(&self, id: Uuid) -> HvResult<Vec<Snapshot>>;

    /// Start a machine
    async fn start(&self, id: Uuid) -> HvResult<()>;

    /// Shut a machine down; `force` turns the guest off if it does not comply
    async fn stop(&self, id: Uuid, force: bool) -> HvResult<()>;

    /// Pause (suspend) a running machine
    async fn pause(&self, id: Uuid) -> HvResult<()>;

    /// Resume a paused machine
    async fn resume(&self, id: Uuid) -> HvResult<()>;

    /// Create a snapshot of the machine's current state
    async fn create_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()>;

    /// Apply a snapshot
    async fn restore_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()>;

    /// Delete a snapshot, and its children when `recursive`
    async fn remove_snapshot(&self, id: Uuid, snapshot: &str, recursive: bool) -> HvResult<()>;

    /// Human-readable endpoint for messages
    fn endpoint(&self) -> String;
}
