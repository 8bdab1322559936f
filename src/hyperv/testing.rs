//! In-memory Hyper-V host for tests

use crate::error::{HvError, HvResult};
use crate::hyperv::client::HypervisorClient;
use crate::hyperv::model::Snapshot;
use crate::inventory::{MachineRecord, MachineState};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Host {
    machines: Vec<MachineRecord>,
    snapshots: HashMap<Uuid, Vec<Snapshot>>,
    fail_fetches: bool,
    fetches: usize,
    last_filter: Option<String>,
    last_id: Option<Uuid>,
    calls: Vec<String>,
}

impl Host {
    fn machine_mut(&mut self, id: Uuid) -> HvResult<&mut MachineRecord> {
        self.machines
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| HvError::remote("fake", format!("no VM with id {}", id)))
    }
}

/// Fake host that records calls and mutates its machines like Hyper-V would
#[derive(Default)]
pub struct FakeHypervisor {
    host: Mutex<Host>,
}

impl FakeHypervisor {
    pub fn with_machines(machines: Vec<MachineRecord>) -> Self {
        let fake = Self::default();
        fake.host.lock().unwrap().machines = machines;
        fake
    }

    pub fn add_machine(&self, machine: MachineRecord) {
        self.host.lock().unwrap().machines.push(machine);
    }

    pub fn remove_machine(&self, name: &str) {
        self.host.lock().unwrap().machines.retain(|m| m.name != name);
    }

    /// Rename a machine on the host without touching any cache
    pub fn rename_machine(&self, id: Uuid, name: &str) {
        if let Ok(machine) = self.host.lock().unwrap().machine_mut(id) {
            machine.name = name.to_string();
        }
    }

    /// Id of the first machine named `vm`
    pub fn id_of(&self, vm: &str) -> Uuid {
        self.host
            .lock()
            .unwrap()
            .machines
            .iter()
            .find(|m| m.name == vm)
            .map(|m| m.id)
            .unwrap()
    }

    pub fn add_snapshot(&self, vm: &str, name: &str, parent: Option<&str>) {
        let id = self.id_of(vm);
        self.push_snapshot(id, name, parent);
    }

    fn push_snapshot(&self, id: Uuid, name: &str, parent: Option<&str>) {
        self.host
            .lock()
            .unwrap()
            .snapshots
            .entry(id)
            .or_default()
            .push(Snapshot {
                name: name.to_string(),
                parent_snapshot_name: parent.map(String::from),
                creation_time: None,
            });
    }

    pub fn fail_fetches(&self) {
        self.host.lock().unwrap().fail_fetches = true;
    }

    pub fn fetch_count(&self) -> usize {
        self.host.lock().unwrap().fetches
    }

    pub fn last_filter(&self) -> Option<String> {
        self.host.lock().unwrap().last_filter.clone()
    }

    /// Id passed to the most recent single-machine fetch
    pub fn last_id(&self) -> Option<Uuid> {
        self.host.lock().unwrap().last_id
    }

    /// Non-fetch operations in call order, e.g. `"stop web force=true"`
    pub fn calls(&self) -> Vec<String> {
        self.host.lock().unwrap().calls.clone()
    }

    /// State of the first machine named `vm`
    pub fn state_of(&self, vm: &str) -> Option<MachineState> {
        self.host
            .lock()
            .unwrap()
            .machines
            .iter()
            .find(|m| m.name == vm)
            .map(|m| m.state)
    }

    pub fn state_of_id(&self, id: Uuid) -> Option<MachineState> {
        self.host
            .lock()
            .unwrap()
            .machines
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.state)
    }

    /// Apply `state` to machine `id` and log `op` against its current name
    fn set_state(&self, op: &str, id: Uuid, suffix: &str, state: MachineState) -> HvResult<()> {
        let mut host = self.host.lock().unwrap();
        let machine = host.machine_mut(id)?;
        machine.state = state;
        let call = format!("{} {}{}", op, machine.name, suffix);
        host.calls.push(call);
        Ok(())
    }

    /// Log a snapshot operation; the machine must exist
    fn snapshot_op(&self, op: &str, id: Uuid, detail: String) -> HvResult<()> {
        let mut host = self.host.lock().unwrap();
        let name = host.machine_mut(id)?.name.clone();
        host.calls.push(format!("{} {} {}", op, name, detail));
        Ok(())
    }
}

#[async_trait]
impl HypervisorClient for FakeHypervisor {
    async fn fetch_machines(&self, name_filter: Option<&str>) -> HvResult<Vec<MachineRecord>> {
        let mut host = self.host.lock().unwrap();
        if host.fail_fetches {
            return Err(HvError::remote("Get-VM", "host unreachable"));
        }
        host.fetches += 1;
        host.last_filter = name_filter.map(String::from);
        Ok(host
            .machines
            .iter()
            .filter(|m| name_filter.is_none_or(|name| m.name == name))
            .cloned()
            .collect())
    }

    async fn fetch_machine(&self, id: Uuid) -> HvResult<Option<MachineRecord>> {
        let mut host = self.host.lock().unwrap();
        if host.fail_fetches {
            return Err(HvError::remote("Get-VM", "host unreachable"));
        }
        host.fetches += 1;
        host.last_id = Some(id);
        Ok(host.machines.iter().find(|m| m.id == id).cloned())
    }

    async fn fetch_snapshots(&self, id: Uuid) -> HvResult<Vec<Snapshot>> {
        let host = self.host.lock().unwrap();
        Ok(host.snapshots.get(&id).cloned().unwrap_or_default())
    }

    async fn start(&self, id: Uuid) -> HvResult<()> {
        self.set_state("start", id, "", MachineState::Running)
    }

    async fn stop(&self, id: Uuid, force: bool) -> HvResult<()> {
        self.set_state("stop", id, &format!(" force={}", force), MachineState::Off)
    }

    async fn pause(&self, id: Uuid) -> HvResult<()> {
        self.set_state("pause", id, "", MachineState::Paused)
    }

    async fn resume(&self, id: Uuid) -> HvResult<()> {
        self.set_state("resume", id, "", MachineState::Running)
    }

    async fn create_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()> {
        self.snapshot_op("create", id, snapshot.to_string())?;
        self.push_snapshot(id, snapshot, None);
        Ok(())
    }

    async fn restore_snapshot(&self, id: Uuid, snapshot: &str) -> HvResult<()> {
        self.snapshot_op("restore", id, snapshot.to_string())
    }

    async fn remove_snapshot(&self, id: Uuid, snapshot: &str, recursive: bool) -> HvResult<()> {
        self.snapshot_op("delete", id, format!("{} recursive={}", snapshot, recursive))
    }

    fn endpoint(&self) -> String {
        "fake-host:22".to_string()
    }
}
