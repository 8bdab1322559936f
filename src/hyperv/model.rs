//! Typed views of `ConvertTo-Json` output from the Hyper-V host

use crate::error::{HvError, HvResult};
use crate::inventory::{MachineRecord, MachineState};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A machine as reported by `Get-VM`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteVm {
    pub id: Uuid,
    pub name: String,
    pub state: u32,
    /// Everything else the host sent
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl From<RemoteVm> for MachineRecord {
    fn from(vm: RemoteVm) -> Self {
        let mut record = MachineRecord::new(vm.id, vm.name, MachineState::from(vm.state));
        record.extra = vm.extra;
        record
    }
}

/// A snapshot (checkpoint) as reported by `Get-VMSnapshot`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    pub name: String,
    #[serde(default)]
    pub parent_snapshot_name: Option<String>,
    #[serde(default)]
    pub creation_time: Option<String>,
}

/// PowerShell emits a bare object for one result and an array for several
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Parse `ConvertTo-Json` output that may be empty, one object, or an array
pub fn parse_json_list<T: DeserializeOwned>(output: &str) -> HvResult<Vec<T>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(vec![]);
    }

    match serde_json::from_str::<OneOrMany<T>>(trimmed) {
        Ok(OneOrMany::Many(items)) => Ok(items),
        Ok(OneOrMany::One(item)) => Ok(vec![item]),
        Err(e) => Err(HvError::RemoteParse(e.to_string())),
    }
}

/// Parse `Get-VM` output into unindexed records
pub fn parse_machines(output: &str) -> HvResult<Vec<MachineRecord>> {
    Ok(parse_json_list::<RemoteVm>(output)?
        .into_iter()
        .map(MachineRecord::from)
        .collect())
}
