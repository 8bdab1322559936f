//! Cached machine records and the persisted cache state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Run state of a virtual machine, mirrored from the Hyper-V `VMState` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum MachineState {
    Other,
    Running,
    Off,
    Stopping,
    Saved,
    Paused,
    Starting,
    Reset,
    Saving,
    Pausing,
    Resuming,
    FastSaved,
    FastSaving,
    /// Code not known to this version; kept as-is
    Unknown(u32),
}

impl MachineState {
    /// Lowercase label for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Other => "other",
            Self::Running => "running",
            Self::Off => "off",
            Self::Stopping => "stopping",
            Self::Saved => "saved",
            Self::Paused => "paused",
            Self::Starting => "starting",
            Self::Reset => "reset",
            Self::Saving => "saving",
            Self::Pausing => "pausing",
            Self::Resuming => "resuming",
            Self::FastSaved => "fast-saved",
            Self::FastSaving => "fast-saving",
            Self::Unknown(_) => "unknown",
        }
    }
}

impl From<u32> for MachineState {
    fn from(code: u32) -> Self {
        match code {
            1 => Self::Other,
            2 => Self::Running,
            3 => Self::Off,
            4 => Self::Stopping,
            6 => Self::Saved,
            9 => Self::Paused,
            10 => Self::Starting,
            11 => Self::Reset,
            32773 => Self::Saving,
            32776 => Self::Pausing,
            32777 => Self::Resuming,
            32779 => Self::FastSaved,
            32780 => Self::FastSaving,
            other => Self::Unknown(other),
        }
    }
}

impl From<MachineState> for u32 {
    fn from(state: MachineState) -> Self {
        match state {
            MachineState::Other => 1,
            MachineState::Running => 2,
            MachineState::Off => 3,
            MachineState::Stopping => 4,
            MachineState::Saved => 6,
            MachineState::Paused => 9,
            MachineState::Starting => 10,
            MachineState::Reset => 11,
            MachineState::Saving => 32773,
            MachineState::Pausing => 32776,
            MachineState::Resuming => 32777,
            MachineState::FastSaved => 32779,
            MachineState::FastSaving => 32780,
            MachineState::Unknown(code) => code,
        }
    }
}

impl fmt::Display for MachineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "unknown ({})", code),
            other => f.write_str(other.label()),
        }
    }
}

/// One virtual machine known to the inventory cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Hypervisor-assigned identity, the only stable join key
    pub id: Uuid,

    /// Display name, may change across syncs
    pub name: String,

    /// Last observed run state
    pub state: MachineState,

    /// 1-based ordinal assigned by the reconciler (0 until assigned)
    #[serde(default)]
    pub index: usize,

    /// Remote attributes passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MachineRecord {
    /// Create a record with no index assigned yet
    pub fn new(id: Uuid, name: impl Into<String>, state: MachineState) -> Self {
        Self {
            id,
            name: name.into(),
            state,
            index: 0,
            extra: BTreeMap::new(),
        }
    }
}

/// Cache file format version
pub const CACHE_VERSION: u32 = 1;

/// Persisted inventory snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheState {
    /// Format version of the cache file
    #[serde(default = "default_version")]
    pub version: u32,

    /// Time of the last full reconciliation, absent if never synced
    pub last_sync: Option<DateTime<Utc>>,

    /// Records in ascending index order
    #[serde(default)]
    pub records: Vec<MachineRecord>,
}

fn default_version() -> u32 {
    CACHE_VERSION
}

impl CacheState {
    /// An empty, never-synced cache
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            last_sync: None,
            records: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl Default for CacheState {
    fn default() -> Self {
        Self::empty()
    }
}
