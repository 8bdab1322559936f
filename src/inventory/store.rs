//! On-disk inventory cache
//!
//! The cache is a single JSON file. Writes go through a temp file in the
//! same directory which is synced and renamed over the target, so readers
//! only ever see a complete file. An advisory lock on a sibling `.lock`
//! file serializes concurrent writers; the last writer still wins.

use crate::error::{HvError, HvResult};
use crate::inventory::record::CacheState;
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Interval between lock attempts while another writer holds the lock
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Reads and writes the persisted `CacheState`
#[derive(Debug, Clone)]
pub struct InventoryStore {
    path: PathBuf,
    lock_timeout: Duration,
}

impl InventoryStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>, lock_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            lock_timeout,
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "inventory".into());
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Load the cache; a missing file is an empty cache
    pub fn load(&self) -> HvResult<CacheState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No inventory cache at {}", self.path.display());
                return Ok(CacheState::empty());
            }
            Err(e) => {
                return Err(HvError::io(
                    format!("reading inventory cache {}", self.path.display()),
                    e,
                ))
            }
        };

        serde_json::from_str(&content).map_err(|e| HvError::CorruptCache {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    /// Load the cache, falling back to an empty (and therefore stale) cache
    /// when the file cannot be read or parsed
    pub fn load_or_empty(&self) -> CacheState {
        match self.load() {
            Ok(state) => state,
            Err(e) => {
                warn!("{}; starting from an empty inventory", e);
                CacheState::empty()
            }
        }
    }

    /// Replace the persisted cache with `state`
    pub fn save(&self, state: &CacheState) -> HvResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| HvError::persist(&self.path, e))?;

        let _lock = self.acquire_lock()?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| HvError::persist(&self.path, e))?;
        self.write_state(tmp.as_file_mut(), state)?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| HvError::persist(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| HvError::persist(&self.path, e.error))?;

        debug!(
            "Saved {} machine(s) to {}",
            state.records.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Encode fully before writing so that every I/O failure is a
    /// `CachePersist` error
    fn write_state(&self, out: &mut dyn Write, state: &CacheState) -> HvResult<()> {
        let mut bytes = serde_json::to_vec_pretty(state)?;
        bytes.push(b'\n');
        out.write_all(&bytes)
            .and_then(|_| out.flush())
            .map_err(|e| HvError::persist(&self.path, e))
    }

    /// Take the exclusive writer lock, held until the returned file is dropped
    fn acquire_lock(&self) -> HvResult<File> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).map_err(|e| HvError::persist(&self.path, e))?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(file),
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    if start.elapsed() >= self.lock_timeout {
                        return Err(HvError::persist(
                            &self.path,
                            std::io::Error::new(
                                ErrorKind::TimedOut,
                                format!(
                                    "timed out after {:?} waiting for {}",
                                    self.lock_timeout,
                                    lock_path.display()
                                ),
                            ),
                        ));
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(HvError::persist(&self.path, e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::record::{MachineRecord, MachineState};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn test_store(dir: &TempDir) -> InventoryStore {
        InventoryStore::new(dir.path().join("inventory.json"), Duration::from_secs(1))
    }

    fn sample_state() -> CacheState {
        let mut web = MachineRecord::new(Uuid::new_v4(), "web-01", MachineState::Running);
        web.index = 1;
        web.extra
            .insert("Uptime".to_string(), serde_json::json!("01:02:03"));
        let mut db = MachineRecord::new(Uuid::new_v4(), "db-01", MachineState::Off);
        db.index = 2;

        CacheState {
            last_sync: Some(Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()),
            records: vec![web, db],
            ..CacheState::empty()
        }
    }

    #[test]
    fn load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        assert_eq!(store.load().unwrap(), CacheState::empty());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let state = sample_state();

        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn save_overwrites_previous_state() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.save(&sample_state()).unwrap();
        store.save(&CacheState::empty()).unwrap();

        assert_eq!(store.load().unwrap(), CacheState::empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = InventoryStore::new(
            dir.path().join("nested/state/inventory.json"),
            Duration::from_secs(1),
        );

        store.save(&sample_state()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.save(&sample_state()).unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["inventory.json", "inventory.json.lock"]);
    }

    #[test]
    fn corrupt_file_fails_load() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, HvError::CorruptCache { .. }));
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        fs::write(store.path(), "[1, 2, 3]").unwrap();

        let state = store.load_or_empty();
        assert!(state.is_empty());
        assert!(state.last_sync.is_none());
    }

    #[test]
    fn save_into_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = InventoryStore::new(blocker.join("inventory.json"), Duration::from_secs(1));

        let err = store.save(&sample_state()).unwrap_err();
        assert!(matches!(err, HvError::CachePersist { .. }));
    }

    /// Accepts a few bytes, then fails like a full disk
    struct FullDisk {
        room: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.room == 0 {
                return Err(std::io::Error::other("File too large"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_midway_is_persist_error() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let mut state = sample_state();
        for i in 0..200 {
            let mut vm = MachineRecord::new(Uuid::new_v4(), format!("vm-{}", i), MachineState::Off);
            vm.index = i + 3;
            state.records.push(vm);
        }

        let err = store
            .write_state(&mut FullDisk { room: 4096 }, &state)
            .unwrap_err();
        assert!(matches!(err, HvError::CachePersist { .. }));
    }

    #[test]
    fn save_times_out_when_lock_is_held() {
        let dir = TempDir::new().unwrap();
        let store = InventoryStore::new(dir.path().join("inventory.json"), Duration::ZERO);

        let holder = File::create(store.lock_path()).unwrap();
        holder.lock_exclusive().unwrap();

        let err = store.save(&sample_state()).unwrap_err();
        assert!(matches!(err, HvError::CachePersist { .. }));
        assert!(!store.path().exists());

        fs2::FileExt::unlock(&holder).unwrap();
        store.save(&sample_state()).unwrap();
    }
}
