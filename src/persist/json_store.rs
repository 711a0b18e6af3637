//! JSON File Store
//!
//! All records live in one JSON document, `{"players": {key: record}}`,
//! cached in memory and rewritten in full on every save. Writes go to a
//! sibling temp file first and are renamed into place.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::persist::store::{PlayerStore, StatsRecord, StoreError};

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    players: BTreeMap<String, StatsRecord>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    players: &'a BTreeMap<String, StatsRecord>,
}

/// File-backed [`PlayerStore`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<String, StatsRecord>>,
    /// Serialises file writes; `records` is only held long enough to copy.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (or create) the store at `path`.
    ///
    /// With `reset`, every existing record is dropped and the empty store is
    /// written out immediately.
    pub fn open(path: impl AsRef<Path>, reset: bool) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let records = if reset {
            info!("Resetting player store at {}", path.display());
            BTreeMap::new()
        } else {
            read_file(&path)?
        };

        let store = Self {
            path,
            records: Mutex::new(records),
            write_lock: Mutex::new(()),
        };
        if reset {
            store.write_file(&BTreeMap::new())?;
        }
        Ok(store)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, records: &BTreeMap<String, StatsRecord>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(&StoreFileRef { players: records })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<BTreeMap<String, StatsRecord>, StoreError> {
    match fs::read(path) {
        Ok(bytes) => {
            let doc: StoreFile = serde_json::from_slice(&bytes)?;
            debug!("Loaded {} player records from {}", doc.players.len(), path.display());
            Ok(doc.players)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(e.into()),
    }
}

impl PlayerStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<StatsRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(key).cloned())
    }

    fn save(&self, record: &StatsRecord) -> Result<(), StoreError> {
        let _writing = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let snapshot = {
            let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
            records.insert(record.key.clone(), record.clone());
            records.clone()
        };
        self.write_file(&snapshot)
    }

    fn load_all(&self) -> Result<Vec<StatsRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gridtrail-test-{}-{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_records_survive_reopen() {
        let path = scratch_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let store = JsonFileStore::open(&path, false).unwrap();
            let mut record = StatsRecord::fresh("k1", "alice");
            record.kills = 5;
            store.save(&record).unwrap();
            store.save(&StatsRecord::fresh("k2", "bob")).unwrap();
        }

        let store = JsonFileStore::open(&path, false).unwrap();
        assert_eq!(store.load("k1").unwrap().unwrap().kills, 5);
        assert_eq!(store.load_all().unwrap().len(), 2);
        assert_eq!(store.load("missing").unwrap(), None);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reset_drops_records() {
        let path = scratch_path("reset");
        let _ = fs::remove_file(&path);

        JsonFileStore::open(&path, false)
            .unwrap()
            .save(&StatsRecord::fresh("k1", "alice"))
            .unwrap();

        let store = JsonFileStore::open(&path, true).unwrap();
        assert!(store.load_all().unwrap().is_empty());

        let reopened = JsonFileStore::open(&path, false).unwrap();
        assert!(reopened.load_all().unwrap().is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_reads_do_not_wait_for_file_writes() {
        let path = scratch_path("reads");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path, false).unwrap();
        store.save(&StatsRecord::fresh("k1", "alice")).unwrap();

        // A write in progress holds only the write lock
        let _writing = store.write_lock.lock().unwrap();
        assert!(store.load("k1").unwrap().is_some());
        assert_eq!(store.load_all().unwrap().len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch_path("corrupt");
        fs::write(&path, b"{ not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path, false), Err(StoreError::Json(_))));

        let _ = fs::remove_file(&path);
    }
}
