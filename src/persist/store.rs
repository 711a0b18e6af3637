//! Player Store Contract
//!
//! Kill/death records keyed by player key. Implementations are called
//! from background tasks only, never from the tick.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Serialize, Deserialize};

/// Persisted per-player stats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    /// Persistence key.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Kill count.
    pub kills: u32,
    /// Death count.
    pub deaths: u32,
}

impl StatsRecord {
    /// Zeroed record for a new player.
    pub fn fresh(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            kills: 0,
            deaths: 0,
        }
    }
}

/// Store errors. Never fatal once the game is running.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt or unserializable record.
    #[error("Store encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the lock.
    #[error("Store lock poisoned")]
    Poisoned,

    /// Store refused the write.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence gateway.
pub trait PlayerStore: Send + Sync {
    /// Record for `key`, or `None` if never saved.
    fn load(&self, key: &str) -> Result<Option<StatsRecord>, StoreError>;

    /// Insert or replace a record.
    fn save(&self, record: &StatsRecord) -> Result<(), StoreError>;

    /// Every stored record.
    fn load_all(&self) -> Result<Vec<StatsRecord>, StoreError>;
}

/// In-memory store. Can be switched to fail every save.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<BTreeMap<String, StatsRecord>>,
    failing: AtomicBool,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `records`.
    pub fn with_records(records: impl IntoIterator<Item = StatsRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.records.lock() {
            map.extend(records.into_iter().map(|r| (r.key.clone(), r)));
        }
        store
    }

    /// Make every following save and load fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.lock().map(|m| m.len()).unwrap_or(0)
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }
        Ok(())
    }
}

impl PlayerStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<StatsRecord>, StoreError> {
        self.check()?;
        let map = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, record: &StatsRecord) -> Result<(), StoreError> {
        self.check()?;
        let mut map = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        map.insert(record.key.clone(), record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<StatsRecord>, StoreError> {
        self.check()?;
        let map = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(map.values().cloned().collect())
    }
}
