//! Persistence
//!
//! - `store`: record type and the [`PlayerStore`] gateway
//! - `json_store`: single-file JSON backend
//! - `queue`: ordered background writer used by the game loop

pub mod store;
pub mod json_store;
pub mod queue;

pub use store::{PlayerStore, StatsRecord, StoreError, MemoryStore};
pub use json_store::JsonFileStore;
pub use queue::SaveQueue;
