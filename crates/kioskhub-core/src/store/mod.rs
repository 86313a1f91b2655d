//! Persistence seams for devices, groups and snapshot history.
//!
//! The engine only talks to these traits. [`MemoryStore`] backs all three
//! with concurrent maps; a database-backed implementation slots in behind
//! the same interfaces.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Device, DeviceSnapshot, Group};

pub use memory::MemoryStore;

/// Storage backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Device records.
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Device>>;
    /// Every device, ordered by id.
    async fn list(&self) -> Result<Vec<Device>>;
    /// Insert or replace. An id of 0 allocates a new one, which is returned.
    async fn save(&self, device: &Device) -> Result<i64>;
}

/// Group records and membership.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<Option<Group>>;
    async fn list(&self) -> Result<Vec<Group>>;
    /// Member devices in id order. Unknown groups have no members.
    async fn members(&self, group_id: i64) -> Result<Vec<Device>>;
}

/// Append-only snapshot history.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn append(&self, snapshot: &DeviceSnapshot) -> Result<()>;

    /// Most recent snapshot of a device, optionally skipping failed fetches.
    async fn latest(&self, device_id: i64, only_success: bool) -> Result<Option<DeviceSnapshot>>;

    /// Newest-first history, at most `limit` entries.
    async fn history(&self, device_id: i64, limit: usize) -> Result<Vec<DeviceSnapshot>>;

    /// Drop every snapshot taken at or before `now - days`. Returns the
    /// number removed.
    async fn delete_older_than(&self, days: u32) -> Result<usize>;
}
