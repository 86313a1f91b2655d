// ── In-memory store ──
//
// Lock-free maps keyed by id. Membership sets are ordered so group fan-outs
// resolve deterministically.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use dashmap::DashMap;

use super::{DeviceRepository, GroupRepository, Result, SnapshotRepository};
use crate::model::{Device, DeviceSnapshot, Group};

/// Devices, groups and history held in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: DashMap<i64, Device>,
    groups: DashMap<i64, Group>,
    members: DashMap<i64, BTreeSet<i64>>,
    snapshots: DashMap<i64, Vec<DeviceSnapshot>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ──────────────────────────────────────────────────────

    /// Insert a device as-is, keeping its id.
    pub fn insert_device(&self, device: Device) {
        self.next_id.fetch_max(device.id, Ordering::Relaxed);
        self.devices.insert(device.id, device);
    }

    pub fn insert_group(&self, group: Group) {
        self.members.entry(group.id).or_default();
        self.groups.insert(group.id, group);
    }

    /// Add a device to a group. Either side may be registered later.
    pub fn add_member(&self, group_id: i64, device_id: i64) {
        self.members.entry(group_id).or_default().insert(device_id);
    }

    /// Number of stored snapshots across all devices.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.iter().map(|e| e.value().len()).sum()
    }
}

// ── Devices ──────────────────────────────────────────────────────────

#[async_trait]
impl DeviceRepository for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Device>> {
        Ok(self.devices.get(&id).map(|d| d.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Device>> {
        let mut all: Vec<Device> = self.devices.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|d| d.id);
        Ok(all)
    }

    async fn save(&self, device: &Device) -> Result<i64> {
        let mut device = device.clone();
        if device.id <= 0 {
            device.id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        } else {
            self.next_id.fetch_max(device.id, Ordering::Relaxed);
        }
        let id = device.id;
        self.devices.insert(id, device);
        Ok(id)
    }
}

// ── Groups ───────────────────────────────────────────────────────────

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn get(&self, id: i64) -> Result<Option<Group>> {
        Ok(self.groups.get(&id).map(|g| g.value().clone()))
    }

    async fn list(&self) -> Result<Vec<Group>> {
        let mut all: Vec<Group> = self.groups.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|g| g.id);
        Ok(all)
    }

    async fn members(&self, group_id: i64) -> Result<Vec<Device>> {
        let Some(ids) = self.members.get(&group_id).map(|m| m.value().clone()) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| self.devices.get(id).map(|d| d.value().clone()))
            .collect())
    }
}

// ── Snapshots ────────────────────────────────────────────────────────

#[async_trait]
impl SnapshotRepository for MemoryStore {
    async fn append(&self, snapshot: &DeviceSnapshot) -> Result<()> {
        self.snapshots
            .entry(snapshot.device_id)
            .or_default()
            .push(snapshot.clone());
        Ok(())
    }

    async fn latest(&self, device_id: i64, only_success: bool) -> Result<Option<DeviceSnapshot>> {
        Ok(self.snapshots.get(&device_id).and_then(|list| {
            list.iter()
                .filter(|s| !only_success || s.success)
                .max_by_key(|s| s.timestamp)
                .cloned()
        }))
    }

    async fn history(&self, device_id: i64, limit: usize) -> Result<Vec<DeviceSnapshot>> {
        let Some(list) = self.snapshots.get(&device_id) else {
            return Ok(Vec::new());
        };
        let mut out = list.value().clone();
        out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        out.truncate(limit);
        Ok(out)
    }

    async fn delete_older_than(&self, days: u32) -> Result<usize> {
        let cutoff = Utc::now() - ChronoDuration::days(i64::from(days));
        let mut removed = 0;
        for mut entry in self.snapshots.iter_mut() {
            let before = entry.len();
            entry.retain(|s| s.timestamp > cutoff);
            removed += before - entry.len();
        }
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn snapshot_at(device_id: i64, age: ChronoDuration, success: bool) -> DeviceSnapshot {
        DeviceSnapshot {
            device_id,
            success,
            timestamp: Utc::now() - age,
            ..DeviceSnapshot::default()
        }
    }

    #[tokio::test]
    async fn save_allocates_ids_after_seeded_ones() {
        let store = MemoryStore::new();
        store.insert_device(Device::new(7, "10.0.0.7", "Bar"));

        let id = store.save(&Device::from_address("10.0.0.50")).await.unwrap();
        assert_eq!(id, 8);
        assert_eq!(DeviceRepository::list(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn members_are_ordered_and_skip_unknown_devices() {
        let store = MemoryStore::new();
        store.insert_device(Device::new(3, "10.0.0.3", "C"));
        store.insert_device(Device::new(1, "10.0.0.1", "A"));
        store.insert_group(Group::new(1, "Lobby"));
        store.add_member(1, 3);
        store.add_member(1, 1);
        store.add_member(1, 99);

        let ids: Vec<i64> = store.members(1).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.members(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn latest_can_skip_failed_snapshots() {
        let store = MemoryStore::new();
        store
            .append(&snapshot_at(1, ChronoDuration::minutes(10), true))
            .await
            .unwrap();
        store
            .append(&snapshot_at(1, ChronoDuration::minutes(1), false))
            .await
            .unwrap();

        assert!(!store.latest(1, false).await.unwrap().unwrap().success);
        assert!(store.latest(1, true).await.unwrap().unwrap().success);
        assert!(store.latest(2, false).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for minutes in [30, 10, 20] {
            store
                .append(&snapshot_at(4, ChronoDuration::minutes(minutes), true))
                .await
                .unwrap();
        }

        let history = store.history(4, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].timestamp > history[1].timestamp);
    }

    #[tokio::test]
    async fn retention_removes_snapshots_past_the_cutoff() {
        let store = MemoryStore::new();
        store
            .append(&snapshot_at(1, ChronoDuration::days(31) + ChronoDuration::seconds(5), true))
            .await
            .unwrap();
        store
            .append(&snapshot_at(1, ChronoDuration::days(30), true))
            .await
            .unwrap();
        store
            .append(&snapshot_at(2, ChronoDuration::days(40), false))
            .await
            .unwrap();

        let removed = store.delete_older_than(31).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.snapshot_count(), 1);
    }
}
