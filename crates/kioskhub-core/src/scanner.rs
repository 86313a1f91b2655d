// ── Fleet scanner ──
//
// Periodic liveness sweep. A fixed pool of workers drains a pre-filled job
// queue, probes each tablet once, records the outcome, then prunes history
// once every worker is done. A cycle in progress is never interrupted:
// cancellation is only observed between cycles.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::capability::DeviceCapability;
use crate::config::HubConfig;
use crate::dispatcher::probe;
use crate::error::CoreError;
use crate::hub::NotificationHub;
use crate::model::{Device, DeviceSnapshot};
use crate::store::{DeviceRepository, SnapshotRepository};

/// Totals of one scan cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    /// Snapshots removed by retention, when pruning ran and succeeded.
    pub pruned: Option<usize>,
}

/// Background monitor over every registered device.
pub struct FleetScanner {
    devices: Arc<dyn DeviceRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    capability: Arc<dyn DeviceCapability>,
    hub: Arc<NotificationHub>,
    config: HubConfig,
}

impl FleetScanner {
    pub fn new(
        devices: Arc<dyn DeviceRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        capability: Arc<dyn DeviceCapability>,
        hub: Arc<NotificationHub>,
        config: HubConfig,
    ) -> Self {
        Self {
            devices,
            snapshots,
            capability,
            hub,
            config,
        }
    }

    /// Scan immediately, then every `poll_interval` until `cancel` fires.
    ///
    /// Always ends with [`CoreError::Cancelled`] on shutdown; a zero
    /// interval is rejected up front.
    pub async fn start(&self, cancel: CancellationToken) -> Result<(), CoreError> {
        if self.config.poll_interval.is_zero() {
            return Err(CoreError::Config {
                message: "poll interval must be greater than zero".into(),
            });
        }
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            workers = self.config.max_workers,
            "fleet monitor started"
        );

        if cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        self.scan_all().await;

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!("fleet monitor stopped");
                    return Err(CoreError::Cancelled);
                }
                _ = interval.tick() => {
                    self.scan_all().await;
                }
            }
        }
    }

    /// Run one full cycle over every known device.
    pub async fn scan_all(&self) -> ScanSummary {
        let devices = match self.devices.list().await {
            Ok(devices) => devices,
            Err(e) => {
                error!(error = %e, "failed to load devices for scan");
                return ScanSummary::default();
            }
        };
        if devices.is_empty() {
            info!("no devices registered, skipping scan");
            return ScanSummary::default();
        }

        let total = devices.len();
        debug!(total, "scan cycle starting");

        let (tx, rx) = mpsc::channel(total);
        for device in devices {
            // Capacity equals the job count, so this never waits.
            if tx.send(device).await.is_err() {
                break;
            }
        }
        drop(tx);
        let queue = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for _ in 0..self.config.max_workers.max(1) {
            let queue = Arc::clone(&queue);
            let ctx = self.worker_context();
            workers.spawn(async move {
                let mut online = 0_usize;
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(device) = next else { break };
                    if ctx.process(device).await {
                        online += 1;
                    }
                }
                online
            });
        }

        let mut online = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(count) => online += count,
                Err(e) => error!(error = %e, "scan worker failed"),
            }
        }

        let pruned = self.prune().await;
        let summary = ScanSummary {
            total,
            online,
            offline: total - online,
            pruned,
        };
        info!(
            total = summary.total,
            online = summary.online,
            offline = summary.offline,
            "scan cycle complete"
        );
        summary
    }

    async fn prune(&self) -> Option<usize> {
        let days = self.config.retention_days;
        if days == 0 {
            return None;
        }
        match self.snapshots.delete_older_than(days).await {
            Ok(removed) => {
                if removed > 0 {
                    info!(removed, days, "pruned snapshot history");
                }
                Some(removed)
            }
            Err(e) => {
                error!(error = %e, days, "snapshot retention failed");
                None
            }
        }
    }

    fn worker_context(&self) -> Worker {
        Worker {
            devices: Arc::clone(&self.devices),
            snapshots: Arc::clone(&self.snapshots),
            capability: Arc::clone(&self.capability),
            hub: Arc::clone(&self.hub),
            port: self.config.device_port,
        }
    }
}

/// Per-worker handles, cloned out of the scanner so tasks are `'static`.
struct Worker {
    devices: Arc<dyn DeviceRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    capability: Arc<dyn DeviceCapability>,
    hub: Arc<NotificationHub>,
    port: u16,
}

impl Worker {
    /// Probe one device and persist the outcome. Returns whether it is online.
    async fn process(&self, mut device: Device) -> bool {
        let snapshot = match probe(self.capability.as_ref(), &device, self.port).await {
            Ok(snapshot) => {
                device.online = true;
                device.last_seen = Some(Utc::now());
                device.version.clone_from(&snapshot.device_version);
                snapshot
            }
            Err(e) => {
                if device.online {
                    warn!(device = %device.name, addr = %device.ip, error = %e, "device went offline");
                } else {
                    info!(device = %device.name, addr = %device.ip, error = %e, "device offline");
                }
                device.online = false;
                DeviceSnapshot::failed(device.id)
            }
        };

        if let Err(e) = self.devices.save(&device).await {
            error!(device = %device.name, error = %e, "failed to save device state");
        }
        if let Err(e) = self.snapshots.append(&snapshot).await {
            error!(device = %device.name, error = %e, "failed to append snapshot");
        }

        self.hub.notify(device.id);
        device.online
    }
}
