// ── Fleet facade ──
//
// Composition root for the engine. Wires the repositories, the tablet
// transport, the shared notification hub, the dispatcher and the scanner,
// and owns the lifecycle of the background monitor task.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use kioskhub_api::KioskClient;

use crate::capability::DeviceCapability;
use crate::command::KioskCommand;
use crate::config::HubConfig;
use crate::dispatcher::Dispatcher;
use crate::error::CoreError;
use crate::hub::NotificationHub;
use crate::model::{Device, DeviceSnapshot, Group, Target};
use crate::report::{ActionReport, StatusReport};
use crate::resolver::TargetResolver;
use crate::scanner::{FleetScanner, ScanSummary};
use crate::store::{DeviceRepository, GroupRepository, MemoryStore, SnapshotRepository};

// ── Fleet ────────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<FleetInner>`. Every clone shares the same
/// hub, so a live-update surface subscribed through one handle sees the
/// notifications produced by commands sent through another.
#[derive(Clone)]
pub struct Fleet {
    inner: Arc<FleetInner>,
}

struct FleetInner {
    devices: Arc<dyn DeviceRepository>,
    groups: Arc<dyn GroupRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    hub: Arc<NotificationHub>,
    dispatcher: Dispatcher,
    scanner: Arc<FleetScanner>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

/// Repository handles the fleet runs against.
pub struct Repositories {
    pub devices: Arc<dyn DeviceRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub snapshots: Arc<dyn SnapshotRepository>,
}

impl Repositories {
    /// Back all three repositories with one in-memory store.
    pub fn memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            devices: store.clone(),
            groups: store.clone(),
            snapshots: store.clone(),
        }
    }
}

impl Fleet {
    /// Build a fleet around an explicit tablet transport.
    pub fn new(
        config: HubConfig,
        repos: Repositories,
        capability: Arc<dyn DeviceCapability>,
    ) -> Self {
        let hub = Arc::new(NotificationHub::new());
        let resolver = TargetResolver::new(Arc::clone(&repos.devices), Arc::clone(&repos.groups));
        let dispatcher = Dispatcher::new(
            resolver,
            Arc::clone(&capability),
            Arc::clone(&hub),
            &config,
        );
        let scanner = Arc::new(FleetScanner::new(
            Arc::clone(&repos.devices),
            Arc::clone(&repos.snapshots),
            capability,
            Arc::clone(&hub),
            config,
        ));

        Self {
            inner: Arc::new(FleetInner {
                devices: repos.devices,
                groups: repos.groups,
                snapshots: repos.snapshots,
                hub,
                dispatcher,
                scanner,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Build a fleet that talks HTTP to the tablets, using the transport
    /// settings from `config`.
    pub fn connect(config: HubConfig, repos: Repositories) -> Result<Self, CoreError> {
        let client = KioskClient::new(&config.transport())?;
        debug!(
            port = config.device_port,
            timeout_ms = u64::try_from(config.request_timeout.as_millis()).unwrap_or(u64::MAX),
            "tablet client ready"
        );
        Ok(Self::new(config, repos, Arc::new(client)))
    }

    /// Shared notification hub; subscribe here for live updates.
    pub fn hub(&self) -> &Arc<NotificationHub> {
        &self.inner.hub
    }

    // ── Operations ───────────────────────────────────────────────────

    pub async fn execute(
        &self,
        target: &Target,
        command: KioskCommand,
    ) -> Result<ActionReport, CoreError> {
        self.inner.dispatcher.execute(target, command).await
    }

    pub async fn fetch_status(&self, target: &Target) -> Result<StatusReport, CoreError> {
        self.inner.dispatcher.fetch_status(target).await
    }

    pub async fn photo(
        &self,
        device_id: i64,
        camera: &str,
        quality: u8,
    ) -> Result<Bytes, CoreError> {
        self.inner.dispatcher.photo(device_id, camera, quality).await
    }

    /// Run a single scan cycle now.
    pub async fn scan(&self) -> ScanSummary {
        self.inner.scanner.scan_all().await
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub async fn devices(&self) -> Result<Vec<Device>, CoreError> {
        Ok(self.inner.devices.list().await?)
    }

    pub async fn groups(&self) -> Result<Vec<Group>, CoreError> {
        Ok(self.inner.groups.list().await?)
    }

    pub async fn group_members(&self, group_id: i64) -> Result<Vec<Device>, CoreError> {
        Ok(self.inner.groups.members(group_id).await?)
    }

    /// Latest recorded snapshot for a device.
    pub async fn latest_snapshot(
        &self,
        device_id: i64,
        only_success: bool,
    ) -> Result<Option<DeviceSnapshot>, CoreError> {
        Ok(self.inner.snapshots.latest(device_id, only_success).await?)
    }

    pub async fn history(
        &self,
        device_id: i64,
        limit: usize,
    ) -> Result<Vec<DeviceSnapshot>, CoreError> {
        Ok(self.inner.snapshots.history(device_id, limit).await?)
    }

    // ── Monitor lifecycle ────────────────────────────────────────────

    /// Run the scanner in the foreground until `cancel` fires.
    pub async fn run_monitor(&self, cancel: CancellationToken) -> Result<(), CoreError> {
        self.inner.scanner.start(cancel).await
    }

    /// Spawn the scanner as a background task tied to this fleet's
    /// cancellation token.
    pub async fn start_monitor(&self) {
        let scanner = Arc::clone(&self.inner.scanner);
        let cancel = self.inner.cancel.child_token();
        let handle = tokio::spawn(async move {
            match scanner.start(cancel).await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => debug!("monitor task exited"),
                Err(e) => warn!(error = %e, "monitor task failed"),
            }
        });
        self.inner.task_handles.lock().await.push(handle);
        info!("background monitor spawned");
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
    }
}
