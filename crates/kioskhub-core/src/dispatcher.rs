// ── Command dispatcher ──
//
// Parallel fan-out/fan-in over a resolved target. Each device call runs in
// its own task; results land in the slot matching the device's resolution
// index, so reports are ordered by resolution and never by completion.
// A failing device is recorded in its own slot and never cancels siblings.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use kioskhub_api::Error as ApiError;

use crate::capability::DeviceCapability;
use crate::command::KioskCommand;
use crate::config::HubConfig;
use crate::error::CoreError;
use crate::hub::NotificationHub;
use crate::model::{Device, DeviceSnapshot, Target};
use crate::report::{ActionReport, ActionResult, StatusReport, StatusResult, format_duration};
use crate::resolver::TargetResolver;

/// Fetch and flatten one device's status.
///
/// Shared by the status aggregator and the scanner so both read a tablet
/// the same way.
pub(crate) async fn probe(
    capability: &dyn DeviceCapability,
    device: &Device,
    port: u16,
) -> Result<DeviceSnapshot, ApiError> {
    let status = capability.fetch_status(&device.address(port)).await?;
    Ok(DeviceSnapshot::from(status).for_device(device.id))
}

/// Runs remote operations against every device a [`Target`] names.
pub struct Dispatcher {
    resolver: TargetResolver,
    capability: Arc<dyn DeviceCapability>,
    hub: Arc<NotificationHub>,
    device_port: u16,
    /// Per-call cap on in-flight device calls.
    limit: Option<usize>,
}

impl Dispatcher {
    pub fn new(
        resolver: TargetResolver,
        capability: Arc<dyn DeviceCapability>,
        hub: Arc<NotificationHub>,
        config: &HubConfig,
    ) -> Self {
        Self {
            resolver,
            capability,
            hub,
            device_port: config.device_port,
            limit: config.dispatch_concurrency.map(|n| n.max(1)),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Send a catalogue command to every targeted device and wait for all
    /// of them. Invalid command arguments fail before any call is made.
    pub async fn execute(
        &self,
        target: &Target,
        command: KioskCommand,
    ) -> Result<ActionReport, CoreError> {
        command.validate()?;
        let name = command.name();
        let command = Arc::new(command);
        let capability = Arc::clone(&self.capability);

        self.dispatch(target, name, move |addr| {
            let capability = Arc::clone(&capability);
            let command = Arc::clone(&command);
            async move { capability.execute(&addr, &command).await }
        })
        .await
    }

    /// Run `op` against the `host:port` address of every device `target`
    /// resolves to and collect an ordered report.
    ///
    /// Resolution errors are returned before any call is made. Per-device
    /// errors end up in the matching result entry. Devices that executed
    /// the operation are announced on the hub.
    pub async fn dispatch<F, Fut>(
        &self,
        target: &Target,
        command: &str,
        op: F,
    ) -> Result<ActionReport, CoreError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<(), ApiError>> + Send + 'static,
    {
        let devices = self.resolver.resolve(target).await?;
        debug!(command, count = devices.len(), "dispatching");

        let outcomes = self
            .fan_out(&devices, |addr| {
                let call = op(addr);
                async move {
                    let started = Instant::now();
                    let result = call.await;
                    (result, started.elapsed())
                }
            })
            .await;

        let results: Vec<ActionResult> = devices
            .iter()
            .zip(outcomes)
            .map(|(device, outcome)| {
                let Some((result, elapsed)) = outcome else {
                    let mut entry = ActionResult::new(device, Duration::ZERO);
                    entry.error = Some("dispatch task aborted".into());
                    return entry;
                };
                let mut entry = ActionResult::new(device, elapsed);
                match result {
                    Ok(()) => {
                        entry.success = true;
                        entry.executed = true;
                    }
                    Err(e) => {
                        warn!(
                            device = %device.name,
                            addr = %device.ip,
                            command,
                            error = %e,
                            "command failed"
                        );
                        entry.error = Some(e.to_string());
                    }
                }
                entry
            })
            .collect();

        for result in results.iter().filter(|r| r.executed && r.id > 0) {
            self.hub.notify(result.id);
        }

        let executed = results.iter().filter(|r| r.executed).count();
        let summary = ActionReport::summarize(executed, results.len());
        info!(command, "{summary}");

        Ok(ActionReport {
            command: command.to_owned(),
            timestamp: Utc::now().timestamp(),
            summary,
            results,
        })
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Fetch the status of every targeted device.
    pub async fn fetch_status(&self, target: &Target) -> Result<StatusReport, CoreError> {
        let devices = self.resolver.resolve(target).await?;
        let port = self.device_port;
        let capability = Arc::clone(&self.capability);

        let outcomes = self
            .fan_out_devices(&devices, move |device| {
                let capability = Arc::clone(&capability);
                async move { probe(capability.as_ref(), &device, port).await }
            })
            .await;

        let results = devices
            .iter()
            .zip(outcomes)
            .map(|(device, outcome)| {
                let mut entry = StatusResult {
                    id: device.id,
                    name: device.name.clone(),
                    success: false,
                    data: None,
                    error: None,
                };
                match outcome {
                    Some(Ok(snapshot)) => {
                        entry.success = true;
                        entry.data = Some(snapshot);
                    }
                    Some(Err(e)) => {
                        warn!(device = %device.name, addr = %device.ip, error = %e, "status fetch failed");
                        entry.error = Some(e.to_string());
                    }
                    None => entry.error = Some("status task aborted".into()),
                }
                entry
            })
            .collect();

        Ok(StatusReport {
            timestamp: Utc::now().timestamp(),
            results,
        })
    }

    // ── Camera ───────────────────────────────────────────────────────

    /// Take a photo with one registered device.
    pub async fn photo(
        &self,
        device_id: i64,
        camera: &str,
        quality: u8,
    ) -> Result<Bytes, CoreError> {
        let device = self.resolver.device(device_id).await?;
        let started = Instant::now();
        let jpeg = self
            .capability
            .take_photo(&device.address(self.device_port), camera, quality)
            .await?;
        debug!(
            device = %device.name,
            bytes = jpeg.len(),
            duration = %format_duration(started.elapsed()),
            "photo captured"
        );
        Ok(jpeg)
    }

    // ── Fan-out core ─────────────────────────────────────────────────

    async fn fan_out<T, F, Fut>(&self, devices: &[Device], op: F) -> Vec<Option<T>>
    where
        T: Send + 'static,
        F: Fn(String) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let port = self.device_port;
        self.fan_out_devices(devices, |device| op(device.address(port)))
            .await
    }

    /// Spawn one task per device and wait for all of them. Slot `i` holds
    /// the outcome for `devices[i]`, or `None` if that task panicked.
    ///
    /// The concurrency cap is owned by this call, so concurrent dispatches
    /// never share permits.
    async fn fan_out_devices<T, F, Fut>(&self, devices: &[Device], op: F) -> Vec<Option<T>>
    where
        T: Send + 'static,
        F: Fn(Device) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let semaphore = self.limit.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();
        for (index, device) in devices.iter().enumerate() {
            let call = op(device.clone());
            let limit = semaphore.clone();
            tasks.spawn(async move {
                let _permit = match limit {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                (index, call.await)
            });
        }

        let mut slots: Vec<Option<T>> = devices.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    if let Some(slot) = slots.get_mut(index) {
                        *slot = Some(outcome);
                    }
                }
                Err(e) => warn!(error = %e, "fan-out task failed"),
            }
        }
        slots
    }
}
