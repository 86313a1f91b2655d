// ── Target resolution ──
//
// Turns a `Target` into the concrete, ordered device list a fan-out runs
// against.

use std::sync::Arc;

use tracing::debug;

use crate::error::CoreError;
use crate::model::{Device, Selector, Target};
use crate::store::{DeviceRepository, GroupRepository};

/// Resolves targets against the device and group repositories.
#[derive(Clone)]
pub struct TargetResolver {
    devices: Arc<dyn DeviceRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl TargetResolver {
    pub fn new(devices: Arc<dyn DeviceRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { devices, groups }
    }

    /// Resolve a target into at least one device.
    ///
    /// Address lists become synthetic devices (id 0) in input order without
    /// touching the repositories. A device id yields that single device. A
    /// group id yields its members in repository order; a group with no
    /// members is reported as not found.
    pub async fn resolve(&self, target: &Target) -> Result<Vec<Device>, CoreError> {
        match target.selector()? {
            Selector::Addresses(addrs) => {
                debug!(count = addrs.len(), "resolved explicit addresses");
                Ok(addrs.into_iter().map(Device::from_address).collect())
            }
            Selector::Device(id) => {
                let device = self
                    .devices
                    .get(id)
                    .await?
                    .ok_or(CoreError::DeviceNotFound { id })?;
                Ok(vec![device])
            }
            Selector::Group(id) => {
                let members = self.groups.members(id).await?;
                if members.is_empty() {
                    return Err(CoreError::GroupNotFound { id });
                }
                debug!(group = id, count = members.len(), "resolved group members");
                Ok(members)
            }
        }
    }

    /// Look up one registered device.
    pub async fn device(&self, id: i64) -> Result<Device, CoreError> {
        self.devices
            .get(id)
            .await?
            .ok_or(CoreError::DeviceNotFound { id })
    }
}
