use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Addressing input for a command or status fetch, as callers build it.
///
/// Only one selector is normally populated. When several are, the address
/// list wins, then the device id, then the group id. Ids `<= 0` count as
/// unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub device_id: Option<i64>,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

/// The single selector a [`Target`] resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Addresses(Vec<String>),
    Device(i64),
    Group(i64),
}

impl Target {
    pub fn device(id: i64) -> Self {
        Self {
            device_id: Some(id),
            ..Self::default()
        }
    }

    pub fn group(id: i64) -> Self {
        Self {
            group_id: Some(id),
            ..Self::default()
        }
    }

    pub fn addresses<I, S>(addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addrs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Pick the effective selector, applying precedence.
    pub fn selector(&self) -> Result<Selector, CoreError> {
        if !self.addresses.is_empty() {
            return Ok(Selector::Addresses(self.addresses.clone()));
        }
        if let Some(id) = self.device_id.filter(|id| *id > 0) {
            return Ok(Selector::Device(id));
        }
        if let Some(id) = self.group_id.filter(|id| *id > 0) {
            return Ok(Selector::Group(id));
        }
        Err(CoreError::InvalidTarget)
    }
}
