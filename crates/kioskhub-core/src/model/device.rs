use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A managed tablet.
///
/// `online`, `last_seen` and `version` are written by the scanner only.
/// An `id` of 0 marks a synthetic device built from a raw address target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub ip: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Device {
    pub fn new(id: i64, ip: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            ip: ip.into(),
            name: name.into(),
            version: String::new(),
            online: false,
            last_seen: None,
        }
    }

    /// Synthetic device for an explicit address target.
    pub fn from_address(ip: impl Into<String>) -> Self {
        Self::new(0, ip, "")
    }

    /// `host:port` address of the control API.
    pub fn address(&self, port: u16) -> String {
        format!("{}:{}", self.ip, port)
    }

    pub fn is_synthetic(&self) -> bool {
        self.id <= 0
    }
}

/// A named set of tablets. Membership lives in the group repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#64748b".into()
}

impl Group {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            color: default_color(),
        }
    }
}
