//! Shared configuration for the kioskhub binary.
//!
//! TOML file plus `KIOSKHUB_*` environment overrides, tablet API key
//! resolution, and translation into `kioskhub_core::HubConfig` and a
//! seeded in-memory roster.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use kioskhub_core::{Device, Group, HubConfig, MemoryStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Engine settings.
    #[serde(default)]
    pub hub: HubSettings,

    /// Registered tablets.
    #[serde(default)]
    pub devices: Vec<DeviceEntry>,

    /// Named tablet groups.
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HubSettings {
    /// Seconds between scan cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Port of the tablet control API.
    #[serde(default = "default_device_port")]
    pub device_port: u16,

    /// Days of snapshot history to keep. 0 keeps everything.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Tablet API key (plaintext, prefer `api_key_env`).
    pub api_key: Option<String>,

    /// Environment variable holding the tablet API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    /// Cap on in-flight calls per command. Unset means one call per device
    /// at once.
    pub dispatch_concurrency: Option<usize>,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            max_workers: default_max_workers(),
            device_port: default_device_port(),
            retention_days: default_retention_days(),
            timeout: default_timeout(),
            api_key: None,
            api_key_env: default_api_key_env(),
            dispatch_concurrency: None,
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}
fn default_max_workers() -> usize {
    5
}
fn default_device_port() -> u16 {
    8080
}
fn default_retention_days() -> u32 {
    31
}
fn default_timeout() -> u64 {
    15
}
#[allow(clippy::unnecessary_wraps)]
fn default_api_key_env() -> Option<String> {
    Some("KIOSK_API_KEY".into())
}

/// A tablet in the roster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceEntry {
    pub id: i64,
    pub ip: String,
    #[serde(default)]
    pub name: String,
}

/// A group and the ids of its member tablets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GroupEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: Option<String>,
    #[serde(default)]
    pub members: Vec<i64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "freekiosk", "kioskhub").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("kioskhub");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` + environment, then validate it.
///
/// A missing file is not an error: defaults and environment still apply.
/// Environment keys nest with a double underscore, e.g.
/// `KIOSKHUB_HUB__POLL_INTERVAL=10`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KIOSKHUB_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hub = &self.hub;
        if hub.poll_interval == 0 {
            return Err(invalid("hub.poll_interval", "must be at least 1 second"));
        }
        if hub.max_workers == 0 {
            return Err(invalid("hub.max_workers", "must be at least 1"));
        }
        if hub.timeout == 0 {
            return Err(invalid("hub.timeout", "must be at least 1 second"));
        }
        if hub.dispatch_concurrency == Some(0) {
            return Err(invalid(
                "hub.dispatch_concurrency",
                "must be at least 1 when set",
            ));
        }

        let mut ids = HashSet::new();
        for device in &self.devices {
            if device.id <= 0 {
                return Err(invalid("devices.id", format!("{} is not positive", device.id)));
            }
            if !ids.insert(device.id) {
                return Err(invalid("devices.id", format!("duplicate id {}", device.id)));
            }
            if device.ip.trim().is_empty() {
                return Err(invalid("devices.ip", format!("device {} has no address", device.id)));
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if group.id <= 0 || !group_ids.insert(group.id) {
                return Err(invalid("groups.id", format!("invalid or duplicate id {}", group.id)));
            }
            if let Some(missing) = group.members.iter().find(|m| !ids.contains(*m)) {
                return Err(invalid(
                    "groups.members",
                    format!("group {} references unknown device {missing}", group.id),
                ));
            }
        }
        Ok(())
    }

    /// Resolve the tablet API key: named env var first, then plaintext.
    pub fn resolve_api_key(&self) -> Option<SecretString> {
        if let Some(ref env_name) = self.hub.api_key_env {
            if let Ok(val) = std::env::var(env_name) {
                if !val.is_empty() {
                    return Some(SecretString::from(val));
                }
            }
        }
        self.hub
            .api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.clone()))
    }

    /// Engine configuration.
    pub fn to_hub_config(&self) -> HubConfig {
        let hub = &self.hub;
        HubConfig {
            poll_interval: Duration::from_secs(hub.poll_interval),
            max_workers: hub.max_workers,
            device_port: hub.device_port,
            retention_days: hub.retention_days,
            request_timeout: Duration::from_secs(hub.timeout),
            api_key: self.resolve_api_key(),
            dispatch_concurrency: hub.dispatch_concurrency,
        }
    }

    /// In-memory store holding the configured roster.
    pub fn seed_store(&self) -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        for entry in &self.devices {
            store.insert_device(Device::new(entry.id, entry.ip.clone(), entry.name.clone()));
        }
        for entry in &self.groups {
            let mut group = Group::new(entry.id, entry.name.clone());
            group.description.clone_from(&entry.description);
            if let Some(ref color) = entry.color {
                group.color.clone_from(color);
            }
            store.insert_group(group);
            for member in &entry.members {
                store.add_member(entry.id, *member);
            }
        }
        Arc::new(store)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use kioskhub_core::{DeviceRepository, GroupRepository};
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const ROSTER: &str = r##"
[hub]
poll_interval = 10
max_workers = 3
device_port = 9090
retention_days = 7
api_key = "plain-key"
api_key_env = "KIOSKHUB_TEST_UNSET_KEY_VAR"

[[devices]]
id = 1
ip = "10.0.0.5"
name = "Living room"

[[devices]]
id = 2
ip = "10.0.0.6"
name = "Kitchen"

[[groups]]
id = 1
name = "Ground floor"
color = "#ff0000"
members = [2, 1]
"##;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        let hub = config.to_hub_config();
        assert_eq!(hub.poll_interval, Duration::from_secs(30));
        assert_eq!(hub.max_workers, 5);
        assert_eq!(hub.device_port, 8080);
        assert_eq!(hub.retention_days, 31);
        assert_eq!(hub.request_timeout, Duration::from_secs(15));
        assert_eq!(hub.dispatch_concurrency, None);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn file_values_reach_hub_config() {
        let file = write_config(ROSTER);
        let config = load_config_from(file.path()).unwrap();
        let hub = config.to_hub_config();

        assert_eq!(hub.poll_interval, Duration::from_secs(10));
        assert_eq!(hub.max_workers, 3);
        assert_eq!(hub.device_port, 9090);
        assert_eq!(hub.retention_days, 7);
        assert_eq!(hub.api_key.unwrap().expose_secret(), "plain-key");
    }

    #[tokio::test]
    async fn roster_seeds_the_store() {
        let file = write_config(ROSTER);
        let store = load_config_from(file.path()).unwrap().seed_store();

        let devices = DeviceRepository::list(store.as_ref()).await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "Living room");

        let group = GroupRepository::get(store.as_ref(), 1).await.unwrap().unwrap();
        assert_eq!(group.color, "#ff0000");
        let members: Vec<i64> = store.members(1).await.unwrap().iter().map(|d| d.id).collect();
        assert_eq!(members, vec![1, 2]);
    }

    #[test]
    fn unknown_group_member_is_rejected() {
        let file = write_config(
            r#"
[[devices]]
id = 1
ip = "10.0.0.5"

[[groups]]
id = 1
name = "Lobby"
members = [1, 4]
"#,
        );
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "groups.members"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config("[hub]\npoll_interval = 0\n");
        assert!(matches!(
            load_config_from(file.path()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn duplicate_device_ids_are_rejected() {
        let file = write_config(
            r#"
[[devices]]
id = 3
ip = "10.0.0.5"

[[devices]]
id = 3
ip = "10.0.0.6"
"#,
        );
        assert!(load_config_from(file.path()).is_err());
    }
}
