// Tablet API response types
//
// Models for the FreeKiosk control API. Every section of the status payload
// uses `#[serde(default)]` because older app builds omit whole blocks
// (sensors, autoBrightness) rather than sending nulls.

use serde::{Deserialize, Serialize};

// ── Status ───────────────────────────────────────────────────────────

/// Body of `GET /api/status`.
///
/// ```json
/// { "success": true, "timestamp": 1718000000, "data": { "battery": {..}, .. } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub data: StatusData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusData {
    pub battery: Battery,
    pub screen: Screen,
    pub audio: Audio,
    pub webview: Webview,
    pub device: DeviceInfo,
    pub wifi: Wifi,
    pub rotation: Rotation,
    pub sensors: Sensors,
    pub auto_brightness: AutoBrightness,
    pub storage: Storage,
    pub memory: Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Battery {
    pub level: i32,
    pub charging: bool,
    pub plugged: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Screen {
    pub on: bool,
    pub brightness: i32,
    pub screensaver_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Audio {
    pub volume: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Webview {
    pub current_url: String,
    pub can_go_back: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    pub ip: String,
    pub hostname: String,
    pub version: String,
    pub is_device_owner: bool,
    pub kiosk_mode: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Wifi {
    pub ssid: String,
    pub signal_strength: i32,
    pub signal_level: i32,
    pub connected: bool,
    pub link_speed: i32,
    pub frequency: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rotation {
    pub enabled: bool,
    pub interval: i32,
    pub current_index: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sensors {
    pub light: f64,
    pub proximity: f64,
    pub accelerometer: Accelerometer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Accelerometer {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoBrightness {
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
    pub current_light_level: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    #[serde(rename = "totalMB")]
    pub total_mb: i64,
    #[serde(rename = "availableMB")]
    pub available_mb: i64,
    #[serde(rename = "usedMB")]
    pub used_mb: i64,
    #[serde(rename = "usedPercent")]
    pub used_percent: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Memory {
    #[serde(rename = "totalMB")]
    pub total_mb: i64,
    #[serde(rename = "availableMB")]
    pub available_mb: i64,
    #[serde(rename = "usedMB")]
    pub used_mb: i64,
    #[serde(rename = "usedPercent")]
    pub used_percent: i32,
    #[serde(rename = "lowMemory")]
    pub low_memory: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

/// Body returned by every `POST` command endpoint.
///
/// ```json
/// { "success": true, "data": { "executed": true, "command": "beep" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub data: CommandData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandData {
    pub executed: bool,
    pub command: String,
}

impl CommandResponse {
    /// A command only counts as executed when both flags are set.
    pub fn executed(&self) -> bool {
        self.success && self.data.executed
    }
}
