use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A point-in-time status record pulled from a tablet.
///
/// Flat by design so it maps onto a single history row. Immutable once
/// captured; failed fetches produce a record with `success = false` and
/// every reading left at its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device_id: i64,
    pub success: bool,

    // Battery
    pub battery_level: i32,
    pub battery_charging: bool,
    pub battery_plugged: String,

    // Screen
    pub screen_on: bool,
    pub screen_brightness: i32,
    pub screensaver_active: bool,

    // Audio
    pub audio_volume: i32,

    // Webview
    pub current_url: String,
    pub webview_can_go_back: bool,
    pub webview_loading: bool,

    // Device
    pub device_ip: String,
    pub device_hostname: String,
    pub device_version: String,
    pub is_device_owner: bool,
    pub kiosk_mode: bool,

    // WiFi
    pub wifi_ssid: String,
    pub wifi_signal_strength: i32,
    pub wifi_signal_level: i32,
    pub wifi_connected: bool,
    pub wifi_link_speed: i32,
    pub wifi_frequency: i32,

    // Rotation
    pub rotation_enabled: bool,
    pub rotation_interval: i32,
    pub rotation_current_index: i32,

    // Sensors
    pub light_level: f64,
    pub proximity: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,

    // Auto brightness
    pub auto_brightness_enabled: bool,
    pub auto_brightness_min: f64,
    pub auto_brightness_max: f64,
    pub auto_brightness_current: f64,

    // Storage (MB / %)
    pub storage_total_mb: i64,
    pub storage_available_mb: i64,
    pub storage_used_mb: i64,
    pub storage_used_percent: i32,

    // Memory (MB / %)
    pub memory_total_mb: i64,
    pub memory_available_mb: i64,
    pub memory_used_mb: i64,
    pub memory_used_percent: i32,
    pub low_memory: bool,

    pub timestamp: DateTime<Utc>,
}

impl DeviceSnapshot {
    /// Record of a failed fetch, stamped now.
    pub fn failed(device_id: i64) -> Self {
        Self {
            device_id,
            success: false,
            timestamp: Utc::now(),
            ..Self::default()
        }
    }

    /// Attach the snapshot to a device.
    pub fn for_device(mut self, device_id: i64) -> Self {
        self.device_id = device_id;
        self
    }
}
