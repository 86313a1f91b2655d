// ── API-to-domain type conversions ──
//
// Bridges raw `kioskhub_api` response types into the canonical domain model.

use chrono::Utc;

use kioskhub_api::StatusResponse;

use crate::model::DeviceSnapshot;

impl From<StatusResponse> for DeviceSnapshot {
    /// Flatten a status payload. The device id is left at 0; callers attach
    /// it with [`DeviceSnapshot::for_device`]. The capture time is the hub's
    /// clock, not the tablet-reported timestamp.
    fn from(resp: StatusResponse) -> Self {
        let d = resp.data;
        Self {
            device_id: 0,
            success: resp.success,

            battery_level: d.battery.level,
            battery_charging: d.battery.charging,
            battery_plugged: d.battery.plugged,

            screen_on: d.screen.on,
            screen_brightness: d.screen.brightness,
            screensaver_active: d.screen.screensaver_active,

            audio_volume: d.audio.volume,

            current_url: d.webview.current_url,
            webview_can_go_back: d.webview.can_go_back,
            webview_loading: d.webview.loading,

            device_ip: d.device.ip,
            device_hostname: d.device.hostname,
            device_version: d.device.version,
            is_device_owner: d.device.is_device_owner,
            kiosk_mode: d.device.kiosk_mode,

            wifi_ssid: d.wifi.ssid,
            wifi_signal_strength: d.wifi.signal_strength,
            wifi_signal_level: d.wifi.signal_level,
            wifi_connected: d.wifi.connected,
            wifi_link_speed: d.wifi.link_speed,
            wifi_frequency: d.wifi.frequency,

            rotation_enabled: d.rotation.enabled,
            rotation_interval: d.rotation.interval,
            rotation_current_index: d.rotation.current_index,

            light_level: d.sensors.light,
            proximity: d.sensors.proximity,
            accel_x: d.sensors.accelerometer.x,
            accel_y: d.sensors.accelerometer.y,
            accel_z: d.sensors.accelerometer.z,

            auto_brightness_enabled: d.auto_brightness.enabled,
            auto_brightness_min: d.auto_brightness.min,
            auto_brightness_max: d.auto_brightness.max,
            auto_brightness_current: d.auto_brightness.current_light_level,

            storage_total_mb: d.storage.total_mb,
            storage_available_mb: d.storage.available_mb,
            storage_used_mb: d.storage.used_mb,
            storage_used_percent: d.storage.used_percent,

            memory_total_mb: d.memory.total_mb,
            memory_available_mb: d.memory.available_mb,
            memory_used_mb: d.memory.used_mb,
            memory_used_percent: d.memory.used_percent,
            low_memory: d.memory.low_memory,

            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use kioskhub_api::models::{DeviceInfo, StatusData, Storage};

    use super::*;

    #[test]
    fn status_flattens_nested_sections() {
        let resp = StatusResponse {
            success: true,
            timestamp: 0,
            data: StatusData {
                device: DeviceInfo {
                    version: "2.0.1".into(),
                    hostname: "kiosk-bar".into(),
                    ..DeviceInfo::default()
                },
                storage: Storage {
                    used_percent: 71,
                    ..Storage::default()
                },
                ..StatusData::default()
            },
        };

        let snap = DeviceSnapshot::from(resp).for_device(9);
        assert!(snap.success);
        assert_eq!(snap.device_id, 9);
        assert_eq!(snap.device_version, "2.0.1");
        assert_eq!(snap.device_hostname, "kiosk-bar");
        assert_eq!(snap.storage_used_percent, 71);
    }
}
