// ── Batch reports ──
//
// Result shapes returned by the dispatcher. One entry per resolved device,
// in resolution order, whatever happened to each call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::{Device, DeviceSnapshot};

// ── Commands ─────────────────────────────────────────────────────────

/// Outcome of one command against one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub id: i64,
    pub name: String,
    pub ip: String,
    /// The device answered (executed or not).
    pub success: bool,
    /// The device confirmed execution.
    pub executed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time of the call, e.g. `12ms`.
    pub duration: String,
}

impl ActionResult {
    pub(crate) fn new(device: &Device, elapsed: Duration) -> Self {
        Self {
            id: device.id,
            name: device.name.clone(),
            ip: device.ip.clone(),
            success: false,
            executed: false,
            error: None,
            duration: format_duration(elapsed),
        }
    }
}

/// Aggregated result of a fan-out command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    pub command: String,
    /// Unix seconds at completion.
    pub timestamp: i64,
    pub summary: String,
    pub results: Vec<ActionResult>,
}

impl ActionReport {
    /// Number of devices that confirmed execution.
    pub fn executed_count(&self) -> usize {
        self.results.iter().filter(|r| r.executed).count()
    }

    pub(crate) fn summarize(executed: usize, total: usize) -> String {
        format!("{executed}/{total} devices executed the command successfully")
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// Status fetch outcome for one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    pub id: i64,
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DeviceSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated status of every targeted device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub timestamp: i64,
    pub results: Vec<StatusResult>,
}

/// Human-readable duration rounded to whole milliseconds.
pub(crate) fn format_duration(elapsed: Duration) -> String {
    // Nearest millisecond, halves rounding up.
    let millis = u64::try_from(elapsed.as_micros().saturating_add(500) / 1000).unwrap_or(u64::MAX);
    if millis == 0 {
        return "0ms".into();
    }
    humantime::format_duration(Duration::from_millis(millis)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_text() {
        assert_eq!(
            ActionReport::summarize(2, 3),
            "2/3 devices executed the command successfully"
        );
    }

    #[test]
    fn durations_round_to_millis() {
        assert_eq!(format_duration(Duration::from_micros(12_400)), "12ms");
        assert_eq!(format_duration(Duration::from_micros(12_600)), "13ms");
        assert_eq!(format_duration(Duration::from_micros(12_500)), "13ms");
        assert_eq!(format_duration(Duration::from_micros(300)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(1_250)), "1s 250ms");
    }

    #[test]
    fn error_is_omitted_when_absent() {
        let device = Device::new(3, "10.0.0.3", "Lobby");
        let mut result = ActionResult::new(&device, Duration::from_millis(5));
        result.success = true;
        result.executed = true;

        let json = serde_json::to_value(&result).unwrap_or_default();
        assert!(json.get("error").is_none());
        assert_eq!(json["duration"], "5ms");
    }
}
