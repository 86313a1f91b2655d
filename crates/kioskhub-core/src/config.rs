// ── Runtime hub configuration ──
//
// These values describe *how* the engine talks to the fleet and how often it
// scans. Core never reads config files: the CLI (via kioskhub-config) builds a
// `HubConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;

use kioskhub_api::TransportConfig;

/// Configuration for the dispatch and monitoring engine.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Delay between two scan cycles.
    pub poll_interval: Duration,
    /// Size of the scanner worker pool.
    pub max_workers: usize,
    /// Port every tablet exposes its control API on.
    pub device_port: u16,
    /// Snapshot retention in days. 0 disables pruning.
    pub retention_days: u32,
    /// Per-request timeout for tablet calls.
    pub request_timeout: Duration,
    /// Optional tablet API key.
    pub api_key: Option<SecretString>,
    /// Upper bound on in-flight calls per dispatch. `None` spawns one task
    /// per resolved device.
    pub dispatch_concurrency: Option<usize>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            max_workers: 5,
            device_port: 8080,
            retention_days: 31,
            request_timeout: Duration::from_secs(15),
            api_key: None,
            dispatch_concurrency: None,
        }
    }
}

impl HubConfig {
    /// Transport settings for the tablet HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.request_timeout,
            api_key: self.api_key.clone(),
        }
    }
}
