// ── Core error types ──
//
// User-facing errors from kioskhub-core. Per-device failures during a
// fan-out never surface here: they are captured inside the report. These
// variants cover whole-operation failures only. The `From<kioskhub_api::Error>`
// impl is used for single-device paths such as the camera fetch.

use thiserror::Error;

use crate::store::StoreError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Target resolution ────────────────────────────────────────────
    #[error("Tablet not found: {id}")]
    DeviceNotFound { id: i64 },

    /// Raised for both an unknown group and a group without members.
    #[error("Group not found or empty: {id}")]
    GroupNotFound { id: i64 },

    #[error("Invalid target: set a device id, a group id or an address list")]
    InvalidTarget,

    /// Reserved for callers that want to classify transport failures.
    /// Nothing in the engine produces it.
    #[error("Tablet unreachable at {addr}")]
    KioskUnreachable { addr: String },

    // ── Commands ─────────────────────────────────────────────────────
    #[error("Invalid {command} command: {reason}")]
    InvalidCommand {
        command: &'static str,
        reason: String,
    },

    // ── Device API (single-device paths) ─────────────────────────────
    #[error("Tablet API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Repository error: {0}")]
    Repository(#[from] StoreError),

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Monitor cancelled")]
    Cancelled,
}

impl CoreError {
    /// Returns `true` for the normal shutdown outcome of a background loop.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<kioskhub_api::Error> for CoreError {
    fn from(err: kioskhub_api::Error) -> Self {
        match err {
            kioskhub_api::Error::Http { ref addr, status } => CoreError::Api {
                message: format!("{addr} returned HTTP {status}"),
                status: Some(status),
            },
            kioskhub_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid tablet address: {e}"),
            },
            kioskhub_api::Error::ClientBuild(message) => CoreError::Config { message },
            other => CoreError::Api {
                message: other.to_string(),
                status: None,
            },
        }
    }
}
