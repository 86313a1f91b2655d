use thiserror::Error;

/// Top-level error type for the `kioskhub-api` crate.
///
/// Covers every way a single tablet call can fail: transport, HTTP status,
/// payload decoding, and the two logical refusals a tablet can report.
/// `kioskhub-core` records these per device; they never abort a batch.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTTP client construction error, including an unusable API key header.
    #[error("HTTP client setup failed: {0}")]
    ClientBuild(String),

    // ── Device responses ────────────────────────────────────────────
    /// The tablet answered with a non-200 status.
    #[error("Tablet {addr} returned HTTP {status}")]
    Http { addr: String, status: u16 },

    /// The tablet answered `success: false`.
    #[error("Tablet {addr} reported success=false")]
    Rejected { addr: String },

    /// The tablet accepted the request but did not execute the command.
    #[error("Tablet {addr} failed to execute {command}")]
    NotExecuted { addr: String, command: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the tablet could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the tablet answered but refused or skipped the work.
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::NotExecuted { .. })
    }
}
