//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use kioskhub_config::ConfigError;
use kioskhub_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Targeting ────────────────────────────────────────────────────
    #[error("{resource_type} {identifier} not found")]
    #[diagnostic(
        code(kioskhub::not_found),
        help("Run: kioskhub {list_command} to see registered {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No target selected")]
    #[diagnostic(
        code(kioskhub::no_target),
        help("Pass --device <ID>, --group <ID> or one or more --ip <ADDR>.")
    )]
    NoTarget,

    // ── Tablets ──────────────────────────────────────────────────────
    #[error("Could not reach tablet at {addr}")]
    #[diagnostic(
        code(kioskhub::unreachable),
        help("Check that the tablet is powered on and the control API port is correct (--port).")
    )]
    Unreachable { addr: String },

    #[error("Tablet API error: {message}")]
    #[diagnostic(code(kioskhub::api_error))]
    Api { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(kioskhub::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error")]
    #[diagnostic(
        code(kioskhub::config),
        help("Check the config file at {path} and any KIOSKHUB_* environment variables.")
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    #[diagnostic(code(kioskhub::storage))]
    Storage(String),

    #[error("Internal error: {0}")]
    #[diagnostic(code(kioskhub::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(kioskhub::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(kioskhub::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NoTarget | Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } => exit_code::CONFIG,
            Self::Unreachable { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DeviceNotFound { id } => CliError::NotFound {
                resource_type: "tablet".into(),
                identifier: id.to_string(),
                list_command: "devices".into(),
            },

            CoreError::GroupNotFound { id } => CliError::NotFound {
                resource_type: "group".into(),
                identifier: format!("{id} (or it has no members)"),
                list_command: "groups".into(),
            },

            CoreError::InvalidTarget => CliError::NoTarget,

            CoreError::KioskUnreachable { addr } => CliError::Unreachable { addr },

            CoreError::InvalidCommand { command, reason } => CliError::Validation {
                field: command.into(),
                reason,
            },

            CoreError::Api { message, .. } => CliError::Api { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Repository(e) => CliError::Storage(e.to_string()),

            CoreError::Cancelled => CliError::Internal("operation cancelled".into()),
        }
    }
}

impl CliError {
    pub fn config(path: impl Into<String>, source: ConfigError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_errors_map_to_exit_codes() {
        assert_eq!(
            CliError::from(CoreError::DeviceNotFound { id: 4 }).exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(CoreError::GroupNotFound { id: 2 }).exit_code(),
            exit_code::NOT_FOUND
        );
        assert_eq!(
            CliError::from(CoreError::InvalidTarget).exit_code(),
            exit_code::USAGE
        );
    }

    #[test]
    fn command_and_lifecycle_errors_map_to_exit_codes() {
        let invalid = CliError::from(CoreError::InvalidCommand {
            command: "remoteCommand",
            reason: "unsupported remote action \"..\"".into(),
        });
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
        assert!(invalid.to_string().contains("remoteCommand"));

        assert_eq!(
            CliError::from(CoreError::Cancelled).exit_code(),
            exit_code::GENERAL
        );
        assert_eq!(
            CliError::from(CoreError::KioskUnreachable {
                addr: "10.0.0.9:8080".into()
            })
            .exit_code(),
            exit_code::CONNECTION
        );
    }
}
