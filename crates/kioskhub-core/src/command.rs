// ── Command catalogue ──
//
// Every one-way remote operation a tablet understands, as a single enum.
// Each variant knows its wire name, endpoint path and optional JSON body;
// the capability layer sends them all through the same executed-check.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{EnumString, IntoStaticStr};

use crate::error::CoreError;

/// All one-way operations against a tablet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, IntoStaticStr, EnumString)]
#[serde(tag = "command", rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum KioskCommand {
    // ── Display & UI ─────────────────────────────────────────────────
    SetBrightness { value: u8 },
    SetVolume { value: u8 },
    ShowToast { text: String },

    // ── System & screen ──────────────────────────────────────────────
    SetScreen { on: bool },
    SetScreensaver { active: bool },
    Wake,
    Reboot,

    // ── Navigation & webview ─────────────────────────────────────────
    Navigate { url: String },
    NavigateAlias { url: String },
    Reload,
    ClearCache,
    #[strum(serialize = "executeJS")]
    #[serde(rename = "executeJS")]
    ExecuteJs { code: String },
    SetRotation { start: bool },

    // ── Audio & TTS ──────────────────────────────────────────────────
    Speak { text: String },
    PlayAudio { url: String, r#loop: bool, volume: u8 },
    StopAudio,
    Beep,

    // ── Apps & remote control ────────────────────────────────────────
    LaunchApp { package: String },
    #[strum(serialize = "remoteCommand")]
    #[serde(rename = "remoteCommand")]
    Remote { action: String },
}

impl KioskCommand {
    /// Stable wire name, used as the report's `command` field.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    /// Endpoint path on the tablet.
    pub fn path(&self) -> String {
        let path = match self {
            Self::SetBrightness { .. } => "/api/brightness",
            Self::SetVolume { .. } => "/api/volume",
            Self::ShowToast { .. } => "/api/toast",
            Self::SetScreen { on: true } => "/api/screen/on",
            Self::SetScreen { on: false } => "/api/screen/off",
            Self::SetScreensaver { active: true } => "/api/screensaver/on",
            Self::SetScreensaver { active: false } => "/api/screensaver/off",
            Self::Wake => "/api/wake",
            Self::Reboot => "/api/reboot",
            Self::Navigate { .. } => "/api/url",
            Self::NavigateAlias { .. } => "/api/navigate",
            Self::Reload => "/api/reload",
            Self::ClearCache => "/api/clearCache",
            Self::ExecuteJs { .. } => "/api/js",
            Self::SetRotation { start: true } => "/api/rotation/start",
            Self::SetRotation { start: false } => "/api/rotation/stop",
            Self::Speak { .. } => "/api/tts",
            Self::PlayAudio { .. } => "/api/audio/play",
            Self::StopAudio => "/api/audio/stop",
            Self::Beep => "/api/audio/beep",
            Self::LaunchApp { .. } => "/api/app/launch",
            Self::Remote { action } => return format!("/api/remote/{action}"),
        };
        path.to_owned()
    }

    /// Reject commands whose arguments cannot be sent as-is.
    ///
    /// A remote-control action becomes one path segment, so it is limited
    /// to ASCII letters, digits, `-` and `_`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Self::Remote { action } = self {
            let valid = !action.is_empty()
                && action
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
            if !valid {
                return Err(CoreError::InvalidCommand {
                    command: self.name(),
                    reason: format!("unsupported remote action {action:?}"),
                });
            }
        }
        Ok(())
    }

    /// JSON body, if the endpoint takes one.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::SetBrightness { value } | Self::SetVolume { value } => {
                Some(json!({ "value": value }))
            }
            Self::ShowToast { text } | Self::Speak { text } => Some(json!({ "text": text })),
            Self::Navigate { url } | Self::NavigateAlias { url } => Some(json!({ "url": url })),
            Self::ExecuteJs { code } => Some(json!({ "code": code })),
            Self::PlayAudio {
                url,
                r#loop,
                volume,
            } => Some(json!({ "url": url, "loop": r#loop, "volume": volume })),
            Self::LaunchApp { package } => Some(json!({ "package": package })),
            Self::SetScreen { .. }
            | Self::SetScreensaver { .. }
            | Self::Wake
            | Self::Reboot
            | Self::Reload
            | Self::ClearCache
            | Self::SetRotation { .. }
            | Self::StopAudio
            | Self::Beep
            | Self::Remote { .. } => None,
        }
    }
}
