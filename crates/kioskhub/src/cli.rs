//! Clap derive structures for the `kioskhub` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// kioskhub -- monitor and control a fleet of FreeKiosk tablets
#[derive(Debug, Parser)]
#[command(
    name = "kioskhub",
    version,
    about = "Monitor and control FreeKiosk tablet fleets",
    long_about = "Fleet hub for FreeKiosk tablets.\n\n\
        Sends commands to single tablets, groups or ad-hoc address lists in\n\
        parallel, polls the whole fleet for liveness, and keeps a history of\n\
        status snapshots.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, env = "KIOSKHUB_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Tablet control API port (overrides config)
    #[arg(long, env = "KIOSKHUB_PORT", global = true)]
    pub port: Option<u16>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "KIOSKHUB_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "KIOSKHUB_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the fleet on a fixed interval until interrupted
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// Run a single scan cycle and print fleet liveness
    Scan,

    /// Fetch live status from targeted tablets
    #[command(alias = "st")]
    Status(TargetArgs),

    /// Send a command to targeted tablets
    #[command(alias = "cmd")]
    Command(CommandArgs),

    /// Take a photo with a tablet camera
    Photo(PhotoArgs),

    /// List registered tablets
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List tablet groups
    Groups,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Targeting ────────────────────────────────────────────────────────

/// Which tablets an operation applies to.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Registered tablet id
    #[arg(long, short = 'd', global = true)]
    pub device: Option<i64>,

    /// Group id
    #[arg(long, short = 'g', global = true)]
    pub group: Option<i64>,

    /// Explicit tablet address (repeatable)
    #[arg(long = "ip", value_name = "ADDR", global = true)]
    pub ips: Vec<String>,
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Scan interval in seconds (overrides config)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CommandArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Set screen brightness (0-100)
    Brightness {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Set media volume (0-100)
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
    /// Show a toast message
    Toast { text: String },
    /// Turn the screen on
    ScreenOn,
    /// Turn the screen off
    ScreenOff,
    /// Start the screensaver
    ScreensaverOn,
    /// Stop the screensaver
    ScreensaverOff,
    /// Wake the tablet
    Wake,
    /// Reboot the tablet
    Reboot,
    /// Load a URL in the kiosk webview
    Navigate {
        url: String,
        /// Use the alternate navigate endpoint
        #[arg(long)]
        alias: bool,
    },
    /// Reload the current page
    Reload,
    /// Clear the webview cache
    ClearCache,
    /// Run JavaScript in the webview
    Js { code: String },
    /// Start URL rotation
    RotationStart,
    /// Stop URL rotation
    RotationStop,
    /// Speak text aloud
    Speak { text: String },
    /// Play an audio file
    Play {
        url: String,
        /// Loop playback
        #[arg(long = "loop")]
        repeat: bool,
        /// Playback volume (0-100)
        #[arg(long, default_value = "50", value_parser = clap::value_parser!(u8).range(0..=100))]
        volume: u8,
    },
    /// Stop audio playback
    StopAudio,
    /// Play a short beep
    Beep,
    /// Launch an installed app
    Launch { package: String },
    /// Send a remote-control key (e.g. home, back, up)
    Remote { action: String },
}

// ── Photo ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PhotoArgs {
    /// Registered tablet id
    #[arg(long, short = 'd')]
    pub device: i64,

    /// Camera to use
    #[arg(long, default_value = "back")]
    pub camera: String,

    /// JPEG quality (1-100)
    #[arg(long, default_value = "80", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Output file
    #[arg(long, short = 'f', default_value = "photo.jpg")]
    pub file: PathBuf,
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    /// Only members of this group
    #[arg(long, short = 'g')]
    pub group: Option<i64>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
