mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kioskhub_config::{Config, config_path, load_config_from};
use kioskhub_core::{Fleet, Repositories};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "kioskhub", &mut std::io::stdout());
            Ok(())
        }

        // Everything else runs against the configured fleet
        cmd => {
            let config = load(&cli.global)?;
            let fleet = build_fleet(&config, &cli.global, &cmd)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &fleet, &cli.global).await
        }
    }
}

/// Load the config file named by `--config`, or the platform default.
fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);
    load_config_from(&path).map_err(|e| CliError::config(path.display().to_string(), e))
}

/// Build the fleet from config, applying CLI flag overrides.
fn build_fleet(config: &Config, global: &GlobalOpts, cmd: &Command) -> Result<Fleet, CliError> {
    let mut hub = config.to_hub_config();
    if let Some(port) = global.port {
        hub.device_port = port;
    }
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        hub.request_timeout = Duration::from_secs(secs);
    }
    if let Command::Monitor(args) = cmd {
        if let Some(secs) = args.interval {
            hub.poll_interval = Duration::from_secs(secs);
        }
    }

    let store = config.seed_store();
    Ok(Fleet::connect(hub, Repositories::memory(&store))?)
}
