//! Foreground fleet monitor.
//!
//! Runs the scanner until Ctrl-C. A hub subscriber logs every change
//! burst so operators can watch the fleet from the terminal.

use tokio_util::sync::CancellationToken;
use tracing::info;

use kioskhub_core::Fleet;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    let cancel = CancellationToken::new();

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping after the current cycle");
        }
        on_signal.cancel();
    });

    let mut changes = fleet.hub().subscribe_global();
    let watcher_cancel = cancel.clone();
    let watcher_fleet = fleet.clone();
    let watcher = tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = watcher_cancel.cancelled() => break,
                alive = changes.changed() => {
                    if !alive {
                        break;
                    }
                    if let Ok(devices) = watcher_fleet.devices().await {
                        let online = devices.iter().filter(|d| d.online).count();
                        info!(online, total = devices.len(), "fleet updated");
                    }
                }
            }
        }
        watcher_fleet.hub().unsubscribe(&changes);
    });

    let outcome = fleet.run_monitor(cancel.clone()).await;
    cancel.cancel();
    let _ = watcher.await;

    match outcome {
        Err(e) if e.is_cancelled() => {
            output::print_output("monitor stopped", global.quiet);
            Ok(())
        }
        Err(e) => Err(e.into()),
        Ok(()) => Ok(()),
    }
}
