//! One-shot scan handler.

use serde::Serialize;

use kioskhub_core::{Device, Fleet, ScanSummary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::devices::{DeviceRow, device_row};

#[derive(Serialize)]
struct ScanView {
    summary: ScanSummary,
    devices: Vec<Device>,
}

pub async fn handle(fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    let summary = fleet.scan().await;
    let view = ScanView {
        summary,
        devices: fleet.devices().await?,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(&global.output, &view, |v| {
        let rows: Vec<DeviceRow> = v.devices.iter().map(|d| device_row(d, color)).collect();
        let mut text = format!(
            "{}\n{}/{} online",
            output::render_table(&rows),
            v.summary.online,
            v.summary.total
        );
        if let Some(pruned) = v.summary.pruned.filter(|n| *n > 0) {
            text.push_str(&format!(", {pruned} old snapshots pruned"));
        }
        text
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
