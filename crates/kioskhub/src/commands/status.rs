//! Live status handler.

use tabled::Tabled;

use kioskhub_core::{Fleet, StatusReport, StatusResult};

use crate::cli::{GlobalOpts, TargetArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Screen")]
    screen: String,
    #[tabled(rename = "WiFi")]
    wifi: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "URL / Error")]
    detail: String,
}

fn row(r: &StatusResult, color: bool) -> StatusRow {
    let state = output::flag(r.success, "online", "offline", color);
    let id = if r.id > 0 { r.id.to_string() } else { "-".into() };
    match &r.data {
        Some(s) => StatusRow {
            id,
            name: util::or_dash(&r.name),
            state,
            battery: format!(
                "{}%{}",
                s.battery_level,
                if s.battery_charging { " ⚡" } else { "" }
            ),
            screen: if s.screen_on {
                format!("on ({})", s.screen_brightness)
            } else {
                "off".into()
            },
            wifi: if s.wifi_connected {
                format!("{} ({} dBm)", s.wifi_ssid, s.wifi_signal_strength)
            } else {
                "-".into()
            },
            version: util::or_dash(&s.device_version),
            detail: util::or_dash(&s.current_url),
        },
        None => StatusRow {
            id,
            name: util::or_dash(&r.name),
            state,
            battery: "-".into(),
            screen: "-".into(),
            wifi: "-".into(),
            version: "-".into(),
            detail: r.error.clone().unwrap_or_default(),
        },
    }
}

fn detail(report: &StatusReport, color: bool) -> String {
    let rows: Vec<StatusRow> = report.results.iter().map(|r| row(r, color)).collect();
    output::render_table(&rows)
}

pub async fn handle(fleet: &Fleet, args: &TargetArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let report = fleet.fetch_status(&util::target(args)).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(&global.output, &report, |r| detail(r, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
