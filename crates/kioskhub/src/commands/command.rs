//! Remote command handlers.

use tabled::Tabled;

use kioskhub_core::{ActionReport, ActionResult, Fleet, KioskCommand};

use crate::cli::{Action, CommandArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Executed")]
    executed: String,
    #[tabled(rename = "Time")]
    duration: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn row(r: &ActionResult, color: bool) -> ResultRow {
    ResultRow {
        id: if r.id > 0 { r.id.to_string() } else { "-".into() },
        name: util::or_dash(&r.name),
        ip: r.ip.clone(),
        executed: output::flag(r.executed, "yes", "no", color),
        duration: r.duration.clone(),
        error: r.error.clone().unwrap_or_default(),
    }
}

fn detail(report: &ActionReport, color: bool) -> String {
    let rows: Vec<ResultRow> = report.results.iter().map(|r| row(r, color)).collect();
    format!(
        "{}\n{}: {}",
        output::render_table(&rows),
        report.command,
        report.summary
    )
}

// ── CLI → core ──────────────────────────────────────────────────────

impl From<Action> for KioskCommand {
    fn from(action: Action) -> Self {
        match action {
            Action::Brightness { value } => Self::SetBrightness { value },
            Action::Volume { value } => Self::SetVolume { value },
            Action::Toast { text } => Self::ShowToast { text },
            Action::ScreenOn => Self::SetScreen { on: true },
            Action::ScreenOff => Self::SetScreen { on: false },
            Action::ScreensaverOn => Self::SetScreensaver { active: true },
            Action::ScreensaverOff => Self::SetScreensaver { active: false },
            Action::Wake => Self::Wake,
            Action::Reboot => Self::Reboot,
            Action::Navigate { url, alias: false } => Self::Navigate { url },
            Action::Navigate { url, alias: true } => Self::NavigateAlias { url },
            Action::Reload => Self::Reload,
            Action::ClearCache => Self::ClearCache,
            Action::Js { code } => Self::ExecuteJs { code },
            Action::RotationStart => Self::SetRotation { start: true },
            Action::RotationStop => Self::SetRotation { start: false },
            Action::Speak { text } => Self::Speak { text },
            Action::Play {
                url,
                repeat,
                volume,
            } => Self::PlayAudio {
                url,
                r#loop: repeat,
                volume,
            },
            Action::StopAudio => Self::StopAudio,
            Action::Beep => Self::Beep,
            Action::Launch { package } => Self::LaunchApp { package },
            Action::Remote { action } => Self::Remote { action },
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(fleet: &Fleet, args: CommandArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let target = util::target(&args.target);
    let report = fleet.execute(&target, args.action.into()).await?;

    let color = output::should_color(&global.color);
    let out = output::render_single(&global.output, &report, |r| detail(r, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
