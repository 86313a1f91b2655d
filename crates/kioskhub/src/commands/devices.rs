//! Roster handlers: tablets and groups.

use serde::Serialize;
use tabled::Tabled;

use kioskhub_core::{Device, Fleet, Group};

use crate::cli::{DevicesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
}

pub(crate) fn device_row(d: &Device, color: bool) -> DeviceRow {
    DeviceRow {
        id: d.id,
        name: util::or_dash(&d.name),
        ip: d.ip.clone(),
        state: output::flag(d.online, "online", "offline", color),
        version: util::or_dash(&d.version),
        last_seen: util::ago(d.last_seen),
    }
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Members")]
    members: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Group plus member ids, as rendered by structured formats.
#[derive(Serialize)]
struct GroupView {
    #[serde(flatten)]
    group: Group,
    members: Vec<i64>,
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(fleet: &Fleet, args: &DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = match args.group {
        Some(id) => fleet.group_members(id).await?,
        None => fleet.devices().await?,
    };

    let color = output::should_color(&global.color);
    let out = output::render_list(&global.output, &devices, |d| device_row(d, color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle_groups(fleet: &Fleet, global: &GlobalOpts) -> Result<(), CliError> {
    let mut views = Vec::new();
    for group in fleet.groups().await? {
        let members = fleet
            .group_members(group.id)
            .await?
            .iter()
            .map(|d| d.id)
            .collect();
        views.push(GroupView { group, members });
    }

    let out = output::render_list(&global.output, &views, |v| GroupRow {
        id: v.group.id,
        name: v.group.name.clone(),
        members: v
            .members
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        description: util::or_dash(&v.group.description),
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
