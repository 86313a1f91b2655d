//! Command dispatch: bridges CLI args -> fleet operations -> output formatting.

pub mod command;
pub mod devices;
pub mod monitor;
pub mod photo;
pub mod scan;
pub mod status;
pub mod util;

use kioskhub_core::Fleet;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a fleet-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    fleet: &Fleet,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Monitor(_) => monitor::handle(fleet, global).await,
        Command::Scan => scan::handle(fleet, global).await,
        Command::Status(args) => status::handle(fleet, &args, global).await,
        Command::Command(args) => command::handle(fleet, args, global).await,
        Command::Photo(args) => photo::handle(fleet, &args, global).await,
        Command::Devices(args) => devices::handle(fleet, &args, global).await,
        Command::Groups => devices::handle_groups(fleet, global).await,
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
