//! Camera capture handler.

use kioskhub_core::Fleet;

use crate::cli::{GlobalOpts, PhotoArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(fleet: &Fleet, args: &PhotoArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let jpeg = fleet.photo(args.device, &args.camera, args.quality).await?;
    tokio::fs::write(&args.file, &jpeg).await?;

    output::print_output(
        &format!("saved {} bytes to {}", jpeg.len(), args.file.display()),
        global.quiet,
    );
    Ok(())
}
