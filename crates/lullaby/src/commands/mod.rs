//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod leds;
pub mod noise;
pub mod session;
pub mod status;
pub mod util;
pub mod watch;

use lullaby_core::ControllerConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    config: ControllerConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(config, global).await,
        Command::Led(args) => leds::handle(config, args, global).await,
        Command::Noise(args) => noise::handle(config, args, global).await,
        Command::Watch(args) => watch::handle(config, args, global).await,
        Command::Session => session::handle(config, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
