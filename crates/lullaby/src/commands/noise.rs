//! White-noise command handlers.

use lullaby_core::{Command as CoreCommand, CommandResult, Controller, ControllerConfig};

use crate::cli::{GlobalOpts, NoiseArgs, NoiseCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    config: ControllerConfig,
    args: NoiseArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (result, state) = Controller::oneshot(config, |ctrl| async move {
        let result = match args.command {
            NoiseCommand::Start { volume } => {
                // Stopped, so this only updates the volume `start` will send
                if let Some(v) = volume {
                    ctrl.set_volume(v).await?;
                }
                ctrl.execute(CoreCommand::StartWhiteNoise).await?
            }
            NoiseCommand::Stop => ctrl.execute(CoreCommand::StopWhiteNoise).await?,
            NoiseCommand::Volume { volume } => {
                ctrl.execute(CoreCommand::SetVolume { volume }).await?
            }
        };
        Ok((result, ctrl.snapshot()))
    })
    .await?;

    if matches!(result, CommandResult::VolumeSkipped(_)) {
        tracing::info!("volume only reaches the device while white noise is playing");
    }

    util::print_result(global, &result, &state);
    Ok(())
}
