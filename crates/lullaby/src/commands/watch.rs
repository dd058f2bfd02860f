//! Watch command: follow device state until Ctrl-C.

use lullaby_core::{Controller, ControllerConfig, DeviceState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::status;

const DEFAULT_INTERVAL_SECS: u64 = 5;

pub async fn handle(
    mut config: ControllerConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    config.refresh_interval_secs = args
        .interval
        .or((config.refresh_interval_secs > 0).then_some(config.refresh_interval_secs))
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    let controller = Controller::new(config);
    let result = follow(&controller, global).await;
    controller.disconnect().await;
    result
}

async fn follow(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    if let Err(e) = controller.connect().await {
        if !controller.is_connected().await {
            return Err(e.into());
        }
        // The refresh task keeps retrying
        eprintln!("warning: could not load LED status: {e}");
    }

    let color = output::should_color(&global.color);
    let mut updates = controller.subscribe();
    output::print_output(&render_change(global, updates.current(), color), global.quiet);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;

            _ = &mut ctrl_c => break,

            changed = updates.changed() => {
                let Some(state) = changed else { break };
                output::print_output(&render_change(global, &state, color), global.quiet);
            }
        }
    }

    Ok(())
}

/// One entry per change: timestamped summary for humans, one document per
/// change for structured formats.
fn render_change(global: &GlobalOpts, state: &DeviceState, color: bool) -> String {
    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let at = chrono::Local::now().format("%H:%M:%S");
            format!("[{at}] {}", status::summary_line(state, color))
        }
        OutputFormat::Json | OutputFormat::JsonCompact => {
            status::render_state(&OutputFormat::JsonCompact, state, color)
        }
        OutputFormat::Yaml => format!("---\n{}", status::render_state(&global.output, state, color)),
    }
}
