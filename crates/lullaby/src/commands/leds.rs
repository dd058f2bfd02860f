//! LED command handlers.

use tabled::Tabled;

use lullaby_core::{Command as CoreCommand, Controller, ControllerConfig, Led, LedId};

use crate::cli::{GlobalOpts, LedArgs, LedCommand};
use crate::error::CliError;
use crate::output;

use super::{status, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "State")]
    state: String,
}

impl LedRow {
    fn new(led: &Led, color: bool) -> Self {
        Self {
            id: led.id.to_string(),
            label: led.label.clone(),
            color: led.color.clone(),
            state: output::on_off(led.on, color),
        }
    }
}

pub(crate) fn led_table(leds: &[Led], color: bool) -> String {
    let rows: Vec<LedRow> = leds.iter().map(|l| LedRow::new(l, color)).collect();
    output::render_table(&rows)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: ControllerConfig,
    args: LedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        LedCommand::List => {
            let state = Controller::oneshot(config, status::hydrated_snapshot).await?;
            let out = output::render_list(
                &global.output,
                &state.leds,
                |l| LedRow::new(l, color),
                |l| format!("{}\t{}", l.id, output::on_off(l.on, false)),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LedCommand::Toggle { id } => {
            let id = LedId::new(id);
            let (result, state) = Controller::oneshot(config, |ctrl| async move {
                let result = ctrl.execute(CoreCommand::ToggleLed { id }).await?;
                Ok((result, ctrl.snapshot()))
            })
            .await?;
            util::print_result(global, &result, &state);
            Ok(())
        }
    }
}
