//! Status command and the shared device-state renderers.

use std::fmt::Write as _;
use std::sync::Arc;

use lullaby_core::{Controller, ControllerConfig, CoreError, DeviceState};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::leds;

pub async fn handle(config: ControllerConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let state = Controller::oneshot(config, hydrated_snapshot).await?;

    let color = output::should_color(&global.color);
    let out = render_state(&global.output, &state, color);
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Snapshot for read-only commands. A hydration that failed during
/// connect is retried once so its error reaches the user instead of a
/// default all-off view.
pub(crate) async fn hydrated_snapshot(ctrl: Controller) -> Result<Arc<DeviceState>, CoreError> {
    if ctrl.store().last_led_sync().is_none() {
        return ctrl.refresh_leds().await;
    }
    Ok(ctrl.snapshot())
}

/// Full state view in the chosen format.
pub(crate) fn render_state(format: &OutputFormat, state: &DeviceState, color: bool) -> String {
    output::render_single(format, state, |s| detail(s, color), plain)
}

/// One-line summary: `led1 on · led2 off · white noise stopped · volume 0.50`.
pub(crate) fn summary_line(state: &DeviceState, color: bool) -> String {
    let mut parts: Vec<String> = state
        .leds
        .iter()
        .map(|l| format!("{} {}", l.id, output::on_off(l.on, color)))
        .collect();
    parts.push(format!("white noise {}", state.playback));
    parts.push(format!("volume {:.2}", state.volume));
    parts.join(" · ")
}

fn detail(state: &DeviceState, color: bool) -> String {
    let mut out = leds::led_table(&state.leds, color);
    let _ = write!(
        out,
        "\nWhite noise: {}\nVolume:      {:.2}",
        state.playback, state.volume
    );
    out
}

fn plain(state: &DeviceState) -> String {
    let mut lines: Vec<String> = state
        .leds
        .iter()
        .map(|l| format!("{}={}", l.id, output::on_off(l.on, false)))
        .collect();
    lines.push(format!("white_noise={}", state.playback));
    lines.push(format!("volume={:.2}", state.volume));
    lines.join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lullaby_core::{DEFAULT_VOLUME, LedDescriptor, LedId, StoreEvent};

    use super::*;

    fn sample() -> DeviceState {
        DeviceState::new(&LedDescriptor::defaults(), DEFAULT_VOLUME).reduce(
            &StoreEvent::LedConfirmed {
                id: LedId::new("led2"),
                state: true,
            },
        )
    }

    #[test]
    fn summary_without_color() {
        assert_eq!(
            summary_line(&sample(), false),
            "led1 off · led2 on · white noise stopped · volume 0.50"
        );
    }

    #[test]
    fn plain_lines() {
        assert_eq!(
            render_state(&OutputFormat::Plain, &sample(), false),
            "led1=off\nled2=on\nwhite_noise=stopped\nvolume=0.50"
        );
    }

    #[test]
    fn json_carries_full_state() {
        let out = render_state(&OutputFormat::JsonCompact, &sample(), false);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["playback"], "stopped");
        assert_eq!(value["leds"][1]["id"], "led2");
        assert_eq!(value["leds"][1]["on"], true);
    }

    #[test]
    fn table_has_playback_footer() {
        let out = render_state(&OutputFormat::Table, &sample(), false);
        assert!(out.contains("Yellow"));
        assert!(out.contains("White noise: stopped"));
        assert!(out.contains("Volume:      0.50"));
    }
}
