// ── Command API ──
//
// Every user action flows through a single `Command` enum so front-ends
// (one-shot CLI, interactive session) share one routing path.

use std::fmt;

use crate::model::{LedId, PlaybackState};

/// All user actions against a baby machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Re-read LED status from the device.
    RefreshLeds,
    /// Toggle one LED.
    ToggleLed { id: LedId },
    /// Start white noise at the store's current volume.
    StartWhiteNoise,
    /// Stop white noise.
    StopWhiteNoise,
    /// Change the volume; pushed to the device only while playing.
    SetVolume { volume: f64 },
}

/// What a successful command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// LED state re-read from the device.
    Refreshed,
    /// The device confirmed the LED's new state.
    LedToggled { id: LedId, on: bool },
    /// The device confirmed a playback transition.
    Playback(PlaybackState),
    /// Volume stored and pushed to the playing device.
    VolumeSent(f64),
    /// Volume stored locally only; nothing is playing.
    VolumeSkipped(f64),
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refreshed => f.write_str("LED status refreshed"),
            Self::LedToggled { id, on } => {
                write!(f, "{id} is now {}", if *on { "on" } else { "off" })
            }
            Self::Playback(state) => write!(f, "white noise {state}"),
            Self::VolumeSent(v) => write!(f, "volume set to {v:.2}"),
            Self::VolumeSkipped(v) => {
                write!(f, "volume set to {v:.2} (not playing, device not updated)")
            }
        }
    }
}
