// ── White-noise playback state ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Playback state machine: `Stopped -> Playing` on a confirmed start,
/// `Playing -> Stopped` on a confirmed stop.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}
