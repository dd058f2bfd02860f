// ── Device view state and its reducer ──
//
// `DeviceState` is an immutable snapshot. Every change is expressed as a
// `StoreEvent` and folded in by `reduce`, which never touches I/O.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Led, LedDescriptor, LedId, PlaybackState};

/// Default white-noise volume before the user touches the slider.
pub const DEFAULT_VOLUME: f64 = 0.5;

/// Snapshot of everything a front-end renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    /// LEDs in descriptor order.
    pub leds: Vec<Led>,
    pub playback: PlaybackState,
    /// Requested volume in `[0.0, 1.0]`. Not validated here.
    pub volume: f64,
}

/// A confirmed fact about the device, or a local volume edit.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Full LED status from `/led_status`.
    LedsHydrated(BTreeMap<String, bool>),
    /// A toggle the device acknowledged.
    LedConfirmed { id: LedId, state: bool },
    /// A start/stop the device acknowledged, with the volume it reports
    /// having applied, if any.
    PlaybackConfirmed {
        playback: PlaybackState,
        volume: Option<f64>,
    },
    /// User moved the volume control (applied without confirmation).
    VolumeChanged(f64),
}

impl DeviceState {
    /// Initial state: every LED off, playback stopped.
    pub fn new(descriptors: &[LedDescriptor], volume: f64) -> Self {
        Self {
            leds: descriptors.iter().map(Led::off).collect(),
            playback: PlaybackState::Stopped,
            volume,
        }
    }

    /// Fold one event into a new snapshot.
    ///
    /// LED ids outside the descriptor list are ignored; known ids missing
    /// from a hydration payload are treated as off.
    #[must_use]
    pub fn reduce(&self, event: &StoreEvent) -> Self {
        let mut next = self.clone();
        match event {
            StoreEvent::LedsHydrated(status) => {
                for led in &mut next.leds {
                    led.on = status.get(led.id.as_str()).copied().unwrap_or(false);
                }
            }
            StoreEvent::LedConfirmed { id, state } => {
                if let Some(led) = next.leds.iter_mut().find(|l| &l.id == id) {
                    led.on = *state;
                }
            }
            StoreEvent::PlaybackConfirmed { playback, volume } => {
                next.playback = *playback;
                if let Some(volume) = volume {
                    next.volume = *volume;
                }
            }
            StoreEvent::VolumeChanged(volume) => next.volume = *volume,
        }
        next
    }

    pub fn led(&self, id: &LedId) -> Option<&Led> {
        self.leds.iter().find(|l| &l.id == id)
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }
}
