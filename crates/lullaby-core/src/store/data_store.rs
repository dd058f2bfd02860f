// ── Central reactive view-state store ──
//
// Holds the latest confirmed device state. `apply` is the only mutation
// entry point; every effective change is broadcast to subscribers via a
// `watch` channel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::state::{DEFAULT_VOLUME, DeviceState, StoreEvent};
use crate::model::{Led, LedDescriptor, LedId, PlaybackState};
use crate::stream::StateStream;

/// Reactive store for the machine's view state.
///
/// Writers replace whole snapshots; readers get cheap `Arc` clones and
/// never block writers.
pub struct DataStore {
    state: watch::Sender<Arc<DeviceState>>,
    last_led_sync: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new(descriptors: &[LedDescriptor], volume: f64) -> Self {
        let (state, _) = watch::channel(Arc::new(DeviceState::new(descriptors, volume)));
        let (last_led_sync, _) = watch::channel(None);

        Self {
            state,
            last_led_sync,
        }
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Fold an event into the state and notify subscribers if anything
    /// changed. Returns the resulting snapshot.
    pub fn apply(&self, event: &StoreEvent) -> Arc<DeviceState> {
        self.state.send_if_modified(|current| {
            let next = current.reduce(event);
            if next == **current {
                false
            } else {
                *current = Arc::new(next);
                true
            }
        });

        if matches!(event, StoreEvent::LedsHydrated(_)) {
            self.last_led_sync.send_replace(Some(Utc::now()));
        }

        self.snapshot()
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<DeviceState> {
        self.state.borrow().clone()
    }

    pub fn led(&self, id: &LedId) -> Option<Led> {
        self.state.borrow().led(id).cloned()
    }

    pub fn playback(&self) -> PlaybackState {
        self.state.borrow().playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback().is_playing()
    }

    pub fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    /// Whether `id` is one of the LEDs this store tracks.
    pub fn knows_led(&self, id: &LedId) -> bool {
        self.state.borrow().led(id).is_some()
    }

    pub fn led_ids(&self) -> Vec<LedId> {
        self.state.borrow().leds.iter().map(|l| l.id.clone()).collect()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.state.subscribe())
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_led_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_led_sync.borrow()
    }

    /// How long ago LED state was last hydrated, or `None` if never.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_led_sync().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new(&LedDescriptor::defaults(), DEFAULT_VOLUME)
    }
}
