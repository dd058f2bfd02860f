// ── Reactive state subscriptions ──
//
// Subscription type for consuming view-state changes from the DataStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::DeviceState;

/// A subscription to the device view state.
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StateStream {
    current: Arc<DeviceState>,
    receiver: watch::Receiver<Arc<DeviceState>>,
}

impl StateStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<DeviceState>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation (or the last `changed()`).
    pub fn current(&self) -> &Arc<DeviceState> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<DeviceState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<DeviceState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream yields the current snapshot first, then one item per
    /// change.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct StateWatchStream {
    inner: WatchStream<Arc<DeviceState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<DeviceState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use crate::model::{LedId, PlaybackState};
    use crate::store::{DataStore, StoreEvent};

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        let store = DataStore::default();
        let mut stream = store.subscribe().into_stream();

        let first = stream.next().await;
        assert_eq!(first.map(|s| s.playback), Some(PlaybackState::Stopped));

        store.apply(&StoreEvent::LedConfirmed {
            id: LedId::new("led1"),
            state: true,
        });

        let second = stream.next().await;
        assert_eq!(
            second.and_then(|s| s.led(&LedId::new("led1")).map(|l| l.on)),
            Some(true)
        );
    }

    #[tokio::test]
    async fn changed_returns_none_after_store_drop() {
        let store = DataStore::default();
        let mut sub = store.subscribe();
        drop(store);
        assert!(sub.changed().await.is_none());
    }

    #[tokio::test]
    async fn latest_tracks_store_without_waiting() {
        let store = DataStore::default();
        let sub = store.subscribe();
        store.apply(&StoreEvent::VolumeChanged(0.9));

        assert!((sub.current().volume - 0.5).abs() < f64::EPSILON);
        assert!((sub.latest().volume - 0.9).abs() < f64::EPSILON);
    }
}
