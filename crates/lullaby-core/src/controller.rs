// ── Controller abstraction ──
//
// Lifecycle and control operations for one baby machine. Every operation
// is a single request/response round trip whose confirmed result is
// folded into the DataStore. Failures leave the store untouched, are
// logged, and are returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lullaby_api::transport::{TlsMode, TransportConfig};
use lullaby_api::DeviceClient;

use crate::command::{Command, CommandResult};
use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{LedId, PlaybackState};
use crate::store::{DataStore, DeviceState, StoreEvent};
use crate::stream::StateStream;

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Requests are not
/// serialized: two overlapping toggles of the same LED both reach the
/// device and whichever response arrives last wins in the store.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    store: Arc<DataStore>,
    client: Mutex<Option<DeviceClient>>,
    /// Cancels the refresh task of the current connection. Replaced with a
    /// fresh token on every disconnect.
    cancel: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to build the client and hydrate.
    pub fn new(config: ControllerConfig) -> Self {
        let store = Arc::new(DataStore::new(&config.leds, config.initial_volume));

        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                client: Mutex::new(None),
                cancel: Mutex::new(CancellationToken::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a Controller around an existing client (tests, embedding).
    pub fn with_client(config: ControllerConfig, client: DeviceClient) -> Self {
        let controller = Self::new(config);
        if let Ok(mut slot) = controller.inner.client.try_lock() {
            *slot = Some(client);
        }
        controller
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the device.
    ///
    /// Builds the HTTP client (unless one was supplied), hydrates LED
    /// state from `/led_status`, and spawns the periodic refresh task when
    /// `refresh_interval_secs > 0`. Connecting again while connected keeps
    /// the existing client and refresh task.
    ///
    /// A failed hydration is returned, but the controller stays connected
    /// with default LED state so callers can keep going. Use
    /// [`is_connected()`](Self::is_connected) to tell the two apart.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;

        {
            let mut slot = self.inner.client.lock().await;
            if slot.is_none() {
                let transport = build_transport(config);
                *slot = Some(DeviceClient::new(config.url.clone(), &transport)?);
            }
        }

        let interval_secs = config.refresh_interval_secs;
        if interval_secs > 0 {
            let mut handles = self.inner.task_handles.lock().await;
            if handles.is_empty() {
                let cancel = self.inner.cancel.lock().await.child_token();
                handles.push(tokio::spawn(refresh_task(self.clone(), interval_secs, cancel)));
            }
        }

        info!(url = %config.url, "connected to device");
        self.refresh_leds().await.map(|_| ())
    }

    /// Whether a device client is installed.
    pub async fn is_connected(&self) -> bool {
        self.inner.client.lock().await.is_some()
    }

    /// Disconnect: stop background tasks and drop the HTTP client.
    pub async fn disconnect(&self) {
        // Swap in a fresh token so a later connect can refresh again
        std::mem::take(&mut *self.inner.cancel.lock().await).cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        *self.inner.client.lock().await = None;
        debug!("disconnected");
    }

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Disables periodic refresh since the CLI only needs a single
    /// request-response cycle. Only a client that cannot be built stops
    /// the closure from running; a failed LED hydration is logged and the
    /// closure sees default LED state.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let controller = Controller::new(cfg);
        let result = match controller.connect().await {
            Err(e) if !controller.is_connected().await => Err(e),
            _ => f(controller.clone()).await,
        };
        controller.disconnect().await;
        result
    }

    // ── Operations ───────────────────────────────────────────────

    /// Re-read LED status and overlay it onto the known LEDs.
    pub async fn refresh_leds(&self) -> Result<Arc<DeviceState>, CoreError> {
        let client = self.client().await?;
        let status = client
            .led_status()
            .await
            .map_err(|e| self.api_error(e))
            .inspect_err(|e| warn!(error = %e, "failed to load LED states"))?;

        let snapshot = self.inner.store.apply(&StoreEvent::LedsHydrated(status));
        debug!(leds = snapshot.leds.len(), "LED status refreshed");
        Ok(snapshot)
    }

    /// Toggle one LED. Returns the state the device confirmed.
    ///
    /// Ids outside the configured LED list are refused without a request.
    pub async fn toggle_led(&self, id: &LedId) -> Result<bool, CoreError> {
        let store = &self.inner.store;
        if !store.knows_led(id) {
            let known: Vec<String> = store.led_ids().iter().map(ToString::to_string).collect();
            return Err(CoreError::UnknownLed {
                id: id.to_string(),
                known: known.join(", "),
            });
        }

        let client = self.client().await?;
        let resp = client
            .toggle_led(id.as_str())
            .await
            .map_err(|e| self.api_error(e))
            .inspect_err(|e| warn!(error = %e, led = %id, "failed to toggle LED"))?;

        store.apply(&StoreEvent::LedConfirmed {
            id: id.clone(),
            state: resp.state,
        });
        debug!(led = %id, on = resp.state, "LED toggle confirmed");
        Ok(resp.state)
    }

    /// Start white noise at the store's current volume.
    pub async fn start_white_noise(&self) -> Result<(), CoreError> {
        let store = &self.inner.store;
        let client = self.client().await?;
        let ack = client
            .start_white_noise(store.volume())
            .await
            .map_err(|e| self.api_error(e))
            .inspect_err(|e| warn!(error = %e, "failed to start white noise"))?;

        store.apply(&StoreEvent::PlaybackConfirmed {
            playback: PlaybackState::Playing,
            volume: ack.volume,
        });
        debug!("white noise started");
        Ok(())
    }

    /// Stop white noise.
    pub async fn stop_white_noise(&self) -> Result<(), CoreError> {
        let client = self.client().await?;
        client
            .stop_white_noise()
            .await
            .map_err(|e| self.api_error(e))
            .inspect_err(|e| warn!(error = %e, "failed to stop white noise"))?;

        self.inner
            .store
            .apply(&StoreEvent::PlaybackConfirmed {
                playback: PlaybackState::Stopped,
                volume: None,
            });
        debug!("white noise stopped");
        Ok(())
    }

    /// Change the volume.
    ///
    /// The store takes the new value immediately. The device only hears
    /// about it while playing; otherwise no request is made and
    /// [`CommandResult::VolumeSkipped`] is returned.
    pub async fn set_volume(&self, volume: f64) -> Result<CommandResult, CoreError> {
        let store = &self.inner.store;
        store.apply(&StoreEvent::VolumeChanged(volume));

        if !store.is_playing() {
            debug!(volume, "not playing, volume kept locally");
            return Ok(CommandResult::VolumeSkipped(volume));
        }

        let client = self.client().await?;
        client
            .set_white_noise_volume(volume)
            .await
            .map_err(|e| self.api_error(e))
            .inspect_err(|e| warn!(error = %e, "failed to update volume"))?;
        Ok(CommandResult::VolumeSent(volume))
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command and describe what it did.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        debug!(command = ?cmd, "executing command");
        match cmd {
            Command::RefreshLeds => {
                self.refresh_leds().await?;
                Ok(CommandResult::Refreshed)
            }
            Command::ToggleLed { id } => {
                let on = self.toggle_led(&id).await?;
                Ok(CommandResult::LedToggled { id, on })
            }
            Command::StartWhiteNoise => {
                self.start_white_noise().await?;
                Ok(CommandResult::Playback(PlaybackState::Playing))
            }
            Command::StopWhiteNoise => {
                self.stop_white_noise().await?;
                Ok(CommandResult::Playback(PlaybackState::Stopped))
            }
            Command::SetVolume { volume } => self.set_volume(volume).await,
        }
    }

    // ── State observation ────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<DeviceState> {
        self.inner.store.snapshot()
    }

    pub fn subscribe(&self) -> StateStream {
        self.inner.store.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────

    async fn client(&self) -> Result<DeviceClient, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    /// Translate an API error, filling in the configured timeout.
    fn api_error(&self, err: lullaby_api::Error) -> CoreError {
        match CoreError::from(err) {
            CoreError::Timeout { .. } => CoreError::Timeout {
                timeout_secs: self.inner.config.timeout.as_secs(),
            },
            other => other,
        }
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically re-read LED status so changes made elsewhere show up.
async fn refresh_task(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                // Failures are already logged by refresh_leds.
                let _ = controller.refresh_leds().await;
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the controller configuration.
fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
