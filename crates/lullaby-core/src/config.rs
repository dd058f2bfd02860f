// ── Runtime connection configuration ──
//
// These types describe *how* to reach a baby machine and which LEDs the
// front-end shows. They never touch disk: the CLI builds a
// `ControllerConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::model::LedDescriptor;
use crate::store::DEFAULT_VOLUME;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Plain `http://` devices ignore this.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed reverse proxy).
    DangerAcceptInvalid,
}

/// Configuration for talking to a single machine.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Device base URL (e.g., `http://babymachine.local:5000`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// LEDs tracked by the store, in display order.
    pub leds: Vec<LedDescriptor>,
    /// Volume the store starts with (sent on the first start).
    pub initial_volume: f64,
    /// How often to re-read LED status (seconds). 0 = never.
    pub refresh_interval_secs: u64,
}

impl ControllerConfig {
    /// Configuration for `url` with stock LEDs and defaults.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(10),
            leds: LedDescriptor::defaults(),
            initial_volume: DEFAULT_VOLUME,
            refresh_interval_secs: 0,
        }
    }
}
