//! Shared configuration for lullaby front-ends.
//!
//! TOML profiles merged with `LULLABY_`-prefixed environment variables,
//! and translation to `lullaby_core::ControllerConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lullaby_core::{ControllerConfig, DEFAULT_VOLUME, LedDescriptor, TlsVerification};

/// Prefix for environment overrides (`LULLABY_DEFAULTS__TIMEOUT=5`).
pub const ENV_PREFIX: &str = "LULLABY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound { name: name.into() })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    10
}

/// A named device profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Device base URL (e.g., "http://babymachine.local:5000").
    pub url: String,

    /// Path to custom CA certificate (HTTPS reverse proxies).
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Volume used for the first `start` (0.0 to 1.0).
    pub default_volume: Option<f64>,

    /// Background LED refresh for long-running commands (seconds, 0 = off).
    pub refresh_interval: Option<u64>,

    /// LEDs fitted to this machine. Empty means the stock pair.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leds: Vec<LedDescriptor>,
}

impl Profile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ca_cert: None,
            insecure: None,
            timeout: None,
            default_volume: None,
            refresh_interval: None,
            leds: Vec::new(),
        }
    }

    /// Configured LEDs, falling back to the stock pair.
    pub fn led_descriptors(&self) -> Vec<LedDescriptor> {
        if self.leds.is_empty() {
            LedDescriptor::defaults()
        } else {
            self.leds.clone()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "lullaby", "lullaby").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lullaby");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment.
///
/// A missing file is not an error; defaults and env still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ControllerConfig` from a profile, with no CLI overrides.
pub fn profile_to_controller_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_url(&profile.url)?;
    validate_leds(&profile.leds)?;

    let initial_volume = profile.default_volume.unwrap_or(DEFAULT_VOLUME);
    validate_volume(initial_volume)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(ControllerConfig {
        url,
        tls,
        timeout,
        leds: profile.led_descriptors(),
        initial_volume,
        refresh_interval_secs: profile.refresh_interval.unwrap_or(0),
    })
}

/// Parse a device base URL; only `http` and `https` are accepted.
pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "url".into(),
            reason: format!("unsupported scheme '{other}' (expected http or https)"),
        }),
    }
}

pub fn validate_volume(volume: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&volume) {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: "volume".into(),
            reason: format!("{volume} is outside 0.0 to 1.0"),
        })
    }
}

fn validate_leds(leds: &[LedDescriptor]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for led in leds {
        if led.id.as_str().is_empty() {
            return Err(ConfigError::Validation {
                field: "leds".into(),
                reason: "LED id must not be empty".into(),
            });
        }
        if !seen.insert(led.id.as_str()) {
            return Err(ConfigError::Validation {
                field: "leds".into(),
                reason: format!("duplicate LED id '{}'", led.id),
            });
        }
    }
    Ok(())
}
