//! CLI configuration: thin wrapper around `lullaby_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--url, --timeout, --insecure).

use std::time::Duration;

use lullaby_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lullaby_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
///
/// Flags win over the profile, which wins over `[defaults]`. Without a
/// matching profile, `--url` alone is enough to reach a stock machine.
pub fn build_controller_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ControllerConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    match config.profile(&profile_name) {
        Ok(profile) => return resolve_profile(profile, &config.defaults, global),
        // An explicitly requested profile must exist
        Err(_) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(config),
            });
        }
        Err(_) => {}
    }

    let url_str = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let mut cfg = ControllerConfig::new(lullaby_config::parse_url(url_str)?);
    cfg.timeout = Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout));
    if global.insecure || config.defaults.insecure {
        cfg.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(cfg)
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ControllerConfig, CliError> {
    let mut cfg = lullaby_config::profile_to_controller_config(profile, defaults)?;

    if let Some(ref url) = global.url {
        cfg.url = lullaby_config::parse_url(url)?;
    }
    if let Some(secs) = global.timeout {
        cfg.timeout = Duration::from_secs(secs);
    }
    if global.insecure {
        cfg.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(cfg)
}
