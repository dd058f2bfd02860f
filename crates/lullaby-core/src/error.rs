// ── Core error types ──
//
// User-facing errors from lullaby-core. Consumers never see raw HTTP
// statuses or JSON parse failures. The `From<lullaby_api::Error>` impl
// translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Controller is not connected")]
    ControllerDisconnected,

    #[error("Device did not answer within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unknown LED '{id}' (known: {known})")]
    UnknownLed { id: String, known: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Device rejected {operation}: {message}")]
    Rejected { operation: String, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` when the device answered and said no, as opposed to
    /// the request never completing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::UnknownLed { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lullaby_api::Error> for CoreError {
    fn from(err: lullaby_api::Error) -> Self {
        match err {
            lullaby_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            lullaby_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            lullaby_api::Error::UnsupportedBaseUrl(url) => CoreError::Config {
                message: format!("URL cannot be used as a device base: {url}"),
            },
            lullaby_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            lullaby_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                status: Some(status),
            },
            lullaby_api::Error::Rejected { operation, message } => CoreError::Rejected {
                operation: operation.replace('_', " "),
                message: message.unwrap_or_else(|| "no reason given".into()),
            },
            lullaby_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Unexpected response from device: {message}"))
            }
        }
    }
}
