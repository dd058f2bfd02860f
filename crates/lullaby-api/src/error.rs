use thiserror::Error;

/// Top-level error type for the `lullaby-api` crate.
///
/// Covers the three ways a control call can fail: the request never
/// completed (transport), the response could not be decoded, or the device
/// answered with `success: false`. `lullaby-core` maps these into
/// domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for device endpoints: {0}")]
    UnsupportedBaseUrl(String),

    /// TLS configuration or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Device responses ────────────────────────────────────────────
    /// Non-success HTTP status without a decodable control envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The device acknowledged the request with `success: false`.
    #[error("Device rejected {operation}: {}", message.as_deref().unwrap_or("no reason given"))]
    Rejected {
        operation: &'static str,
        message: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_message_falls_back_when_missing() {
        let err = Error::Rejected {
            operation: "toggle_led",
            message: None,
        };
        assert_eq!(
            err.to_string(),
            "Device rejected toggle_led: no reason given"
        );
    }

    #[test]
    fn http_error_shows_status_and_body() {
        let err = Error::Http {
            status: 503,
            body: "busy".into(),
        };
        assert_eq!(err.to_string(), "HTTP 503: busy");
    }
}
