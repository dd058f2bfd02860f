// Device control HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction and control
// envelope decoding. The endpoint groups (LEDs, white noise) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Ack;
use crate::transport::TransportConfig;

const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for a single baby machine controller.
///
/// Every control call is a single request/response round trip. Control
/// responses are checked for `success: true` before the payload is handed
/// back; a `success: false` answer becomes [`Error::Rejected`] regardless
/// of the HTTP status it arrived with.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the device root (e.g. `http://babymachine.local:5000`);
    /// endpoint paths are appended to it, so a reverse-proxy prefix such as
    /// `https://home.example/nursery/` is preserved.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build an endpoint URL by appending percent-encoded path segments
    /// to the base URL.
    pub(crate) fn endpoint_url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::UnsupportedBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a plain JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        decode(&body)
    }

    /// Start a POST to a control endpoint.
    ///
    /// The device expects a JSON content type even on requests that carry
    /// no body, so the header is always set; callers attach `.json(..)`
    /// when there is a payload.
    pub(crate) fn control_request(&self, url: Url) -> reqwest::RequestBuilder {
        debug!("POST {}", url);
        self.http
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Send a control request and decode its acknowledged payload.
    pub(crate) async fn send_control<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<T, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        trace!(%status, operation, "control response received");

        parse_ack(status, &body, operation)
    }

    /// Send a control request whose response is not inspected.
    ///
    /// Only transport failures are reported. Any answer from the device,
    /// including a non-success status, counts as delivered.
    pub(crate) async fn send_unacknowledged(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<(), Error> {
        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            trace!(%status, operation, "request delivered");
        } else {
            debug!(%status, operation, "device answered with non-success status (ignored)");
        }
        Ok(())
    }
}

/// Decode a control envelope.
///
/// The `success` flag decides the outcome even on non-2xx statuses: an
/// unknown LED id is answered with HTTP 400 and `{"success": false,
/// "error": "Invalid LED ID"}`, which is a rejection and not a transport
/// problem.
fn parse_ack<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
    operation: &'static str,
) -> Result<T, Error> {
    let ack = match serde_json::from_str::<Ack>(body) {
        Ok(Ack {
            success: false,
            error,
        }) => {
            return Err(Error::Rejected {
                operation,
                message: error,
            });
        }
        other => other,
    };

    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(body),
        });
    }

    match ack {
        Ok(_) => decode(body),
        Err(e) => Err(Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        }),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
