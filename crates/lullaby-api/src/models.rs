// Wire types for the baby machine control API.
//
// Control endpoints answer with a flat object carrying a `success` flag
// next to the endpoint-specific fields, e.g. `{"success": true, "led":
// "led1", "state": true}`. The `Ack` header is decoded first, then the
// same body is decoded into the endpoint payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `GET /led_status` body: LED id → on/off.
pub type LedStatus = BTreeMap<String, bool>;

/// Common header of every control response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Ack {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `POST /toggle_led/{id}` success payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToggleLedResponse {
    /// Echo of the LED id (newer firmware only).
    #[serde(default)]
    pub led: Option<String>,
    /// Confirmed state after the toggle.
    pub state: bool,
}

/// `POST /white_noise/start|stop` success payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct WhiteNoiseAck {
    /// Volume the device actually applied (clamped to `[0.0, 1.0]`).
    #[serde(default)]
    pub volume: Option<f64>,
}

/// Request body for `start` and `volume`.
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct VolumeRequest {
    pub volume: f64,
}
