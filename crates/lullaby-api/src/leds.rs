// LED endpoints
//
// Status read and per-LED toggle. The device is authoritative for LED
// state: a toggle answers with the state it actually applied.

use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{LedStatus, ToggleLedResponse};

impl DeviceClient {
    /// Read the current state of every LED the device knows.
    ///
    /// `GET /led_status` → `{"led1": false, "led2": true}`
    pub async fn led_status(&self) -> Result<LedStatus, Error> {
        let url = self.endpoint_url(&["led_status"])?;
        debug!("fetching LED status");
        self.get_json(url).await
    }

    /// Flip one LED and return the state the device confirmed.
    ///
    /// `POST /toggle_led/{id}` with a JSON content type and no body.
    pub async fn toggle_led(&self, led_id: &str) -> Result<ToggleLedResponse, Error> {
        let url = self.endpoint_url(&["toggle_led", led_id])?;
        debug!(led = led_id, "toggling LED");
        self.send_control(self.control_request(url), "toggle_led")
            .await
    }
}
