// White-noise endpoints
//
// Start/stop are acknowledged with a `success` flag. Volume updates are
// fire-and-forget: the device's answer is not inspected.

use tracing::debug;

use crate::client::DeviceClient;
use crate::error::Error;
use crate::models::{VolumeRequest, WhiteNoiseAck};

impl DeviceClient {
    /// Start white-noise playback at the given volume.
    ///
    /// `POST /white_noise/start` with `{"volume": v}`
    pub async fn start_white_noise(&self, volume: f64) -> Result<WhiteNoiseAck, Error> {
        let url = self.endpoint_url(&["white_noise", "start"])?;
        debug!(volume, "starting white noise");
        let request = self.control_request(url).json(&VolumeRequest { volume });
        self.send_control(request, "start_white_noise").await
    }

    /// Stop white-noise playback.
    ///
    /// `POST /white_noise/stop` with a JSON content type and no body.
    pub async fn stop_white_noise(&self) -> Result<WhiteNoiseAck, Error> {
        let url = self.endpoint_url(&["white_noise", "stop"])?;
        debug!("stopping white noise");
        self.send_control(self.control_request(url), "stop_white_noise")
            .await
    }

    /// Push a new volume to the playing generator.
    ///
    /// `POST /white_noise/volume` with `{"volume": v}`. Only transport
    /// failures are reported.
    pub async fn set_white_noise_volume(&self, volume: f64) -> Result<(), Error> {
        let url = self.endpoint_url(&["white_noise", "volume"])?;
        debug!(volume, "updating white noise volume");
        let request = self.control_request(url).json(&VolumeRequest { volume });
        self.send_unacknowledged(request, "set_white_noise_volume")
            .await
    }
}
