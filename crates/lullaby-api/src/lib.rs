// lullaby-api: Async Rust client for the baby machine control API

pub mod client;
pub mod error;
pub mod leds;
pub mod models;
pub mod transport;
pub mod white_noise;

pub use client::DeviceClient;
pub use error::Error;
pub use models::{LedStatus, ToggleLedResponse, WhiteNoiseAck};
pub use transport::{TlsMode, TransportConfig};
