//! View-state store and control logic between `lullaby-api` and front-ends.
//!
//! - **[`Controller`]** owns the device client and the store.
//!   [`connect()`](Controller::connect) builds the client and hydrates LED
//!   state; each control operation is one round trip whose confirmed result
//!   lands in the store. [`Controller::oneshot()`](Controller::oneshot)
//!   wraps a single CLI invocation.
//!
//! - **[`DataStore`]** holds the latest [`DeviceState`] behind a
//!   `tokio::sync::watch` channel. [`StoreEvent`]s are the only way in.
//!
//! - **[`StateStream`]** is the subscription handle vended by the store,
//!   with `current()` / `latest()` / `changed()` and a `Stream` adapter.
//!
//! - **[`Command`]** names every user action so front-ends share one
//!   routing path through [`Controller::execute()`](Controller::execute).

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use model::{Led, LedDescriptor, LedId, PlaybackState};
pub use store::{DEFAULT_VOLUME, DataStore, DeviceState, StoreEvent};
pub use stream::{StateStream, StateWatchStream};
