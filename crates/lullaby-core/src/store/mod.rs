// ── Reactive view-state store ──
//
// Snapshot state, a pure reducer, and push-based change notification.

mod data_store;
mod state;

pub use data_store::DataStore;
pub use state::{DEFAULT_VOLUME, DeviceState, StoreEvent};
