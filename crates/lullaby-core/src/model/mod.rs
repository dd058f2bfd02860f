// ── Domain model ──
//
// Canonical representation of the machine's observable state. Consumers
// (CLI, interactive session) depend on these types, never on wire types.

pub mod led;
pub mod playback;

// ── Re-exports ──────────────────────────────────────────────────────

pub use led::{Led, LedDescriptor, LedId};
pub use playback::PlaybackState;
