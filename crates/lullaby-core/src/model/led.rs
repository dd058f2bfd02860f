// ── LED domain types ──

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── LedId ───────────────────────────────────────────────────────────

/// Identifier of one indicator LED as the device names it (e.g. `led1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedId(String);

impl LedId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LedId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for LedId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LedId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for LedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── LedDescriptor ───────────────────────────────────────────────────

/// Static description of an LED known to the front-end.
///
/// The descriptor list fixes which ids the store tracks and the order
/// they are rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedDescriptor {
    pub id: LedId,
    pub label: String,
    pub color: String,
}

impl LedDescriptor {
    pub fn new(id: impl Into<LedId>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: color.into(),
        }
    }

    /// The two LEDs fitted to the stock machine.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("led1", "Red", "red"),
            Self::new("led2", "Yellow", "yellow"),
        ]
    }
}

// ── Led ─────────────────────────────────────────────────────────────

/// One LED with its last server-confirmed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    pub id: LedId,
    pub label: String,
    pub color: String,
    pub on: bool,
}

impl Led {
    /// An LED that has not been confirmed on yet.
    pub fn off(descriptor: &LedDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            label: descriptor.label.clone(),
            color: descriptor.color.clone(),
            on: false,
        }
    }
}
