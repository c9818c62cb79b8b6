//! Conversation turn types.
//!
//! A [`Turn`] is what the widget keeps client-side (with a timestamp for
//! display); a [`WireTurn`] is what goes over the network as request context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Represents the speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Message typed or attached by the person using the widget.
    User,
    /// Message produced by the remote assistant (or a synthetic notice).
    Assistant,
}

/// A single message in the conversation history.
///
/// Turns are never edited after they are appended; history only grows at the
/// back and is truncated from the front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// The role of the message sender.
    pub role: Role,
    /// Text content. May be a placeholder for image-only exchanges.
    pub content: String,
    /// When the turn was created.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Creates a turn stamped with the current time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Returns the wire representation used as request context.
    pub fn to_wire(&self) -> WireTurn {
        WireTurn {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Turn as serialized into request history: `{"role": ..., "content": ...}`.
///
/// The timestamp is intentionally absent from the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTurn {
    pub role: Role,
    pub content: String,
}

impl From<&Turn> for WireTurn {
    fn from(turn: &Turn) -> Self {
        turn.to_wire()
    }
}
