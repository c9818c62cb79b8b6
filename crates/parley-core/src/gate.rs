//! Widget state types.
//!
//! The gate replaces the loose `typing`/`open` flags a widget tends to grow
//! with explicit two-state enums, so invalid combinations cannot be expressed.

use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Whether a request is currently in flight.
///
/// `Idle --submit--> Sending --success|failure--> Idle`. Submissions made
/// while `Sending` are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Idle,
    Sending,
}

impl GateState {
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_sending(self) -> bool {
        matches!(self, Self::Sending)
    }
}

/// Visibility of the chat window. Independent of [`GateState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    Open,
    #[default]
    Closed,
}

impl WindowState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }
}

/// Result of handing a user intent to the input gate.
///
/// None of these is an error for the surrounding page: failures have already
/// been rendered as a synthetic assistant turn by the time this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request completed and the assistant's reply was appended.
    Replied,
    /// The request failed; a synthetic error turn was appended.
    Failed(TransportError),
    /// Another request was in flight; nothing happened.
    Busy,
    /// Neither text nor an attachment was supplied; nothing happened.
    Empty,
}

impl SubmitOutcome {
    /// Whether the submission reached the transport.
    pub fn was_dispatched(&self) -> bool {
        matches!(self, Self::Replied | Self::Failed(_))
    }
}

/// Result of staging an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The image is now the pending attachment.
    Staged,
    /// A previous pending attachment was discarded in favour of this one.
    Replaced,
    /// The file was not an image; nothing was staged.
    Rejected,
}
