//! Request/response contract with the remote assistant service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::attachment::ImageAttachment;
use crate::error::TransportError;
use crate::message::WireTurn;

/// JSON body of a text turn: `{message, sessionId, history, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTurnRequest {
    /// Trimmed user message.
    pub message: String,
    pub session_id: String,
    pub history: Vec<WireTurn>,
    /// Client-side send time.
    pub timestamp: DateTime<Utc>,
}

/// Multipart submission of an image-analysis turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTurnRequest {
    pub session_id: String,
    pub attachment: ImageAttachment,
    /// The user's accompanying text, or the configured default prompt.
    pub prompt: String,
    pub history: Vec<WireTurn>,
}

impl ImageTurnRequest {
    /// History serialized as the JSON string carried in the `history` field.
    pub fn history_json(&self) -> Result<String, TransportError> {
        serde_json::to_string(&self.history).map_err(|e| TransportError::encode(e.to_string()))
    }
}

/// Successful text-turn response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextReply {
    pub output: String,
}

/// Successful image-turn response body. Either field may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ImageReply {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ImageReply {
    /// Text output, treating an empty string as absent.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref().filter(|s| !s.is_empty())
    }

    /// Image reference, treating an empty string as absent.
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|s| !s.is_empty())
    }
}

/// Issues turns against the assistant service.
///
/// Each call is fire-once: no retries and no timeout beyond what the
/// underlying client applies. Any non-success status, network error or
/// malformed body is reported as a [`TransportError`].
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(&self, request: TextTurnRequest) -> Result<TextReply, TransportError>;

    async fn send_image(&self, request: ImageTurnRequest) -> Result<ImageReply, TransportError>;
}
