//! The presentation surface the widget renders into.
//!
//! The core never owns UI structure. A host declares its element set up front
//! (message list, typing indicator, send button, attachment preview, input
//! field, window) and exposes it through [`PresentationSink`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::message::Role;

/// Severity of a transient notification (toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// UI capabilities required by the chat widget.
///
/// Implementations must render `render_text_turn` content as plain text:
/// assistant output is untrusted and must never be interpreted as markup.
pub trait PresentationSink: Send + Sync {
    /// Appends a text bubble.
    fn render_text_turn(&self, role: Role, text: &str, timestamp: DateTime<Utc>);

    /// Appends an image bubble. `image_ref` is a URL (possibly a `data:` URL).
    fn render_image_turn(&self, role: Role, image_ref: &str, timestamp: DateTime<Utc>);

    fn set_typing_indicator(&self, visible: bool);

    fn set_send_affordance_enabled(&self, enabled: bool);

    fn set_attachment_preview_visible(&self, visible: bool);

    /// Empties the text input after a submission was accepted.
    fn clear_input(&self) {}

    fn set_window_open(&self, _open: bool) {}

    fn focus_input(&self) {}

    /// Shows a transient notification outside the message list.
    fn notify(&self, _level: NotificationLevel, _message: &str) {}
}
