//! HtmlMessageList - a `PresentationSink` that renders into HTML fragments.
//!
//! Holds the declared element set of the chat window in memory: message
//! list, typing indicator, send button, attachment preview, input field and
//! the window itself. Hosts serialize it with [`HtmlMessageList::to_html`].

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};
use parley_core::html::escape_html;
use parley_core::sink::{NotificationLevel, PresentationSink};
use parley_core::Role;

/// Body of a rendered bubble. Text is stored already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BubbleBody {
    Text(String),
    Image(String),
}

/// One message element in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub role: Role,
    pub body: BubbleBody,
    /// `HH:MM` in local time.
    pub time_label: String,
}

impl Bubble {
    fn css_class(&self) -> &'static str {
        match self.role {
            Role::User => "message user-message",
            Role::Assistant => "message bot-message",
        }
    }

    fn to_html(&self) -> String {
        let content = match &self.body {
            BubbleBody::Text(escaped) => format!("<p>{escaped}</p>"),
            BubbleBody::Image(src) => format!(
                r#"<img src="{src}" alt="Imagem" style="max-width:220px; border-radius:8px; display:block;">"#
            ),
        };
        format!(
            r#"<div class="{}"><div class="message-content">{}</div><div class="message-time">{}</div></div>"#,
            self.css_class(),
            content,
            self.time_label
        )
    }
}

#[derive(Debug)]
struct Elements {
    bubbles: Vec<Bubble>,
    typing_visible: bool,
    send_enabled: bool,
    preview_visible: bool,
    input_value: String,
    input_focused: bool,
    window_open: bool,
    notifications: Vec<(NotificationLevel, String)>,
}

impl Default for Elements {
    fn default() -> Self {
        Self {
            bubbles: Vec::new(),
            typing_visible: false,
            send_enabled: true,
            preview_visible: false,
            input_value: String::new(),
            input_focused: false,
            window_open: false,
            notifications: Vec::new(),
        }
    }
}

const TYPING_INDICATOR_HTML: &str = r#"<div class="message bot-message" id="typing-indicator"><div class="typing-indicator"><div class="typing-dots"><div class="typing-dot"></div><div class="typing-dot"></div><div class="typing-dot"></div></div></div></div>"#;

/// In-memory message list producing escaped HTML.
#[derive(Debug, Default)]
pub struct HtmlMessageList {
    elements: Mutex<Elements>,
}

impl HtmlMessageList {
    pub fn new() -> Self {
        Self::default()
    }

    fn elements(&self) -> MutexGuard<'_, Elements> {
        // Rendering state stays usable even if a holder panicked.
        self.elements
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serializes the message list, typing indicator last when visible.
    pub fn to_html(&self) -> String {
        let elements = self.elements();
        let mut html: String = elements.bubbles.iter().map(Bubble::to_html).collect();
        if elements.typing_visible {
            html.push_str(TYPING_INDICATOR_HTML);
        }
        html
    }

    pub fn bubbles(&self) -> Vec<Bubble> {
        self.elements().bubbles.clone()
    }

    /// Sets the input field's value, as typed by the user.
    pub fn set_input(&self, value: impl Into<String>) {
        self.elements().input_value = value.into();
    }

    pub fn input_value(&self) -> String {
        self.elements().input_value.clone()
    }

    pub fn is_input_focused(&self) -> bool {
        self.elements().input_focused
    }

    pub fn is_typing_visible(&self) -> bool {
        self.elements().typing_visible
    }

    pub fn is_send_enabled(&self) -> bool {
        self.elements().send_enabled
    }

    pub fn is_preview_visible(&self) -> bool {
        self.elements().preview_visible
    }

    pub fn is_window_open(&self) -> bool {
        self.elements().window_open
    }

    /// Drains notifications shown since the last call.
    pub fn take_notifications(&self) -> Vec<(NotificationLevel, String)> {
        std::mem::take(&mut self.elements().notifications)
    }
}

fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

impl PresentationSink for HtmlMessageList {
    fn render_text_turn(&self, role: Role, text: &str, timestamp: DateTime<Utc>) {
        self.elements().bubbles.push(Bubble {
            role,
            body: BubbleBody::Text(escape_html(text)),
            time_label: time_label(timestamp),
        });
    }

    fn render_image_turn(&self, role: Role, image_ref: &str, timestamp: DateTime<Utc>) {
        self.elements().bubbles.push(Bubble {
            role,
            body: BubbleBody::Image(escape_html(image_ref)),
            time_label: time_label(timestamp),
        });
    }

    fn set_typing_indicator(&self, visible: bool) {
        self.elements().typing_visible = visible;
    }

    fn set_send_affordance_enabled(&self, enabled: bool) {
        self.elements().send_enabled = enabled;
    }

    fn set_attachment_preview_visible(&self, visible: bool) {
        self.elements().preview_visible = visible;
    }

    fn clear_input(&self) {
        let mut elements = self.elements();
        elements.input_value.clear();
        elements.input_focused = false;
    }

    fn set_window_open(&self, open: bool) {
        self.elements().window_open = open;
    }

    fn focus_input(&self) {
        self.elements().input_focused = true;
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        self.elements()
            .notifications
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_rendered_literally() {
        let list = HtmlMessageList::new();
        list.render_text_turn(Role::Assistant, "<script>alert(1)</script>", Utc::now());

        let html = list.to_html();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"class="message bot-message""#));
    }

    #[test]
    fn test_image_src_cannot_break_out_of_attribute() {
        let list = HtmlMessageList::new();
        list.render_image_turn(Role::Assistant, r#"x" onerror="alert(1)"#, Utc::now());

        let html = list.to_html();
        assert!(html.contains("x&quot; onerror=&quot;alert(1)"));
    }

    #[test]
    fn test_typing_indicator_is_appended_when_visible() {
        let list = HtmlMessageList::new();
        list.render_text_turn(Role::User, "oi", Utc::now());
        list.set_typing_indicator(true);
        assert!(list.to_html().ends_with(TYPING_INDICATOR_HTML));

        list.set_typing_indicator(false);
        assert!(!list.to_html().contains("typing-indicator"));
    }

    #[test]
    fn test_time_label_format() {
        let list = HtmlMessageList::new();
        list.render_text_turn(Role::User, "oi", Utc::now());
        let label = &list.bubbles()[0].time_label;
        assert_eq!(label.len(), 5);
        assert_eq!(label.as_bytes()[2], b':');
    }

    #[test]
    fn test_clear_input_and_focus() {
        let list = HtmlMessageList::new();
        list.set_input("hello");
        list.focus_input();
        assert!(list.is_input_focused());

        list.clear_input();
        assert_eq!(list.input_value(), "");
        assert!(!list.is_input_focused());
    }

    #[test]
    fn test_notifications_are_drained() {
        let list = HtmlMessageList::new();
        list.notify(NotificationLevel::Info, "Memória do chat limpa.");

        assert_eq!(
            list.take_notifications(),
            vec![(NotificationLevel::Info, "Memória do chat limpa.".to_string())]
        );
        assert!(list.take_notifications().is_empty());
    }
}
