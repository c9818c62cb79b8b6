//! Presentation sink that writes colored lines to the terminal.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use parley_core::sink::{NotificationLevel, PresentationSink};
use parley_core::Role;

/// Longest image reference printed verbatim; `data:` URLs are summarized.
const MAX_IMAGE_REF_LEN: usize = 96;

#[derive(Debug)]
pub struct TerminalSink {
    send_enabled: AtomicBool,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self {
            send_enabled: AtomicBool::new(true),
        }
    }

    /// Whether the widget currently accepts submissions.
    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled.load(Ordering::SeqCst)
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

fn time_label(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

fn describe_image_ref(image_ref: &str) -> String {
    if let Some(rest) = image_ref.strip_prefix("data:") {
        let media_type = rest.split(';').next().unwrap_or("image");
        return format!("{media_type} anexada");
    }
    if image_ref.chars().count() > MAX_IMAGE_REF_LEN {
        let head: String = image_ref.chars().take(MAX_IMAGE_REF_LEN).collect();
        return format!("{head}…");
    }
    image_ref.to_string()
}

impl PresentationSink for TerminalSink {
    fn render_text_turn(&self, role: Role, text: &str, timestamp: DateTime<Utc>) {
        let time = time_label(timestamp).bright_black();
        match role {
            Role::User => println!("{} {}", time, format!("> {}", text).green()),
            Role::Assistant => {
                println!("{} {}", time, "[assistente]".bright_magenta());
                for line in text.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
    }

    fn render_image_turn(&self, role: Role, image_ref: &str, timestamp: DateTime<Utc>) {
        let label = match role {
            Role::User => "[imagem enviada]".green(),
            Role::Assistant => "[imagem]".bright_magenta(),
        };
        println!(
            "{} {} {}",
            time_label(timestamp).bright_black(),
            label,
            describe_image_ref(image_ref)
        );
    }

    fn set_typing_indicator(&self, visible: bool) {
        if visible {
            println!("{}", "digitando...".bright_black());
        }
    }

    fn set_send_affordance_enabled(&self, enabled: bool) {
        self.send_enabled.store(enabled, Ordering::SeqCst);
    }

    fn set_attachment_preview_visible(&self, visible: bool) {
        if visible {
            println!("{}", "Imagem anexada (/remove para remover)".yellow());
        }
    }

    fn set_window_open(&self, open: bool) {
        let state = if open { "chat aberto" } else { "chat fechado" };
        println!("{}", state.bright_black());
    }

    fn notify(&self, level: NotificationLevel, message: &str) {
        let line = format!("[{level}] {message}");
        match level {
            NotificationLevel::Info => println!("{}", line.cyan()),
            NotificationLevel::Success => println!("{}", line.green()),
            NotificationLevel::Warning => println!("{}", line.yellow()),
            NotificationLevel::Error => println!("{}", line.red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sink_accepts_submissions() {
        let sink = TerminalSink::default();
        assert!(sink.is_send_enabled());
        sink.set_send_affordance_enabled(false);
        assert!(!sink.is_send_enabled());
    }

    #[test]
    fn test_data_urls_are_summarized() {
        assert_eq!(
            describe_image_ref("data:image/png;base64,iVBORw0KGgo="),
            "image/png anexada"
        );
    }

    #[test]
    fn test_long_urls_are_truncated() {
        let url = format!("https://cdn.example.com/{}", "a".repeat(200));
        let described = describe_image_ref(&url);
        assert_eq!(described.chars().count(), MAX_IMAGE_REF_LEN + 1);
        assert!(described.ends_with('…'));
        assert_eq!(describe_image_ref("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn test_send_affordance_tracking() {
        let sink = TerminalSink::new();
        assert!(sink.is_send_enabled());
        sink.set_send_affordance_enabled(false);
        assert!(!sink.is_send_enabled());
    }
}
