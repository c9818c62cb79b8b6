//! REPL line parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parley_core::ImageAttachment;

/// Slash commands offered for completion.
pub const COMMANDS: &[&str] = &[
    "/image", "/remove", "/clear", "/history", "/open", "/close", "/toggle", "/help",
];

/// What a single REPL line asks the widget to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text (possibly empty) to submit.
    Send(String),
    /// Stage an image file.
    Attach(PathBuf),
    Remove,
    Clear,
    History,
    Open,
    Close,
    Toggle,
    Help,
    Quit,
    /// A slash command that is not recognized.
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            return Self::Send(trimmed.to_string());
        }

        let (name, rest) = trimmed
            .split_once(char::is_whitespace)
            .map(|(name, rest)| (name, rest.trim()))
            .unwrap_or((trimmed, ""));

        match name {
            "/image" if !rest.is_empty() => Self::Attach(PathBuf::from(rest)),
            "/remove" => Self::Remove,
            "/clear" => Self::Clear,
            "/history" => Self::History,
            "/open" => Self::Open,
            "/close" => Self::Close,
            "/toggle" => Self::Toggle,
            "/help" => Self::Help,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }
}

/// Reads a file into an attachment, guessing its media type from the
/// extension. Unknown extensions get `application/octet-stream`, which the
/// widget then rejects.
pub async fn load_attachment(path: &Path) -> Result<ImageAttachment> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let media_type = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    Ok(ImageAttachment::new(file_name, media_type, bytes))
}
