//! Widget configuration.
//!
//! Configuration priority: explicit file > `~/.config/parley/config.toml` >
//! built-in defaults, with `PARLEY_BASE_URL` / `PARLEY_VISION_URL`
//! environment variables applied last.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ParleyError, Result};
use crate::session::DEFAULT_MAX_HISTORY;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CHAT_PATH: &str = "/api/chat";
const DEFAULT_VISION_PATH: &str = "/api/vision";
const DEFAULT_IMAGE_PROMPT: &str = "Analise a imagem de forma objetiva.";

pub const ENV_BASE_URL: &str = "PARLEY_BASE_URL";
pub const ENV_VISION_URL: &str = "PARLEY_VISION_URL";

/// Endpoints, limits and user-visible strings for one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base URL of the assistant backend.
    pub base_url: String,
    /// Path of the text-chat endpoint, relative to `base_url`.
    pub chat_path: String,
    /// Absolute URL of the image-analysis endpoint. Defaults to
    /// `{base_url}/api/vision` when unset.
    pub vision_url: Option<String>,
    /// Number of turns kept and sent as context.
    pub max_history: usize,
    /// Prompt sent with an image when the user typed nothing.
    pub default_image_prompt: String,
    pub messages: WidgetMessages,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            vision_url: None,
            max_history: DEFAULT_MAX_HISTORY,
            default_image_prompt: DEFAULT_IMAGE_PROMPT.to_string(),
            messages: WidgetMessages::default(),
        }
    }
}

/// Synthetic texts the widget renders on its own behalf.
///
/// `*_history` fields are what gets recorded as the assistant turn's content
/// when it differs from what is displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetMessages {
    pub text_error: String,
    pub text_error_history: String,
    pub image_error: String,
    pub image_error_history: String,
    pub image_received: String,
    pub invalid_attachment: String,
    pub memory_cleared: String,
}

impl Default for WidgetMessages {
    fn default() -> Self {
        Self {
            text_error: "Desculpe, ocorreu um erro. Tente novamente em alguns instantes."
                .to_string(),
            text_error_history: "[erro]".to_string(),
            image_error: "Erro ao analisar a imagem.".to_string(),
            image_error_history: "[erro imagem]".to_string(),
            image_received: "Imagem recebida.".to_string(),
            invalid_attachment: "Arquivo inválido. Selecione uma imagem.".to_string(),
            memory_cleared: "Memória do chat limpa.".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`, then applies environment overrides.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Parses a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParleyError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(target: "parley::config", "Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `~/.config/parley/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("parley").join("config.toml"))
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url;
        }
        if let Some(vision_url) = lookup(ENV_VISION_URL).filter(|v| !v.trim().is_empty()) {
            self.vision_url = Some(vision_url);
        }
    }

    /// Full URL of the text-chat endpoint.
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    /// Full URL of the image-analysis endpoint.
    pub fn vision_url(&self) -> String {
        match &self.vision_url {
            Some(url) => url.clone(),
            None => join_url(&self.base_url, DEFAULT_VISION_PATH),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = WidgetConfig::default();
        assert_eq!(config.max_history, 20);
        assert_eq!(config.chat_url(), "http://localhost:8000/api/chat");
        assert_eq!(config.vision_url(), "http://localhost:8000/api/vision");
        assert_eq!(config.messages.image_received, "Imagem recebida.");
    }

    #[test]
    fn test_join_url_normalizes_slashes() {
        assert_eq!(join_url("http://h/", "/api/chat"), "http://h/api/chat");
        assert_eq!(join_url("http://h", "api/chat"), "http://h/api/chat");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
base_url = "https://dash.example.com"
vision_url = "https://vision.example.com/upload"

[messages]
image_received = "Image received."
"#,
        )
        .unwrap();

        let config = WidgetConfig::from_file(&path).unwrap();
        assert_eq!(config.chat_url(), "https://dash.example.com/api/chat");
        assert_eq!(config.vision_url(), "https://vision.example.com/upload");
        assert_eq!(config.messages.image_received, "Image received.");
        assert_eq!(config.messages.text_error_history, "[erro]");
        assert_eq!(config.max_history, 20);
    }

    #[test]
    fn test_missing_explicit_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = WidgetConfig::from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "max_history = \"many\"").unwrap();

        let err = WidgetConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ParleyError::Serialization { .. }));
    }

    #[test]
    fn test_overrides_apply_non_empty_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "http://override:9000"),
            (ENV_VISION_URL, "  "),
        ]);
        let mut config = WidgetConfig::default();

        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://override:9000");
        assert_eq!(config.vision_url, None);
    }
}
