//! Error types for the Parley chat widget.

use thiserror::Error;

/// A shared error type for the widget core and its hosts.
///
/// Transport failures have their own type ([`TransportError`]) because the
/// input gate recovers from them locally; everything else surfaces here.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// Configuration error (bad endpoint, unreadable config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Attachment could not be read or is not an image
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// Request to the assistant service failed
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ParleyError {
    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<std::io::Error> for ParleyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Failure of a single request against the assistant service.
///
/// The widget treats every variant the same way (one synthetic error turn);
/// the variants exist for logging and for hosts that want to inspect them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connect, DNS, reset).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("server responded with status {status}")]
    Status { status: u16 },

    /// The response body was not the expected JSON shape.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The request body could not be built.
    #[error("request body could not be encoded: {0}")]
    Encode(String),

    /// The configured endpoint is not a usable URL.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
}

impl TransportError {
    /// Creates a Request error
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates an Encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }
}

/// A type alias for `Result<T, ParleyError>`.
pub type Result<T> = std::result::Result<T, ParleyError>;
