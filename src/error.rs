//! Error types for the patreon-crawler application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid policy: {0}")]
    Policy(String),

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Campaign not found for creator: {0}")]
    CampaignNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    // Decode errors
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("invalid mime type: {0}")]
    InvalidMimeType(String),

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Worker task failed: {0}")]
    Task(String),

    // File system errors
    #[error("File system error: {0}")]
    FileSystem(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Whether this error came from turning a remote payload into typed values.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Decode(_) | Error::UnknownEntity(_) | Error::InvalidMimeType(_)
        )
    }

    /// Whether this error came from the network layer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::Authentication(_) | Error::Api(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
