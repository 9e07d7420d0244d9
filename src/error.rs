//! Error types for voicebridge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Voice gateway / event stream errors
    #[error("Voice stream error for speaker {speaker}: {message}")]
    Stream { speaker: String, message: String },

    #[error("Event script error at line {line}: {message}")]
    Script { line: usize, message: String },

    // Provider errors
    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("Response generation failed: {message}")]
    Response { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    // Playback errors
    #[error("Playback tool not found: {tool}")]
    PlayerNotFound { tool: String },

    #[error("Playback failed: {message}")]
    Playback { message: String },

    // HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, BridgeError>;
