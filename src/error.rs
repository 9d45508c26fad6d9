//! Error types for dialogcast.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DialogcastError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Missing required configuration values: {keys}")]
    ConfigMissing { keys: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Transcript input errors
    #[error("Input file not found: {path}")]
    InputNotFound { path: String },

    #[error("Input file contains no dialogue lines: {path}")]
    EmptyInput { path: String },

    // Content source errors
    #[error("Failed to extract content from {source_name}: {message}")]
    SourceExtraction { source_name: String, message: String },

    // External service errors
    #[error("Transcript generation failed: {message}")]
    Generation { message: String },

    #[error("Speech synthesis failed: {message}")]
    Synthesis { message: String },

    #[error("HTTP request to {service} failed: {message}")]
    Http { service: String, message: String },

    // Audio errors
    #[error("No audio content was generated")]
    NoAudioGenerated,

    #[error("No audio chunks to combine")]
    NoChunksToCombine,

    #[error("Audio format mismatch: expected {expected}, got {actual}")]
    AudioFormatMismatch { expected: String, actual: String },

    #[error("Failed to decode audio {path}: {message}")]
    AudioDecode { path: String, message: String },

    #[error("Failed to encode audio {path}: {message}")]
    AudioEncode { path: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DialogcastError>;
