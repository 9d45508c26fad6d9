//! dialogcast - Two-host podcast generation
//!
//! Turns articles into dialogue scripts and dialogue scripts into
//! multi-speaker audio using Google Cloud.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
#[cfg(feature = "cli")]
pub mod diagnostics;
pub mod error;
pub mod google;
pub mod llm;
pub mod pipeline;
pub mod source;
pub mod transcript;
pub mod tts;

// Core traits (script → speech)
pub use llm::TextGenerator;
pub use tts::SpeechSynthesizer;

// Pipeline
pub use pipeline::{PodcastOutput, PodcastPipeline};

// Error handling
pub use error::{DialogcastError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_has_hash_only_when_built_from_git() {
        let ver = version_string();
        match option_env!("GIT_HASH").filter(|h| !h.is_empty()) {
            Some(hash) => assert_eq!(ver, format!("{}+{}", env!("CARGO_PKG_VERSION"), hash)),
            None => assert_eq!(ver, env!("CARGO_PKG_VERSION")),
        }
    }
}
