//! Multi-speaker speech synthesis.

pub mod google;
pub mod synthesizer;

pub use google::GoogleSpeechClient;
pub use synthesizer::{MockSynthesizer, SpeechSynthesizer, SynthesisOutcome, VoiceParams};
