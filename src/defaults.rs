//! Default configuration constants for dialogcast.
//!
//! Shared between the config layer, the CLI and the tests so that every
//! component agrees on the same built-in values.

/// Number of transcript lines sent in one synthesis request.
///
/// The multi-speaker voice rejects long inputs, so the transcript is cut
/// into small positional batches.
pub const BATCH_SIZE: usize = 5;

/// Sample rate of LINEAR16 audio returned by the speech service.
pub const SYNTH_SAMPLE_RATE: u32 = 24000;

/// Output directory for chunk and combined files.
pub const OUTPUT_DIRECTORY: &str = "output";

/// Only container the concatenator can read and write.
pub const FILE_FORMAT: &str = "wav";

/// Prefix of generated base names when no `--output` is given.
pub const OUTPUT_PREFIX: &str = "podcast";

/// Suffix of per-batch files: `<base>_chunk_<i>.wav`.
pub const CHUNK_SUFFIX: &str = "_chunk_";

/// Suffix of the final file: `<base>_combined.wav`.
pub const COMBINED_SUFFIX: &str = "_combined";

/// Suffix of the saved dialogue script: `<base>_transcript.txt`.
pub const TRANSCRIPT_SUFFIX: &str = "_transcript.txt";

// Vertex AI
pub const VERTEX_LOCATION: &str = "us-central1";
pub const VERTEX_MODEL: &str = "gemini-1.5-pro-002";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;
pub const TOP_K: u32 = 40;
pub const TOP_P: f64 = 0.8;

// Text-to-Speech
pub const TTS_LANGUAGE_CODE: &str = "en-US";
pub const TTS_VOICE_NAME: &str = "en-US-Studio-MultiSpeaker";
pub const TTS_SPEAKING_RATE: f64 = 1.1;
pub const TTS_PITCH: f64 = 0.5;
pub const TTS_VOLUME_GAIN_DB: f64 = 2.0;

// Speakers
pub const HOST_NAME: &str = "Alex";
pub const GUEST_NAME: &str = "Emma";
pub const HOST_VOICE: &str = "S";
pub const GUEST_VOICE: &str = "R";
pub const HOST_PERSONALITY: &str = "Super enthusiastic, loves diving deep into details, uses lots of exclamation points, rapid-fire energy";
pub const GUEST_PERSONALITY: &str = "Equally excited but channels it through lots of questions and \"aha!\" moments, loves building on points";

// Conversation structure, in words
pub const OPENING_WORDS_MIN: u32 = 30;
pub const OPENING_WORDS_MAX: u32 = 45;
pub const MAIN_DISCUSSION_MIN: u32 = 400;
pub const MAIN_DISCUSSION_MAX: u32 = 700;

// Speech cues used inside the prompt
pub const PAUSE_MARKER: &str = "...";
pub const EXCITEMENT_MARKER: &str = "!";
pub const QUESTION_MARKER: &str = "?";
pub const THINKING_SOUND: &str = "Hmm";
pub const AGREEMENT_SOUND: &str = "Mm";
pub const LAUGHTER_SOUND: &str = "hehe";
