//! Dialogue transcripts: line parsing and batching.

pub mod batch;
pub mod parser;

pub use batch::{Batch, Transcript, batch_count};
pub use parser::{ParsedLine, Speaker, SpeakerRole, SpeakerRoster, Utterance};
