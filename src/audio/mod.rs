//! Chunk persistence and WAV concatenation.

pub mod chunk_store;
pub mod concat;
pub mod wav;

pub use chunk_store::{ChunkStore, PersistedChunk};
pub use concat::{CombinedAudio, combined_path, concat_wav};
