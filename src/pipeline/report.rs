//! Size verification of a finished run.

use crate::audio::{CombinedAudio, PersistedChunk};
use log::info;

/// Per-chunk byte counts next to the size of the combined file.
///
/// The combined file carries one WAV header instead of one per chunk, so
/// it is normally a little smaller than the chunk total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    /// `(batch index, bytes)` in batch order.
    pub chunk_sizes: Vec<(usize, u64)>,
    pub total_chunk_bytes: u64,
    pub combined_bytes: u64,
}

impl SizeReport {
    pub fn new(chunks: &[PersistedChunk], combined: &CombinedAudio) -> Self {
        let chunk_sizes: Vec<(usize, u64)> =
            chunks.iter().map(|c| (c.index, c.bytes_written)).collect();
        let total_chunk_bytes = chunk_sizes.iter().map(|(_, bytes)| bytes).sum();
        Self {
            chunk_sizes,
            total_chunk_bytes,
            combined_bytes: combined.bytes_written,
        }
    }

    /// Signed difference between the combined file and the chunk total.
    pub fn difference(&self) -> i64 {
        self.combined_bytes as i64 - self.total_chunk_bytes as i64
    }

    pub fn log(&self) {
        info!("Size verification:");
        for (index, bytes) in &self.chunk_sizes {
            info!("  chunk {index}: {bytes} bytes");
        }
        info!("  total of chunks: {} bytes", self.total_chunk_bytes);
        info!(
            "  combined file: {} bytes ({:+})",
            self.combined_bytes,
            self.difference()
        );
    }
}
