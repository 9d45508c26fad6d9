//! Joins chunk files into one continuous WAV.

use crate::audio::wav::{self, WavFormat};
use crate::defaults;
use crate::error::{DialogcastError, Result};
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// The joined file and what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedAudio {
    pub path: PathBuf,
    pub format: WavFormat,
    pub chunk_count: usize,
    pub total_samples: usize,
    pub duration_ms: u64,
    pub bytes_written: u64,
}

/// Path of the joined file: `<dir>/<base>_combined.wav`.
pub fn combined_path(dir: &Path, base_name: &str) -> PathBuf {
    dir.join(format!(
        "{base_name}{}.{}",
        defaults::COMBINED_SUFFIX,
        defaults::FILE_FORMAT
    ))
}

/// Concatenate WAV files in the order given and write the result.
///
/// Every input must share the first file's format; a mismatch aborts
/// before anything is written.
pub fn concat_wav(chunks: &[PathBuf], output: &Path) -> Result<CombinedAudio> {
    let Some(first) = chunks.first() else {
        return Err(DialogcastError::NoChunksToCombine);
    };

    let head = read_chunk(first)?;
    let format = head.format;
    let mut samples = head.samples;

    for path in &chunks[1..] {
        let chunk = read_chunk(path)?;
        if chunk.format != format {
            return Err(DialogcastError::AudioFormatMismatch {
                expected: format.to_string(),
                actual: format!("{} in {}", chunk.format, path.display()),
            });
        }
        samples.extend_from_slice(&chunk.samples);
    }

    info!("Combining {} chunks into {}", chunks.len(), output.display());
    wav::write_file(output, format, &samples)?;

    let bytes_written = fs::metadata(output)?.len();
    let combined = wav::DecodedWav { format, samples };
    Ok(CombinedAudio {
        path: output.to_path_buf(),
        format,
        chunk_count: chunks.len(),
        total_samples: combined.samples.len(),
        duration_ms: combined.duration_ms(),
        bytes_written,
    })
}

fn read_chunk(path: &Path) -> Result<wav::DecodedWav> {
    let file = File::open(path).map_err(|e| DialogcastError::AudioDecode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let decoded = wav::decode(BufReader::new(file), &path.display().to_string())?;
    debug!(
        "Read {} samples ({}) from {}",
        decoded.samples.len(),
        decoded.format,
        path.display()
    );
    Ok(decoded)
}
