//! WAV decoding and encoding for LINEAR16 chunks.

use crate::error::{DialogcastError, Result};
use std::fmt;
use std::io::{Cursor, Read};

/// Channel count, rate and sample layout of a WAV stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit PCM, the only layout the speech service returns for LINEAR16.
    pub fn pcm16(sample_rate: u32, channels: u16) -> Self {
        Self {
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

impl fmt::Display for WavFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {} bit",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}

/// Decoded PCM samples (interleaved when multi-channel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedWav {
    pub format: WavFormat,
    pub samples: Vec<i16>,
}

impl DecodedWav {
    /// Playback length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        let frames = self.samples.len() as u64 / u64::from(self.format.channels.max(1));
        frames * 1000 / u64::from(self.format.sample_rate.max(1))
    }
}

/// Decode a 16-bit integer PCM WAV stream.
///
/// `label` names the stream in error messages.
pub fn decode<R: Read>(reader: R, label: &str) -> Result<DecodedWav> {
    let decode_error = |message: String| DialogcastError::AudioDecode {
        path: label.to_string(),
        message,
    };

    let mut wav_reader =
        hound::WavReader::new(reader).map_err(|e| decode_error(format!("not a WAV file: {e}")))?;

    let spec = wav_reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(DialogcastError::AudioFormatMismatch {
            expected: "16-bit integer PCM".to_string(),
            actual: format!("{}-bit {:?}", spec.bits_per_sample, spec.sample_format),
        });
    }

    let samples: Vec<i16> = wav_reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| decode_error(format!("failed to read samples: {e}")))?;

    Ok(DecodedWav {
        format: WavFormat::pcm16(spec.sample_rate, spec.channels),
        samples,
    })
}

/// Decode WAV bytes held in memory.
pub fn decode_bytes(bytes: &[u8], label: &str) -> Result<DecodedWav> {
    decode(Cursor::new(bytes), label)
}

/// Encode samples as a complete WAV file in memory.
pub fn encode(format: WavFormat, samples: &[i16]) -> Result<Vec<u8>> {
    let encode_error = |e: hound::Error| DialogcastError::AudioEncode {
        path: "<memory>".to_string(),
        message: e.to_string(),
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, format.spec()).map_err(encode_error)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(encode_error)?;
        }
        writer.finalize().map_err(encode_error)?;
    }
    Ok(cursor.into_inner())
}

/// Write samples to a WAV file on disk.
pub fn write_file(path: &std::path::Path, format: WavFormat, samples: &[i16]) -> Result<()> {
    let encode_error = |e: hound::Error| DialogcastError::AudioEncode {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut writer = hound::WavWriter::create(path, format.spec()).map_err(encode_error)?;
    for &sample in samples {
        writer.write_sample(sample).map_err(encode_error)?;
    }
    writer.finalize().map_err(encode_error)
}
