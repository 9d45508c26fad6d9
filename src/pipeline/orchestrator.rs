//! Transcript to podcast: read, batch, synthesize, persist, combine.

use crate::audio::{self, ChunkStore, CombinedAudio, PersistedChunk};
use crate::config::Config;
use crate::defaults;
use crate::error::{DialogcastError, Result};
use crate::pipeline::report::SizeReport;
use crate::transcript::{SpeakerRoster, Transcript};
use crate::tts::{SpeechSynthesizer, SynthesisOutcome};
use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a run is; used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ReadingInput,
    Batching,
    Synthesizing { batch: usize },
    Persisting { batch: usize },
    Combining,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::ReadingInput => write!(f, "reading input"),
            PipelineStage::Batching => write!(f, "batching"),
            PipelineStage::Synthesizing { batch } => write!(f, "synthesizing batch {batch}"),
            PipelineStage::Persisting { batch } => write!(f, "persisting batch {batch}"),
            PipelineStage::Combining => write!(f, "combining"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

/// Why a batch produced no chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Every line was a direction, narration or an unknown speaker.
    NoValidTurns,
    /// The service returned no audio.
    EmptyAudio,
    /// The service call failed.
    Failed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoValidTurns => write!(f, "no valid dialogue lines"),
            SkipReason::EmptyAudio => write!(f, "no audio content returned"),
            SkipReason::Failed(reason) => write!(f, "synthesis failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBatch {
    pub index: usize,
    pub reason: SkipReason,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastOutput {
    pub base_name: String,
    pub combined: CombinedAudio,
    /// Chunks in batch order.
    pub chunks: Vec<PersistedChunk>,
    pub skipped: Vec<SkippedBatch>,
    pub batch_count: usize,
    pub sizes: SizeReport,
}

impl PodcastOutput {
    pub fn combined_path(&self) -> &Path {
        &self.combined.path
    }
}

/// Settings a run needs, resolved from `Config` once.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub output_dir: PathBuf,
    pub roster: SpeakerRoster,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.tts.batch_size,
            output_dir: config.tts.output_directory.clone(),
            roster: SpeakerRoster::from_config(&config.speakers),
        }
    }
}

/// `podcast_<YYYYmmdd_HHMMSS>` for the given time.
pub fn base_name_at(time: DateTime<Local>) -> String {
    format!(
        "{}_{}",
        defaults::OUTPUT_PREFIX,
        time.format("%Y%m%d_%H%M%S")
    )
}

/// Base name for a run started now.
pub fn default_base_name() -> String {
    base_name_at(Local::now())
}

/// Drives one transcript through synthesis into a combined WAV.
///
/// Batches run strictly one after another. A batch that yields no audio
/// is skipped and the run carries on; only a run with no audio at all
/// fails.
pub struct PodcastPipeline<S: SpeechSynthesizer> {
    config: PipelineConfig,
    synthesizer: S,
    store: ChunkStore,
}

impl<S: SpeechSynthesizer> PodcastPipeline<S> {
    pub fn new(config: &Config, synthesizer: S) -> Self {
        Self::with_pipeline_config(PipelineConfig::from_config(config), synthesizer)
    }

    pub fn with_pipeline_config(config: PipelineConfig, synthesizer: S) -> Self {
        let store = ChunkStore::new(config.output_dir.clone());
        Self {
            config,
            synthesizer,
            store,
        }
    }

    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    /// Turn the transcript at `input` into `<base>_combined.wav`.
    ///
    /// Without `base_name` a timestamped name is generated. Failures are
    /// logged with the stage they happened in and returned.
    pub async fn run(&self, input: &Path, base_name: Option<&str>) -> Result<PodcastOutput> {
        let base_name = base_name
            .map(str::to_string)
            .unwrap_or_else(default_base_name);

        let mut stage = PipelineStage::ReadingInput;
        let result = self.execute(input, &base_name, &mut stage).await;
        if let Err(e) = &result {
            error!("Podcast generation failed while {stage}: {e}");
        }
        result
    }

    async fn execute(
        &self,
        input: &Path,
        base_name: &str,
        stage: &mut PipelineStage,
    ) -> Result<PodcastOutput> {
        *stage = PipelineStage::ReadingInput;
        info!("Reading transcript from {}", input.display());
        let transcript = Transcript::read(input)?;

        *stage = PipelineStage::Batching;
        let batches = transcript.batches(self.config.batch_size);
        let batch_count = batches.len();
        info!(
            "Transcript has {} lines in {} batches of up to {}",
            transcript.lines().len(),
            batch_count,
            self.config.batch_size
        );
        self.store.ensure_dir()?;

        let mut chunks = Vec::new();
        let mut skipped = Vec::new();

        for batch in batches {
            info!("Processing chunk {}/{}", batch.index, batch_count);

            let turns = batch.utterances(&self.config.roster);
            if turns.is_empty() {
                warn!("Skipping chunk {}: no valid dialogue lines", batch.index);
                skipped.push(SkippedBatch {
                    index: batch.index,
                    reason: SkipReason::NoValidTurns,
                });
                continue;
            }

            *stage = PipelineStage::Synthesizing { batch: batch.index };
            let bytes = match self.synthesizer.synthesize(&turns).await {
                SynthesisOutcome::Audio(bytes) => bytes,
                SynthesisOutcome::Empty => {
                    warn!("Skipping chunk {}: no audio content returned", batch.index);
                    skipped.push(SkippedBatch {
                        index: batch.index,
                        reason: SkipReason::EmptyAudio,
                    });
                    continue;
                }
                SynthesisOutcome::Failed(reason) => {
                    warn!("Skipping chunk {}: {}", batch.index, reason);
                    skipped.push(SkippedBatch {
                        index: batch.index,
                        reason: SkipReason::Failed(reason),
                    });
                    continue;
                }
            };

            *stage = PipelineStage::Persisting { batch: batch.index };
            let chunk = self.store.persist(base_name, batch.index, &bytes)?;
            info!(
                "Saved chunk {} ({} bytes) to {}",
                chunk.index,
                chunk.bytes_written,
                chunk.path.display()
            );
            chunks.push(chunk);
        }

        if chunks.is_empty() {
            return Err(DialogcastError::NoAudioGenerated);
        }

        *stage = PipelineStage::Combining;
        let paths: Vec<PathBuf> = chunks.iter().map(|c| c.path.clone()).collect();
        let output = audio::combined_path(self.store.dir(), base_name);
        let combined = audio::concat_wav(&paths, &output)?;

        let sizes = SizeReport::new(&chunks, &combined);
        sizes.log();

        *stage = PipelineStage::Done;
        info!(
            "Podcast saved to {} ({} of {} batches, {:.1}s)",
            combined.path.display(),
            chunks.len(),
            batch_count,
            combined.duration_ms as f64 / 1000.0
        );

        Ok(PodcastOutput {
            base_name: base_name.to_string(),
            combined,
            chunks,
            skipped,
            batch_count,
            sizes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::wav;
    use crate::tts::MockSynthesizer;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn pipeline(out: &Path, synth: MockSynthesizer) -> PodcastPipeline<MockSynthesizer> {
        let mut config = Config::default();
        config.tts.output_directory = out.to_path_buf();
        PodcastPipeline::new(&config, synth)
    }

    fn write_transcript(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("transcript.txt");
        fs::write(&path, text).unwrap();
        path
    }

    fn dialogue(lines: usize) -> String {
        (1..=lines)
            .map(|i| {
                let speaker = if i % 2 == 1 { "Alex" } else { "Emma" };
                format!("{speaker}: line {i}\n")
            })
            .collect()
    }

    fn combined_samples(output: &PodcastOutput) -> Vec<i16> {
        wav::decode(fs::File::open(output.combined_path()).unwrap(), "combined")
            .unwrap()
            .samples
    }

    #[test]
    fn test_base_name_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(base_name_at(time), "podcast_20240309_070501");
    }

    #[test]
    fn test_default_base_name_has_prefix() {
        let name = default_base_name();
        assert!(name.starts_with("podcast_"));
        assert_eq!(name.len(), "podcast_YYYYmmdd_HHMMSS".len());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(PipelineStage::ReadingInput.to_string(), "reading input");
        assert_eq!(
            PipelineStage::Synthesizing { batch: 2 }.to_string(),
            "synthesizing batch 2"
        );
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_synthesis() {
        let tmp = TempDir::new().unwrap();
        let p = pipeline(tmp.path(), MockSynthesizer::new());

        let result = p.run(&tmp.path().join("nope.txt"), Some("ep")).await;
        assert!(matches!(result, Err(DialogcastError::InputNotFound { .. })));
        assert_eq!(p.synthesizer().call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_fails_before_synthesis() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), "\n \n");
        let p = pipeline(&tmp.path().join("out"), MockSynthesizer::new());

        let result = p.run(&input, Some("ep")).await;
        assert!(matches!(result, Err(DialogcastError::EmptyInput { .. })));
        assert_eq!(p.synthesizer().call_count(), 0);
    }

    #[tokio::test]
    async fn test_interior_failure_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(12));
        let out = tmp.path().join("out");
        let p = pipeline(&out, MockSynthesizer::new().with_failure_on(2));

        let output = p.run(&input, Some("ep")).await.unwrap();

        assert_eq!(output.batch_count, 3);
        let indices: Vec<usize> = output.chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].index, 2);
        assert!(matches!(output.skipped[0].reason, SkipReason::Failed(_)));

        // Call 1 wrote 5 turns of 100s, call 3 wrote 2 turns of 300s
        let mut expected = vec![100i16; 50];
        expected.extend(vec![300i16; 20]);
        assert_eq!(combined_samples(&output), expected);

        assert!(out.join("ep_chunk_1.wav").exists());
        assert!(!out.join("ep_chunk_2.wav").exists());
        assert!(out.join("ep_chunk_3.wav").exists());
        assert_eq!(output.combined_path(), out.join("ep_combined.wav"));
    }

    #[tokio::test]
    async fn test_empty_audio_batch_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(10));
        let p = pipeline(tmp.path(), MockSynthesizer::new().with_empty_on(1));

        let output = p.run(&input, Some("ep")).await.unwrap();
        assert_eq!(output.chunks.len(), 1);
        assert_eq!(output.chunks[0].index, 2);
        assert_eq!(output.skipped[0].reason, SkipReason::EmptyAudio);
    }

    #[tokio::test]
    async fn test_batch_without_turns_is_not_sent() {
        let tmp = TempDir::new().unwrap();
        let text = "(intro music)\n[applause]\nNarrator: hi\nJamie: hello\n(pause)\nAlex: finally\nEmma: yes";
        let input = write_transcript(tmp.path(), text);
        let p = pipeline(tmp.path(), MockSynthesizer::new());

        let output = p.run(&input, Some("ep")).await.unwrap();

        assert_eq!(p.synthesizer().call_count(), 1);
        assert_eq!(output.skipped[0].index, 1);
        assert_eq!(output.skipped[0].reason, SkipReason::NoValidTurns);
        assert_eq!(output.chunks[0].index, 2);

        let calls = p.synthesizer().calls();
        let tags: Vec<&str> = calls[0].iter().map(|u| u.speaker_tag.as_str()).collect();
        assert_eq!(tags, vec!["S", "R"]);
    }

    #[tokio::test]
    async fn test_all_batches_failing_is_no_audio() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(7));
        let out = tmp.path().join("out");
        let p = pipeline(
            &out,
            MockSynthesizer::new().with_failure_on(1).with_empty_on(2),
        );

        let result = p.run(&input, Some("ep")).await;
        assert!(matches!(result, Err(DialogcastError::NoAudioGenerated)));
        assert!(!out.join("ep_combined.wav").exists());
        assert_eq!(p.synthesizer().call_count(), 2);
    }

    #[tokio::test]
    async fn test_single_batch_round_trip() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(3));
        let p = pipeline(tmp.path(), MockSynthesizer::new());

        let output = p.run(&input, Some("solo")).await.unwrap();

        let chunk = wav::decode(fs::File::open(&output.chunks[0].path).unwrap(), "chunk").unwrap();
        assert_eq!(combined_samples(&output), chunk.samples);
        assert_eq!(output.sizes.chunk_sizes.len(), 1);
        assert_eq!(output.sizes.combined_bytes, output.combined.bytes_written);
    }

    #[tokio::test]
    async fn test_run_without_base_name_uses_timestamp() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(2));
        let p = pipeline(tmp.path(), MockSynthesizer::new());

        let output = p.run(&input, None).await.unwrap();
        assert!(output.base_name.starts_with("podcast_"));
        let file_name = output.combined_path().file_name().unwrap().to_string_lossy();
        assert!(file_name.ends_with("_combined.wav"));
    }

    #[tokio::test]
    async fn test_rerun_overwrites_chunks() {
        let tmp = TempDir::new().unwrap();
        let input = write_transcript(tmp.path(), &dialogue(2));
        let p = pipeline(tmp.path(), MockSynthesizer::new());

        p.run(&input, Some("ep")).await.unwrap();
        let second = p.run(&input, Some("ep")).await.unwrap();

        // Second run is call 2 on the same mock, so every sample is 200
        assert!(combined_samples(&second).iter().all(|&s| s == 200));
    }
}
