use crate::audio::wav::{self, WavFormat};
use crate::config::TtsConfig;
use crate::defaults;
use crate::transcript::Utterance;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Result of one multi-speaker synthesis request.
///
/// Failures are values, not errors: the pipeline skips the batch and
/// carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// WAV bytes, header included.
    Audio(Vec<u8>),
    /// The service answered but returned no audio.
    Empty,
    /// The request failed.
    Failed(String),
}

impl SynthesisOutcome {
    pub fn is_audio(&self) -> bool {
        matches!(self, SynthesisOutcome::Audio(_))
    }
}

/// Trait for multi-speaker text-to-speech.
///
/// This trait allows swapping implementations (Google Cloud vs mock).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render a batch of turns as one audio file.
    ///
    /// # Arguments
    /// * `turns` - Utterances in transcript order, each tagged with a voice
    async fn synthesize(&self, turns: &[Utterance]) -> SynthesisOutcome;

    /// Name of the multi-speaker voice in use
    fn voice_name(&self) -> &str;
}

/// Implement SpeechSynthesizer for Arc<T> so one client can serve several runs.
#[async_trait]
impl<T: SpeechSynthesizer> SpeechSynthesizer for Arc<T> {
    async fn synthesize(&self, turns: &[Utterance]) -> SynthesisOutcome {
        (**self).synthesize(turns).await
    }

    fn voice_name(&self) -> &str {
        (**self).voice_name()
    }
}

/// Voice selection and prosody sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceParams {
    pub language_code: String,
    pub voice_name: String,
    pub speaking_rate: f64,
    pub pitch: f64,
    pub volume_gain_db: f64,
}

impl VoiceParams {
    pub fn from_config(tts: &TtsConfig) -> Self {
        Self {
            language_code: tts.language_code.clone(),
            voice_name: tts.voice_name.clone(),
            speaking_rate: tts.speaking_rate,
            pitch: tts.pitch,
            volume_gain_db: tts.volume_gain_db,
        }
    }
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self::from_config(&TtsConfig::default())
    }
}

/// Samples the mock writes per turn.
const MOCK_SAMPLES_PER_TURN: usize = 10;

/// Mock synthesizer for testing
///
/// Call `n` (1-based) yields a 24 kHz mono WAV whose samples all equal
/// `n * 100`, so the order of chunks in a combined file can be checked.
#[derive(Debug, Default)]
pub struct MockSynthesizer {
    voice_name: String,
    empty_on: Vec<usize>,
    fail_on: Vec<usize>,
    calls: Mutex<Vec<Vec<Utterance>>>,
}

impl MockSynthesizer {
    /// Create a new mock that succeeds on every call
    pub fn new() -> Self {
        Self {
            voice_name: defaults::TTS_VOICE_NAME.to_string(),
            ..Self::default()
        }
    }

    /// Return no audio on the given call
    pub fn with_empty_on(mut self, call: usize) -> Self {
        self.empty_on.push(call);
        self
    }

    /// Fail on the given call
    pub fn with_failure_on(mut self, call: usize) -> Self {
        self.fail_on.push(call);
        self
    }

    /// Batches received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Utterance>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// The sample value call `n` writes.
    pub fn marker_for_call(n: usize) -> i16 {
        i16::try_from(n * 100).unwrap_or(i16::MAX)
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, turns: &[Utterance]) -> SynthesisOutcome {
        let call_no = {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            calls.push(turns.to_vec());
            calls.len()
        };

        if self.fail_on.contains(&call_no) {
            return SynthesisOutcome::Failed(format!("mock synthesis failure on call {call_no}"));
        }
        if self.empty_on.contains(&call_no) {
            return SynthesisOutcome::Empty;
        }

        let samples = vec![Self::marker_for_call(call_no); turns.len() * MOCK_SAMPLES_PER_TURN];
        match wav::encode(
            WavFormat::pcm16(defaults::SYNTH_SAMPLE_RATE, 1),
            &samples,
        ) {
            Ok(bytes) => SynthesisOutcome::Audio(bytes),
            Err(e) => SynthesisOutcome::Failed(e.to_string()),
        }
    }

    fn voice_name(&self) -> &str {
        &self.voice_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::SpeakerRole;

    fn turn(tag: &str, text: &str) -> Utterance {
        Utterance {
            role: SpeakerRole::Host,
            speaker_tag: tag.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_returns_wav_with_call_marker() {
        let synth = MockSynthesizer::new();
        let outcome = synth.synthesize(&[turn("S", "hi"), turn("R", "hey")]).await;

        let SynthesisOutcome::Audio(bytes) = outcome else {
            panic!("Expected audio, got {:?}", outcome);
        };
        let decoded = wav::decode_bytes(&bytes, "mock").unwrap();
        assert_eq!(decoded.format.sample_rate, 24000);
        assert_eq!(decoded.samples.len(), 2 * MOCK_SAMPLES_PER_TURN);
        assert!(decoded.samples.iter().all(|&s| s == 100));
    }

    #[tokio::test]
    async fn test_mock_failure_and_empty_are_per_call() {
        let synth = MockSynthesizer::new().with_failure_on(2).with_empty_on(3);
        let turns = [turn("S", "x")];

        assert!(synth.synthesize(&turns).await.is_audio());
        assert!(matches!(
            synth.synthesize(&turns).await,
            SynthesisOutcome::Failed(_)
        ));
        assert_eq!(synth.synthesize(&turns).await, SynthesisOutcome::Empty);
        assert!(synth.synthesize(&turns).await.is_audio());
        assert_eq!(synth.call_count(), 4);
    }

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let synth = MockSynthesizer::new();
        synth.synthesize(&[turn("S", "first")]).await;
        synth.synthesize(&[turn("R", "second")]).await;

        let calls = synth.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0].text, "first");
        assert_eq!(calls[1][0].speaker_tag, "R");
    }

    #[tokio::test]
    async fn test_synthesizer_works_through_arc_and_box() {
        let shared = Arc::new(MockSynthesizer::new());
        let boxed: Box<dyn SpeechSynthesizer> = Box::new(Arc::clone(&shared));

        assert!(boxed.synthesize(&[turn("S", "a")]).await.is_audio());
        assert_eq!(boxed.voice_name(), defaults::TTS_VOICE_NAME);
        assert_eq!(shared.call_count(), 1);
    }

    #[test]
    fn test_voice_params_from_config() {
        let tts = TtsConfig {
            speaking_rate: 0.9,
            voice_name: "custom-voice".to_string(),
            ..TtsConfig::default()
        };
        let params = VoiceParams::from_config(&tts);
        assert_eq!(params.speaking_rate, 0.9);
        assert_eq!(params.voice_name, "custom-voice");
        assert_eq!(params.language_code, "en-US");
        assert_eq!(params.pitch, 0.5);
        assert_eq!(params.volume_gain_db, 2.0);
    }

    #[test]
    fn test_marker_for_call_saturates() {
        assert_eq!(MockSynthesizer::marker_for_call(3), 300);
        assert_eq!(MockSynthesizer::marker_for_call(10_000), i16::MAX);
    }
}
