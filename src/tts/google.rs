//! Google Cloud Text-to-Speech multi-speaker client.
//!
//! Sends one `text:synthesize` request per batch with the turns as
//! `multiSpeakerMarkup` and returns the LINEAR16 WAV it gets back.

use crate::config::Config;
use crate::error::{DialogcastError, Result};
use crate::google::{self, GoogleAuth};
use crate::transcript::Utterance;
use crate::tts::synthesizer::{SpeechSynthesizer, SynthesisOutcome, VoiceParams};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use serde::{Deserialize, Serialize};

/// Multi-speaker markup is only served by the beta surface.
pub const TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1beta1/text:synthesize";

const SERVICE: &str = "text-to-speech";

/// LINEAR16 comes back as a WAV file, header included.
const AUDIO_ENCODING: &str = "LINEAR16";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisInput<'a> {
    multi_speaker_markup: MultiSpeakerMarkup<'a>,
}

#[derive(Debug, Serialize)]
struct MultiSpeakerMarkup<'a> {
    turns: Vec<Turn<'a>>,
}

#[derive(Debug, Serialize)]
struct Turn<'a> {
    speaker: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
    pitch: f64,
    volume_gain_db: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

fn build_request<'a>(voice: &'a VoiceParams, turns: &'a [Utterance]) -> SynthesizeRequest<'a> {
    SynthesizeRequest {
        input: SynthesisInput {
            multi_speaker_markup: MultiSpeakerMarkup {
                turns: turns
                    .iter()
                    .map(|u| Turn {
                        speaker: &u.speaker_tag,
                        text: &u.text,
                    })
                    .collect(),
            },
        },
        voice: VoiceSelection {
            language_code: &voice.language_code,
            name: &voice.voice_name,
        },
        audio_config: AudioConfig {
            audio_encoding: AUDIO_ENCODING,
            speaking_rate: voice.speaking_rate,
            pitch: voice.pitch,
            volume_gain_db: voice.volume_gain_db,
        },
    }
}

fn decode_audio(response: &SynthesizeResponse) -> Result<Vec<u8>> {
    STANDARD
        .decode(response.audio_content.trim())
        .map_err(|e| DialogcastError::Synthesis {
            message: format!("audioContent is not valid base64: {e}"),
        })
}

/// Client for the Text-to-Speech REST API.
#[derive(Debug, Clone)]
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    auth: GoogleAuth,
    endpoint: String,
    voice: VoiceParams,
}

impl GoogleSpeechClient {
    pub fn new(auth: GoogleAuth, voice: VoiceParams) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            endpoint: TTS_ENDPOINT.to_string(),
            voice,
        }
    }

    /// Client using the `[tts]` section and the shared access token.
    pub fn from_config(config: &Config) -> Result<Self> {
        let auth = GoogleAuth::from_config(config)?;
        Ok(Self::new(auth, VoiceParams::from_config(&config.tts)))
    }

    /// Point the client at a different URL (proxies, local fakes).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn request_audio(&self, turns: &[Utterance]) -> Result<Vec<u8>> {
        let request = build_request(&self.voice, turns);
        let response: SynthesizeResponse =
            google::post_json(&self.http, &self.auth, SERVICE, &self.endpoint, &request).await?;
        decode_audio(&response)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeechClient {
    async fn synthesize(&self, turns: &[Utterance]) -> SynthesisOutcome {
        if turns.is_empty() {
            return SynthesisOutcome::Empty;
        }

        debug!(
            "Requesting {} turns from {} ({})",
            turns.len(),
            self.endpoint,
            self.voice.voice_name
        );

        match self.request_audio(turns).await {
            Ok(bytes) if bytes.is_empty() => SynthesisOutcome::Empty,
            Ok(bytes) => SynthesisOutcome::Audio(bytes),
            Err(e) => SynthesisOutcome::Failed(e.to_string()),
        }
    }

    fn voice_name(&self) -> &str {
        &self.voice.voice_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::SpeakerRole;

    fn turns() -> Vec<Utterance> {
        vec![
            Utterance {
                role: SpeakerRole::Host,
                speaker_tag: "S".to_string(),
                text: "Welcome back!".to_string(),
            },
            Utterance {
                role: SpeakerRole::Guest,
                speaker_tag: "R".to_string(),
                text: "Hmm... really?".to_string(),
            },
        ]
    }

    #[test]
    fn test_request_json_shape() {
        let voice = VoiceParams::default();
        let turns = turns();
        let json = serde_json::to_value(build_request(&voice, &turns)).unwrap();

        let expected = serde_json::json!({
            "input": {
                "multiSpeakerMarkup": {
                    "turns": [
                        {"speaker": "S", "text": "Welcome back!"},
                        {"speaker": "R", "text": "Hmm... really?"}
                    ]
                }
            },
            "voice": {
                "languageCode": "en-US",
                "name": "en-US-Studio-MultiSpeaker"
            },
            "audioConfig": {
                "audioEncoding": "LINEAR16",
                "speakingRate": 1.1,
                "pitch": 0.5,
                "volumeGainDb": 2.0
            }
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn test_decode_audio_base64() {
        let response: SynthesizeResponse =
            serde_json::from_str(r#"{"audioContent": "UklGRg=="}"#).unwrap();
        assert_eq!(decode_audio(&response).unwrap(), b"RIFF");
    }

    #[test]
    fn test_missing_audio_content_decodes_to_empty() {
        let response: SynthesizeResponse = serde_json::from_str("{}").unwrap();
        assert!(decode_audio(&response).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_base64_is_synthesis_error() {
        let response = SynthesizeResponse {
            audio_content: "not base64!!".to_string(),
        };
        assert!(matches!(
            decode_audio(&response),
            Err(DialogcastError::Synthesis { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_batch_short_circuits() {
        let client = GoogleSpeechClient::new(GoogleAuth::new("token", None), VoiceParams::default())
            .with_endpoint("http://127.0.0.1:1/unused");
        assert_eq!(client.synthesize(&[]).await, SynthesisOutcome::Empty);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_failed_outcome() {
        let client = GoogleSpeechClient::new(GoogleAuth::new("token", None), VoiceParams::default())
            .with_endpoint("http://127.0.0.1:1/text:synthesize");
        let outcome = client.synthesize(&turns()).await;
        match outcome {
            SynthesisOutcome::Failed(message) => assert!(message.contains("text-to-speech")),
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = Config::default();
        assert!(GoogleSpeechClient::from_config(&config).is_err());
    }
}
