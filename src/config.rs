//! Run-time configuration.
//!
//! Built once at startup from defaults, an optional TOML file and the
//! environment, validated, then passed by reference to every component.

use crate::defaults;
use crate::error::{DialogcastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub vertex: VertexConfig,
    pub tts: TtsConfig,
    pub speakers: SpeakersConfig,
    pub conversation: ConversationConfig,
    pub speech: SpeechConfig,
}

/// Vertex AI (transcript generation) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VertexConfig {
    pub project: String,
    pub location: String,
    pub model: String,
    /// OAuth bearer token shared by both Google services.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

/// Text-to-Speech configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TtsConfig {
    pub language_code: String,
    pub voice_name: String,
    pub speaking_rate: f64,
    pub pitch: f64,
    pub volume_gain_db: f64,
    pub output_directory: PathBuf,
    pub file_format: String,
    pub batch_size: usize,
}

/// The two hosts: display names, voice tags and personalities
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeakersConfig {
    pub host_name: String,
    pub guest_name: String,
    pub host_voice: String,
    pub guest_voice: String,
    pub host_personality: String,
    pub guest_personality: String,
}

/// Word-count bounds for the generated conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConversationConfig {
    pub opening_words_min: u32,
    pub opening_words_max: u32,
    pub main_discussion_min: u32,
    pub main_discussion_max: u32,
}

/// Speech cues the prompt asks the model to use
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub pause_marker: String,
    pub excitement_marker: String,
    pub question_marker: String,
    pub thinking_sound: String,
    pub agreement_sound: String,
    pub laughter_sound: String,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            location: defaults::VERTEX_LOCATION.to_string(),
            model: defaults::VERTEX_MODEL.to_string(),
            access_token: None,
            temperature: defaults::TEMPERATURE,
            top_k: defaults::TOP_K,
            top_p: defaults::TOP_P,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            language_code: defaults::TTS_LANGUAGE_CODE.to_string(),
            voice_name: defaults::TTS_VOICE_NAME.to_string(),
            speaking_rate: defaults::TTS_SPEAKING_RATE,
            pitch: defaults::TTS_PITCH,
            volume_gain_db: defaults::TTS_VOLUME_GAIN_DB,
            output_directory: PathBuf::from(defaults::OUTPUT_DIRECTORY),
            file_format: defaults::FILE_FORMAT.to_string(),
            batch_size: defaults::BATCH_SIZE,
        }
    }
}

impl Default for SpeakersConfig {
    fn default() -> Self {
        Self {
            host_name: defaults::HOST_NAME.to_string(),
            guest_name: defaults::GUEST_NAME.to_string(),
            host_voice: defaults::HOST_VOICE.to_string(),
            guest_voice: defaults::GUEST_VOICE.to_string(),
            host_personality: defaults::HOST_PERSONALITY.to_string(),
            guest_personality: defaults::GUEST_PERSONALITY.to_string(),
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            opening_words_min: defaults::OPENING_WORDS_MIN,
            opening_words_max: defaults::OPENING_WORDS_MAX,
            main_discussion_min: defaults::MAIN_DISCUSSION_MIN,
            main_discussion_max: defaults::MAIN_DISCUSSION_MAX,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            pause_marker: defaults::PAUSE_MARKER.to_string(),
            excitement_marker: defaults::EXCITEMENT_MARKER.to_string(),
            question_marker: defaults::QUESTION_MARKER.to_string(),
            thinking_sound: defaults::THINKING_SOUND.to_string(),
            agreement_sound: defaults::AGREEMENT_SOUND.to_string(),
            laughter_sound: defaults::LAUGHTER_SOUND.to_string(),
        }
    }
}

/// Parse an override value, naming the variable on failure.
fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| DialogcastError::ConfigInvalidValue {
            key: key.to_string(),
            message: format!("'{}' is not valid: {}", raw, e),
        })
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DialogcastError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DialogcastError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(DialogcastError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/dialogcast/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("dialogcast")
            .join("config.toml")
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (environment-style names).
    ///
    /// Empty values are ignored; unparseable numbers are an error.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        macro_rules! set_string {
            ($field:expr, $($key:literal),+) => {
                $(
                    if let Some(v) = get($key) {
                        $field = v;
                    }
                )+
            };
        }
        macro_rules! set_parsed {
            ($field:expr, $key:literal) => {
                if let Some(v) = get($key) {
                    $field = parse_value($key, &v)?;
                }
            };
        }

        set_string!(self.vertex.project, "VERTEX_PROJECT");
        set_string!(self.vertex.location, "VERTEX_LOCATION");
        set_string!(self.vertex.model, "VERTEX_MODEL");
        if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            self.vertex.access_token = Some(token.trim().to_string());
        }
        set_parsed!(self.vertex.temperature, "TEMPERATURE");
        set_parsed!(self.vertex.top_k, "TOP_K");
        set_parsed!(self.vertex.top_p, "TOP_P");
        set_parsed!(self.vertex.max_output_tokens, "MAX_OUTPUT_TOKENS");

        set_string!(self.tts.language_code, "TTS_LANGUAGE_CODE");
        set_string!(self.tts.voice_name, "TTS_VOICE_NAME");
        set_parsed!(self.tts.speaking_rate, "TTS_SPEAKING_RATE");
        set_parsed!(self.tts.pitch, "TTS_PITCH");
        set_parsed!(self.tts.volume_gain_db, "TTS_VOLUME_GAIN_DB");
        if let Some(dir) = get("TTS_OUTPUT_DIRECTORY") {
            self.tts.output_directory = PathBuf::from(dir);
        }
        set_string!(self.tts.file_format, "TTS_FILE_FORMAT");
        set_parsed!(self.tts.batch_size, "TTS_BATCH_SIZE");

        set_string!(self.speakers.host_name, "SPEAKER_1_NAME");
        set_string!(self.speakers.guest_name, "SPEAKER_2_NAME");
        // SPEAKER_n_VOICE wins over the older TTS_*_SPEAKER names
        set_string!(self.speakers.host_voice, "TTS_HOST_SPEAKER", "SPEAKER_1_VOICE");
        set_string!(self.speakers.guest_voice, "TTS_GUEST_SPEAKER", "SPEAKER_2_VOICE");
        set_string!(self.speakers.host_personality, "SPEAKER_1_PERSONALITY");
        set_string!(self.speakers.guest_personality, "SPEAKER_2_PERSONALITY");

        set_parsed!(self.conversation.opening_words_min, "OPENING_WORDS_MIN");
        set_parsed!(self.conversation.opening_words_max, "OPENING_WORDS_MAX");
        set_parsed!(self.conversation.main_discussion_min, "MAIN_DISCUSSION_MIN");
        set_parsed!(self.conversation.main_discussion_max, "MAIN_DISCUSSION_MAX");

        set_string!(self.speech.pause_marker, "PAUSE_MARKER");
        set_string!(self.speech.excitement_marker, "EXCITEMENT_MARKER");
        set_string!(self.speech.question_marker, "QUESTION_MARKER");
        set_string!(self.speech.thinking_sound, "THINKING_SOUND");
        set_string!(self.speech.agreement_sound, "AGREEMENT_SOUND");
        set_string!(self.speech.laughter_sound, "LAUGHTER_SOUND");

        Ok(self)
    }

    /// Check that every required setting is present and every value is usable.
    ///
    /// All missing settings are reported together.
    pub fn validate(&self) -> Result<()> {
        let output_directory = self.tts.output_directory.to_string_lossy();
        let required: [(&str, &str); 18] = [
            ("vertex.project (VERTEX_PROJECT)", &self.vertex.project),
            ("vertex.location (VERTEX_LOCATION)", &self.vertex.location),
            ("vertex.model (VERTEX_MODEL)", &self.vertex.model),
            ("speakers.host_name (SPEAKER_1_NAME)", &self.speakers.host_name),
            ("speakers.guest_name (SPEAKER_2_NAME)", &self.speakers.guest_name),
            ("speakers.host_voice (SPEAKER_1_VOICE)", &self.speakers.host_voice),
            ("speakers.guest_voice (SPEAKER_2_VOICE)", &self.speakers.guest_voice),
            (
                "speakers.host_personality (SPEAKER_1_PERSONALITY)",
                &self.speakers.host_personality,
            ),
            (
                "speakers.guest_personality (SPEAKER_2_PERSONALITY)",
                &self.speakers.guest_personality,
            ),
            ("speech.pause_marker (PAUSE_MARKER)", &self.speech.pause_marker),
            (
                "speech.excitement_marker (EXCITEMENT_MARKER)",
                &self.speech.excitement_marker,
            ),
            (
                "speech.question_marker (QUESTION_MARKER)",
                &self.speech.question_marker,
            ),
            ("speech.thinking_sound (THINKING_SOUND)", &self.speech.thinking_sound),
            ("speech.agreement_sound (AGREEMENT_SOUND)", &self.speech.agreement_sound),
            ("speech.laughter_sound (LAUGHTER_SOUND)", &self.speech.laughter_sound),
            ("tts.language_code (TTS_LANGUAGE_CODE)", &self.tts.language_code),
            ("tts.voice_name (TTS_VOICE_NAME)", &self.tts.voice_name),
            ("tts.output_directory (TTS_OUTPUT_DIRECTORY)", &*output_directory),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(DialogcastError::ConfigMissing {
                keys: missing.join(", "),
            });
        }

        let invalid = |key: &str, message: &str| DialogcastError::ConfigInvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if !self.tts.file_format.eq_ignore_ascii_case(defaults::FILE_FORMAT) {
            return Err(invalid(
                "tts.file_format",
                &format!(
                    "'{}' is not supported, only '{}'",
                    self.tts.file_format,
                    defaults::FILE_FORMAT
                ),
            ));
        }
        if self.tts.batch_size == 0 {
            return Err(invalid("tts.batch_size", "must be at least 1"));
        }
        if self.tts.speaking_rate <= 0.0 {
            return Err(invalid("tts.speaking_rate", "must be positive"));
        }
        if self.conversation.opening_words_min > self.conversation.opening_words_max {
            return Err(invalid(
                "conversation.opening_words_min",
                "must not exceed opening_words_max",
            ));
        }
        if self.conversation.main_discussion_min > self.conversation.main_discussion_max {
            return Err(invalid(
                "conversation.main_discussion_min",
                "must not exceed main_discussion_max",
            ));
        }
        if self.speakers.host_name.to_lowercase() == self.speakers.guest_name.to_lowercase() {
            return Err(invalid(
                "speakers.guest_name",
                "must differ from speakers.host_name",
            ));
        }

        Ok(())
    }

    /// Bearer token for the Google APIs.
    pub fn access_token(&self) -> Result<&str> {
        self.vertex
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DialogcastError::ConfigMissing {
                keys: "vertex.access_token (GOOGLE_ACCESS_TOKEN)".to_string(),
            })
    }

    /// Copy of the config that is safe to print.
    fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if shown.vertex.access_token.is_some() {
            shown.vertex.access_token = Some("<redacted>".to_string());
        }
        shown
    }

    fn to_toml_value(&self) -> Result<toml::Value> {
        toml::Value::try_from(self.redacted()).map_err(|e| DialogcastError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Render the effective configuration as TOML (token redacted).
    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).map_err(|e| DialogcastError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Render one section (e.g. `tts`) as TOML.
    pub fn display_section(&self, section: &str) -> Result<String> {
        let value = self.to_toml_value()?;
        let table = value
            .get(section)
            .and_then(|v| v.as_table())
            .ok_or_else(|| DialogcastError::ConfigInvalidValue {
                key: section.to_string(),
                message: "unknown section (expected vertex, tts, speakers, conversation or speech)"
                    .to_string(),
            })?;
        toml::to_string_pretty(table).map_err(|e| DialogcastError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Look up a value by dotted key path, e.g. `tts.speaking_rate`.
    pub fn get_value_by_path(&self, key: &str) -> Result<String> {
        let root = self.to_toml_value()?;
        let mut current = &root;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| DialogcastError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: "no such key".to_string(),
                })?;
        }
        Ok(match current {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Commented configuration template with the built-in defaults.
    pub fn dump_template() -> String {
        format!(
            r#"# dialogcast configuration
# Every value can also be set through the environment variable shown.

[vertex]
project = ""                          # VERTEX_PROJECT (required)
location = "{location}"               # VERTEX_LOCATION
model = "{model}"                     # VERTEX_MODEL
# access_token = ""                   # GOOGLE_ACCESS_TOKEN (e.g. `gcloud auth print-access-token`)
temperature = {temperature:?}           # TEMPERATURE
top_k = {top_k}                       # TOP_K
top_p = {top_p:?}                       # TOP_P
max_output_tokens = {max_tokens}      # MAX_OUTPUT_TOKENS

[tts]
language_code = "{language}"          # TTS_LANGUAGE_CODE
voice_name = "{voice}"                # TTS_VOICE_NAME
speaking_rate = {rate:?}                # TTS_SPEAKING_RATE
pitch = {pitch:?}                       # TTS_PITCH
volume_gain_db = {gain:?}               # TTS_VOLUME_GAIN_DB
output_directory = "{output}"         # TTS_OUTPUT_DIRECTORY
file_format = "{format}"              # TTS_FILE_FORMAT (only wav)
batch_size = {batch}                  # TTS_BATCH_SIZE (dialogue lines per request)

[speakers]
host_name = "{host}"                  # SPEAKER_1_NAME
guest_name = "{guest}"                # SPEAKER_2_NAME
host_voice = "{host_voice}"           # SPEAKER_1_VOICE
guest_voice = "{guest_voice}"         # SPEAKER_2_VOICE
host_personality = {host_personality}  # SPEAKER_1_PERSONALITY
guest_personality = {guest_personality}  # SPEAKER_2_PERSONALITY

[conversation]
opening_words_min = {open_min}        # OPENING_WORDS_MIN
opening_words_max = {open_max}        # OPENING_WORDS_MAX
main_discussion_min = {main_min}      # MAIN_DISCUSSION_MIN
main_discussion_max = {main_max}      # MAIN_DISCUSSION_MAX

[speech]
pause_marker = "{pause}"              # PAUSE_MARKER
excitement_marker = "{excitement}"    # EXCITEMENT_MARKER
question_marker = "{question}"        # QUESTION_MARKER
thinking_sound = "{thinking}"         # THINKING_SOUND
agreement_sound = "{agreement}"       # AGREEMENT_SOUND
laughter_sound = "{laughter}"         # LAUGHTER_SOUND
"#,
            location = defaults::VERTEX_LOCATION,
            model = defaults::VERTEX_MODEL,
            temperature = defaults::TEMPERATURE,
            top_k = defaults::TOP_K,
            top_p = defaults::TOP_P,
            max_tokens = defaults::MAX_OUTPUT_TOKENS,
            language = defaults::TTS_LANGUAGE_CODE,
            voice = defaults::TTS_VOICE_NAME,
            rate = defaults::TTS_SPEAKING_RATE,
            pitch = defaults::TTS_PITCH,
            gain = defaults::TTS_VOLUME_GAIN_DB,
            output = defaults::OUTPUT_DIRECTORY,
            format = defaults::FILE_FORMAT,
            batch = defaults::BATCH_SIZE,
            host = defaults::HOST_NAME,
            guest = defaults::GUEST_NAME,
            host_voice = defaults::HOST_VOICE,
            guest_voice = defaults::GUEST_VOICE,
            host_personality = toml::Value::from(defaults::HOST_PERSONALITY),
            guest_personality = toml::Value::from(defaults::GUEST_PERSONALITY),
            open_min = defaults::OPENING_WORDS_MIN,
            open_max = defaults::OPENING_WORDS_MAX,
            main_min = defaults::MAIN_DISCUSSION_MIN,
            main_max = defaults::MAIN_DISCUSSION_MAX,
            pause = defaults::PAUSE_MARKER,
            excitement = defaults::EXCITEMENT_MARKER,
            question = defaults::QUESTION_MARKER,
            thinking = defaults::THINKING_SOUND,
            agreement = defaults::AGREEMENT_SOUND,
            laughter = defaults::LAUGHTER_SOUND,
        )
    }
}
