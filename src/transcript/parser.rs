//! Turn parser: one dialogue line in, one speaker-tagged utterance out.

use crate::config::SpeakersConfig;
use std::fmt;

/// Separator between the speaker name and what they say.
pub const SPEAKER_SEPARATOR: &str = ": ";

/// Which of the two hosts is speaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakerRole {
    Host,
    Guest,
}

impl fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerRole::Host => write!(f, "host"),
            SpeakerRole::Guest => write!(f, "guest"),
        }
    }
}

/// One parsed dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub role: SpeakerRole,
    /// Voice tag the speech service uses for this speaker (e.g. "S").
    pub speaker_tag: String,
    pub text: String,
}

/// A configured host: display name plus voice tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
    pub name: String,
    pub voice: String,
}

/// What a single transcript line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A line spoken by one of the configured hosts.
    Turn(Utterance),
    /// `(laughs)` or `[music]` style direction, or an empty line.
    StageDirection,
    /// No `": "` separator, so not dialogue.
    NotDialogue,
    /// Dialogue by someone who is not a configured host.
    UnknownSpeaker(String),
}

impl ParsedLine {
    /// The utterance, if this line produced one.
    pub fn into_utterance(self) -> Option<Utterance> {
        match self {
            ParsedLine::Turn(u) => Some(u),
            _ => None,
        }
    }
}

/// The two hosts a transcript is allowed to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerRoster {
    pub host: Speaker,
    pub guest: Speaker,
}

impl SpeakerRoster {
    pub fn new(host: Speaker, guest: Speaker) -> Self {
        Self { host, guest }
    }

    /// Roster from the `[speakers]` config section.
    pub fn from_config(speakers: &SpeakersConfig) -> Self {
        Self {
            host: Speaker {
                name: speakers.host_name.clone(),
                voice: speakers.host_voice.clone(),
            },
            guest: Speaker {
                name: speakers.guest_name.clone(),
                voice: speakers.guest_voice.clone(),
            },
        }
    }

    /// Match a speaker name case-insensitively.
    pub fn resolve(&self, name: &str) -> Option<(SpeakerRole, &Speaker)> {
        let name = name.to_lowercase();
        if name == self.host.name.to_lowercase() {
            Some((SpeakerRole::Host, &self.host))
        } else if name == self.guest.name.to_lowercase() {
            Some((SpeakerRole::Guest, &self.guest))
        } else {
            None
        }
    }

    /// Classify one transcript line.
    ///
    /// The line is trimmed first. Speaker name is everything before the
    /// first `": "`; the rest, trimmed, is the utterance text.
    pub fn parse_line(&self, line: &str) -> ParsedLine {
        let line = line.trim();
        if line.is_empty() || line.starts_with('(') || line.starts_with('[') {
            return ParsedLine::StageDirection;
        }

        let Some((speaker, text)) = line.split_once(SPEAKER_SEPARATOR) else {
            return ParsedLine::NotDialogue;
        };

        match self.resolve(speaker) {
            Some((role, resolved)) => ParsedLine::Turn(Utterance {
                role,
                speaker_tag: resolved.voice.clone(),
                text: text.trim().to_string(),
            }),
            None => ParsedLine::UnknownSpeaker(speaker.to_string()),
        }
    }
}
