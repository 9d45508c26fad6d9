//! Transcript loading and positional batching.

use crate::error::{DialogcastError, Result};
use crate::transcript::parser::{ParsedLine, SpeakerRoster, Utterance};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// How much of a line to echo in debug output.
const PREVIEW_CHARS: usize = 50;

/// The non-empty, trimmed lines of one transcript file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    source: PathBuf,
    lines: Vec<String>,
}

impl Transcript {
    /// Read a transcript file.
    ///
    /// Fails with `InputNotFound` when the file is missing and with
    /// `EmptyInput` when no non-blank line remains.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DialogcastError::InputNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Self::from_text(path, &contents)
    }

    /// Build a transcript from text already in memory.
    pub fn from_text(source: &Path, text: &str) -> Result<Self> {
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        if lines.is_empty() {
            return Err(DialogcastError::EmptyInput {
                path: source.display().to_string(),
            });
        }

        Ok(Self {
            source: source.to_path_buf(),
            lines,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Split into consecutive batches of at most `size` lines.
    ///
    /// A `size` of zero is treated as one line per batch.
    pub fn batches(&self, size: usize) -> impl ExactSizeIterator<Item = Batch<'_>> {
        self.lines
            .chunks(size.max(1))
            .enumerate()
            .map(|(i, lines)| Batch {
                index: i + 1,
                lines,
            })
    }
}

/// Number of batches `line_count` lines split into.
pub fn batch_count(line_count: usize, size: usize) -> usize {
    line_count.div_ceil(size.max(1))
}

/// A positional slice of transcript lines, sent as one synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// 1-based position in the transcript.
    pub index: usize,
    pub lines: &'a [String],
}

impl Batch<'_> {
    /// Parse every line, keeping only turns by configured hosts.
    ///
    /// Unknown speakers are logged and dropped; they never fail the batch.
    pub fn utterances(&self, roster: &SpeakerRoster) -> Vec<Utterance> {
        let mut turns = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            match roster.parse_line(line) {
                ParsedLine::Turn(utterance) => {
                    debug!(
                        "Processed {} line ({}): {}...",
                        utterance.role,
                        utterance.speaker_tag,
                        preview(&utterance.text)
                    );
                    turns.push(utterance);
                }
                ParsedLine::UnknownSpeaker(name) => {
                    warn!("Unknown speaker in chunk {}: {}", self.index, name);
                }
                ParsedLine::StageDirection => {
                    debug!("Skipping stage direction: {}", preview(line));
                }
                ParsedLine::NotDialogue => {
                    debug!("Skipping non-dialogue line: {}", preview(line));
                }
            }
        }
        turns
    }
}

fn preview(text: &str) -> String {
    text.chars().take(PREVIEW_CHARS).collect()
}
