//! Podcast generation entry points.
//!
//! Wires config, content sources, the script writer and the synthesis
//! pipeline together for the CLI commands:
//! source → script → synthesize → combine

use crate::config::Config;
use crate::defaults;
use crate::error::Result;
use crate::llm::{self, TextGenerator, VertexClient};
use crate::pipeline::{PodcastOutput, PodcastPipeline, default_base_name};
use crate::source::ContentSource;
use crate::tts::{GoogleSpeechClient, SpeechSynthesizer};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// A script written to disk and the podcast made from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPodcast {
    pub script_path: PathBuf,
    pub podcast: PodcastOutput,
}

/// Run the synthesize command: transcript file → combined WAV.
pub async fn run_synthesize_command(
    config: &Config,
    transcript: &Path,
    output: Option<&str>,
) -> Result<PodcastOutput> {
    config.validate()?;
    let synthesizer = GoogleSpeechClient::from_config(config)?;
    let pipeline = PodcastPipeline::new(config, synthesizer);
    pipeline.run(transcript, output).await
}

/// Run the script command: source → cleaned dialogue script.
pub async fn run_script_command(config: &Config, source: &str) -> Result<String> {
    config.validate()?;
    let generator = VertexClient::from_config(config)?;
    script_from_source(config, &generator, &reqwest::Client::new(), source).await
}

/// Run the generate command: source → script file → combined WAV.
pub async fn run_generate_command(
    config: &Config,
    source: &str,
    output: Option<&str>,
) -> Result<GeneratedPodcast> {
    config.validate()?;
    let generator = VertexClient::from_config(config)?;
    let synthesizer = GoogleSpeechClient::from_config(config)?;
    generate_podcast(
        config,
        &generator,
        synthesizer,
        &reqwest::Client::new(),
        source,
        output,
    )
    .await
}

/// Extract `source` and have `generator` turn it into a dialogue.
pub async fn script_from_source<G>(
    config: &Config,
    generator: &G,
    http: &reqwest::Client,
    source: &str,
) -> Result<String>
where
    G: TextGenerator + ?Sized,
{
    let content = ContentSource::detect(source).extract(http).await?;
    llm::write_script(generator, config, &content).await
}

/// Path the generated script is saved to: `<dir>/<base>_transcript.txt`.
pub fn script_path(config: &Config, base_name: &str) -> PathBuf {
    config
        .tts
        .output_directory
        .join(format!("{base_name}{}", defaults::TRANSCRIPT_SUFFIX))
}

/// Write a script, save it next to the audio, then synthesize it.
///
/// The saved script is what gets synthesized, so it can be edited and
/// re-run with `synthesize` later.
pub async fn generate_podcast<G, S>(
    config: &Config,
    generator: &G,
    synthesizer: S,
    http: &reqwest::Client,
    source: &str,
    output: Option<&str>,
) -> Result<GeneratedPodcast>
where
    G: TextGenerator + ?Sized,
    S: SpeechSynthesizer,
{
    let base_name = output.map(str::to_string).unwrap_or_else(default_base_name);

    let script = script_from_source(config, generator, http, source).await?;

    fs::create_dir_all(&config.tts.output_directory)?;
    let script_path = script_path(config, &base_name);
    fs::write(&script_path, format!("{script}\n"))?;
    info!("Saved script to {}", script_path.display());

    let pipeline = PodcastPipeline::new(config, synthesizer);
    let podcast = pipeline.run(&script_path, Some(&base_name)).await?;

    Ok(GeneratedPodcast {
        script_path,
        podcast,
    })
}
