//! Command-line interface for dialogcast
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Two-host podcast generator
#[derive(Parser, Debug)]
#[command(
    name = "dialogcast",
    version,
    about = "Turn articles and dialogue scripts into two-host podcast audio"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-line detail, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize a dialogue transcript into a combined WAV
    Synthesize {
        /// Transcript file, one "Name: text" line per turn
        transcript: PathBuf,

        /// Base name for output files (default: podcast_<timestamp>)
        #[arg(long, short, value_name = "NAME")]
        output: Option<String>,
    },

    /// Write a two-host dialogue script from a text file, PDF or URL
    Script {
        /// Text file, PDF file or http(s) URL
        source: String,

        /// Write the script here instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Write a script from a source, then synthesize it
    Generate {
        /// Text file, PDF file or http(s) URL
        source: String,

        /// Base name for output files (default: podcast_<timestamp>)
        #[arg(long, short, value_name = "NAME")]
        output: Option<String>,
    },

    /// Check configuration and environment
    Check,

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Configuration inspection actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value by key (e.g., tts.voice_name)
    Get {
        /// Dotted key path (e.g., speakers.host_name, tts.batch_size)
        key: String,
    },
    /// List current configuration values (optionally one section)
    List {
        /// Config section to show (e.g., vertex, tts, speakers)
        key: Option<String>,
    },
    /// Dump a commented configuration template
    Dump,
}
