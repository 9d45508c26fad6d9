use anyhow::Result;
use clap::{CommandFactory, Parser};
use dialogcast::app::{run_generate_command, run_script_command, run_synthesize_command};
use dialogcast::cli::{Cli, Commands, ConfigAction};
use dialogcast::config::Config;
use dialogcast::diagnostics::check_environment;
use dialogcast::pipeline::PodcastOutput;
use log::{LevelFilter, warn};
use owo_colors::OwoColorize;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env may carry RUST_LOG, so read it before the logger starts
    let dotenv_result = dotenv::dotenv();
    init_logging(cli.quiet, cli.verbose);
    if let Err(e) = dotenv_result
        && !e.not_found()
    {
        warn!("Failed to load .env file: {}", e);
    }

    match cli.command {
        Commands::Synthesize { transcript, output } => {
            let config = load_config(cli.config.as_deref())?;
            let podcast = run_synthesize_command(&config, &transcript, output.as_deref()).await?;
            print_podcast(&podcast, cli.quiet);
        }
        Commands::Script { source, out } => {
            let config = load_config(cli.config.as_deref())?;
            let script = run_script_command(&config, &source).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, format!("{script}\n"))?;
                    println!("{} {}", "Script saved to".green(), path.display());
                }
                None => println!("{script}"),
            }
        }
        Commands::Generate { source, output } => {
            let config = load_config(cli.config.as_deref())?;
            let generated = run_generate_command(&config, &source, output.as_deref()).await?;
            if !cli.quiet {
                println!(
                    "{} {}",
                    "Script:".dimmed(),
                    generated.script_path.display()
                );
            }
            print_podcast(&generated.podcast, cli.quiet);
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            if !check_environment(&config) {
                std::process::exit(1);
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "dialogcast",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Library logs go to stderr; `RUST_LOG` overrides the flag-derived level.
fn init_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter_module("dialogcast", level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

/// Load configuration: file (explicit or default path), then environment.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides()?)
}

fn print_podcast(podcast: &PodcastOutput, quiet: bool) {
    if quiet {
        println!("{}", podcast.combined_path().display());
        return;
    }

    println!(
        "{} {}",
        "Podcast saved to".green(),
        podcast.combined_path().display().bold()
    );
    println!(
        "  {}  {} of {} batches, {:.1}s, {} bytes",
        "Audio:".dimmed(),
        podcast.chunks.len(),
        podcast.batch_count,
        podcast.combined.duration_ms as f64 / 1000.0,
        podcast.combined.bytes_written
    );
    for skipped in &podcast.skipped {
        println!(
            "  {} chunk {} skipped: {}",
            "⚠".yellow(),
            skipped.index,
            skipped.reason
        );
    }
}

/// Handle configuration inspection commands.
fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Get { key } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides()?;
            match config.get_value_by_path(&key) {
                Ok(value) => println!("{}", value),
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::List { key } => {
            let config = Config::load_or_default(&config_path)?.with_env_overrides()?;
            let rendered = match key.as_deref() {
                Some(section) => config.display_section(section),
                None => config.to_display_toml(),
            };
            match rendered {
                Ok(toml) => print!("{}", toml),
                Err(e) => {
                    eprintln!("{}", format!("Error: {}", e).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Dump => {
            print!("{}", Config::dump_template());
        }
    }

    Ok(())
}
