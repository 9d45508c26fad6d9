//! Configuration and environment diagnostics.
//!
//! Verifies that the settings and credentials a run needs are present
//! before any paid API call is made.

use crate::config::Config;
use std::fs;
use std::path::Path;

/// Result of a single check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Setting is present and usable
    Ok,
    /// Setting is missing
    NotFound,
    /// Present but with issues (e.g., directory not writable)
    Warning(String),
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckResult::Ok)
    }
}

/// Check that the configuration passes validation.
fn check_config(config: &Config) -> CheckResult {
    match config.validate() {
        Ok(()) => CheckResult::Ok,
        Err(e) => CheckResult::Warning(e.to_string()),
    }
}

/// Check that a bearer token for the Google APIs is available.
fn check_access_token(config: &Config) -> CheckResult {
    match config.access_token() {
        Ok(token) if token.contains(char::is_whitespace) => {
            CheckResult::Warning("token contains whitespace".to_string())
        }
        Ok(_) => CheckResult::Ok,
        Err(_) => CheckResult::NotFound,
    }
}

/// Check that the output directory exists (or can be created) and is writable.
fn check_output_directory(dir: &Path) -> CheckResult {
    if !dir.exists() {
        return match dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
                CheckResult::Warning(format!(
                    "{} does not exist and neither does its parent",
                    dir.display()
                ))
            }
            _ => CheckResult::Ok,
        };
    }
    if !dir.is_dir() {
        return CheckResult::Warning(format!("{} is not a directory", dir.display()));
    }

    let probe = dir.join(".dialogcast-write-test");
    match fs::write(&probe, b"") {
        Ok(()) => {
            if let Err(e) = fs::remove_file(&probe) {
                return CheckResult::Warning(format!(
                    "could not remove {}: {}",
                    probe.display(),
                    e
                ));
            }
            CheckResult::Ok
        }
        Err(e) => CheckResult::Warning(format!("{} is not writable: {}", dir.display(), e)),
    }
}

/// Check whether PDF sources can be read by this build.
fn check_pdf_support() -> CheckResult {
    if cfg!(feature = "pdf-input") {
        CheckResult::Ok
    } else {
        CheckResult::NotFound
    }
}

/// Run all checks and print results. Returns true when a run can proceed.
pub fn check_environment(config: &Config) -> bool {
    println!("dialogcast {}", crate::version_string());
    println!("Checking configuration and environment...\n");

    print!("Configuration: ");
    let config_ok = match check_config(config) {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            false
        }
        CheckResult::Warning(msg) => {
            println!("✗ INVALID");
            println!("  {}", msg);
            println!("  See: dialogcast config dump");
            false
        }
    };

    print!("Google access token: ");
    let token_ok = match check_access_token(config) {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            println!("  Set GOOGLE_ACCESS_TOKEN, e.g.:");
            println!("    export GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token)");
            false
        }
        CheckResult::Warning(msg) => {
            println!("⚠ WARNING: {}", msg);
            true
        }
    };

    print!(
        "Output directory ({}): ",
        config.tts.output_directory.display()
    );
    let output_ok = match check_output_directory(&config.tts.output_directory) {
        CheckResult::Ok => {
            println!("✓ OK");
            true
        }
        CheckResult::NotFound => {
            println!("✗ NOT FOUND");
            false
        }
        CheckResult::Warning(msg) => {
            println!("⚠ WARNING: {}", msg);
            false
        }
    };

    print!("PDF sources: ");
    match check_pdf_support() {
        CheckResult::Ok => println!("✓ OK"),
        _ => println!("- not built in (enable the 'pdf-input' feature)"),
    }

    println!();
    println!(
        "Hosts: {} (voice {}) and {} (voice {}), {} lines per request",
        config.speakers.host_name,
        config.speakers.host_voice,
        config.speakers.guest_name,
        config.speakers.guest_voice,
        config.tts.batch_size
    );

    let ready = config_ok && token_ok && output_ok;
    if ready {
        println!("✓ Ready to generate podcasts.");
    } else {
        println!("⚠ Fix the items above before running synthesize or generate.");
    }
    ready
}
