//! # desym - Main Entry Point
//!
//! Parses the command line, runs the pipeline with the system tool runner and
//! maps failures onto exit codes.

use anyhow::{Context, Result};
use clap::Parser;

use desym::cli::Args;
use desym::symbolization::SystemRunner;
use desym::{desymbolicate, DesymError};

// Exit codes (usage errors exit with 2 from clap)
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_NOINPUT: i32 = 66;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            exit_code_for(&e)
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DesymError>() {
        Some(e) if e.is_input_error() => EXIT_NOINPUT,
        _ => EXIT_ERROR,
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.to_config();

    let outcome = desymbolicate(&config, &SystemRunner)
        .with_context(|| format!("Failed to desymbolicate {}", config.crash_report.display()))?;

    if !args.quiet {
        if outcome.pre_resolved {
            println!("symbolicatecrash: applied");
        }
        println!("frames: {}", outcome.resolved_frames);
        match outcome.backup {
            Some(backup) => println!(
                "saved: {} (backup: {})",
                config.crash_report.display(),
                backup.display()
            ),
            None => println!("unchanged: {}", config.crash_report.display()),
        }
    }

    Ok(())
}
