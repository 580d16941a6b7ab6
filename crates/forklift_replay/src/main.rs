//! Forklift Replay CLI - trajectory log validator
//!
//! Checks simulator logs against the forklift kinematic model and reports the
//! worst corner discrepancy.

use clap::{Parser, Subcommand};
use forklift_replay::{ModelConfig, Render, ReportFormat, Result, Validator, validate_logs};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Exit status for a log that exceeds the tolerance
const EXIT_FAILED: u8 = 2;
/// Exit status for configuration, log or I/O errors
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(
    name = "forklift-replay",
    about = "Forklift trajectory log validator",
    long_about = "Replay simulator trajectory logs through the forklift kinematic model and check the logged load corners"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a single trajectory log
    Check {
        /// Path to the CSV trajectory log
        log: PathBuf,
        /// Path to the model configuration (.json, .yaml)
        config: PathBuf,
        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
        /// Output file for the report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate every trajectory log in a directory
    Batch {
        /// Directory containing CSV trajectory logs
        dir: PathBuf,
        /// Path to the model configuration (.json, .yaml)
        config: PathBuf,
        /// Output format (text, json, yaml)
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            log,
            config,
            format,
            output,
        } => check_log(log, config, format, output),
        Commands::Batch {
            dir,
            config,
            format,
        } => check_directory(dir, config, format).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILED),
        Err(error) => {
            eprintln!("Error: {}", error);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn load_validator(config_path: &Path) -> Result<Validator> {
    let config = ModelConfig::load_from_file(config_path)?;
    Ok(Validator::from_config(&config)?)
}

fn check_log(
    log_path: PathBuf,
    config_path: PathBuf,
    format: ReportFormat,
    output_path: Option<PathBuf>,
) -> Result<bool> {
    let validator = load_validator(&config_path)?;
    let report = validator.validate_file(&log_path)?;

    if let Some(output_path) = output_path {
        report.save_to_file(&output_path, format)?;
        println!("Report saved to: {}", output_path.display());
        // Keep the verdict visible when the report goes to a file
        eprint!("{}", report.to_text());
    } else {
        print!("{}", report.render(format)?);
    }

    Ok(report.passed)
}

async fn check_directory(dir: PathBuf, config_path: PathBuf, format: ReportFormat) -> Result<bool> {
    let validator = Arc::new(load_validator(&config_path)?);
    let report = validate_logs(validator, &dir).await?;

    if report.entries.is_empty() {
        log::warn!("No trajectory logs found in {}", dir.display());
    }
    print!("{}", report.render(format)?);

    Ok(report.passed())
}
