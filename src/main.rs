//! onyx-job CLI - render and validate Onyx job definitions

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use onyx_job::error::{FixSuggestion, JobError};
use onyx_job::{Job, ValidationError, Validator};

#[derive(Parser)]
#[command(name = "onyx-job")]
#[command(about = "onyx-job - build and check Onyx job documents")]
#[command(version)]
struct Cli {
    /// Log coercion and loading details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Coerce a job definition and print the canonical document
    Render {
        /// Path to a job definition (.yaml or .json)
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Edn)]
        format: Format,
    },

    /// Check a job definition for broken references and structure
    Validate {
        /// Path to a job definition (.yaml or .json)
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Edn,
    Json,
    Yaml,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render { file, format } => render(&file, format),
        Commands::Validate { file } => validate(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.downcast_ref::<JobError>().and_then(|e| e.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load(file: &Path) -> Result<Job> {
    Job::from_path(file).with_context(|| format!("Failed to load job from {}", file.display()))
}

fn render(file: &Path, format: Format) -> Result<()> {
    let document = load(file)?.to_canonical_document()?;

    let text = match format {
        Format::Edn => document.to_edn(),
        Format::Json => document.to_json()?,
        Format::Yaml => document.to_yaml()?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

fn validate(file: &Path) -> Result<()> {
    let job = load(file)?;
    let result = Validator::new().validate(&job);

    println!(
        "{} {}: {} tasks, {} edges",
        "→".cyan(),
        file.display(),
        result.task_count,
        result.edge_count
    );

    for error in &result.errors {
        print_finding("✗".red().bold().to_string(), error);
    }
    for warning in &result.warnings {
        print_finding("⚠".yellow().bold().to_string(), warning);
    }

    if !result.is_valid() {
        eprintln!(
            "{} {} error(s), {} warning(s)",
            "Error:".red().bold(),
            result.errors.len(),
            result.warnings.len()
        );
        std::process::exit(1);
    }

    if result.has_warnings() {
        println!(
            "{} Valid with {} warning(s)",
            "✓".green(),
            result.warnings.len()
        );
    } else {
        println!("{} Valid", "✓".green());
    }
    Ok(())
}

fn print_finding(marker: String, finding: &ValidationError) {
    println!("  {} [{}] {}", marker, finding.layer(), finding);
    if let Some(suggestion) = finding.suggestion() {
        println!("      {} {}", "Fix:".yellow(), suggestion);
    }
}
