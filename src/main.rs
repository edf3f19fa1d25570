use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::Write;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tubedigest::cli::{Cli, Commands};
use tubedigest::config::Config;
use tubedigest::digest::MISSING_SUBJECT_MESSAGE;
use tubedigest::output::{self, ExportDocument};
use tubedigest::{utils, DigestError, DigestPipeline};

const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "YouTube could not be reached right now. Please try again later.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "tubedigest=debug"
    } else {
        "tubedigest=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Past argument parsing every failure is reported and the process exits normally
    if let Err(err) = run(cli).await {
        tracing::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().await?.with_api_key(cli.api_key);
    let show_progress = !cli.quiet;

    match cli.command {
        Commands::Steps { url, export } => {
            warn_missing_dependencies(&config).await;

            let pipeline = DigestPipeline::new(&config).with_progress(show_progress);
            let digest = match pipeline.tutorial(&url).await {
                Ok(digest) => digest,
                Err(err) => return report(err),
            };

            let document = ExportDocument::tutorial(&digest, Local::now());
            output::print_to_console(&document);

            // Nothing worth exporting without a transcript
            if digest.steps.is_some() {
                if let Some(dir) = export.resolve_dir(&config.export) {
                    let path = output::save_to_file(&document, &dir).await?;
                    println!("Steps have been saved to '{}'", path.display());
                }
            }
        }
        Commands::Search {
            subject,
            max_results,
            export,
        } => {
            let subject = match subject {
                Some(subject) => subject,
                None => prompt_subject()?,
            };
            if subject.trim().is_empty() {
                println!("{}", MISSING_SUBJECT_MESSAGE);
                return Ok(());
            }

            if !config.has_api_key() {
                println!("A YouTube Data API key is required for search.");
                println!("Set YOUTUBE_API_KEY, pass --api-key, or add it to:");
                println!("  {}", Config::config_path()?.display());
                return Ok(());
            }
            warn_missing_dependencies(&config).await;
            let limit = max_results.unwrap_or(config.search.max_results);

            let pipeline = DigestPipeline::new(&config).with_progress(show_progress);
            let records = match pipeline.search_summaries(&subject, limit).await {
                Ok(records) => records,
                Err(err) => return report(err),
            };

            let document = ExportDocument::summaries(&subject, &records, Local::now());
            output::print_to_console(&document);

            if let Some(dir) = export.resolve_dir(&config.export) {
                let path = output::save_to_file(&document, &dir).await?;
                println!("Video summaries have been saved to '{}'", path.display());
            }
        }
        Commands::Config { show } => {
            if show {
                config.display();
            } else {
                Config::print_location()?;
            }
        }
    }

    Ok(())
}

/// Show a user-facing message for a pipeline error
fn report(err: DigestError) -> Result<()> {
    match err {
        DigestError::InvalidInput(message) => println!("{}", message),
        DigestError::ServiceUnavailable { service, reason } => {
            tracing::error!("The {} failed: {}", service, reason);
            println!("{}", SERVICE_UNAVAILABLE_MESSAGE);
        }
    }
    Ok(())
}

/// Ask for a subject on stdout and read one line from stdin, which may be piped
fn prompt_subject() -> Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "Enter the subject to search on YouTube: ")?;
    stdout.flush()?;
    utils::read_trimmed_line(std::io::stdin().lock()).context("Failed to read search subject")
}

async fn warn_missing_dependencies(config: &Config) {
    let missing = utils::check_dependencies(&config.transcript.yt_dlp_path).await;
    if !missing.is_empty() {
        eprintln!("⚠️  Dependency check warnings:");
        for dep in missing {
            eprintln!("   • {}", dep);
        }
        eprintln!("   (Transcripts will be reported as unavailable)");
    }
}
