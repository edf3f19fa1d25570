use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ExportConfig;

#[derive(Parser)]
#[command(
    name = "tubedigest",
    about = "TubeDigest - Turn YouTube transcripts into tutorial steps and video overviews",
    version,
    long_about = "A CLI tool that extracts step-by-step instructions from a YouTube tutorial's transcript, or searches YouTube for the most viewed videos on a subject and summarizes each one. Results are printed and exported as Markdown."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// YouTube Data API key (overrides the config file)
    #[arg(long, global = true, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract step-by-step instructions from a tutorial video
    Steps {
        /// YouTube watch URL (must contain v=<video id>)
        #[arg(value_name = "URL")]
        url: String,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Search the most viewed videos on a subject and summarize them
    Search {
        /// Subject to search for (prompted for when omitted)
        #[arg(value_name = "SUBJECT")]
        subject: Option<String>,

        /// Number of videos to summarize (default from config: 5)
        #[arg(short = 'n', long, value_name = "COUNT", value_parser = clap::value_parser!(u32).range(1..=50))]
        max_results: Option<u32>,

        #[command(flatten)]
        export: ExportArgs,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory for Markdown exports (default from config: ./export)
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Print results without writing a Markdown file
    #[arg(long)]
    pub no_export: bool,
}

impl ExportArgs {
    /// Where to write the Markdown export, or `None` when exporting is off.
    ///
    /// `--no-export` always wins. An explicit `--export-dir` re-enables exporting
    /// even when the config file turns it off.
    pub fn resolve_dir(&self, config: &ExportConfig) -> Option<PathBuf> {
        if self.no_export || (!config.enabled && self.export_dir.is_none()) {
            return None;
        }
        Some(
            self.export_dir
                .clone()
                .unwrap_or_else(|| config.dir.clone()),
        )
    }
}
