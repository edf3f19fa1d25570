//! TubeDigest - A Rust CLI tool for distilling YouTube transcripts
//!
//! This library extracts video identifiers from watch URLs, fetches transcripts and catalog
//! metadata from YouTube, reduces transcripts to tutorial steps or short overviews, and
//! renders the result to the terminal and to Markdown export files.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod digest;
pub mod distill;
pub mod extractors;
pub mod output;
pub mod transcript;
pub mod utils;

pub use catalog::{CatalogClient, SearchHit, SearchOrder, VideoDetails, VideoRecord};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use digest::{DigestPipeline, TutorialDigest};
pub use extractors::extract_video_id;
pub use transcript::{TranscriptFragment, TranscriptSource, TranscriptUnavailable};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// External services the digest pipeline talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Transcript,
    Catalog,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Transcript => write!(f, "transcript service"),
            Service::Catalog => write!(f, "catalog service"),
        }
    }
}

/// Error types surfaced to the user
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The {service} is unavailable: {reason}")]
    ServiceUnavailable { service: Service, reason: String },
}

impl DigestError {
    pub fn catalog(reason: impl std::fmt::Display) -> Self {
        DigestError::ServiceUnavailable {
            service: Service::Catalog,
            reason: reason.to_string(),
        }
    }
}

impl From<TranscriptUnavailable> for DigestError {
    fn from(err: TranscriptUnavailable) -> Self {
        DigestError::ServiceUnavailable {
            service: Service::Transcript,
            reason: err.to_string(),
        }
    }
}
