use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub mod youtube_api;

pub use youtube_api::YoutubeDataApi;

use crate::DigestError;

/// One entry of a catalog search, in service order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub title: String,
}

/// Metadata returned by the per-video detail lookup
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub published_at: DateTime<Utc>,
    pub channel_title: String,
    pub duration: Duration,
    pub view_count: u64,
}

/// A search result enriched with its details and derived overview
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub channel_title: String,
    pub duration: Duration,
    pub view_count: u64,

    /// Transcript overview, attached after construction
    pub overview: Option<String>,
}

impl VideoRecord {
    pub fn new(hit: SearchHit, details: VideoDetails) -> Self {
        Self {
            id: hit.video_id,
            title: hit.title,
            published_at: details.published_at,
            channel_title: details.channel_title,
            duration: details.duration,
            view_count: details.view_count,
            overview: None,
        }
    }

    pub fn with_overview(mut self, overview: String) -> Self {
        self.overview = Some(overview);
        self
    }
}

/// Result ordering requested from the search service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    /// Most viewed first
    #[default]
    ViewCount,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

/// Catalog search and detail lookups
///
/// Implementations return hits in the order the service produced them. Nothing here
/// reconciles the search order with later detail lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search for videos matching `query`
    async fn search(
        &self,
        query: &str,
        order: SearchOrder,
        limit: u32,
    ) -> std::result::Result<Vec<SearchHit>, DigestError>;

    /// Look up publication, channel, duration and view statistics for one video
    async fn video_details(&self, video_id: &str) -> std::result::Result<VideoDetails, DigestError>;

    /// Look up the title of a single video
    async fn video_title(&self, video_id: &str) -> std::result::Result<String, DigestError>;
}
