use futures_util::{stream, StreamExt, TryStreamExt};
use indicatif::{ProgressBar, ProgressStyle};

use crate::catalog::{CatalogClient, SearchHit, SearchOrder, VideoRecord, YoutubeDataApi};
use crate::config::Config;
use crate::distill;
use crate::extractors::extract_video_id;
use crate::transcript::{fetch_or_none, TranscriptSource, YtDlpTranscriptSource};
use crate::DigestError;

pub const MISSING_SUBJECT_MESSAGE: &str = "A search subject is required.";

/// Outcome of single-video tutorial mode
#[derive(Debug, Clone, PartialEq)]
pub struct TutorialDigest {
    pub video_id: String,

    /// Video title, or the video id when the title lookup failed
    pub title: String,

    /// Extracted steps; `None` when no transcript could be fetched
    pub steps: Option<Vec<String>>,
}

/// Main digest pipeline: extraction, lookup, distillation
pub struct DigestPipeline {
    transcripts: Box<dyn TranscriptSource>,
    catalog: Box<dyn CatalogClient>,
    max_concurrent_lookups: usize,
    show_progress: bool,
}

impl DigestPipeline {
    /// Create a pipeline backed by yt-dlp and the YouTube Data API
    pub fn new(config: &Config) -> Self {
        Self::with_sources(
            Box::new(YtDlpTranscriptSource::new(&config.transcript)),
            Box::new(YoutubeDataApi::new(&config.youtube)),
            config.search.max_concurrent_lookups,
        )
    }

    /// Create a pipeline over arbitrary lookup backends
    pub fn with_sources(
        transcripts: Box<dyn TranscriptSource>,
        catalog: Box<dyn CatalogClient>,
        max_concurrent_lookups: usize,
    ) -> Self {
        Self {
            transcripts,
            catalog,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
            show_progress: false,
        }
    }

    /// Show spinners while lookups run
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.enable_steady_tick(std::time::Duration::from_millis(120));
        progress.set_message(message);
        progress
    }

    /// Extract tutorial steps from the video behind a watch URL
    pub async fn tutorial(&self, url: &str) -> Result<TutorialDigest, DigestError> {
        let video_id = extract_video_id(url)
            .ok_or_else(|| DigestError::InvalidInput("Invalid YouTube URL.".to_string()))?;

        tracing::info!("Extracting tutorial steps for video: {}", video_id);
        let progress = self.spinner(format!("Fetching transcript for {}...", video_id));

        let title = match self.catalog.video_title(&video_id).await {
            Ok(title) => title,
            Err(err) => {
                tracing::warn!("Title lookup failed, using video id: {}", err);
                video_id.clone()
            }
        };

        let transcript = fetch_or_none(self.transcripts.as_ref(), &video_id).await;
        progress.finish_and_clear();

        let steps = transcript.as_deref().map(distill::extract_steps);

        Ok(TutorialDigest {
            video_id,
            title,
            steps,
        })
    }

    /// Search the catalog and attach an overview to every result.
    ///
    /// Results keep the order the search service returned. Videos without a transcript
    /// get the placeholder overview; a failed detail lookup fails the whole search.
    pub async fn search_summaries(
        &self,
        subject: &str,
        limit: u32,
    ) -> Result<Vec<VideoRecord>, DigestError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(DigestError::InvalidInput(MISSING_SUBJECT_MESSAGE.to_string()));
        }

        let progress = self.spinner(format!("Searching YouTube for \"{}\"...", subject));

        let hits = self
            .catalog
            .search(subject, SearchOrder::ViewCount, limit)
            .await;
        let hits = match hits {
            Ok(hits) => hits,
            Err(err) => {
                progress.finish_and_clear();
                return Err(err);
            }
        };

        tracing::info!("Search returned {} videos", hits.len());
        progress.set_message(format!("Summarizing {} videos...", hits.len()));

        // `buffered` keeps service order while lookups overlap
        let records = stream::iter(hits)
            .map(|hit| self.enrich(hit))
            .buffered(self.max_concurrent_lookups)
            .try_collect::<Vec<_>>()
            .await;

        progress.finish_and_clear();
        records
    }

    /// Detail lookup plus transcript overview for one search hit
    async fn enrich(&self, hit: SearchHit) -> Result<VideoRecord, DigestError> {
        let details = self.catalog.video_details(&hit.video_id).await?;
        let transcript = fetch_or_none(self.transcripts.as_ref(), &hit.video_id).await;
        let overview = distill::overview(transcript.as_deref());

        Ok(VideoRecord::new(hit, details).with_overview(overview))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MockCatalogClient, VideoDetails};
    use crate::transcript::{MockTranscriptSource, TranscriptFragment, TranscriptUnavailable};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn fragment(text: &str) -> TranscriptFragment {
        TranscriptFragment::new(text, Duration::ZERO, Duration::from_secs(1))
    }

    fn details() -> VideoDetails {
        VideoDetails {
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            channel_title: "Channel".to_string(),
            duration: chrono::Duration::seconds(600),
            view_count: 42,
        }
    }

    #[tokio::test]
    async fn test_tutorial_rejects_url_without_id() {
        let pipeline = DigestPipeline::with_sources(
            Box::new(MockTranscriptSource::new()),
            Box::new(MockCatalogClient::new()),
            1,
        );

        let err = pipeline.tutorial("https://youtu.be/dQw4w9WgXcQ").await.unwrap_err();
        assert!(matches!(err, DigestError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_tutorial_falls_back_to_video_id_title() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_video_title()
            .returning(|_| Err(DigestError::catalog("offline")));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|_| Ok(vec![fragment("1. Only step"), fragment("chatter")]));

        let pipeline =
            DigestPipeline::with_sources(Box::new(transcripts), Box::new(catalog), 1);
        let digest = pipeline
            .tutorial("https://www.youtube.com/watch?v=ABCDEFGHIJK")
            .await
            .unwrap();

        assert_eq!(digest.title, "ABCDEFGHIJK");
        assert_eq!(digest.steps, Some(vec!["1. Only step".to_string()]));
    }

    #[tokio::test]
    async fn test_tutorial_without_transcript_has_no_steps() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_video_title()
            .returning(|_| Ok("Sourdough".to_string()));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|id| Err(TranscriptUnavailable::new(id, "no captions")));

        let pipeline =
            DigestPipeline::with_sources(Box::new(transcripts), Box::new(catalog), 1);
        let digest = pipeline
            .tutorial("https://www.youtube.com/watch?v=ABCDEFGHIJK")
            .await
            .unwrap();

        assert_eq!(digest.title, "Sourdough");
        assert_eq!(digest.steps, None);
    }

    #[tokio::test]
    async fn test_search_propagates_catalog_failure() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_search()
            .returning(|_, _, _| Err(DigestError::catalog("quota exceeded")));

        let pipeline = DigestPipeline::with_sources(
            Box::new(MockTranscriptSource::new()),
            Box::new(catalog),
            2,
        );

        let err = pipeline.search_summaries("knitting", 5).await.unwrap_err();
        assert!(matches!(err, DigestError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_search_requests_view_count_order() {
        let mut catalog = MockCatalogClient::new();
        catalog
            .expect_search()
            .times(1)
            .returning(|_, order, limit| {
                assert_eq!(order, SearchOrder::ViewCount);
                assert_eq!(limit, 3);
                Ok(vec![SearchHit {
                    video_id: "AAAAAAAAAAA".to_string(),
                    title: "Only".to_string(),
                }])
            });
        catalog.expect_video_details().returning(|_| Ok(details()));

        let mut transcripts = MockTranscriptSource::new();
        transcripts
            .expect_fetch_transcript()
            .returning(|_| Ok(vec![fragment("hello"), fragment("world")]));

        let pipeline =
            DigestPipeline::with_sources(Box::new(transcripts), Box::new(catalog), 2);
        let records = pipeline.search_summaries("knitting", 3).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].overview.as_deref(), Some("hello world"));
        assert_eq!(records[0].view_count, 42);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_subject() {
        let pipeline = DigestPipeline::with_sources(
            Box::new(MockTranscriptSource::new()),
            Box::new(MockCatalogClient::new()),
            1,
        );

        let err = pipeline.search_summaries("   ", 5).await.unwrap_err();
        assert!(matches!(err, DigestError::InvalidInput(_)));
    }
}
