use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod ytdlp;

pub use ytdlp::YtDlpTranscriptSource;

/// One timed caption unit within a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Caption text exactly as served
    pub text: String,

    /// Offset of the fragment from the start of the video
    pub start_offset: Duration,

    /// How long the fragment is shown
    pub duration: Duration,
}

impl TranscriptFragment {
    pub fn new(text: impl Into<String>, start_offset: Duration, duration: Duration) -> Self {
        Self {
            text: text.into(),
            start_offset,
            duration,
        }
    }
}

/// The transcript service could not produce a transcript.
///
/// Network errors, missing captions, bad identifiers and quota errors all collapse into
/// this one kind. Callers treat it as an expected outcome.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("transcript unavailable for {video_id}: {reason}")]
pub struct TranscriptUnavailable {
    pub video_id: String,
    pub reason: String,
}

impl TranscriptUnavailable {
    pub fn new(video_id: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Source of video transcripts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the full transcript, ordered by start offset
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptFragment>, TranscriptUnavailable>;
}

/// Fetch a transcript, logging the cause and yielding `None` on failure
pub async fn fetch_or_none(
    source: &dyn TranscriptSource,
    video_id: &str,
) -> Option<Vec<TranscriptFragment>> {
    match source.fetch_transcript(video_id).await {
        Ok(fragments) => {
            tracing::debug!("Fetched {} transcript fragments for {}", fragments.len(), video_id);
            Some(fragments)
        }
        Err(err) => {
            tracing::warn!("An error occurred while fetching transcript: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_or_none_passes_fragments_through() {
        let mut source = MockTranscriptSource::new();
        source.expect_fetch_transcript().times(1).returning(|_| {
            Ok(vec![TranscriptFragment::new(
                "hello",
                Duration::ZERO,
                Duration::from_millis(1500),
            )])
        });

        let fragments = fetch_or_none(&source, "ABCDEFGHIJK").await.unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "hello");
    }

    #[tokio::test]
    async fn test_fetch_or_none_swallows_failures() {
        let mut source = MockTranscriptSource::new();
        source
            .expect_fetch_transcript()
            .times(1)
            .returning(|id| Err(TranscriptUnavailable::new(id, "captions disabled")));

        assert!(fetch_or_none(&source, "ABCDEFGHIJK").await.is_none());
    }

    #[test]
    fn test_unavailable_message_names_video() {
        let err = TranscriptUnavailable::new("ABCDEFGHIJK", "quota exceeded");
        assert_eq!(err.to_string(), "transcript unavailable for ABCDEFGHIJK: quota exceeded");
    }
}
