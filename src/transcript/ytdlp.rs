use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use super::{TranscriptFragment, TranscriptSource, TranscriptUnavailable};
use crate::config::TranscriptConfig;
use crate::extractors::watch_url;
use crate::Result;

/// Caption file format requested from yt-dlp
const SUBTITLE_FORMAT: &str = "json3";

/// Transcript source that downloads caption tracks with yt-dlp
pub struct YtDlpTranscriptSource {
    yt_dlp_path: String,
    languages: Vec<String>,
}

/// yt-dlp json3 caption document
#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

impl YtDlpTranscriptSource {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            yt_dlp_path: config.yt_dlp_path.clone(),
            languages: config.languages.clone(),
        }
    }

    /// Download the caption track into `dir` and return its path
    async fn download_captions(&self, video_id: &str, dir: &Path) -> Result<PathBuf> {
        tracing::debug!("Downloading captions for: {}", video_id);

        let output_template = dir.join("%(id)s.%(ext)s");
        let languages = self.languages.join(",");
        let url = watch_url(video_id);

        let output = Command::new(&self.yt_dlp_path)
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-langs",
                &languages,
                "--sub-format",
                SUBTITLE_FORMAT,
                "--no-playlist",
                "--output",
                &output_template.to_string_lossy(),
                &url,
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("yt-dlp failed: {}", error.trim());
        }

        self.pick_caption_file(dir)?
            .ok_or_else(|| anyhow::anyhow!("no captions available"))
    }

    /// Choose the caption file for the most preferred language
    fn pick_caption_file(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs_err::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == SUBTITLE_FORMAT) {
                files.push(path);
            }
        }
        files.sort();

        for language in &self.languages {
            let suffix = format!(".{}.{}", language, SUBTITLE_FORMAT);
            if let Some(path) = files
                .iter()
                .find(|p| p.to_string_lossy().ends_with(&suffix))
            {
                return Ok(Some(path.clone()));
            }
        }

        Ok(files.into_iter().next())
    }
}

/// Parse a json3 caption document into ordered fragments
pub fn parse_json3(content: &str) -> Result<Vec<TranscriptFragment>> {
    let document: Json3Document = serde_json::from_str(content)?;

    let mut fragments: Vec<TranscriptFragment> = document
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs?.into_iter().map(|seg| seg.utf8).collect();
            if text.trim().is_empty() {
                return None;
            }
            Some(TranscriptFragment::new(
                text,
                Duration::from_millis(event.start_ms),
                Duration::from_millis(event.duration_ms),
            ))
        })
        .collect();

    fragments.sort_by_key(|fragment| fragment.start_offset);
    Ok(fragments)
}

#[async_trait]
impl TranscriptSource for YtDlpTranscriptSource {
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptFragment>, TranscriptUnavailable> {
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| TranscriptUnavailable::new(video_id, e))?;

        let caption_path = self
            .download_captions(video_id, temp_dir.path())
            .await
            .map_err(|e| TranscriptUnavailable::new(video_id, format!("{:#}", e)))?;

        let content = fs_err::read_to_string(&caption_path)
            .map_err(|e| TranscriptUnavailable::new(video_id, e))?;

        let fragments = parse_json3(&content)
            .map_err(|e| TranscriptUnavailable::new(video_id, format!("unreadable captions: {}", e)))?;

        if fragments.is_empty() {
            return Err(TranscriptUnavailable::new(video_id, "caption track is empty"));
        }

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json3_joins_segments() {
        let json = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "1. "}, {"utf8": "Preheat"}]},
                {"tStartMs": 2000, "dDurationMs": 10, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 2100, "dDurationMs": 1500}
            ]
        }"#;

        let fragments = parse_json3(json).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "1. Preheat");
        assert_eq!(fragments[0].duration, Duration::from_secs(2));
    }

    #[test]
    fn test_parse_json3_orders_by_start() {
        let json = r#"{"events": [
            {"tStartMs": 5000, "dDurationMs": 1000, "segs": [{"utf8": "second"}]},
            {"tStartMs": 1000, "dDurationMs": 1000, "segs": [{"utf8": "first"}]}
        ]}"#;

        let texts: Vec<String> = parse_json3(json)
            .unwrap()
            .into_iter()
            .map(|f| f.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_parse_json3_rejects_garbage() {
        assert!(parse_json3("<html>").is_err());
    }

    #[test]
    fn test_pick_caption_file_prefers_language_order() {
        let dir = tempfile::TempDir::new().unwrap();
        fs_err::write(dir.path().join("ABCDEFGHIJK.de.json3"), "{}").unwrap();
        fs_err::write(dir.path().join("ABCDEFGHIJK.en.json3"), "{}").unwrap();
        fs_err::write(dir.path().join("notes.txt"), "").unwrap();

        let source = YtDlpTranscriptSource {
            yt_dlp_path: "yt-dlp".to_string(),
            languages: vec!["en".to_string(), "de".to_string()],
        };

        let picked = source.pick_caption_file(dir.path()).unwrap().unwrap();
        assert!(picked.ends_with("ABCDEFGHIJK.en.json3"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let source = YtDlpTranscriptSource {
            yt_dlp_path: "definitely-not-a-real-yt-dlp-binary".to_string(),
            languages: vec!["en".to_string()],
        };

        let err = source.fetch_transcript("ABCDEFGHIJK").await.unwrap_err();
        assert_eq!(err.video_id, "ABCDEFGHIJK");
    }
}
