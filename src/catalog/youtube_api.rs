use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use super::{CatalogClient, SearchHit, SearchOrder, VideoDetails};
use crate::config::YoutubeConfig;
use crate::extractors::watch_url;
use crate::utils::parse_iso8601_duration;
use crate::DigestError;

/// Catalog client for the YouTube Data API v3
pub struct YoutubeDataApi {
    client: Client,
    api_key: Option<String>,
    api_base_url: String,
    oembed_url: String,
}

// ============================================================================
// Data API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    title: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
    #[serde(rename = "contentDetails")]
    content_details: ContentDetails,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(rename = "publishedAt")]
    published_at: String,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: String,
}

impl YoutubeDataApi {
    pub fn new(config: &YoutubeConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            oembed_url: config.oembed_url.clone(),
        }
    }

    fn api_key(&self) -> Result<&str, DigestError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| DigestError::catalog("no YouTube API key configured"))
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, DigestError> {
        let key = self.api_key()?;
        let base = format!("{}/{}", self.api_base_url, resource);
        Url::parse_with_params(&base, params.iter().copied().chain([("key", key)]))
            .map_err(|e| DigestError::catalog(format!("invalid endpoint {}: {}", base, e)))
    }

    /// Issue a GET request and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, DigestError> {
        tracing::debug!("GET {}", redact_key(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DigestError::catalog(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DigestError::catalog(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(DigestError::catalog(format!("HTTP {}: {}", status, message)));
        }

        serde_json::from_str(&body)
            .map_err(|e| DigestError::catalog(format!("unexpected response: {}", e)))
    }
}

/// Strip the credential from a URL before logging it
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let value = if k == "key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

fn into_details(video_id: &str, item: VideoItem) -> Result<VideoDetails, DigestError> {
    let published_at = DateTime::parse_from_rfc3339(&item.snippet.published_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DigestError::catalog(format!("bad publishedAt for {}: {}", video_id, e))
        })?;

    let duration = parse_iso8601_duration(&item.content_details.duration).unwrap_or_else(|| {
        tracing::warn!(
            "Unrecognised duration {:?} for {}",
            item.content_details.duration,
            video_id
        );
        chrono::Duration::zero()
    });

    // Channels can hide their view counts
    let view_count = item
        .statistics
        .view_count
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(VideoDetails {
        published_at,
        channel_title: item.snippet.channel_title,
        duration,
        view_count,
    })
}

#[async_trait]
impl CatalogClient for YoutubeDataApi {
    async fn search(
        &self,
        query: &str,
        order: SearchOrder,
        limit: u32,
    ) -> Result<Vec<SearchHit>, DigestError> {
        tracing::info!("Searching for {:?} ordered by {}", query, order.as_str());

        let limit = limit.to_string();
        let url = self.endpoint(
            "search",
            &[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("order", order.as_str()),
                ("maxResults", limit.as_str()),
            ],
        )?;

        let response: SearchResponse = self.get_json(url).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                Some(SearchHit {
                    video_id: item.id.video_id?,
                    title: item.snippet.title,
                })
            })
            .collect())
    }

    async fn video_details(&self, video_id: &str) -> Result<VideoDetails, DigestError> {
        let url = self.endpoint(
            "videos",
            &[("part", "snippet,contentDetails,statistics"), ("id", video_id)],
        )?;

        let response: VideosResponse = self.get_json(url).await?;
        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| DigestError::catalog(format!("no details found for {}", video_id)))?;

        into_details(video_id, item)
    }

    async fn video_title(&self, video_id: &str) -> Result<String, DigestError> {
        let url = format!(
            "{}?url={}&format=json",
            self.oembed_url,
            urlencoding::encode(&watch_url(video_id))
        );
        let url = Url::parse(&url)
            .map_err(|e| DigestError::catalog(format!("invalid oEmbed URL: {}", e)))?;

        let response: OEmbedResponse = self.get_json(url).await?;
        Ok(response.title)
    }
}
