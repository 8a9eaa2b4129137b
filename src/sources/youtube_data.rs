//! YouTube Data API v3 client for video metadata.

use super::MetadataSource;
use crate::error::{FeedError, Result};
use crate::models::{VideoDetails, VideoListResponse};
use crate::utils::truncate_for_log;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Calls `videos.list` with an API key.
#[derive(Debug, Clone)]
pub struct YouTubeDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeDataClient {
    /// Build a client, failing with [`FeedError::MissingCredential`] when no
    /// usable key was configured.
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(FeedError::MissingCredential)?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: YOUTUBE_API_BASE_URL.to_string(),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn videos_url(&self) -> String {
        format!("{}/videos", self.base_url.trim_end_matches('/'))
    }
}

impl MetadataSource for YouTubeDataClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch_details(&self, video_id: &str) -> Result<Option<VideoDetails>> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(self.videos_url())
            .query(&[
                ("part", VIDEO_PARTS),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Source(format!(
                "videos.list returned {status}: {}",
                truncate_for_log(&body, 300)
            )));
        }

        let list: VideoListResponse = response.json().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            items = list.items.len(),
            "videos.list answered"
        );

        let details = list.items.into_iter().next();
        if details.is_none() {
            warn!(%video_id, "No data found for video ID");
        }
        Ok(details)
    }
}
