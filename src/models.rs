//! Data models for scraped videos, their enriched form, and the persisted files.
//!
//! This module defines the core data structures used throughout the application:
//! - [`VideoRecord`]: A video as scraped from the news feed (url, title, channel)
//! - [`EnhancedVideo`]: A video record merged with statistics, description and captions
//! - [`CategorizedVideos`] / [`EnhancedDataset`]: Category name to videos, in feed order
//! - [`ProcessedVideos`]: The persisted set of already-enriched video identifiers
//! - [`VideoDetails`] and friends: The subset of the YouTube Data API `videos`
//!   resource the enrichment step reads
//!
//! Field names follow the camelCase JSON consumed by the browser UI and produced
//! by the YouTube Data API.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

/// Scraped videos grouped by news category, in the order YouTube showed them.
pub type CategorizedVideos = IndexMap<String, Vec<VideoRecord>>;

/// Enriched videos grouped by news category; the file the feed server serves.
pub type EnhancedDataset = IndexMap<String, Vec<EnhancedVideo>>;

/// A video as scraped from the YouTube news feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VideoRecord {
    /// Watch URL, e.g. `https://www.youtube.com/watch?v=abc123`.
    pub url: String,
    /// Video title as displayed in the feed.
    pub title: String,
    /// Channel name; empty when the feed did not show one.
    #[serde(default)]
    pub channel: String,
}

impl VideoRecord {
    /// The video identifier carried in the `v` query parameter of the URL.
    ///
    /// Returns `None` for unparsable URLs and URLs without a non-empty `v`.
    pub fn video_id(&self) -> Option<String> {
        let parsed = Url::parse(&self.url).ok()?;
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
    }
}

/// A scraped video merged with the data fetched during enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedVideo {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub channel: String,
    /// View count as the decimal string the Data API returns.
    pub views: Option<String>,
    pub likes: Option<String>,
    pub comments: Option<String>,
    pub thumbnail: Option<String>,
    /// ISO-8601 duration, e.g. `PT4M13S`.
    pub duration: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub description: String,
    pub has_captions: bool,
    pub language: String,
    /// Transcript text; `None` when the caption fetch failed.
    pub captions: Option<String>,
}

impl EnhancedVideo {
    /// Merge a scraped record with its fetched details and transcript.
    pub fn merge(video: &VideoRecord, details: &VideoDetails, captions: Option<String>) -> Self {
        EnhancedVideo {
            url: video.url.clone(),
            title: video.title.clone(),
            channel: video.channel.clone(),
            views: details.statistics.view_count.clone(),
            likes: details.statistics.like_count.clone(),
            comments: details.statistics.comment_count.clone(),
            thumbnail: details.snippet.thumbnails.best_url(),
            duration: details.content_details.duration.clone(),
            published_at: details.snippet.published_at.clone(),
            description: details.snippet.description.clone(),
            has_captions: details.content_details.has_captions(),
            language: details.snippet.language(),
            captions,
        }
    }
}

/// Persisted record of which videos have already been enriched.
///
/// Serialized as `{ "processedVideos": { "<videoId>": "<ISO-8601>" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedVideos {
    #[serde(default)]
    pub processed_videos: IndexMap<String, String>,
}

impl ProcessedVideos {
    pub fn contains(&self, video_id: &str) -> bool {
        self.processed_videos.contains_key(video_id)
    }

    /// Record `video_id` as enriched at `timestamp`.
    pub fn mark(&mut self, video_id: impl Into<String>, timestamp: impl Into<String>) {
        self.processed_videos.insert(video_id.into(), timestamp.into());
    }

    pub fn len(&self) -> usize {
        self.processed_videos.len()
    }
}

/// Response envelope of the Data API `videos.list` call.
#[derive(Debug, Default, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoDetails>,
}

/// One item of a `videos.list` response with `snippet,statistics,contentDetails`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default)]
    pub snippet: Snippet,
    #[serde(default)]
    pub content_details: ContentDetails,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub thumbnails: Thumbnails,
    pub published_at: Option<String>,
    #[serde(default)]
    pub description: String,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
}

impl Snippet {
    /// `defaultLanguage`, then `defaultAudioLanguage`, then `"unknown"`.
    pub fn language(&self) -> String {
        self.default_language
            .as_deref()
            .or(self.default_audio_language.as_deref())
            .filter(|lang| !lang.is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Prefer the high resolution thumbnail, falling back to smaller ones.
    pub fn best_url(&self) -> Option<String> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    pub duration: Option<String>,
    /// `"true"` or `"false"`, as a string.
    pub caption: Option<String>,
}

impl ContentDetails {
    pub fn has_captions(&self) -> bool {
        self.caption.as_deref() == Some("true")
    }
}
