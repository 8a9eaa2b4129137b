//! JSON files exchanged between the stages.
//!
//! # Files
//!
//! ```text
//! youtube_news_videos.json           # scrape -> enrich   (CategorizedVideos)
//! enhanced_youtube_news_videos.json  # enrich -> serve    (EnhancedDataset)
//! ```
//!
//! Both are pretty-printed objects keyed by category name, in feed order.

use crate::error::{FeedError, Result};
use crate::models::{CategorizedVideos, EnhancedDataset};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| FeedError::persistence(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretty-print `value` to `path`, creating the parent directory first.
pub(crate) async fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| FeedError::persistence(parent, e))?;
    }
    fs::write(path, json)
        .await
        .map_err(|e| FeedError::persistence(path, e))
}

/// Read the scraper's categorized videos.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_categorized(path: &Path) -> Result<CategorizedVideos> {
    let data: CategorizedVideos = read_json(path).await?;
    info!(categories = data.len(), "Loaded categorized videos");
    Ok(data)
}

/// Check the shape of scraped data before it is written.
///
/// The dataset must be non-empty, every category name non-blank, and every
/// video must carry a title and a YouTube watch URL.
pub fn validate_categorized(data: &CategorizedVideos) -> Result<()> {
    if data.is_empty() {
        return Err(FeedError::InvalidDataset("data object is empty".to_string()));
    }
    for (category, videos) in data {
        if category.trim().is_empty() {
            return Err(FeedError::InvalidDataset(
                "invalid category name found".to_string(),
            ));
        }
        for (index, video) in videos.iter().enumerate() {
            if video.url.is_empty() || video.title.is_empty() {
                return Err(FeedError::InvalidDataset(format!(
                    "invalid video data in category \"{category}\" at index {index}"
                )));
            }
            if !video.url.starts_with(WATCH_URL_PREFIX) {
                return Err(FeedError::InvalidDataset(format!(
                    "invalid YouTube URL in category \"{category}\" at index {index}"
                )));
            }
        }
    }
    Ok(())
}

/// Validate and write categorized videos, then re-read the file to verify it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_categorized(data: &CategorizedVideos, path: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(FeedError::InvalidDataset(
            "filename must have .json extension".to_string(),
        ));
    }
    validate_categorized(data)?;

    write_json(data, path).await?;
    let _: CategorizedVideos = read_json(path).await.map_err(|e| {
        FeedError::InvalidDataset(format!("failed to verify saved JSON file: {e}"))
    })?;

    info!(categories = data.len(), "Data saved");
    Ok(())
}

/// Read the enhanced dataset.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_enhanced(path: &Path) -> Result<EnhancedDataset> {
    read_json(path).await
}

/// Write the enhanced dataset in one go.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_enhanced(data: &EnhancedDataset, path: &Path) -> Result<()> {
    write_json(data, path).await?;
    info!(
        categories = data.len(),
        videos = data.values().map(Vec::len).sum::<usize>(),
        "Enhanced data saved"
    );
    Ok(())
}
