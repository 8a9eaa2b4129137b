//! Category-scoped incremental enrichment.
//!
//! One [`EnrichmentPipeline::process_category`] call walks a single category in
//! feed order and enriches at most `batch_cap` videos that have not been
//! enriched by an earlier run:
//!
//! 1. Resolve the category, failing with [`FeedError::InvalidCategory`].
//! 2. Load the processed-videos set (empty if missing or unreadable).
//! 3. For each video: derive its id, skip ids already processed, fetch
//!    metadata and captions concurrently, and drop videos the API does not
//!    know or that have no captions. Those stay unmarked so a later run can
//!    retry them.
//! 4. Merge each kept video, mark it processed, persist the set immediately,
//!    then pause for `item_delay` before the next one.
//!
//! Per-video failures are logged and skipped. Only persistence failures escape.

use crate::config::Settings;
use crate::error::{FeedError, Result};
use crate::models::{CategorizedVideos, EnhancedDataset, EnhancedVideo, ProcessedVideos, VideoRecord};
use crate::sources::{CaptionSource, MetadataSource};
use crate::tracker::ProcessedTracker;
use chrono::{SecondsFormat, Utc};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Which category of the dataset to enrich.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    /// Position in feed order, starting at 0.
    Index(usize),
    /// Exact category name.
    Name(String),
}

impl FromStr for CategorySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.parse::<usize>() {
            Ok(index) => CategorySelector::Index(index),
            Err(_) => CategorySelector::Name(s.to_string()),
        })
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategorySelector::Index(i) => write!(f, "index {i}"),
            CategorySelector::Name(name) => write!(f, "\"{name}\""),
        }
    }
}

/// Limits applied to every category run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichOptions {
    /// Maximum newly enriched videos per call.
    pub batch_cap: usize,
    /// Pause after each successful enrichment.
    pub item_delay: Duration,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            batch_cap: 5,
            item_delay: Duration::from_millis(2000),
        }
    }
}

impl From<&Settings> for EnrichOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            batch_cap: settings.batch_cap,
            item_delay: settings.item_delay(),
        }
    }
}

/// Everything one enrichment run needs, passed explicitly to each stage.
pub struct EnrichmentPipeline<'a, M, C> {
    dataset: &'a CategorizedVideos,
    tracker: ProcessedTracker,
    options: EnrichOptions,
    metadata: M,
    captions: C,
}

impl<'a, M, C> EnrichmentPipeline<'a, M, C>
where
    M: MetadataSource,
    C: CaptionSource,
{
    pub fn new(
        dataset: &'a CategorizedVideos,
        tracker: ProcessedTracker,
        options: EnrichOptions,
        metadata: M,
        captions: C,
    ) -> Self {
        Self {
            dataset,
            tracker,
            options,
            metadata,
            captions,
        }
    }

    pub fn dataset(&self) -> &'a CategorizedVideos {
        self.dataset
    }

    /// Resolve a selector to the category's name and videos.
    pub fn resolve(&self, selector: &CategorySelector) -> Result<(&'a str, &'a [VideoRecord])> {
        let dataset: &'a CategorizedVideos = self.dataset;
        let found = match selector {
            CategorySelector::Index(i) => dataset.get_index(*i),
            CategorySelector::Name(name) => dataset.get_key_value(name.as_str()),
        };
        found
            .map(|(name, videos)| (name.as_str(), videos.as_slice()))
            .ok_or_else(|| FeedError::InvalidCategory {
                selector: selector.to_string(),
                available: dataset.len(),
            })
    }

    /// Enrich up to `batch_cap` unprocessed videos of one category.
    ///
    /// The returned fragment always contains the category, possibly with an
    /// empty list.
    #[instrument(level = "info", skip(self), fields(category = tracing::field::Empty))]
    pub async fn process_category(&self, selector: &CategorySelector) -> Result<EnhancedDataset> {
        let (category, videos) = self.resolve(selector)?;
        tracing::Span::current().record("category", category);
        info!(videos = videos.len(), "Processing category");

        let mut processed = self.tracker.load().await;
        let mut enriched = Vec::new();

        for video in videos {
            if enriched.len() >= self.options.batch_cap {
                break;
            }

            let Some(video_id) = video.video_id() else {
                warn!(url = %video.url, "Invalid video URL");
                continue;
            };
            if processed.contains(&video_id) {
                debug!(%video_id, title = %video.title, "Skipping already processed video");
                continue;
            }

            let Some(enhanced) = self.enrich_video(video, &video_id).await else {
                continue;
            };
            enriched.push(enhanced);

            self.mark_processed(&mut processed, &video_id).await?;
            info!(%video_id, title = %video.title, "Successfully enhanced video");

            if !self.options.item_delay.is_zero() {
                sleep(self.options.item_delay).await;
            }
        }

        info!(enriched = enriched.len(), "Category done");
        let mut fragment = EnhancedDataset::new();
        fragment.insert(category.to_string(), enriched);
        Ok(fragment)
    }

    /// Fetch and merge one video; `None` means skip it and leave it unmarked.
    async fn enrich_video(&self, video: &VideoRecord, video_id: &str) -> Option<EnhancedVideo> {
        debug!(%video_id, title = %video.title, "Fetching details for video");
        let (details, captions) = futures::join!(
            self.metadata.fetch_details(video_id),
            self.captions.fetch_captions(video_id)
        );

        let details = match details {
            Ok(Some(details)) => details,
            Ok(None) => {
                warn!(%video_id, "No metadata for video; skipping");
                return None;
            }
            Err(e) => {
                error!(%video_id, title = %video.title, error = %e, "Error processing video");
                return None;
            }
        };

        if !details.content_details.has_captions() {
            debug!(%video_id, "Video has no captions; leaving it for a later run");
            return None;
        }

        Some(EnhancedVideo::merge(video, &details, captions))
    }

    async fn mark_processed(&self, processed: &mut ProcessedVideos, video_id: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        processed.mark(video_id, now);
        self.tracker.save(processed).await
    }
}
