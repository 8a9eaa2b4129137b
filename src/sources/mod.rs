//! External providers consulted while enriching a video.
//!
//! The enrichment pipeline only sees the two traits below, so tests can swap
//! in canned sources and the production clients stay thin.
//!
//! | Source | Trait | Client |
//! |--------|-------|--------|
//! | YouTube Data API v3 `videos.list` | [`MetadataSource`] | [`youtube_data::YouTubeDataClient`] |
//! | Watch page caption tracks | [`CaptionSource`] | [`transcript::TranscriptClient`] |

use crate::error::Result;
use crate::models::VideoDetails;

pub mod transcript;
pub mod youtube_data;

/// Fetches statistics, snippet and content details for a video.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    /// `Ok(None)` when the provider has no data for `video_id`.
    async fn fetch_details(&self, video_id: &str) -> Result<Option<VideoDetails>>;
}

/// Fetches the transcript text of a video.
#[allow(async_fn_in_trait)]
pub trait CaptionSource {
    /// The whole transcript joined with spaces, or `None` on any failure.
    async fn fetch_captions(&self, video_id: &str) -> Option<String>;
}
