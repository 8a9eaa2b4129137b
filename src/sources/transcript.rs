//! Caption retrieval through the public transcript endpoints.
//!
//! `yt-transcript-rs` resolves the caption tracks of a video and returns the
//! transcript as timed snippets. The snippets of the first track matching the
//! configured languages are joined with single spaces. Failures are logged and
//! reported as `None`.

use super::CaptionSource;
use crate::error::{FeedError, Result};
use tracing::{debug, instrument, warn};
use yt_transcript_rs::api::YouTubeTranscriptApi;

/// Fetches transcripts in order of language preference.
pub struct TranscriptClient {
    api: YouTubeTranscriptApi,
    languages: Vec<String>,
}

impl TranscriptClient {
    pub fn new(languages: Vec<String>) -> Result<Self> {
        // No cookies, proxy or custom HTTP client.
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| FeedError::Source(format!("transcript client: {e}")))?;
        Ok(Self { api, languages })
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<Option<String>> {
        let languages: Vec<&str> = self.languages.iter().map(String::as_str).collect();
        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| FeedError::Source(e.to_string()))?;
        debug!(
            %video_id,
            language = %transcript.language_code,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        let text = join_snippets(transcript.snippets.iter().map(|s| s.text.as_str()));
        Ok((!text.is_empty()).then_some(text))
    }
}

impl CaptionSource for TranscriptClient {
    #[instrument(level = "info", skip(self))]
    async fn fetch_captions(&self, video_id: &str) -> Option<String> {
        match self.fetch_transcript(video_id).await {
            Ok(captions) => captions,
            Err(e) => {
                warn!(%video_id, error = %e, "Error fetching captions");
                None
            }
        }
    }
}

/// Join snippet texts with single spaces, dropping blank snippets.
fn join_snippets<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    texts
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
