//! Error type shared by every stage of the feed pipeline.
//!
//! Per-video problems never surface as errors; sources return `None` and the
//! enrichment loop logs and moves on. What remains here are the failures a
//! category run, a whole run, or a server request has to decide about.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by scraping, enrichment, persistence and configuration.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("YouTube API key not found (set YOUTUBE_API_KEY or pass --api-key)")]
    MissingCredential,

    #[error("Invalid category {selector}. Available categories: {available}")]
    InvalidCategory { selector: String, available: usize },

    #[error("No news sections found on the page")]
    NoSections,

    #[error("No videos found in any category")]
    NoVideos,

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Failed to access {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source error: {0}")]
    Source(String),

    #[error("All {attempts} attempts failed. Last error: {last}")]
    RetriesExhausted { attempts: u32, last: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// Wrap an I/O error with the file it concerns.
    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Errors that must end the whole run instead of just one category.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FeedError::MissingCredential | FeedError::Persistence { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
