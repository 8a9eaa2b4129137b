//! Runtime settings: built-in defaults, an optional YAML file, then CLI/env overrides.

use crate::cli::{CleanCaptionsArgs, EnrichArgs, ScrapeArgs, ServeArgs};
use crate::error::{FeedError, Result};
use crate::retry::{RetryPolicy, RetrySettings};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Every tunable of the scrape, enrich and serve stages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub youtube_api_key: Option<String>,
    /// Maximum newly enriched videos per category per run.
    pub batch_cap: usize,
    /// Pause after each successful enrichment, in milliseconds.
    pub item_delay_ms: u64,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub processed_path: PathBuf,
    pub captions_path: PathBuf,
    pub public_dir: PathBuf,
    pub port: u16,
    pub scrape_retry: RetrySettings,
    /// Transcript languages, most preferred first.
    pub caption_languages: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            batch_cap: 5,
            item_delay_ms: 2000,
            input_path: PathBuf::from("youtube_news_videos.json"),
            output_path: PathBuf::from("enhanced_youtube_news_videos.json"),
            processed_path: PathBuf::from("processed_videos.json"),
            captions_path: PathBuf::from("cleaned_captions.json"),
            public_dir: PathBuf::from("public"),
            port: 3001,
            scrape_retry: RetrySettings::default(),
            caption_languages: vec!["en".to_string()],
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the YAML file at `path` when one is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| FeedError::Config(format!("{}: {e}", path.display())))?;
        let settings = Self::from_yaml(&text)
            .map_err(|e| FeedError::Config(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    pub fn from_yaml(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    pub fn scrape_retry_policy(&self) -> RetryPolicy {
        self.scrape_retry.into()
    }

    pub fn apply_scrape(&mut self, args: &ScrapeArgs) {
        if let Some(output) = &args.output {
            self.input_path = output.clone();
        }
    }

    pub fn apply_enrich(&mut self, args: &EnrichArgs) {
        if let Some(key) = &args.api_key {
            self.youtube_api_key = Some(key.clone());
        }
        if let Some(input) = &args.input {
            self.input_path = input.clone();
        }
        if let Some(output) = &args.output {
            self.output_path = output.clone();
        }
        if let Some(processed) = &args.processed {
            self.processed_path = processed.clone();
        }
        if let Some(cap) = args.batch_cap {
            self.batch_cap = cap;
        }
        if let Some(delay) = args.delay_ms {
            self.item_delay_ms = delay;
        }
        if !args.caption_languages.is_empty() {
            self.caption_languages = args.caption_languages.clone();
        }
    }

    pub fn apply_serve(&mut self, args: &ServeArgs) {
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(data) = &args.data {
            self.output_path = data.clone();
        }
        if let Some(dir) = &args.public_dir {
            self.public_dir = dir.clone();
        }
    }

    pub fn apply_clean_captions(&mut self, args: &CleanCaptionsArgs) {
        if let Some(input) = &args.input {
            self.output_path = input.clone();
        }
        if let Some(output) = &args.output {
            self.captions_path = output.clone();
        }
    }
}
