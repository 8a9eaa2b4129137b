//! Command-line interface definitions for the YouTube news feed.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every per-command option is optional: anything left unset falls back to
//! the YAML config file (when given) and then to the built-in defaults in
//! [`crate::config::Settings`].

use crate::pipeline::CategorySelector;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the YouTube news feed.
///
/// # Examples
///
/// ```sh
/// # Scrape the general news feed into youtube_news_videos.json
/// yt_news_feed scrape
///
/// # Enrich every category, five new videos per category
/// YOUTUBE_API_KEY=... yt_news_feed enrich
///
/// # Serve the enriched feed on port 3001
/// yt_news_feed serve
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape the YouTube news feed into categorized videos
    Scrape(ScrapeArgs),
    /// Enrich unprocessed videos with statistics, descriptions and captions
    Enrich(EnrichArgs),
    /// Serve the enriched dataset and the static feed UI
    Serve(ServeArgs),
    /// Export cleaned caption text per category and title
    CleanCaptions(CleanCaptionsArgs),
}

/// Which YouTube news destination to scrape.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Feed {
    #[default]
    General,
    Business,
}

impl Feed {
    pub fn url(self) -> &'static str {
        match self {
            Feed::General => "https://www.youtube.com/feed/news_destination",
            Feed::Business => "https://www.youtube.com/feed/news_destination/business",
        }
    }
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// News destination to scrape
    #[arg(long, value_enum, default_value_t = Feed::General)]
    pub feed: Feed,

    /// Explicit page URL, overriding --feed
    #[arg(long)]
    pub url: Option<String>,

    /// Parse a saved, already-rendered page instead of fetching one
    #[arg(long)]
    pub html_file: Option<PathBuf>,

    /// Where to write the categorized videos
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Categorized videos produced by `scrape`
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the enhanced dataset
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Processed-videos tracker file
    #[arg(long)]
    pub processed: Option<PathBuf>,

    /// Maximum number of newly enriched videos per category
    #[arg(long)]
    pub batch_cap: Option<usize>,

    /// Pause after each enriched video, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Preferred transcript language; repeat for fallbacks
    #[arg(long = "caption-language")]
    pub caption_languages: Vec<String>,

    /// Only enrich this category (index or exact name)
    #[arg(long)]
    pub category: Option<CategorySelector>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Enhanced dataset file served at /api/videos
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Directory of static UI files
    #[arg(long)]
    pub public_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CleanCaptionsArgs {
    /// Enhanced dataset to read captions from
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the cleaned captions
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrich_parsing() {
        let cli = Cli::parse_from([
            "yt_news_feed",
            "enrich",
            "--api-key",
            "KEY",
            "--batch-cap",
            "3",
            "--category",
            "1",
        ]);

        match cli.command {
            Command::Enrich(args) => {
                assert_eq!(args.api_key.as_deref(), Some("KEY"));
                assert_eq!(args.batch_cap, Some(3));
                assert_eq!(args.category, Some(CategorySelector::Index(1)));
                assert_eq!(args.delay_ms, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_category_by_name() {
        let cli = Cli::parse_from(["yt_news_feed", "enrich", "--category", "Election night"]);
        match cli.command {
            Command::Enrich(args) => assert_eq!(
                args.category,
                Some(CategorySelector::Name("Election night".to_string()))
            ),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag_and_feed() {
        let cli = Cli::parse_from([
            "yt_news_feed",
            "scrape",
            "--feed",
            "business",
            "-c",
            "settings.yaml",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
        match cli.command {
            Command::Scrape(args) => {
                assert_eq!(args.feed, Feed::Business);
                assert!(args.feed.url().ends_with("/business"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_serve_short_flags() {
        let cli = Cli::parse_from(["yt_news_feed", "serve", "-p", "8080", "--data", "feed.json"]);
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.data, Some(PathBuf::from("feed.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
