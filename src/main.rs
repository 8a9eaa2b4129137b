//! # YouTube News Feed
//!
//! Scrapes YouTube's news destination into categories of videos, enriches the
//! videos with statistics, descriptions and captions, and serves the result as
//! a JSON feed behind a small browser UI.
//!
//! ## Usage
//!
//! ```sh
//! yt_news_feed scrape
//! YOUTUBE_API_KEY=... yt_news_feed enrich
//! yt_news_feed serve --port 3001
//! ```
//!
//! ## Architecture
//!
//! The application is a chain of stages that hand JSON files to each other:
//! 1. **Scraping**: News page sections become categories of videos
//! 2. **Enrichment**: Per category, up to a batch cap of not-yet-processed
//!    videos get metadata and captions; processed ids are tracked on disk
//! 3. **Serving**: The enhanced dataset is served at `/api/videos`
//! 4. **Caption export**: Cleaned caption text per category and title

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregate;
mod captions;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod retry;
mod scrapers;
mod server;
mod sources;
mod tracker;
mod utils;

use cli::{CleanCaptionsArgs, Cli, Command, EnrichArgs, ScrapeArgs, ServeArgs};
use config::Settings;
use error::FeedError;
use pipeline::{EnrichOptions, EnrichmentPipeline};
use sources::transcript::TranscriptClient;
use sources::youtube_data::YouTubeDataClient;
use tracker::ProcessedTracker;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "yt_news_feed starting up");

    let cli = Cli::parse();
    debug!(?cli, "Parsed CLI arguments");

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Failed to load settings");
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Command::Scrape(args) => scrape(settings, args).await,
        Command::Enrich(args) => enrich(settings, args).await,
        Command::Serve(args) => serve(settings, args).await,
        Command::CleanCaptions(args) => clean_captions(settings, args).await,
    };

    let elapsed = start_time.elapsed();
    match &result {
        Ok(()) => info!(?elapsed, secs = elapsed.as_secs(), "Execution complete"),
        Err(e) => error!(?elapsed, error = %e, "Execution failed"),
    }
    result
}

#[instrument(level = "info", skip_all)]
async fn scrape(mut settings: Settings, args: ScrapeArgs) -> Result<(), Box<dyn Error>> {
    settings.apply_scrape(&args);

    let categories = match &args.html_file {
        Some(path) => scrapers::youtube::index_snapshot(path).await?,
        None => {
            let url = args.url.as_deref().unwrap_or(args.feed.url());
            info!(%url, "Scraping news feed");
            scrapers::youtube::index_categories(url, &settings.scrape_retry_policy()).await?
        }
    };

    outputs::json::write_categorized(&categories, &settings.input_path).await?;
    info!(
        categories = categories.len(),
        videos = categories.values().map(Vec::len).sum::<usize>(),
        path = %settings.input_path.display(),
        "Process completed successfully"
    );
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn enrich(mut settings: Settings, args: EnrichArgs) -> Result<(), Box<dyn Error>> {
    settings.apply_enrich(&args);

    // Fail fast on a missing key, before reading or fetching anything.
    let metadata = match YouTubeDataClient::new(settings.youtube_api_key.as_deref()) {
        Ok(client) => client,
        Err(e @ FeedError::MissingCredential) => {
            error!("YouTube API key not found in environment variables");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    let captions = TranscriptClient::new(settings.caption_languages.clone())?;

    ensure_writable_parent(&settings.output_path).await?;
    let dataset = outputs::json::read_categorized(&settings.input_path).await?;

    let pipeline = EnrichmentPipeline::new(
        &dataset,
        ProcessedTracker::new(&settings.processed_path),
        EnrichOptions::from(&settings),
        metadata,
        captions,
    );
    aggregate::run_enrichment(&pipeline, args.category.as_ref(), &settings.output_path).await?;
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn serve(mut settings: Settings, args: ServeArgs) -> Result<(), Box<dyn Error>> {
    settings.apply_serve(&args);

    let state = server::AppState::new(&settings.output_path);
    server::start_http_server(state, &settings.public_dir, settings.port).await?;
    Ok(())
}

#[instrument(level = "info", skip_all)]
async fn clean_captions(mut settings: Settings, args: CleanCaptionsArgs) -> Result<(), Box<dyn Error>> {
    settings.apply_clean_captions(&args);

    captions::extract_and_clean_captions(&settings.output_path, &settings.captions_path).await?;
    Ok(())
}
