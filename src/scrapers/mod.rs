//! News feed scrapers.
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | YouTube news destination | [`youtube`] | HTML scraping | General or business feed; sections become categories |
//!
//! A scraper exports:
//! - `index_categories(url, policy)`: Fetch the page under a retry policy and
//!   return [`crate::models::CategorizedVideos`]
//! - `index_snapshot(path)`: The same, from a saved rendered page

pub mod youtube;
