//! YouTube news feed scraper.
//!
//! The news destination page groups videos into sections, one per major story
//! of the day. Each `ytd-rich-section-renderer` becomes a category named after
//! its `#title-text`, holding the videos found inside it.
//!
//! The live page is assembled client-side, so a plain fetch may come back
//! without sections. That case is reported as [`FeedError::NoSections`] and
//! retried; a page rendered elsewhere (e.g. saved from a browser) can be
//! parsed directly with [`index_snapshot`].

use crate::error::{FeedError, Result};
use crate::models::{CategorizedVideos, VideoRecord};
use crate::retry::{RetryPolicy, with_retry};
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";
const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static SECTION: Lazy<Selector> = Lazy::new(|| selector("ytd-rich-section-renderer"));
static SECTION_TITLE: Lazy<Selector> = Lazy::new(|| selector("#title-text"));
static CONTAINER: Lazy<Selector> =
    Lazy::new(|| selector("ytd-rich-item-renderer, ytd-video-renderer"));
static THUMBNAIL_LINK: Lazy<Selector> = Lazy::new(|| selector(r#"a#thumbnail[href*="watch"]"#));
static VIDEO_TITLE: Lazy<Selector> = Lazy::new(|| selector("#video-title"));
static CHANNEL_NAME: Lazy<Selector> = Lazy::new(|| selector("#channel-name a, #text > a"));

fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn parse_video(container: ElementRef<'_>, base: &Url) -> Option<VideoRecord> {
    let anchor = container.select(&THUMBNAIL_LINK).next()?;
    let href = anchor.value().attr("href")?;
    let url = base.join(href).ok()?;
    let title = first_text(container, &VIDEO_TITLE)?;
    let channel = first_text(container, &CHANNEL_NAME).unwrap_or_default();

    Some(VideoRecord {
        url: url.to_string(),
        title,
        channel,
    })
}

/// Group the videos of a rendered news page by section title.
///
/// Sections without a title are ignored, duplicate URLs within a section are
/// dropped, and sections left without videos are removed.
pub fn parse_news_sections(html: &str) -> Result<CategorizedVideos> {
    let document = Html::parse_document(html);
    let base = Url::parse(YOUTUBE_BASE_URL).map_err(|e| FeedError::Source(e.to_string()))?;

    let mut categories = CategorizedVideos::new();
    let mut section_count = 0usize;

    for section in document.select(&SECTION) {
        section_count += 1;
        let Some(title) = first_text(section, &SECTION_TITLE) else {
            continue;
        };

        let videos = section
            .select(&CONTAINER)
            .filter_map(|container| parse_video(container, &base))
            .unique_by(|v| v.url.clone())
            .collect::<Vec<_>>();
        debug!(section = %title, count = videos.len(), "Parsed section");

        categories.entry(title).or_default().extend(videos);
    }

    if section_count == 0 {
        return Err(FeedError::NoSections);
    }

    categories.retain(|_, videos| !videos.is_empty());
    if categories.is_empty() {
        return Err(FeedError::NoVideos);
    }
    Ok(categories)
}

async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let html = client
        .get(url)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = html.len(), "Fetched news page");
    Ok(html)
}

/// Fetch and parse the news page, retrying per `policy`.
#[instrument(level = "info", skip(policy))]
pub async fn index_categories(url: &str, policy: &RetryPolicy) -> Result<CategorizedVideos> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(NAVIGATION_TIMEOUT)
        .build()?;
    let client = &client;

    let categories = with_retry(policy, "news page scrape", |_attempt| async move {
        let html = fetch_page(client, url).await?;
        parse_news_sections(&html)
    })
    .await?;

    info!(categories = categories.len(), "Found news categories");
    Ok(categories)
}

/// Parse a saved, already-rendered news page.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn index_snapshot(path: &Path) -> Result<CategorizedVideos> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| FeedError::persistence(path, e))?;
    let categories = parse_news_sections(&html)?;
    info!(categories = categories.len(), "Found news categories");
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body><div id="content">
  <ytd-rich-section-renderer>
    <span id="title-text"> Election results </span>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="/watch?v=aaa111"></a>
      <a id="video-title">Polls close in key states</a>
      <div id="channel-name"><a href="/@NewsOne">News One</a></div>
    </ytd-rich-item-renderer>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="/watch?v=aaa111"></a>
      <a id="video-title">Polls close in key states (again)</a>
    </ytd-rich-item-renderer>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="https://www.youtube.com/watch?v=bbb222"></a>
      <a id="video-title">Turnout explained</a>
      <div id="text"><a href="/@Desk">The Desk</a></div>
    </ytd-rich-item-renderer>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="/watch?v=ccc333"></a>
      <a id="video-title">   </a>
    </ytd-rich-item-renderer>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="/shorts/ddd444"></a>
      <a id="video-title">A short</a>
    </ytd-rich-item-renderer>
  </ytd-rich-section-renderer>
  <ytd-rich-section-renderer>
    <ytd-rich-item-renderer>
      <a id="thumbnail" href="/watch?v=eee555"></a>
      <a id="video-title">Untitled section video</a>
    </ytd-rich-item-renderer>
  </ytd-rich-section-renderer>
  <ytd-rich-section-renderer>
    <span id="title-text">Storm season</span>
    <ytd-video-renderer>
      <a id="thumbnail" href="/watch?v=fff666"></a>
      <a id="video-title">Hurricane makes landfall</a>
    </ytd-video-renderer>
  </ytd-rich-section-renderer>
  <ytd-rich-section-renderer>
    <span id="title-text">Empty story</span>
  </ytd-rich-section-renderer>
</div></body></html>"#;

    #[test]
    fn test_parse_sections() {
        let categories = parse_news_sections(PAGE).unwrap();
        let names: Vec<&String> = categories.keys().collect();
        assert_eq!(names, vec!["Election results", "Storm season"]);

        let election = &categories["Election results"];
        assert_eq!(election.len(), 2);
        assert_eq!(election[0].url, "https://www.youtube.com/watch?v=aaa111");
        assert_eq!(election[0].title, "Polls close in key states");
        assert_eq!(election[0].channel, "News One");
        assert_eq!(election[1].channel, "The Desk");

        let storm = &categories["Storm season"];
        assert_eq!(storm[0].channel, "");
        assert_eq!(storm[0].video_id().as_deref(), Some("fff666"));
    }

    #[test]
    fn test_page_without_sections() {
        let err = parse_news_sections("<html><body><div id=\"content\"></div></body></html>")
            .unwrap_err();
        assert!(matches!(err, FeedError::NoSections));
    }

    #[test]
    fn test_sections_without_videos() {
        let html = r#"<ytd-rich-section-renderer><span id="title-text">Nothing</span></ytd-rich-section-renderer>"#;
        assert!(matches!(
            parse_news_sections(html).unwrap_err(),
            FeedError::NoVideos
        ));
    }

    #[tokio::test]
    async fn test_index_snapshot() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("news.html");
        std::fs::write(&path, PAGE).unwrap();

        let categories = index_snapshot(&path).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert!(crate::outputs::json::validate_categorized(&categories).is_ok());
    }
}
