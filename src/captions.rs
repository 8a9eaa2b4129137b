//! Caption text cleanup and the cleaned-captions export.

use crate::error::Result;
use crate::models::EnhancedDataset;
use crate::outputs::json;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::{info, instrument};

/// Cleaned captions keyed by category, then by video title.
pub type CleanedCaptions = IndexMap<String, IndexMap<String, String>>;

// Transcripts arrive escaped once or twice.
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;#39;|&#39;|&amp;quot;|&quot;").expect("static regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Decode the quote entities transcripts arrive with, collapse whitespace, trim.
///
/// Idempotent: the replacements never contain `&` or whitespace, so a second
/// pass finds nothing left to change.
pub fn clean_caption(caption: &str) -> String {
    let decoded = ENTITY_RE.replace_all(caption, |caps: &regex::Captures| {
        if caps[0].ends_with("#39;") { "'" } else { "\"" }
    });
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

/// Cleaned captions of every captioned video, dropping categories left empty.
pub fn clean_dataset_captions(data: &EnhancedDataset) -> CleanedCaptions {
    let mut cleaned = CleanedCaptions::new();
    for (category, videos) in data {
        let entries: IndexMap<String, String> = videos
            .iter()
            .filter_map(|v| {
                v.captions
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .map(|c| (v.title.clone(), clean_caption(c)))
            })
            .collect();
        if !entries.is_empty() {
            cleaned.insert(category.clone(), entries);
        }
    }
    cleaned
}

/// Read the enhanced dataset at `input` and write its cleaned captions to `output`.
#[instrument(level = "info", skip_all, fields(input = %input.display(), output = %output.display()))]
pub async fn extract_and_clean_captions(input: &Path, output: &Path) -> Result<CleanedCaptions> {
    let data = json::read_enhanced(input).await?;
    let cleaned = clean_dataset_captions(&data);

    json::write_json(&cleaned, output).await?;

    info!(categories = cleaned.len(), "Cleaned captions saved");
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnhancedVideo;
    use tempfile::TempDir;

    fn video(title: &str, captions: Option<&str>) -> EnhancedVideo {
        EnhancedVideo {
            url: format!("https://www.youtube.com/watch?v={title}"),
            title: title.to_string(),
            channel: "Channel".to_string(),
            views: Some("1".to_string()),
            likes: None,
            comments: None,
            thumbnail: None,
            duration: Some("PT1M".to_string()),
            published_at: None,
            description: String::new(),
            has_captions: true,
            language: "en".to_string(),
            captions: captions.map(str::to_string),
        }
    }

    #[test]
    fn test_clean_caption_decodes_and_collapses() {
        assert_eq!(
            clean_caption("  it&amp;#39;s\n\n a  &quot;big&quot;\tday "),
            "it's a \"big\" day"
        );
        assert_eq!(clean_caption("don&#39;t"), "don't");
        assert_eq!(clean_caption("&amp;quot;quoted&amp;quot;"), "\"quoted\"");
    }

    #[test]
    fn test_clean_caption_leaves_other_entities() {
        assert_eq!(clean_caption("Q&amp;A"), "Q&amp;A");
        assert_eq!(clean_caption(""), "");
        assert_eq!(clean_caption(" \n\t "), "");
    }

    #[test]
    fn test_clean_caption_is_idempotent() {
        let corpus = [
            "",
            "plain",
            "   leading and trailing   ",
            "&amp;amp;#39;",
            "&&#39;#39;",
            "&amp;#39;&#39;&quot;&amp;quot;",
            "&#3&#39;9;",
            "&amp;&#39;#39;",
            "line\r\nbreak\u{00a0}nbsp\u{2003}em",
            "&quot; &quot;  &quot;",
            "multi\n\n\nline\n\tcaption &amp;#39; text",
            "&amp;#39",
            "ünïcödé   ☃  &#39;",
        ];
        for input in corpus {
            let once = clean_caption(input);
            assert_eq!(clean_caption(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_clean_dataset_drops_uncaptioned_and_empty_categories() {
        let mut data = EnhancedDataset::new();
        data.insert(
            "Storm".to_string(),
            vec![video("a", Some("wind&#39;s  up")), video("b", None)],
        );
        data.insert("Quiet".to_string(), vec![video("c", None), video("d", Some(""))]);

        let cleaned = clean_dataset_captions(&data);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned["Storm"].len(), 1);
        assert_eq!(cleaned["Storm"]["a"], "wind's up");
    }

    #[tokio::test]
    async fn test_extract_and_clean_captions_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("enhanced.json");
        let output = dir.path().join("exports").join("cleaned.json");

        let mut data = EnhancedDataset::new();
        data.insert("Storm".to_string(), vec![video("a", Some(" hello\nworld "))]);
        json::write_enhanced(&data, &input).await.unwrap();

        extract_and_clean_captions(&input, &output).await.unwrap();

        let written: CleanedCaptions =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["Storm"]["a"], "hello world");
    }
}
