//! Aggregation over every category of the scraped dataset.
//!
//! Categories run one after another so they share the API quota and the
//! processed-videos file without contention. A category that fails for its
//! own reasons is logged and skipped; a fatal error (a tracker that cannot be
//! written) stops the run. The merged dataset is written once, at the end, so
//! an interrupted run keeps its processed markers but loses its merged output.

use crate::error::Result;
use crate::models::EnhancedDataset;
use crate::outputs::json;
use crate::pipeline::{CategorySelector, EnrichmentPipeline};
use crate::sources::{CaptionSource, MetadataSource};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Run the pipeline for each category in dataset order and merge the fragments.
#[instrument(level = "info", skip_all)]
pub async fn enrich_all_categories<M, C>(
    pipeline: &EnrichmentPipeline<'_, M, C>,
) -> Result<EnhancedDataset>
where
    M: MetadataSource,
    C: CaptionSource,
{
    let total = pipeline.dataset().len();
    let mut merged = EnhancedDataset::new();

    for index in 0..total {
        info!(category = index + 1, total, "Processing category");
        match pipeline
            .process_category(&CategorySelector::Index(index))
            .await
        {
            Ok(fragment) => merged.extend(fragment),
            Err(e) if e.is_fatal() => {
                error!(index, error = %e, "Fatal error; stopping enrichment run");
                return Err(e);
            }
            Err(e) => error!(index, error = %e, "Category failed; continuing"),
        }
    }

    Ok(merged)
}

/// Enrich all categories (or just `only`) and write the result to `output`.
#[instrument(level = "info", skip(pipeline, output), fields(output = %output.display()))]
pub async fn run_enrichment<M, C>(
    pipeline: &EnrichmentPipeline<'_, M, C>,
    only: Option<&CategorySelector>,
    output: &Path,
) -> Result<EnhancedDataset>
where
    M: MetadataSource,
    C: CaptionSource,
{
    let t0 = Instant::now();
    let enhanced = match only {
        Some(selector) => pipeline.process_category(selector).await?,
        None => enrich_all_categories(pipeline).await?,
    };

    json::write_enhanced(&enhanced, output).await?;
    info!(
        categories = enhanced.len(),
        videos = enhanced.values().map(Vec::len).sum::<usize>(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Completed processing all categories"
    );
    Ok(enhanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::models::CategorizedVideos;
    use crate::pipeline::tests::{FakeCaptions, FakeMetadata, instant, record};
    use crate::tracker::ProcessedTracker;
    use tempfile::TempDir;

    fn data() -> CategorizedVideos {
        let mut data = CategorizedVideos::new();
        data.insert("First".to_string(), vec![record("a"), record("b")]);
        data.insert("Second".to_string(), vec![record("c")]);
        data.insert("Third".to_string(), vec![record("d"), record("e")]);
        data
    }

    #[tokio::test]
    async fn test_merges_categories_in_order() {
        let dir = TempDir::new().unwrap();
        let data = data();
        let meta = FakeMetadata::with(&[
            ("a", true),
            ("b", false),
            ("c", true),
            ("d", true),
            ("e", true),
        ]);
        let pipeline = EnrichmentPipeline::new(
            &data,
            ProcessedTracker::new(dir.path().join("processed.json")),
            instant(),
            meta,
            FakeCaptions::default(),
        );

        let merged = enrich_all_categories(&pipeline).await.unwrap();
        let names: Vec<&String> = merged.keys().collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert_eq!(merged["First"].len(), 1);
        assert_eq!(merged["Third"].len(), 2);
    }

    #[tokio::test]
    async fn test_failing_videos_do_not_stop_other_categories() {
        let dir = TempDir::new().unwrap();
        let data = data();
        let meta = FakeMetadata::with(&[("a", true), ("d", true), ("e", true)])
            .failing("b")
            .failing("c");
        let pipeline = EnrichmentPipeline::new(
            &data,
            ProcessedTracker::new(dir.path().join("processed.json")),
            instant(),
            meta,
            FakeCaptions::default(),
        );

        let merged = enrich_all_categories(&pipeline).await.unwrap();
        assert_eq!(merged["First"].len(), 1);
        assert!(merged["Second"].is_empty());
        assert_eq!(merged["Third"].len(), 2);
    }

    #[tokio::test]
    async fn test_fatal_tracker_error_stops_run() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let data = data();
        let meta = FakeMetadata::with(&[("a", true)]);
        let pipeline = EnrichmentPipeline::new(
            &data,
            ProcessedTracker::new(blocker.join("processed.json")),
            instant(),
            meta,
            FakeCaptions::default(),
        );

        let err = enrich_all_categories(&pipeline).await.unwrap_err();
        assert!(matches!(err, FeedError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_run_enrichment_writes_output_once() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("enhanced.json");
        let data = data();
        let meta = FakeMetadata::with(&[("a", true), ("c", true)]);
        let pipeline = EnrichmentPipeline::new(
            &data,
            ProcessedTracker::new(dir.path().join("processed.json")),
            instant(),
            meta,
            FakeCaptions::default(),
        );

        let enhanced = run_enrichment(&pipeline, None, &output).await.unwrap();
        let written = json::read_enhanced(&output).await.unwrap();
        assert_eq!(written, enhanced);
        assert_eq!(written.len(), 3);
    }

    #[tokio::test]
    async fn test_run_single_category() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("enhanced.json");
        let data = data();
        let meta = FakeMetadata::with(&[("c", true)]);
        let pipeline = EnrichmentPipeline::new(
            &data,
            ProcessedTracker::new(dir.path().join("processed.json")),
            instant(),
            meta,
            FakeCaptions::default(),
        );

        let selector = CategorySelector::Name("Second".to_string());
        let enhanced = run_enrichment(&pipeline, Some(&selector), &output)
            .await
            .unwrap();
        assert_eq!(enhanced.len(), 1);
        assert_eq!(enhanced["Second"].len(), 1);

        let missing = CategorySelector::Index(10);
        assert!(matches!(
            run_enrichment(&pipeline, Some(&missing), &output).await,
            Err(FeedError::InvalidCategory { .. })
        ));
    }
}
