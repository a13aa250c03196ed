use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::analyzer::ImageAnalysis;
use crate::catalog::TagSpec;
use crate::core::error::Result;
use crate::repo::{AssociationInsert, CatalogRepository};
use crate::utils::dedupe_preserve_order;
use crate::DEFAULT_RECONCILE_BATCH_SIZE;


#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub applied: usize,
    pub skipped_existing: usize,
    /// (tag name, error) for tags that could not be resolved. A bad tag is
    /// skipped so the rest of the analysis still lands.
    pub failed: Vec<(String, String)>,
}


/// Idempotently installs a tag set on an item. Tags are created lazily by
/// name (category "auto"); existing (item, tag) pairs are left alone; usage
/// counts move only inside the repository's atomic batch operations.
pub struct TagReconciler {
    repo: Arc<dyn CatalogRepository>,
    batch_size: usize,
}

impl TagReconciler {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self {
            repo,
            batch_size: DEFAULT_RECONCILE_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn replace_tags(
        &self,
        item_id: Uuid,
        specs: Vec<TagSpec>,
    ) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        debug!(
            "Reconciling {} tag specs for item {} (batch_size={})",
            specs.len(),
            item_id,
            self.batch_size
        );

        for chunk in specs.chunks(self.batch_size) {
            let mut batch = Vec::with_capacity(chunk.len());

            for spec in chunk {
                match self.repo.get_or_create_tag(&spec.name, "auto").await {
                    Ok(tag) => batch.push(AssociationInsert {
                        tag_id: tag.id,
                        confidence: spec.confidence,
                        source: spec.source.clone(),
                    }),
                    Err(e) => {
                        warn!("Skipping tag '{}': {}", spec.name, e);
                        report.failed.push((spec.name.clone(), e.to_string()));
                    }
                }
            }

            if batch.is_empty() {
                continue;
            }

            // A batch-level insert failure propagates: the orchestrator must
            // know the item's tag set is now incomplete.
            let inserted = self.repo.insert_associations(item_id, &batch).await?;
            report.applied += inserted;
            report.skipped_existing += batch.len() - inserted;
        }

        debug!(
            "Reconcile done for {}: {} applied, {} already present, {} failed",
            item_id,
            report.applied,
            report.skipped_existing,
            report.failed.len()
        );

        Ok(report)
    }
}


/// Flattens an analysis into tag specs: every categorized tag name, every
/// searchable keyword, and the mood/style labels as single-value tags.
/// Names are deduplicated case-sensitively, first occurrence wins.
pub fn extract_tag_specs(analysis: &ImageAnalysis, source: &str) -> Vec<TagSpec> {
    let mut names: Vec<String> = Vec::new();

    let mut groups: Vec<_> = analysis.tags.iter().collect();
    groups.sort_by(|a, b| a.0.cmp(b.0));
    for (_, group) in groups {
        names.extend(group.iter().cloned());
    }

    names.extend(analysis.searchable_keywords.iter().cloned());

    if let Some(mood) = &analysis.mood {
        names.push(mood.clone());
    }
    if let Some(style) = &analysis.style {
        names.push(style.clone());
    }

    dedupe_preserve_order(names)
        .into_iter()
        .map(|name| TagSpec::new(name, analysis.confidence, source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::analysis_with_tags;
    use crate::catalog::ContentItem;
    use crate::repo::MemoryRepository;

    fn specs(names: &[&str]) -> Vec<TagSpec> {
        names
            .iter()
            .map(|n| TagSpec::new(*n, 0.9, "analyzer"))
            .collect()
    }

    #[tokio::test]
    async fn test_replace_tags_creates_and_counts() {
        let repo = Arc::new(MemoryRepository::new());
        let item = ContentItem::new("a.jpg");
        repo.insert_item(item.clone()).await.unwrap();

        let reconciler = TagReconciler::new(repo.clone());
        let report = reconciler
            .replace_tags(item.id, specs(&["sitting", "indoor"]))
            .await
            .unwrap();

        assert_eq!(report.applied, 2);
        assert!(report.failed.is_empty());
        let tag = repo.tag_by_name("sitting").await.unwrap().unwrap();
        assert_eq!(tag.category, "auto");
        assert_eq!(tag.usage_count, 1);
    }

    #[tokio::test]
    async fn test_replace_tags_idempotent() {
        let repo = Arc::new(MemoryRepository::new());
        let item = ContentItem::new("a.jpg");
        repo.insert_item(item.clone()).await.unwrap();

        let reconciler = TagReconciler::new(repo.clone());
        reconciler
            .replace_tags(item.id, specs(&["sitting", "indoor"]))
            .await
            .unwrap();
        let second = reconciler
            .replace_tags(item.id, specs(&["sitting", "indoor"]))
            .await
            .unwrap();

        assert_eq!(second.applied, 0);
        assert_eq!(second.skipped_existing, 2);
        let tag = repo.tag_by_name("indoor").await.unwrap().unwrap();
        assert_eq!(tag.usage_count, 1);
        assert_eq!(repo.associations_for_item(item.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_batching_splits_large_sets() {
        let repo = Arc::new(MemoryRepository::new());
        let item = ContentItem::new("a.jpg");
        repo.insert_item(item.clone()).await.unwrap();

        let names: Vec<String> = (0..25).map(|i| format!("tag-{}", i)).collect();
        let specs: Vec<TagSpec> = names
            .iter()
            .map(|n| TagSpec::new(n.clone(), 0.8, "analyzer"))
            .collect();

        let reconciler = TagReconciler::new(repo.clone()).with_batch_size(10);
        let report = reconciler.replace_tags(item.id, specs).await.unwrap();

        assert_eq!(report.applied, 25);
        assert_eq!(repo.associations_for_item(item.id).await.unwrap().len(), 25);
    }

    #[test]
    fn test_extract_folds_mood_style_and_keywords() {
        let mut analysis = analysis_with_tags("desc", 0.9, &["sitting", "indoor"]);
        analysis.searchable_keywords = vec!["reading".to_string(), "sitting".to_string()];
        analysis.mood = Some("calm".to_string());
        analysis.style = Some("minimal".to_string());

        let specs = extract_tag_specs(&analysis, "analyzer");
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();

        // "sitting" appears once despite being both tag and keyword
        assert_eq!(names, vec!["sitting", "indoor", "reading", "calm", "minimal"]);
        assert!(specs.iter().all(|s| (s.confidence - 0.9).abs() < f64::EPSILON));
        assert!(specs.iter().all(|s| s.source == "analyzer"));
    }
}
