use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::reconcile::{extract_tag_specs, TagReconciler};
use crate::analyzer::Analyzer;
use crate::catalog::AnalysisStatus;
use crate::core::error::{PictorError, Result};
use crate::repo::{AnalysisUpdate, CatalogRepository};
use crate::storage::Storage;
use crate::utils::dedupe_preserve_order;

const ANALYZER_SOURCE: &str = "analyzer";


/// Drives one content item through the analysis state machine:
/// `pending -> completed` on success, `pending -> failed` on any analyzer,
/// storage or persistence failure. A failed run never erases the previous
/// successful analysis; only a new successful run overwrites it. Retries
/// are always explicit reanalysis requests from outside.
pub struct AnalysisOrchestrator {
    repo: Arc<dyn CatalogRepository>,
    storage: Arc<dyn Storage>,
    analyzer: Arc<dyn Analyzer>,
    reconciler: TagReconciler,
}

impl AnalysisOrchestrator {
    pub fn new(
        repo: Arc<dyn CatalogRepository>,
        storage: Arc<dyn Storage>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        info!(
            "AnalysisOrchestrator initialized: analyzer={}/{}",
            analyzer.provider_name(),
            analyzer.model_name()
        );
        let reconciler = TagReconciler::new(repo.clone());
        Self {
            repo,
            storage,
            analyzer,
            reconciler,
        }
    }

    pub fn with_reconciler(mut self, reconciler: TagReconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Analyzes one item. The returned status mirrors what was persisted;
    /// `Err` is reserved for preconditions (unknown item) and repository
    /// failures that prevent even the failure state from being recorded.
    pub async fn analyze(
        &self,
        item_id: Uuid,
        custom_prompt: Option<&str>,
    ) -> Result<AnalysisStatus> {
        let item = self
            .repo
            .item(item_id)
            .await?
            .ok_or_else(|| PictorError::ItemNotFound(item_id.to_string()))?;

        let url = match self.storage.resolve_url(&item.content_ref).await {
            Ok(url) => url,
            Err(e) => {
                warn!("URL resolution failed for item {}: {}", item_id, e);
                return self.mark_failed(item_id).await;
            }
        };

        let analysis = match self.analyzer.analyze_for_search(&url, custom_prompt).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Analysis failed for item {}: {}", item_id, e);
                return self.mark_failed(item_id).await;
            }
        };

        let model_label = if custom_prompt.is_some() {
            format!("{}-custom", self.analyzer.model_name())
        } else {
            self.analyzer.model_name().to_string()
        };

        let update = AnalysisUpdate {
            description: analysis.description.clone(),
            confidence: analysis.confidence.clamp(0.0, 1.0),
            analyzer_model: model_label,
            mood: analysis.mood.clone(),
            style: analysis.style.clone(),
            searchable_keywords: dedupe_preserve_order(analysis.searchable_keywords.clone()),
            raw_analysis: serde_json::to_value(&analysis)?,
        };

        if let Err(e) = self.repo.apply_analysis(item_id, update).await {
            warn!("Persisting analysis failed for item {}: {}", item_id, e);
            return self.mark_failed(item_id).await;
        }

        // Tag replacement is all-or-nothing against the item's tag set: a
        // completed item must never carry the previous run's tags.
        if let Err(e) = self.repo.clear_associations(item_id).await {
            warn!("Clearing stale tags failed for item {}: {}", item_id, e);
            return self.mark_failed(item_id).await;
        }
        let specs = extract_tag_specs(&analysis, ANALYZER_SOURCE);
        match self.reconciler.replace_tags(item_id, specs).await {
            Ok(report) => {
                if !report.failed.is_empty() {
                    warn!(
                        "Item {} completed with {} unresolved tags",
                        item_id,
                        report.failed.len()
                    );
                }
                info!(
                    "Item {} analyzed: {} tags applied, confidence={:.2}",
                    item_id, report.applied, analysis.confidence
                );
                Ok(AnalysisStatus::Completed)
            }
            Err(e) => {
                warn!(
                    "Tag reconciliation failed for item {} after clearing: {}",
                    item_id, e
                );
                self.mark_failed(item_id).await
            }
        }
    }

    async fn mark_failed(&self, item_id: Uuid) -> Result<AnalysisStatus> {
        self.repo
            .set_status(item_id, AnalysisStatus::Failed)
            .await?;
        Ok(AnalysisStatus::Failed)
    }
}
