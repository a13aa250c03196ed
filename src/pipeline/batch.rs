use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use uuid::Uuid;

use super::orchestrator::AnalysisOrchestrator;
use crate::catalog::AnalysisStatus;
use crate::core::error::Result;
use crate::repo::CatalogRepository;
use crate::DEFAULT_BATCH_DELAY_SECS;


#[derive(Debug, Default, Clone)]
pub struct BatchStats {
    pub success_count: usize,
    pub failed_count: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.success_count + self.failed_count
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.total() as f64
    }
}


/// Re-runs analysis over a set of items strictly sequentially. The analyzer
/// is a rate-limited upstream, so a fixed delay separates successive calls.
/// One item's failure is counted, never propagated.
pub struct BatchAnalyzer {
    repo: Arc<dyn CatalogRepository>,
    orchestrator: Arc<AnalysisOrchestrator>,
    delay: Duration,
}

impl BatchAnalyzer {
    pub fn new(repo: Arc<dyn CatalogRepository>, orchestrator: Arc<AnalysisOrchestrator>) -> Self {
        Self {
            repo,
            orchestrator,
            delay: Duration::from_secs(DEFAULT_BATCH_DELAY_SECS),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub async fn run_batch(
        &self,
        item_ids: &[Uuid],
        custom_prompt: Option<&str>,
    ) -> Result<BatchStats> {
        let mut stats = BatchStats {
            started_at: Some(Utc::now()),
            ..Default::default()
        };

        info!("Starting batch analysis: {} items", item_ids.len());

        // One step so concurrent status queries see the whole batch as
        // in-progress before the first analyzer call goes out.
        self.repo.mark_pending(item_ids).await?;

        for (idx, item_id) in item_ids.iter().enumerate() {
            match self.orchestrator.analyze(*item_id, custom_prompt).await {
                Ok(AnalysisStatus::Completed) => stats.success_count += 1,
                Ok(_) => stats.failed_count += 1,
                Err(e) => {
                    warn!("Batch item {} errored: {}", item_id, e);
                    stats.failed_count += 1;
                }
            }

            if idx + 1 < item_ids.len() {
                sleep(self.delay).await;
            }
        }

        stats.completed_at = Some(Utc::now());

        info!(
            "Batch complete: {} succeeded, {} failed (success rate: {:.1}%)",
            stats.success_count,
            stats.failed_count,
            stats.success_rate() * 100.0
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::mock::{analysis_with_tags, MockAnalyzer};
    use crate::catalog::ContentItem;
    use crate::repo::MemoryRepository;
    use crate::storage::{BaseUrlStorage, Storage};
    use std::sync::atomic::Ordering;

    fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn storage() -> Arc<dyn Storage> {
        Arc::new(BaseUrlStorage::new("https://cdn.test/uploads/").unwrap())
    }

    async fn seed_items(repo: &Arc<MemoryRepository>, n: usize) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for i in 0..n {
            let item = ContentItem::new(format!("{}.jpg", i));
            ids.push(item.id);
            repo.insert_item(item).await.unwrap();
        }
        ids
    }

    #[tokio::test]
    async fn test_batch_counts_successes() {
        init_test_tracing();
        let repo = Arc::new(MemoryRepository::new());
        let ids = seed_items(&repo, 3).await;
        let analyzer = Arc::new(
            MockAnalyzer::new().with_analysis(analysis_with_tags("d", 0.9, &["tag"])),
        );
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            repo.clone(),
            storage(),
            analyzer.clone(),
        ));
        let batch = BatchAnalyzer::new(repo.clone(), orchestrator)
            .with_delay(Duration::from_millis(0));

        let stats = batch.run_batch(&ids, None).await.unwrap();
        assert_eq!(stats.success_count, 3);
        assert_eq!(stats.failed_count, 0);
        assert_eq!(analyzer.analyze_calls.load(Ordering::SeqCst), 3);
        assert!(stats.started_at.is_some() && stats.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_batch() {
        init_test_tracing();
        let repo = Arc::new(MemoryRepository::new());
        let ids = seed_items(&repo, 2).await;
        // item missing from the repo errors mid-batch; others still run
        let mut with_ghost = vec![ids[0], Uuid::new_v4(), ids[1]];
        let analyzer = Arc::new(
            MockAnalyzer::new().with_analysis(analysis_with_tags("d", 0.9, &["tag"])),
        );
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            repo.clone(),
            storage(),
            analyzer,
        ));
        let batch = BatchAnalyzer::new(repo.clone(), orchestrator)
            .with_delay(Duration::from_millis(0));

        let stats = batch.run_batch(&with_ghost, None).await.unwrap();
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failed_count, 1);

        with_ghost.remove(1);
        for id in with_ghost {
            let item = repo.item(id).await.unwrap().unwrap();
            assert_eq!(item.status, AnalysisStatus::Completed);
        }
    }

    #[tokio::test]
    async fn test_all_items_marked_pending_up_front() {
        init_test_tracing();
        let repo = Arc::new(MemoryRepository::new());
        let ids = seed_items(&repo, 2).await;
        for id in &ids {
            repo.set_status(*id, AnalysisStatus::Completed).await.unwrap();
        }

        // failing analyzer: items go pending first, then failed
        let analyzer = Arc::new(MockAnalyzer::new().failing_analysis());
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            repo.clone(),
            storage(),
            analyzer,
        ));
        let batch = BatchAnalyzer::new(repo.clone(), orchestrator)
            .with_delay(Duration::from_millis(0));

        let stats = batch.run_batch(&ids, None).await.unwrap();
        assert_eq!(stats.failed_count, 2);
        for id in ids {
            let item = repo.item(id).await.unwrap().unwrap();
            assert_eq!(item.status, AnalysisStatus::Failed);
        }
    }
}
