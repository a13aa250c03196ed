use std::sync::Arc;
use tracing::{debug, warn};

use crate::analyzer::Analyzer;
use crate::catalog::ContentItem;


/// Best-effort LLM reordering of retrieved candidates. The candidate set is
/// never shrunk or grown here: candidates the analyzer does not mention sort
/// last with an implicit score of zero, and an analyzer failure leaves the
/// original order untouched.
pub struct SemanticReranker {
    analyzer: Arc<dyn Analyzer>,
}

impl SemanticReranker {
    pub fn new(analyzer: Arc<dyn Analyzer>) -> Self {
        Self { analyzer }
    }

    pub async fn rerank(&self, query: &str, candidates: Vec<ContentItem>) -> Vec<ContentItem> {
        if candidates.len() < 2 {
            return candidates;
        }

        let descriptions: Vec<String> =
            candidates.iter().map(|c| c.description.clone()).collect();

        let ranking = match self.analyzer.rank_similarity(query, &descriptions).await {
            Ok(ranking) => ranking,
            Err(e) => {
                warn!("Semantic rerank failed, keeping retrieval order: {}", e);
                return candidates;
            }
        };

        let mut scores = vec![0.0_f64; candidates.len()];
        for m in &ranking.matches {
            // analyzer indices are 1-based; out-of-range entries are noise
            if (1..=candidates.len()).contains(&m.index) {
                scores[m.index - 1] = m.similarity_score;
            }
        }

        let mut scored: Vec<(f64, ContentItem)> =
            scores.into_iter().zip(candidates).collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        debug!(
            "Reranked {} candidates ({} scored by analyzer)",
            scored.len(),
            ranking.matches.len()
        );
        scored.into_iter().map(|(_, item)| item).collect()
    }
}
