use std::collections::HashSet;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::ContentItem;
use crate::core::error::{PictorError, Result};
use crate::repo::CatalogRepository;

const TAG_WEIGHT: f64 = 0.4;
const KEYWORD_WEIGHT: f64 = 0.3;
const CONFIDENCE_WEIGHT: f64 = 0.2;
const POPULARITY_WEIGHT: f64 = 0.1;
const POPULARITY_SATURATION: f64 = 100.0;
const TOP_KEYWORDS: usize = 3;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SimilarityMode {
    Tags,
    Style,
    Mood,
    Keywords,
}


/// "More like this" lookup over the catalog. Candidate selection is
/// mode-specific; scoring is uniform: 70% exact-signal overlap with the
/// reference term set, 30% quality and popularity priors, so one shared tag
/// on an unpopular low-confidence item never outranks a multi-signal match.
pub struct SimilarityScorer {
    repo: Arc<dyn CatalogRepository>,
}

impl SimilarityScorer {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_similar(
        &self,
        reference_id: Uuid,
        mode: SimilarityMode,
        limit: usize,
    ) -> Result<Vec<(ContentItem, f64)>> {
        let reference = self
            .repo
            .item(reference_id)
            .await?
            .ok_or_else(|| PictorError::ItemNotFound(reference_id.to_string()))?;

        let reference_tags = self.repo.tag_names_for_item(reference_id).await?;

        // modes without a usable reference signal degrade to tag similarity
        let mode = match mode {
            SimilarityMode::Style if reference.style.is_none() => SimilarityMode::Tags,
            SimilarityMode::Mood if reference.mood.is_none() => SimilarityMode::Tags,
            SimilarityMode::Keywords if reference.searchable_keywords.is_empty() => {
                SimilarityMode::Tags
            }
            m => m,
        };

        let reference_terms: Vec<String> = match mode {
            SimilarityMode::Tags => reference_tags.clone(),
            SimilarityMode::Style => vec![reference.style.clone().unwrap_or_default()],
            SimilarityMode::Mood => vec![reference.mood.clone().unwrap_or_default()],
            SimilarityMode::Keywords => reference
                .searchable_keywords
                .iter()
                .take(TOP_KEYWORDS)
                .cloned()
                .collect(),
        };
        let term_set: HashSet<&str> = reference_terms.iter().map(String::as_str).collect();

        let mut scored = Vec::new();
        for candidate in self.repo.active_items().await? {
            if candidate.id == reference_id {
                continue;
            }

            let candidate_tags = self.repo.tag_names_for_item(candidate.id).await?;
            if !self.selects(&candidate, &candidate_tags, mode, &reference, &term_set) {
                continue;
            }

            let score = composite_score(&candidate, &candidate_tags, &term_set);
            scored.push((candidate, score));
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        debug!(
            "Similar to {} ({}): {} results",
            reference_id,
            mode,
            scored.len()
        );
        Ok(scored)
    }

    fn selects(
        &self,
        candidate: &ContentItem,
        candidate_tags: &[String],
        mode: SimilarityMode,
        reference: &ContentItem,
        term_set: &HashSet<&str>,
    ) -> bool {
        match mode {
            SimilarityMode::Tags => candidate_tags
                .iter()
                .any(|t| term_set.contains(t.as_str())),
            SimilarityMode::Style => match (&candidate.style, &reference.style) {
                (Some(c), Some(r)) => c.contains(r.as_str()),
                _ => false,
            },
            SimilarityMode::Mood => match (&candidate.mood, &reference.mood) {
                (Some(c), Some(r)) => c.contains(r.as_str()),
                _ => false,
            },
            SimilarityMode::Keywords => candidate
                .searchable_keywords
                .iter()
                .any(|k| term_set.iter().any(|t| k.contains(t))),
        }
    }
}


fn composite_score(
    candidate: &ContentItem,
    candidate_tags: &[String],
    reference_terms: &HashSet<&str>,
) -> f64 {
    let denominator = reference_terms.len().max(1) as f64;

    let tag_overlap = candidate_tags
        .iter()
        .filter(|t| reference_terms.contains(t.as_str()))
        .count() as f64
        / denominator;

    let keyword_overlap = candidate
        .searchable_keywords
        .iter()
        .filter(|k| reference_terms.contains(k.as_str()))
        .count() as f64
        / denominator;

    let popularity = (candidate.view_count as f64 / POPULARITY_SATURATION).min(1.0);

    (TAG_WEIGHT * tag_overlap
        + KEYWORD_WEIGHT * keyword_overlap
        + CONFIDENCE_WEIGHT * candidate.confidence
        + POPULARITY_WEIGHT * popularity)
        .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::{AssociationInsert, MemoryRepository};

    async fn seed(
        repo: &Arc<MemoryRepository>,
        tags: &[&str],
        confidence: f64,
        view_count: u64,
    ) -> ContentItem {
        let mut item = ContentItem::new(format!("{}.jpg", Uuid::new_v4()));
        item.confidence = confidence;
        item.view_count = view_count;
        repo.insert_item(item.clone()).await.unwrap();

        for name in tags {
            let tag = repo.get_or_create_tag(name, "auto").await.unwrap();
            repo.insert_associations(
                item.id,
                &[AssociationInsert {
                    tag_id: tag.id,
                    confidence: 0.9,
                    source: "analyzer".to_string(),
                }],
            )
            .await
            .unwrap();
        }
        item
    }

    #[tokio::test]
    async fn test_two_tag_match_outranks_popular_one_tag_match() {
        let repo = Arc::new(MemoryRepository::new());
        let reference = seed(&repo, &["sitting", "indoor"], 0.9, 0).await;
        let both_tags = seed(&repo, &["sitting", "indoor"], 0.9, 70).await;
        let one_tag = seed(&repo, &["sitting"], 0.95, 100).await;

        let scorer = SimilarityScorer::new(repo);
        let results = scorer
            .find_similar(reference.id, SimilarityMode::Tags, 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id, both_tags.id);
        assert!((results[0].1 - 0.65).abs() < 1e-9);
        assert_eq!(results[1].0.id, one_tag.id);
        assert!((results[1].1 - 0.49).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reference_excluded_from_results() {
        let repo = Arc::new(MemoryRepository::new());
        let reference = seed(&repo, &["sunset"], 0.9, 500).await;
        seed(&repo, &["sunset"], 0.5, 0).await;

        let scorer = SimilarityScorer::new(repo);
        let results = scorer
            .find_similar(reference.id, SimilarityMode::Tags, 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_ne!(results[0].0.id, reference.id);
    }

    #[tokio::test]
    async fn test_style_mode_substring_selection() {
        let repo = Arc::new(MemoryRepository::new());
        let mut reference = ContentItem::new("r.jpg");
        reference.style = Some("noir".to_string());
        repo.insert_item(reference.clone()).await.unwrap();

        let mut close = ContentItem::new("c.jpg");
        close.style = Some("film noir".to_string());
        repo.insert_item(close.clone()).await.unwrap();

        let mut far = ContentItem::new("f.jpg");
        far.style = Some("pastel".to_string());
        repo.insert_item(far).await.unwrap();

        let scorer = SimilarityScorer::new(repo);
        let results = scorer
            .find_similar(reference.id, SimilarityMode::Style, 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, close.id);
    }

    #[tokio::test]
    async fn test_missing_style_falls_back_to_tags() {
        let repo = Arc::new(MemoryRepository::new());
        let reference = seed(&repo, &["portrait"], 0.9, 0).await;
        let tag_match = seed(&repo, &["portrait"], 0.9, 0).await;

        let scorer = SimilarityScorer::new(repo);
        let results = scorer
            .find_similar(reference.id, SimilarityMode::Style, 10)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, tag_match.id);
    }

    #[tokio::test]
    async fn test_keywords_mode_uses_top_three() {
        let repo = Arc::new(MemoryRepository::new());
        let mut reference = ContentItem::new("r.jpg");
        reference.searchable_keywords = vec![
            "beach".to_string(),
            "wave".to_string(),
            "surf".to_string(),
            "dune".to_string(),
        ];
        repo.insert_item(reference.clone()).await.unwrap();

        let mut fourth_only = ContentItem::new("d.jpg");
        fourth_only.searchable_keywords = vec!["dune".to_string()];
        repo.insert_item(fourth_only).await.unwrap();

        let mut surf_match = ContentItem::new("s.jpg");
        surf_match.searchable_keywords = vec!["surfing".to_string()];
        repo.insert_item(surf_match.clone()).await.unwrap();

        let scorer = SimilarityScorer::new(repo);
        let results = scorer
            .find_similar(reference.id, SimilarityMode::Keywords, 10)
            .await
            .unwrap();

        // "dune" is the fourth keyword and does not select; "surfing"
        // contains "surf" and does
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, surf_match.id);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_an_error() {
        let repo = Arc::new(MemoryRepository::new());
        let scorer = SimilarityScorer::new(repo);
        let err = scorer
            .find_similar(Uuid::new_v4(), SimilarityMode::Tags, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, PictorError::ItemNotFound(_)));
    }
}
