use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::analyzer::EnhancedQuery;
use crate::catalog::ContentItem;
use crate::core::error::Result;
use crate::repo::CatalogRepository;
use crate::utils::dedupe_preserve_order;


/// Recall-oriented candidate lookup. An item qualifies when any single
/// signal fires: its description contains a search term, it carries a tag
/// named by a term, or its keyword set intersects the terms. Terms never
/// have to co-occur.
pub struct CandidateRetriever {
    repo: Arc<dyn CatalogRepository>,
}

impl CandidateRetriever {
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        Self { repo }
    }

    pub async fn retrieve(
        &self,
        enhanced: &EnhancedQuery,
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        let terms = search_terms(enhanced);
        if terms.is_empty() {
            debug!("No search terms, falling back to recent items");
            return Ok(self.repo.recent_active_items(limit).await?);
        }

        let term_set: HashSet<&str> = terms.iter().map(String::as_str).collect();

        let mut matched = Vec::new();
        for item in self.repo.active_items().await? {
            if self.matches(&item, &terms, &term_set).await? {
                matched.push(item);
            }
        }

        matched.sort_by(|a, b| {
            b.view_count
                .cmp(&a.view_count)
                .then(b.created_at.cmp(&a.created_at))
        });
        matched.truncate(limit);

        debug!("Retrieved {} candidates for {} terms", matched.len(), terms.len());
        Ok(matched)
    }

    async fn matches(
        &self,
        item: &ContentItem,
        terms: &[String],
        term_set: &HashSet<&str>,
    ) -> Result<bool> {
        if terms.iter().any(|t| item.description.contains(t.as_str())) {
            return Ok(true);
        }

        if item
            .searchable_keywords
            .iter()
            .any(|k| term_set.contains(k.as_str()))
        {
            return Ok(true);
        }

        let tag_names = self.repo.tag_names_for_item(item.id).await?;
        Ok(tag_names.iter().any(|n| term_set.contains(n.as_str())))
    }
}


/// Unique keywords and synonyms of an enhanced query, first occurrence wins.
pub fn search_terms(enhanced: &EnhancedQuery) -> Vec<String> {
    dedupe_preserve_order(
        enhanced
            .keywords
            .iter()
            .chain(enhanced.synonyms.iter())
            .cloned(),
    )
}
