use std::sync::Arc;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::info;

use super::enhance::QueryEnhancer;
use super::rerank::SemanticReranker;
use super::retrieval::{search_terms, CandidateRetriever};
use crate::analyzer::Analyzer;
use crate::catalog::ContentItem;
use crate::core::error::Result;
use crate::repo::CatalogRepository;
use crate::utils::dedupe_preserve_order;
use crate::DEFAULT_SEARCH_LIMIT;

const MAX_SUGGESTIONS: usize = 8;
const SUGGESTION_TAG_POOL: usize = 50;


/// How a result set was produced. `Semantic` means the reranker ran over an
/// over-fetched candidate set, `EnhancedKeyword` means retrieval alone was
/// selective enough, `Fallback` means the query carried no usable terms and
/// recent items were returned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SearchMethod {
    Semantic,
    EnhancedKeyword,
    Fallback,
}


#[derive(Debug)]
pub struct SearchResults {
    pub query: String,
    pub method: SearchMethod,
    pub items: Vec<ContentItem>,
}


/// Front door of the search side: enhancement, recall-oriented retrieval
/// over twice the requested limit, then semantic reranking only when the
/// candidate set actually overflows the limit.
pub struct SearchEngine {
    repo: Arc<dyn CatalogRepository>,
    enhancer: QueryEnhancer,
    retriever: CandidateRetriever,
    reranker: SemanticReranker,
    default_limit: usize,
}

impl SearchEngine {
    pub fn new(repo: Arc<dyn CatalogRepository>, analyzer: Arc<dyn Analyzer>) -> Self {
        info!(
            "SearchEngine initialized: analyzer={}/{}",
            analyzer.provider_name(),
            analyzer.model_name()
        );
        Self {
            repo: repo.clone(),
            enhancer: QueryEnhancer::new(analyzer.clone()),
            retriever: CandidateRetriever::new(repo),
            reranker: SemanticReranker::new(analyzer),
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<SearchResults> {
        let limit = limit.unwrap_or(self.default_limit).max(1);

        let enhanced = self.enhancer.enhance(query).await;
        let terms = search_terms(&enhanced);

        // over-fetch so the reranker has something to choose between
        let mut items = self.retriever.retrieve(&enhanced, limit * 2).await?;

        let method = if terms.is_empty() {
            SearchMethod::Fallback
        } else if items.len() > limit {
            items = self.reranker.rerank(query, items).await;
            SearchMethod::Semantic
        } else {
            SearchMethod::EnhancedKeyword
        };
        items.truncate(limit);

        info!(
            "Search '{}': {} results via {}",
            query,
            items.len(),
            method
        );

        Ok(SearchResults {
            query: query.to_string(),
            method,
            items,
        })
    }

    /// Autocomplete-style suggestions for a partial query: the analyzer's
    /// related searches and synonyms first, then catalog tag names that
    /// contain the fragment. Degrades to tags alone when enhancement fails.
    pub async fn suggestions(&self, partial: &str) -> Result<Vec<String>> {
        let enhanced = self.enhancer.enhance(partial).await;

        let mut pool: Vec<String> = enhanced.related_searches;
        pool.extend(enhanced.synonyms);

        for tag in self.repo.popular_tags(SUGGESTION_TAG_POOL).await? {
            if tag.name.contains(partial) {
                pool.push(tag.name);
            }
        }

        let mut suggestions = dedupe_preserve_order(pool);
        suggestions.retain(|s| s != partial);
        suggestions.truncate(MAX_SUGGESTIONS);
        Ok(suggestions)
    }
}
