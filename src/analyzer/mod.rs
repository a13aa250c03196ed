pub mod models;
pub mod openai;
pub mod prompts;

#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use models::{EnhancedQuery, ImageAnalysis, SimilarityMatch, SimilarityRanking};
pub use openai::OpenAiAnalyzer;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unparseable analyzer response: {0}")]
    Unparseable(String),

    #[error("Provider error: {0}")]
    Provider(String),
}


#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Vision analysis of one image, producing the structured record the
    /// pipeline persists. `custom_prompt` replaces the default instruction.
    async fn analyze_for_search(
        &self,
        image_url: &str,
        custom_prompt: Option<&str>,
    ) -> Result<ImageAnalysis, AnalyzerError>;

    /// Expands a free-text query into keywords/synonyms/related terms.
    async fn enhance_query(&self, query: &str) -> Result<EnhancedQuery, AnalyzerError>;

    /// Scores the relevance of each candidate description against the query.
    async fn rank_similarity(
        &self,
        query: &str,
        descriptions: &[String],
    ) -> Result<SimilarityRanking, AnalyzerError>;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}


#[async_trait]
impl Analyzer for Arc<dyn Analyzer> {
    async fn analyze_for_search(
        &self,
        image_url: &str,
        custom_prompt: Option<&str>,
    ) -> Result<ImageAnalysis, AnalyzerError> {
        (**self).analyze_for_search(image_url, custom_prompt).await
    }

    async fn enhance_query(&self, query: &str) -> Result<EnhancedQuery, AnalyzerError> {
        (**self).enhance_query(query).await
    }

    async fn rank_similarity(
        &self,
        query: &str,
        descriptions: &[String],
    ) -> Result<SimilarityRanking, AnalyzerError> {
        (**self).rank_similarity(query, descriptions).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
