use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::models::{EnhancedQuery, ImageAnalysis, SimilarityMatch, SimilarityRanking};
use super::{Analyzer, AnalyzerError};


#[derive(Default)]
pub struct MockAnalyzer {
    pub analysis: Mutex<Option<ImageAnalysis>>,
    pub enhanced: Mutex<Option<EnhancedQuery>>,
    pub ranking: Mutex<Option<SimilarityRanking>>,
    pub fail_analysis: std::sync::atomic::AtomicBool,
    pub fail_enhance: std::sync::atomic::AtomicBool,
    pub fail_ranking: std::sync::atomic::AtomicBool,
    pub analyze_calls: AtomicUsize,
    pub enhance_calls: AtomicUsize,
    pub ranking_calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_analysis(self, analysis: ImageAnalysis) -> Self {
        *self.analysis.lock() = Some(analysis);
        self
    }

    pub fn with_enhanced(self, enhanced: EnhancedQuery) -> Self {
        *self.enhanced.lock() = Some(enhanced);
        self
    }

    pub fn with_ranking(self, scores: &[(usize, f64)]) -> Self {
        *self.ranking.lock() = Some(SimilarityRanking {
            matches: scores
                .iter()
                .map(|&(index, similarity_score)| SimilarityMatch {
                    index,
                    similarity_score,
                    reasoning: String::new(),
                })
                .collect(),
            query_analysis: String::new(),
        });
        self
    }

    pub fn failing_analysis(self) -> Self {
        self.fail_analysis.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_enhance(self) -> Self {
        self.fail_enhance.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_ranking(self) -> Self {
        self.fail_ranking.store(true, Ordering::SeqCst);
        self
    }
}


pub fn analysis_with_tags(description: &str, confidence: f64, tags: &[&str]) -> ImageAnalysis {
    let mut groups = HashMap::new();
    groups.insert(
        "general".to_string(),
        tags.iter().map(|t| t.to_string()).collect(),
    );
    ImageAnalysis {
        description: description.to_string(),
        confidence,
        tags: groups,
        searchable_keywords: Vec::new(),
        mood: None,
        style: None,
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze_for_search(
        &self,
        _image_url: &str,
        _custom_prompt: Option<&str>,
    ) -> Result<ImageAnalysis, AnalyzerError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_analysis.load(Ordering::SeqCst) {
            return Err(AnalyzerError::Provider("mock analysis failure".to_string()));
        }
        self.analysis
            .lock()
            .clone()
            .ok_or_else(|| AnalyzerError::Provider("no scripted analysis".to_string()))
    }

    async fn enhance_query(&self, query: &str) -> Result<EnhancedQuery, AnalyzerError> {
        self.enhance_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_enhance.load(Ordering::SeqCst) {
            return Err(AnalyzerError::Provider("mock enhance failure".to_string()));
        }
        Ok(self
            .enhanced
            .lock()
            .clone()
            .unwrap_or_else(|| EnhancedQuery::raw(query)))
    }

    async fn rank_similarity(
        &self,
        _query: &str,
        _descriptions: &[String],
    ) -> Result<SimilarityRanking, AnalyzerError> {
        self.ranking_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_ranking.load(Ordering::SeqCst) {
            return Err(AnalyzerError::Provider("mock ranking failure".to_string()));
        }
        Ok(self.ranking.lock().clone().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-vision"
    }
}
