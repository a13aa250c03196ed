use serde::{Deserialize, Serialize};
use std::collections::HashMap;


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub description: String,

    #[serde(default = "default_confidence")]
    pub confidence: f64,

    /// Categorized tag names, e.g. {"pose": ["sitting"], "scene": ["indoor"]}.
    #[serde(default)]
    pub tags: HashMap<String, Vec<String>>,

    #[serde(default)]
    pub searchable_keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

fn default_confidence() -> f64 {
    0.8
}


#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EnhancedQuery {
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub synonyms: Vec<String>,

    #[serde(default)]
    pub related_searches: Vec<String>,

    #[serde(default)]
    pub tag_categories: HashMap<String, Vec<String>>,
}

impl EnhancedQuery {
    /// The "no enhancement" result: the raw query is the only keyword.
    pub fn raw(query: &str) -> Self {
        Self {
            keywords: vec![query.to_string()],
            ..Default::default()
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimilarityRanking {
    #[serde(default)]
    pub matches: Vec<SimilarityMatch>,

    #[serde(default)]
    pub query_analysis: String,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatch {
    /// 1-based index into the candidate list sent to the analyzer.
    pub index: usize,

    #[serde(default)]
    pub similarity_score: f64,

    #[serde(default)]
    pub reasoning: String,
}
