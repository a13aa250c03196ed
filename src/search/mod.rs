pub mod cache;
pub mod engine;
pub mod enhance;
pub mod rerank;
pub mod retrieval;
pub mod similar;

pub use cache::QueryCache;
pub use engine::{SearchEngine, SearchMethod, SearchResults};
pub use enhance::QueryEnhancer;
pub use rerank::SemanticReranker;
pub use retrieval::CandidateRetriever;
pub use similar::{SimilarityMode, SimilarityScorer};
