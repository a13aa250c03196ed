pub mod analyzer;
pub mod catalog;
pub mod core;
pub mod pipeline;
pub mod repo;
pub mod search;
pub mod storage;
pub mod utils;

pub use crate::analyzer::{Analyzer, AnalyzerError};
pub use crate::core::config::PictorConfig;
pub use crate::core::error::{PictorError, Result};
pub use crate::pipeline::{AnalysisOrchestrator, BatchAnalyzer, TagReconciler};
pub use crate::repo::CatalogRepository;
pub use crate::search::{SearchEngine, SimilarityScorer};
pub use crate::storage::Storage;
pub use crate::utils::{safe_truncate, safe_truncate_ellipsis};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_ANALYZER_MODEL: &str = "gpt-4o";

pub const DEFAULT_ANALYZER_TIMEOUT_SECS: u64 = 60;

/// Seconds between successive analyzer calls inside a batch run.
pub const DEFAULT_BATCH_DELAY_SECS: u64 = 2;

/// Tag associations written per atomic insert during reconciliation.
pub const DEFAULT_RECONCILE_BATCH_SIZE: usize = 10;

pub const DEFAULT_CACHE_SIZE: usize = 1000;

pub const DEFAULT_CACHE_TTL: u64 = 300;

pub const DEFAULT_SEARCH_LIMIT: usize = 20;
