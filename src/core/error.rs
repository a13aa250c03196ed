use thiserror::Error;

use crate::analyzer::AnalyzerError;
use crate::repo::RepoError;

#[derive(Error, Debug)]
pub enum PictorError {
    #[error("Content item not found: {0}")]
    ItemNotFound(String),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PictorError>;
