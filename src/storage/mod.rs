use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage base URL: {0}")]
    InvalidBase(String),

    #[error("Unresolvable content reference: {0}")]
    Unresolvable(String),
}


/// Turns an internal content reference into a URL the analyzer can fetch.
/// Raw file paths are never handed to the analyzer directly.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn resolve_url(&self, content_ref: &str) -> Result<String, StorageError>;
}

#[async_trait]
impl Storage for Arc<dyn Storage> {
    async fn resolve_url(&self, content_ref: &str) -> Result<String, StorageError> {
        (**self).resolve_url(content_ref).await
    }
}


/// Resolves relative references against a configured base URL.
/// References that are already absolute URLs pass through unchanged.
pub struct BaseUrlStorage {
    base: Url,
}

impl BaseUrlStorage {
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url).map_err(|e| {
            StorageError::InvalidBase(format!("{}: {}", base_url, e))
        })?;
        info!("BaseUrlStorage initialized (base={})", base);
        Ok(Self { base })
    }
}

#[async_trait]
impl Storage for BaseUrlStorage {
    async fn resolve_url(&self, content_ref: &str) -> Result<String, StorageError> {
        if let Ok(absolute) = Url::parse(content_ref) {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                return Ok(absolute.to_string());
            }
        }

        let trimmed = content_ref.trim_start_matches('/');
        self.base
            .join(trimmed)
            .map(|u| u.to_string())
            .map_err(|_| StorageError::Unresolvable(content_ref.to_string()))
    }
}
