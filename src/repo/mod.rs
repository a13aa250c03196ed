pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{AnalysisStatus, ContentItem, Tag, TagAssociation};

pub use memory::MemoryRepository;

#[derive(Error, Debug)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}


/// The AI-produced fields written back to an item in one step when an
/// analysis run succeeds. Status moves to `Completed` atomically with them.
#[derive(Debug, Clone)]
pub struct AnalysisUpdate {
    pub description: String,
    pub confidence: f64,
    pub analyzer_model: String,
    pub mood: Option<String>,
    pub style: Option<String>,
    pub searchable_keywords: Vec<String>,
    pub raw_analysis: serde_json::Value,
}


#[derive(Debug, Clone)]
pub struct AssociationInsert {
    pub tag_id: Uuid,
    pub confidence: f64,
    pub source: String,
}


#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn item(&self, id: Uuid) -> Result<Option<ContentItem>, RepoError>;

    async fn insert_item(&self, item: ContentItem) -> Result<(), RepoError>;

    async fn apply_analysis(&self, id: Uuid, update: AnalysisUpdate) -> Result<(), RepoError>;

    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<(), RepoError>;

    /// Transitions every listed item to `Pending` in one step, so concurrent
    /// status reads observe "in progress" rather than a stale prior state.
    async fn mark_pending(&self, ids: &[Uuid]) -> Result<(), RepoError>;

    async fn record_view(&self, id: Uuid) -> Result<(), RepoError>;

    async fn active_items(&self) -> Result<Vec<ContentItem>, RepoError>;

    /// Active items ordered by creation time descending, capped at `limit`.
    async fn recent_active_items(&self, limit: usize) -> Result<Vec<ContentItem>, RepoError>;

    async fn get_or_create_tag(&self, name: &str, category: &str) -> Result<Tag, RepoError>;

    async fn tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError>;

    async fn popular_tags(&self, limit: usize) -> Result<Vec<Tag>, RepoError>;

    async fn tag_names_for_item(&self, item_id: Uuid) -> Result<Vec<String>, RepoError>;

    async fn associations_for_item(&self, item_id: Uuid)
        -> Result<Vec<TagAssociation>, RepoError>;

    /// Removes every association of the item and decrements the affected
    /// tags' usage counts in the same step. Returns the number removed.
    async fn clear_associations(&self, item_id: Uuid) -> Result<usize, RepoError>;

    /// Inserts a batch of associations atomically: either every new pair in
    /// the batch lands with its usage-count increment, or none do. Existing
    /// (item, tag) pairs are skipped, not duplicated. Returns the number
    /// actually inserted.
    async fn insert_associations(
        &self,
        item_id: Uuid,
        batch: &[AssociationInsert],
    ) -> Result<usize, RepoError>;
}


#[async_trait]
impl CatalogRepository for Arc<dyn CatalogRepository> {
    async fn item(&self, id: Uuid) -> Result<Option<ContentItem>, RepoError> {
        (**self).item(id).await
    }

    async fn insert_item(&self, item: ContentItem) -> Result<(), RepoError> {
        (**self).insert_item(item).await
    }

    async fn apply_analysis(&self, id: Uuid, update: AnalysisUpdate) -> Result<(), RepoError> {
        (**self).apply_analysis(id, update).await
    }

    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<(), RepoError> {
        (**self).set_status(id, status).await
    }

    async fn mark_pending(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        (**self).mark_pending(ids).await
    }

    async fn record_view(&self, id: Uuid) -> Result<(), RepoError> {
        (**self).record_view(id).await
    }

    async fn active_items(&self) -> Result<Vec<ContentItem>, RepoError> {
        (**self).active_items().await
    }

    async fn recent_active_items(&self, limit: usize) -> Result<Vec<ContentItem>, RepoError> {
        (**self).recent_active_items(limit).await
    }

    async fn get_or_create_tag(&self, name: &str, category: &str) -> Result<Tag, RepoError> {
        (**self).get_or_create_tag(name, category).await
    }

    async fn tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        (**self).tag_by_name(name).await
    }

    async fn popular_tags(&self, limit: usize) -> Result<Vec<Tag>, RepoError> {
        (**self).popular_tags(limit).await
    }

    async fn tag_names_for_item(&self, item_id: Uuid) -> Result<Vec<String>, RepoError> {
        (**self).tag_names_for_item(item_id).await
    }

    async fn associations_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<TagAssociation>, RepoError> {
        (**self).associations_for_item(item_id).await
    }

    async fn clear_associations(&self, item_id: Uuid) -> Result<usize, RepoError> {
        (**self).clear_associations(item_id).await
    }

    async fn insert_associations(
        &self,
        item_id: Uuid,
        batch: &[AssociationInsert],
    ) -> Result<usize, RepoError> {
        (**self).insert_associations(item_id, batch).await
    }
}
