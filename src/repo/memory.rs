use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::{AnalysisUpdate, AssociationInsert, CatalogRepository, RepoError};
use crate::catalog::{AnalysisStatus, ContentItem, Tag, TagAssociation};

#[derive(Default)]
struct Store {
    items: HashMap<Uuid, ContentItem>,
    tags: HashMap<Uuid, Tag>,
    tag_ids_by_name: HashMap<String, Uuid>,
    associations: HashMap<(Uuid, Uuid), TagAssociation>,
}


/// In-memory repository. Every method takes the write or read lock once,
/// so each call is atomic with respect to every other call.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogRepository for MemoryRepository {
    async fn item(&self, id: Uuid) -> Result<Option<ContentItem>, RepoError> {
        Ok(self.store.read().items.get(&id).cloned())
    }

    async fn insert_item(&self, item: ContentItem) -> Result<(), RepoError> {
        let mut store = self.store.write();
        if store.items.contains_key(&item.id) {
            return Err(RepoError::Conflict(format!("item {} already exists", item.id)));
        }
        store.items.insert(item.id, item);
        Ok(())
    }

    async fn apply_analysis(&self, id: Uuid, update: AnalysisUpdate) -> Result<(), RepoError> {
        let mut store = self.store.write();
        let item = store
            .items
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("item {}", id)))?;

        item.description = update.description;
        item.confidence = update.confidence;
        item.analyzer_model = update.analyzer_model;
        item.mood = update.mood;
        item.style = update.style;
        item.searchable_keywords = update.searchable_keywords;
        item.raw_analysis = Some(update.raw_analysis);
        item.status = AnalysisStatus::Completed;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: AnalysisStatus) -> Result<(), RepoError> {
        let mut store = self.store.write();
        let item = store
            .items
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("item {}", id)))?;
        item.status = status;
        Ok(())
    }

    async fn mark_pending(&self, ids: &[Uuid]) -> Result<(), RepoError> {
        let mut store = self.store.write();
        for id in ids {
            if let Some(item) = store.items.get_mut(id) {
                item.status = AnalysisStatus::Pending;
            }
        }
        Ok(())
    }

    async fn record_view(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write();
        let item = store
            .items
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("item {}", id)))?;
        item.view_count += 1;
        Ok(())
    }

    async fn active_items(&self) -> Result<Vec<ContentItem>, RepoError> {
        Ok(self
            .store
            .read()
            .items
            .values()
            .filter(|i| i.is_active)
            .cloned()
            .collect())
    }

    async fn recent_active_items(&self, limit: usize) -> Result<Vec<ContentItem>, RepoError> {
        let mut items: Vec<ContentItem> = self
            .store
            .read()
            .items
            .values()
            .filter(|i| i.is_active)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        items.truncate(limit);
        Ok(items)
    }

    async fn get_or_create_tag(&self, name: &str, category: &str) -> Result<Tag, RepoError> {
        let mut store = self.store.write();
        if let Some(id) = store.tag_ids_by_name.get(name) {
            return Ok(store.tags[id].clone());
        }
        let tag = Tag::new(name, category);
        store.tag_ids_by_name.insert(name.to_string(), tag.id);
        store.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn tag_by_name(&self, name: &str) -> Result<Option<Tag>, RepoError> {
        let store = self.store.read();
        Ok(store
            .tag_ids_by_name
            .get(name)
            .and_then(|id| store.tags.get(id))
            .cloned())
    }

    async fn popular_tags(&self, limit: usize) -> Result<Vec<Tag>, RepoError> {
        let mut tags: Vec<Tag> = self.store.read().tags.values().cloned().collect();
        tags.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then(a.name.cmp(&b.name)));
        tags.truncate(limit);
        Ok(tags)
    }

    async fn tag_names_for_item(&self, item_id: Uuid) -> Result<Vec<String>, RepoError> {
        let store = self.store.read();
        Ok(store
            .associations
            .keys()
            .filter(|(item, _)| *item == item_id)
            .filter_map(|(_, tag_id)| store.tags.get(tag_id).map(|t| t.name.clone()))
            .collect())
    }

    async fn associations_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<TagAssociation>, RepoError> {
        Ok(self
            .store
            .read()
            .associations
            .values()
            .filter(|a| a.item_id == item_id)
            .cloned()
            .collect())
    }

    async fn clear_associations(&self, item_id: Uuid) -> Result<usize, RepoError> {
        let mut store = self.store.write();
        let keys: Vec<(Uuid, Uuid)> = store
            .associations
            .keys()
            .filter(|(item, _)| *item == item_id)
            .copied()
            .collect();

        for key in &keys {
            store.associations.remove(key);
            if let Some(tag) = store.tags.get_mut(&key.1) {
                tag.usage_count = tag.usage_count.saturating_sub(1);
            }
        }
        Ok(keys.len())
    }

    async fn insert_associations(
        &self,
        item_id: Uuid,
        batch: &[AssociationInsert],
    ) -> Result<usize, RepoError> {
        let mut store = self.store.write();

        // Validate the whole batch before mutating anything.
        if !store.items.contains_key(&item_id) {
            return Err(RepoError::NotFound(format!("item {}", item_id)));
        }
        for insert in batch {
            if !store.tags.contains_key(&insert.tag_id) {
                return Err(RepoError::NotFound(format!("tag {}", insert.tag_id)));
            }
        }

        let mut inserted = 0;
        for insert in batch {
            let key = (item_id, insert.tag_id);
            if store.associations.contains_key(&key) {
                continue;
            }
            store.associations.insert(
                key,
                TagAssociation {
                    item_id,
                    tag_id: insert.tag_id,
                    confidence: insert.confidence,
                    source: insert.source.clone(),
                    created_at: Utc::now(),
                },
            );
            if let Some(tag) = store.tags.get_mut(&insert.tag_id) {
                tag.usage_count += 1;
            }
            inserted += 1;
        }
        Ok(inserted)
    }
}
