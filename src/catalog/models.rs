use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    Completed,
    Failed,
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub content_ref: String,

    pub description: String,
    pub confidence: f64,
    pub status: AnalysisStatus,
    pub analyzer_model: String,
    pub mood: Option<String>,
    pub style: Option<String>,
    pub searchable_keywords: Vec<String>,
    pub raw_analysis: Option<serde_json::Value>,

    pub view_count: u64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(content_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_ref: content_ref.into(),
            description: String::new(),
            confidence: 0.0,
            status: AnalysisStatus::Pending,
            analyzer_model: String::new(),
            mood: None,
            style: None,
            searchable_keywords: Vec::new(),
            raw_analysis: None,
            view_count: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            usage_count: 0,
            created_at: Utc::now(),
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagAssociation {
    pub item_id: Uuid,
    pub tag_id: Uuid,
    pub confidence: f64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}


#[derive(Debug, Clone, PartialEq)]
pub struct TagSpec {
    pub name: String,
    pub confidence: f64,
    pub source: String,
}

impl TagSpec {
    pub fn new(name: impl Into<String>, confidence: f64, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            confidence,
            source: source.into(),
        }
    }
}
