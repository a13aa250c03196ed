pub mod models;

pub use models::{AnalysisStatus, ContentItem, Tag, TagAssociation, TagSpec};
