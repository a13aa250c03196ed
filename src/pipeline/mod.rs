pub mod batch;
pub mod orchestrator;
pub mod reconcile;

pub use batch::{BatchAnalyzer, BatchStats};
pub use orchestrator::AnalysisOrchestrator;
pub use reconcile::{extract_tag_specs, ReconcileReport, TagReconciler};
