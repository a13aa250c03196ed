use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_ANALYZER_MODEL, DEFAULT_ANALYZER_TIMEOUT_SECS, DEFAULT_BATCH_DELAY_SECS,
    DEFAULT_CACHE_SIZE, DEFAULT_CACHE_TTL, DEFAULT_OPENAI_URL, DEFAULT_RECONCILE_BATCH_SIZE,
    DEFAULT_SEARCH_LIMIT,
};


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictorConfig {
    pub analyzer_base_url: String,
    pub analyzer_model: String,
    pub analyzer_api_key: Option<String>,
    pub analyzer_temperature: f64,
    pub analyzer_max_tokens: u32,
    pub analyzer_timeout: u64,

    pub storage_base_url: String,

    pub batch_delay_secs: u64,
    pub reconcile_batch_size: usize,

    pub cache_size: usize,
    pub cache_ttl: u64,

    pub default_search_limit: usize,
}

impl PictorConfig {
    pub fn new(analyzer_base_url: &str, analyzer_model: &str) -> Self {
        Self {
            analyzer_base_url: analyzer_base_url.to_string(),
            analyzer_model: analyzer_model.to_string(),
            analyzer_api_key: None,
            analyzer_temperature: 0.3,
            analyzer_max_tokens: 1500,
            analyzer_timeout: DEFAULT_ANALYZER_TIMEOUT_SECS,

            storage_base_url: "http://localhost:8000/uploads/".to_string(),

            batch_delay_secs: DEFAULT_BATCH_DELAY_SECS,
            reconcile_batch_size: DEFAULT_RECONCILE_BATCH_SIZE,

            cache_size: DEFAULT_CACHE_SIZE,
            cache_ttl: DEFAULT_CACHE_TTL,

            default_search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(
            &std::env::var("PICTOR_ANALYZER_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            &std::env::var("PICTOR_ANALYZER_MODEL")
                .unwrap_or_else(|_| DEFAULT_ANALYZER_MODEL.to_string()),
        );

        if let Ok(key) = std::env::var("PICTOR_ANALYZER_API_KEY") {
            config.analyzer_api_key = Some(key);
        }
        if let Ok(temp) = std::env::var("PICTOR_ANALYZER_TEMPERATURE") {
            if let Ok(temp) = temp.parse() {
                config.analyzer_temperature = temp;
            }
        }
        if let Ok(timeout) = std::env::var("PICTOR_ANALYZER_TIMEOUT") {
            if let Ok(timeout) = timeout.parse() {
                config.analyzer_timeout = timeout;
            }
        }
        if let Ok(url) = std::env::var("PICTOR_STORAGE_URL") {
            config.storage_base_url = url;
        }
        if let Ok(delay) = std::env::var("PICTOR_BATCH_DELAY_SECS") {
            if let Ok(delay) = delay.parse() {
                config.batch_delay_secs = delay;
            }
        }
        if let Ok(limit) = std::env::var("PICTOR_SEARCH_LIMIT") {
            if let Ok(limit) = limit.parse() {
                config.default_search_limit = limit;
            }
        }

        config
    }
}

impl Default for PictorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OPENAI_URL, DEFAULT_ANALYZER_MODEL)
    }
}
