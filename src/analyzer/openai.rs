use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use async_trait::async_trait;

use super::models::{EnhancedQuery, ImageAnalysis, SimilarityRanking};
use super::prompts::{
    build_enhance_prompt, build_ranking_prompt, ANALYSIS_SYSTEM_PROMPT, DEFAULT_ANALYSIS_PROMPT,
    QUERY_SYSTEM_PROMPT,
};
use super::{Analyzer, AnalyzerError};
use crate::core::config::PictorConfig;

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
    detail: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}


pub struct OpenAiAnalyzer {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    client: Client,
}

impl OpenAiAnalyzer {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Self {
        let base_url = base_url.into();
        let model = model.into();
        info!(
            "OpenAI analyzer initialized (model={}, url={}, timeout={}s)",
            model, base_url, timeout_secs
        );
        Self {
            base_url,
            api_key: api_key.into(),
            model,
            temperature,
            max_tokens,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub fn from_config(config: &PictorConfig) -> Self {
        Self::new(
            config.analyzer_base_url.clone(),
            config.analyzer_api_key.clone().unwrap_or_default(),
            config.analyzer_model.clone(),
            config.analyzer_temperature,
            config.analyzer_max_tokens,
            config.analyzer_timeout,
        )
    }

    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, AnalyzerError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: Some(ResponseFormat {
                r#type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .map_err(AnalyzerError::Http)?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| AnalyzerError::Provider("No choices in response".to_string()))
    }

    /// Strict parse first, then a `{...}` extraction pass for models that
    /// wrap the JSON in prose or code fences.
    fn parse_json_payload(&self, content: &str) -> Result<Value, AnalyzerError> {
        if let Ok(value) = serde_json::from_str::<Value>(content) {
            return Ok(value);
        }

        let re = Regex::new(r"(?s)\{.*\}").expect("valid regex");
        if let Some(found) = re.find(content) {
            if let Ok(value) = serde_json::from_str::<Value>(found.as_str()) {
                debug!("Recovered JSON object from loose analyzer output");
                return Ok(value);
            }
        }

        warn!(
            "Analyzer returned unparseable payload: {}",
            crate::safe_truncate_ellipsis(content, 200)
        );
        Err(AnalyzerError::Unparseable(crate::safe_truncate(
            content, 200,
        )))
    }
}

#[async_trait]
impl Analyzer for OpenAiAnalyzer {
    async fn analyze_for_search(
        &self,
        image_url: &str,
        custom_prompt: Option<&str>,
    ) -> Result<ImageAnalysis, AnalyzerError> {
        let prompt = custom_prompt.unwrap_or(DEFAULT_ANALYSIS_PROMPT);

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(ANALYSIS_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url.to_string(),
                            detail: "high".to_string(),
                        },
                    },
                ]),
            },
        ];

        let content = self.chat(messages).await?;
        let value = self.parse_json_payload(&content)?;
        let analysis: ImageAnalysis = serde_json::from_value(value)?;

        debug!(
            "Image analyzed: {} tags in {} groups, {} keywords",
            analysis.tags.values().map(|v| v.len()).sum::<usize>(),
            analysis.tags.len(),
            analysis.searchable_keywords.len()
        );

        Ok(analysis)
    }

    async fn enhance_query(&self, query: &str) -> Result<EnhancedQuery, AnalyzerError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(QUERY_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Text(build_enhance_prompt(query)),
            },
        ];

        let content = self.chat(messages).await?;
        let value = self.parse_json_payload(&content)?;
        Ok(serde_json::from_value(value)?)
    }

    async fn rank_similarity(
        &self,
        query: &str,
        descriptions: &[String],
    ) -> Result<SimilarityRanking, AnalyzerError> {
        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(QUERY_SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Text(build_ranking_prompt(query, descriptions)),
            },
        ];

        let content = self.chat(messages).await?;
        let value = self.parse_json_payload(&content)?;
        Ok(serde_json::from_value(value)?)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
