//! DeepSeek chat-completions client.
//!
//! Works with any OpenAI-compatible `/chat/completions` endpoint that supports
//! `response_format: {"type": "json_object"}`.
//!
//! Each batch is sent as a flat JSON object `{identifier: source text}`; the
//! identifiers are dotted key paths, so they also tell the model where a string
//! lives (`"Auth.Login.button"`). The reply must be a JSON object with the same
//! identifiers mapped to translated strings.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{RetryPolicy, TranslationMap, Translator};
use crate::batch::TranslationBatch;
use crate::error::ProviderError;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";
pub const BASE_URL_ENV: &str = "DEEPSEEK_BASE_URL";

const TEMPERATURE: f32 = 0.1;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const PROMPT: &str = "You are a professional translator that translates the values in the JSON object from {source_lang} to {target_lang}.
Preserve all keys exactly, only return valid JSON without explanations.
Keys are dotted paths into the original file and provide context for translation.
Do not translate or modify interpolation or nesting like {{value}}, $t(key). All other words should be translated normally.";

pub fn system_prompt(source_lang: &str, target_lang: &str) -> String {
    PROMPT
        .replace("{source_lang}", source_lang)
        .replace("{target_lang}", target_lang)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

impl DeepSeekClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send(&self, request: &ChatRequest<'_>) -> Result<TranslationMap, ProviderError> {
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth {
                    status: status.as_u16(),
                    message,
                },
                429 => ProviderError::RateLimited { message },
                code => ProviderError::Status {
                    status: code,
                    message,
                },
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid response body: {}", e)))?;

        if let Some(usage) = &parsed.usage {
            info!(
                "Translation request completed (tokens: {})",
                usage.total_tokens
            );
        }

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("response contained no message".to_string())
            })?;

        parse_content(&content)
    }
}

#[async_trait]
impl Translator for DeepSeekClient {
    async fn translate(&self, batch: &TranslationBatch) -> Result<TranslationMap, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(&batch.source_lang, &batch.target_lang),
                },
                ChatMessage {
                    role: "user",
                    content: batch.payload().to_string(),
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            stream: false,
        };

        debug!(
            "Sending batch {} ({} keys, {} -> {})",
            batch.index,
            batch.len(),
            batch.source_lang,
            batch.target_lang
        );
        self.retry.run(|| self.send(&request)).await
    }
}

/// Parse the model's message content into a translation map.
///
/// Tolerates a surrounding Markdown code fence.
fn parse_content(content: &str) -> Result<TranslationMap, ProviderError> {
    let trimmed = strip_code_fence(content.trim());
    let value: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
        ProviderError::MalformedResponse(format!("content is not valid JSON: {}", e))
    })?;

    let serde_json::Value::Object(map) = value else {
        return Err(ProviderError::MalformedResponse(
            "content is not a JSON object".to_string(),
        ));
    };

    map.into_iter()
        .map(|(id, value)| match value {
            serde_json::Value::String(text) => Ok((id, text)),
            other => Err(ProviderError::MalformedResponse(format!(
                "translation for \"{}\" is not a string: {}",
                id, other
            ))),
        })
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
