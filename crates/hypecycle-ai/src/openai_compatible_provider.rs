//! Backend for any OpenAI-chat-compatible endpoint (local Ollama/LM Studio
//! servers, or a hosted OpenAI-compatible gateway). Grounded in the same
//! request/retry shape as [`crate::anthropic_provider::AnthropicProvider`];
//! the two differ only in wire format.

use std::time::Duration;

use async_trait::async_trait;
use hypecycle_core::LlmError;
use serde_json::{json, Value};
use tracing::warn;

use crate::provider::{
    GenerationConfig, LlmProvider, LlmResponse, LlmResult, Message, MessageRole,
    ProviderCharacteristics, StructuredResponse,
};

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl OpenAiCompatibleConfig {
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            base_url: "http://localhost:11434/v1/chat/completions".into(),
            api_key: None,
            model: model.into(),
            timeout_secs: 120,
            max_retries: 3,
        }
    }
}

pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatibleConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn to_chat_messages(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                };
                json!({"role": role, "content": m.content})
            })
            .collect()
    }

    async fn try_request(&self, body: Value) -> LlmResult<Value> {
        let mut request = self.client.post(&self.config.base_url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Unavailable(format!("provider returned {status}: {text}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Unavailable(format!("invalid response body: {e}")))
    }

    fn parse_structured_response(response: Value) -> LlmResult<StructuredResponse> {
        let prompt_tokens = response["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = response["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32;
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::SchemaViolation("provider returned no message content".into()))?;
        let value: Value = serde_json::from_str(content)
            .map_err(|e| LlmError::SchemaViolation(format!("structured output was not valid JSON: {e}")))?;

        Ok(StructuredResponse {
            value,
            prompt_tokens,
            completion_tokens,
            generated_at: chrono::Utc::now(),
        })
    }

    async fn send_request(&self, body: Value) -> LlmResult<Value> {
        let mut attempt = 0;
        loop {
            match self.try_request(body.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.config.max_retries {
                        return Err(e);
                    }
                    warn!(attempt, error = %e, "openai-compatible request failed, retrying");
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
                }
            }
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn characteristics(&self) -> ProviderCharacteristics {
        ProviderCharacteristics {
            max_tokens_per_minute: 0,
            max_requests_per_minute: 0,
            typical_latency_ms: 3_000,
            supports_structured_output: true,
        }
    }

    async fn generate(&self, messages: &[Message], config: &GenerationConfig) -> LlmResult<LlmResponse> {
        let body = json!({
            "model": self.config.model,
            "messages": Self::to_chat_messages(messages),
            "temperature": config.temperature,
            "top_p": config.top_p,
            "max_tokens": config.max_tokens,
        });

        let response = self.send_request(body).await?;
        let choice = &response["choices"][0];
        let content = choice["message"]["content"].as_str().unwrap_or_default().to_string();
        let prompt_tokens = response["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = response["usage"]["completion_tokens"].as_u64().unwrap_or(0) as u32;
        let finish_reason = choice["finish_reason"].as_str().unwrap_or("unknown").to_string();

        Ok(LlmResponse {
            content,
            prompt_tokens,
            completion_tokens,
            finish_reason,
        })
    }

    async fn generate_structured(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
        schema_name: &str,
        schema: &Value,
    ) -> LlmResult<StructuredResponse> {
        let body = json!({
            "model": self.config.model,
            "messages": Self::to_chat_messages(messages),
            "temperature": config.temperature,
            "top_p": config.top_p,
            "max_tokens": config.max_tokens,
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": schema_name, "schema": schema, "strict": true},
            },
        });

        // Schema-parse failures get their own retry budget, separate from the
        // transport retries inside `send_request`: the same prompt is re-sent
        // up to twice more before degrading (spec §4.L retry policy).
        let mut attempt = 0;
        loop {
            let response = self.send_request(body.clone()).await?;
            match Self::parse_structured_response(response) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => {
                    attempt += 1;
                    if attempt > 2 {
                        return Err(e);
                    }
                    warn!(attempt, error = %e, "structured output failed schema validation, retrying with same prompt");
                }
            }
        }
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(&self.config.base_url)
            .send()
            .await
            .map(|r| r.status().is_success() || r.status().as_u16() == 405)
            .unwrap_or(false)
    }
}
