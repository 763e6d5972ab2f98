//! Anthropic Messages API backend, grounded in the same request/retry shape
//! used throughout the pipeline's other external calls (spec §4.A retry
//! policy, generalized here to an LLM call budget of 3 attempts).

use std::time::Duration;

use async_trait::async_trait;
use hypecycle_core::LlmError;
use serde_json::{json, Value};
use tracing::{instrument, warn};

use crate::provider::{
    GenerationConfig, LlmProvider, LlmResponse, LlmResult, Message, MessageRole,
    ProviderCharacteristics, StructuredResponse,
};

const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub context_window: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl AnthropicConfig {
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| LlmError::Unavailable("ANTHROPIC_API_KEY not set".into()))?;
        let model =
            std::env::var("HYPECYCLE_ANTHROPIC_MODEL").unwrap_or_else(|_| "claude-sonnet-4-20250514".into());
        Ok(Self {
            api_key,
            model,
            context_window: 200_000,
            timeout_secs: 60,
            max_retries: 3,
        })
    }
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Unavailable(format!("failed to build http client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> LlmResult<Self> {
        Self::new(AnthropicConfig::from_env()?)
    }

    fn to_anthropic_messages(messages: &[Message]) -> (Option<String>, Vec<Value>) {
        let mut system = None;
        let mut turns = Vec::new();
        for m in messages {
            match m.role {
                MessageRole::System => system = Some(m.content.clone()),
                MessageRole::User => turns.push(json!({"role": "user", "content": m.content})),
                MessageRole::Assistant => turns.push(json!({"role": "assistant", "content": m.content})),
            }
        }
        (system, turns)
    }

    #[instrument(skip(self, body), fields(model = %self.config.model))]
    async fn try_request(&self, body: Value) -> LlmResult<Value> {
        let response = self
            .client
            .post(DEFAULT_API_BASE)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Unavailable(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Unavailable(format!("anthropic returned {status}: {text}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LlmError::Unavailable(format!("invalid response body: {e}")))
    }

    fn parse_structured_response(response: Value) -> LlmResult<StructuredResponse> {
        let prompt_tokens = response["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = response["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32;

        let tool_use = response["content"]
            .as_array()
            .and_then(|blocks| blocks.iter().find(|b| b["type"] == "tool_use"))
            .ok_or_else(|| LlmError::SchemaViolation("model did not call the structured-output tool".into()))?;

        Ok(StructuredResponse {
            value: tool_use["input"].clone(),
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
                    warn!(attempt, error = %e, "anthropic request failed, retrying");
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
                }
            }
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn characteristics(&self) -> ProviderCharacteristics {
        ProviderCharacteristics {
            max_tokens_per_minute: 200_000,
            max_requests_per_minute: 1_000,
            typical_latency_ms: 2_000,
            supports_structured_output: true,
        }
    }

    async fn generate(&self, messages: &[Message], config: &GenerationConfig) -> LlmResult<LlmResponse> {
        let (system, turns) = Self::to_anthropic_messages(messages);
        let mut body = json!({
            "model": self.config.model,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "top_p": config.top_p,
            "messages": turns,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }

        let response = self.send_request(body).await?;
        let content = response["content"][0]["text"].as_str().unwrap_or_default().to_string();
        let prompt_tokens = response["usage"]["input_tokens"].as_u64().unwrap_or(0) as u32;
        let completion_tokens = response["usage"]["output_tokens"].as_u64().unwrap_or(0) as u32;
        let finish_reason = response["stop_reason"].as_str().unwrap_or("unknown").to_string();

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
        let (system, mut turns) = Self::to_anthropic_messages(messages);
        let tool = json!({
            "name": schema_name,
            "description": format!("Return {schema_name} as structured output"),
            "input_schema": schema,
        });

        if let Some(last) = turns.last_mut() {
            let content = last["content"].as_str().unwrap_or_default().to_string();
            last["content"] = json!(format!(
                "{content}\n\nRespond only by calling the `{schema_name}` tool with your answer."
            ));
        }

        let mut body = json!({
            "model": self.config.model,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "top_p": config.top_p,
            "messages": turns,
            "tools": [tool],
            "tool_choice": {"type": "tool", "name": schema_name},
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }

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
        !self.config.api_key.is_empty()
    }
}
