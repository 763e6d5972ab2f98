use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hypecycle_core::LlmError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type LlmResult<T> = Result<T, LlmError>;

/// What an `LlmProvider` can be relied on for, used by the orchestrator to
/// pick timeouts and retry budgets per provider (spec §4.C "LLM call
/// budget").
#[derive(Debug, Clone, Copy)]
pub struct ProviderCharacteristics {
    pub max_tokens_per_minute: u32,
    pub max_requests_per_minute: u32,
    pub typical_latency_ms: u32,
    pub supports_structured_output: bool,
}

/// Sampling and structured-output controls for a single generation call
/// (spec §4.C "scoring prompt"). `temperature` defaults low: layer scoring
/// and narrative generation are meant to be stable across re-runs, not
/// creative.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Raw text-completion response, returned by [`LlmProvider::generate`].
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub finish_reason: String,
}

/// A provider's answer to one structured-output request: the schema-checked
/// JSON value plus bookkeeping used by the evidence compiler and the
/// pipeline's own metrics (spec §4.C, §4.F).
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    pub value: Value,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub generated_at: DateTime<Utc>,
}

/// Abstraction over a language model backend (spec §6.3 "LLM backend" as an
/// external collaborator). Every provider must be able to produce
/// schema-conformant JSON, since layer scorers and the narrative generator
/// never accept free text (spec §4.C, §4.F invariant).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;
    fn model_name(&self) -> &str;
    fn characteristics(&self) -> ProviderCharacteristics;

    async fn generate(&self, messages: &[Message], config: &GenerationConfig) -> LlmResult<LlmResponse>;

    /// Generate a response constrained to `schema`, a JSON Schema document
    /// (spec §4.C "typed scoring output", §4.F "typed narrative output").
    /// Implementations that cannot enforce the schema natively must still
    /// validate the model's output against it before returning.
    async fn generate_structured(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
        schema_name: &str,
        schema: &Value,
    ) -> LlmResult<StructuredResponse>;

    async fn is_available(&self) -> bool;
}
