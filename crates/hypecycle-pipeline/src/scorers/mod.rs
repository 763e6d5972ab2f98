//! Layer scorers (component C, spec §4.C): four implementations of one
//! shared contract. Spec §9 Design Notes prefers "instances of a single
//! interface" over class inheritance here — each scorer collects its own
//! metrics and builds its own prompt, but all four share the
//! assemble-score-clamp-degrade pipeline in [`run_scorer`].

mod adoption;
mod innovation;
mod narrative;
mod risk;

pub use adoption::AdoptionScorer;
pub use innovation::InnovationScorer;
pub use narrative::NarrativeScorer;
pub use risk::RiskScorer;

use async_trait::async_trait;
use chrono::NaiveDate;
use hypecycle_ai::{GenerationConfig, LayerScoreOutput, LlmProvider, Message, MessageRole};
use hypecycle_core::{Confidence, Layer, LayerBlock};
use hypecycle_graph::GraphAccessors;
use serde_json::Value;
use tracing::warn;

/// Everything a scorer needs to assemble metrics and call the LLM adapter.
pub struct ScoringInput<'a> {
    pub graph: &'a dyn GraphAccessors,
    pub llm: &'a dyn LlmProvider,
    pub external_search: &'a dyn crate::external_search::ExternalSearchProvider,
    pub enable_external_search: bool,
    pub tech_id: &'a str,
    pub tech_name: &'a str,
    pub community_version: &'a str,
    pub anchor_date: NaiveDate,
    pub temperature: f32,
}

/// Capability set shared by all four layer scorers (spec §9 "Polymorphism
/// over layer scorers"): `collect_metrics`, `build_prompt`,
/// `parse_llm_output` expressed as one trait rather than four ad hoc
/// functions per layer.
#[async_trait]
pub trait LayerScorer: Send + Sync {
    fn layer(&self) -> Layer;

    /// Assembles this layer's metrics via graph accessors (spec §4.C step 1).
    /// Any exhausted-retry `GraphUnavailable` is appended to `errors` rather
    /// than propagated (spec §7.1: the stage degrades, it does not fail).
    async fn collect_metrics(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> Value;

    /// Builds the scoring prompt from the assembled metrics (spec §4.C step 2).
    fn build_prompt(&self, tech_name: &str, metrics: &Value) -> Vec<Message>;

    /// Runs the shared assemble-score-clamp-degrade pipeline (spec §4.C
    /// steps 1-5, failure semantics).
    async fn score(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> LayerBlock {
        let metrics = self.collect_metrics(input, errors).await;
        let messages = self.build_prompt(input.tech_name, &metrics);
        run_scorer(input.llm, &messages, input.temperature, metrics).await
    }
}

/// Runs a graph accessor call through the retry policy and records
/// `graph_unavailable` on exhaustion, returning `default` so the scorer can
/// keep going with partial metrics (spec §7.1).
pub(crate) async fn retried_or_default<T, F, Fut>(errors: &mut Vec<String>, op: F) -> T
where
    T: Default,
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = hypecycle_graph::GraphResult<T>>,
{
    match hypecycle_graph::retry_graph_call(3, op).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "graph accessor exhausted retries");
            errors.push("graph_unavailable".to_string());
            T::default()
        }
    }
}

/// Calls the LLM for a `{score, reasoning, confidence}` structured output,
/// clamps the score into `[0, 100]`, and degrades gracefully on any LLM
/// error (spec §4.C failure semantics: "never raise out of the stage").
pub async fn run_scorer(
    llm: &dyn LlmProvider,
    messages: &[Message],
    temperature: f32,
    metrics: Value,
) -> LayerBlock {
    let config = GenerationConfig {
        temperature,
        ..GenerationConfig::default()
    };
    let schema = hypecycle_ai::schema_of::<LayerScoreOutput>();

    match llm
        .generate_structured(messages, &config, "LayerScoreOutput", &schema)
        .await
    {
        Ok(response) => match serde_json::from_value::<LayerScoreOutput>(response.value) {
            Ok(output) => LayerBlock {
                score: output.score.clamp(0.0, 100.0),
                reasoning: output.reasoning,
                metrics,
                confidence: output.confidence.into(),
            },
            Err(e) => {
                warn!(error = %e, "layer scorer received a schema-violating response");
                degraded_block(metrics)
            }
        },
        Err(e) => {
            warn!(error = %e, "layer scorer's LLM call failed after retries");
            degraded_block(metrics)
        }
    }
}

fn degraded_block(metrics: Value) -> LayerBlock {
    LayerBlock {
        score: 0.0,
        reasoning: "upstream_error".to_string(),
        metrics,
        confidence: Confidence::Low,
    }
}

pub(crate) fn system_message(text: impl Into<String>) -> Message {
    Message {
        role: MessageRole::System,
        content: text.into(),
    }
}

pub(crate) fn user_message(text: impl Into<String>) -> Message {
    Message {
        role: MessageRole::User,
        content: text.into(),
    }
}
