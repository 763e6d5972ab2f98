//! Typed structured-output schemas, one per LLM-assisted stage (spec §4.C
//! "typed scoring output", §4.F "typed narrative output"). Modeled on the
//! teacher's `agentic_schemas.rs`: every shape the model can return derives
//! `JsonSchema` so its schema can be handed straight to a provider.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a layer scorer's LLM call must return (spec §4.C step 3).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LayerScoreOutput {
    /// 0-100; out-of-range values are clamped by the caller, not here.
    pub score: f64,
    pub reasoning: String,
    pub confidence: ConfidenceOutput,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceOutput {
    Low,
    Medium,
    High,
}

impl From<ConfidenceOutput> for hypecycle_core::Confidence {
    fn from(value: ConfidenceOutput) -> Self {
        match value {
            ConfidenceOutput::Low => hypecycle_core::Confidence::Low,
            ConfidenceOutput::Medium => hypecycle_core::Confidence::Medium,
            ConfidenceOutput::High => hypecycle_core::Confidence::High,
        }
    }
}

/// What the narrative generator's LLM call must return (spec §4.F).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NarrativeOutput {
    /// 3-4 sentence executive summary.
    pub summary: String,
    /// Single-sentence key insight.
    pub key_insight: String,
    pub recommendation: RecommendationOutput,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationOutput {
    Invest,
    Monitor,
    Avoid,
    Caution,
}

impl From<RecommendationOutput> for hypecycle_core::Recommendation {
    fn from(value: RecommendationOutput) -> Self {
        match value {
            RecommendationOutput::Invest => hypecycle_core::Recommendation::Invest,
            RecommendationOutput::Monitor => hypecycle_core::Recommendation::Monitor,
            RecommendationOutput::Avoid => hypecycle_core::Recommendation::Avoid,
            RecommendationOutput::Caution => hypecycle_core::Recommendation::Caution,
        }
    }
}

/// Renders `T`'s JSON Schema as the `serde_json::Value` a provider expects.
pub fn schema_of<T: schemars::JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(T)).expect("schemars output is always valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_score_schema_is_an_object() {
        let schema = schema_of::<LayerScoreOutput>();
        assert!(schema.get("properties").is_some());
    }
}
