//! Narrative generator (component F, spec §4.F): produces the executive
//! summary, key insight, and recommendation shown to a human reader. Not to
//! be confused with the narrative *layer scorer* (component C.3), which
//! produces a numeric score from news evidence.

use hypecycle_ai::{GenerationConfig, LlmProvider, Message, MessageRole, NarrativeOutput};
use hypecycle_core::{NarrativeBlock, Phase};
use serde_json::json;
use tracing::warn;

/// Generates the narrative block from the four layer scores, hype, phase,
/// and divergence (spec §4.F). Failures degrade to the documented fallback
/// text rather than propagating (spec §4.F "Failures degrade").
pub async fn generate_narrative(
    llm: &dyn LlmProvider,
    tech_name: &str,
    innovation: f64,
    adoption: f64,
    narrative: f64,
    risk: f64,
    hype: f64,
    phase: Phase,
    layer_divergence: f64,
    temperature: f32,
) -> NarrativeBlock {
    let metrics = json!({
        "innovation": innovation,
        "adoption": adoption,
        "narrative": narrative,
        "risk": risk,
        "hype": hype,
        "phase": phase,
        "layer_divergence": layer_divergence,
    });

    let messages = vec![
        Message {
            role: MessageRole::System,
            content: "You write a 3-4 sentence executive summary, a single-sentence key \
                      insight, and a recommendation (invest, monitor, avoid, or caution) for \
                      a technology's hype-cycle position, given its four layer scores, hype \
                      score, phase, and layer divergence."
                .to_string(),
        },
        Message {
            role: MessageRole::User,
            content: format!(
                "Technology: {tech_name}\nAnalysis: {}",
                serde_json::to_string_pretty(&metrics).unwrap_or_default()
            ),
        },
    ];

    let config = GenerationConfig {
        temperature,
        ..GenerationConfig::default()
    };
    let schema = hypecycle_ai::schema_of::<NarrativeOutput>();

    match llm
        .generate_structured(&messages, &config, "NarrativeOutput", &schema)
        .await
    {
        Ok(response) => match serde_json::from_value::<NarrativeOutput>(response.value) {
            Ok(output) => NarrativeBlock {
                executive_summary: output.summary,
                key_insight: output.key_insight,
                recommendation: recommendation_str(output.recommendation.into()),
            },
            Err(e) => {
                warn!(error = %e, "narrative generator received a schema-violating response");
                degraded_narrative()
            }
        },
        Err(e) => {
            warn!(error = %e, "narrative generator's LLM call failed after retries");
            degraded_narrative()
        }
    }
}

fn recommendation_str(recommendation: hypecycle_core::Recommendation) -> String {
    match recommendation {
        hypecycle_core::Recommendation::Invest => "invest",
        hypecycle_core::Recommendation::Monitor => "monitor",
        hypecycle_core::Recommendation::Avoid => "avoid",
        hypecycle_core::Recommendation::Caution => "caution",
    }
    .to_string()
}

fn degraded_narrative() -> NarrativeBlock {
    NarrativeBlock {
        executive_summary: "analysis_unavailable".to_string(),
        key_insight: String::new(),
        recommendation: "monitor".to_string(),
    }
}
