use async_trait::async_trait;
use chrono::Duration;
use hypecycle_ai::Message;
use hypecycle_core::{Layer, LayerBlock};
use hypecycle_graph::GraphAccessors;
use serde_json::{json, Value};

use super::{retried_or_default, run_scorer, system_message, user_message, LayerScorer, ScoringInput};

/// Narrative layer scorer (spec §4.C.3): news volume across three outlet
/// tiers, plus an optional freshness probe against an external search
/// collaborator.
///
/// Freshness definition (spec §9 Open Question 1, resolved here): computed
/// as the fraction `external_recent / (news_count_6mo + external_recent)`.
/// The spec's adjustment bands (`> 3.0`, `1.5..3.0`) are written for a
/// ratio that can exceed 1 and are therefore structurally unreachable under
/// this fraction — that inconsistency is inherited from the source and
/// preserved as written rather than silently corrected; only the `< 0.5`
/// band (and the disabled-search constant 0.33, which also falls under
/// 0.5) is reachable in practice. See `DESIGN.md`.
pub struct NarrativeScorer;

impl NarrativeScorer {
    fn freshness_adjustment(freshness: f64) -> f64 {
        if freshness > 3.0 {
            30.0
        } else if freshness > 1.5 {
            15.0
        } else if freshness < 0.5 {
            -20.0
        } else {
            0.0
        }
    }
}

#[async_trait]
impl LayerScorer for NarrativeScorer {
    fn layer(&self) -> Layer {
        Layer::Narrative
    }

    async fn collect_metrics(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> Value {
        let end = input.anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let start = end - Duration::days(Layer::Narrative.temporal_window_days());

        let news =
            retried_or_default(errors, || input.graph.news_activity(input.tech_id, start, end)).await;

        let freshness = if input.enable_external_search {
            match input.external_search.recent_count(input.tech_name, 30).await {
                Ok(external_recent) => {
                    let denom = news.activity.news_count + external_recent;
                    if denom > 0 {
                        external_recent as f64 / denom as f64
                    } else {
                        0.0
                    }
                }
                Err(e) => {
                    errors.push("external_search_unavailable".to_string());
                    tracing::warn!(error = %e, "external search probe failed");
                    0.33
                }
            }
        } else {
            0.33
        };

        json!({
            "news_count": news.activity.news_count,
            "tier1_count": news.activity.tier1_count,
            "tier2_count": news.activity.tier2_count,
            "tier3_count": news.activity.tier3_count,
            "freshness": freshness,
            "external_search_enabled": input.enable_external_search,
        })
    }

    fn build_prompt(&self, tech_name: &str, metrics: &Value) -> Vec<Message> {
        vec![
            system_message(
                "You are scoring the Narrative layer of a technology hype-cycle analysis \
                 based on news volume and the share of tier-1 (industry authority) outlets. \
                 Higher tier1 share and higher total volume indicate stronger narrative \
                 presence. Return a score in [0,100], a short reasoning, and a confidence \
                 level; freshness adjustments are applied separately, do not apply them \
                 yourself.",
            ),
            user_message(format!(
                "Technology: {tech_name}\nMetrics: {}",
                serde_json::to_string_pretty(metrics).unwrap_or_default()
            )),
        ]
    }

    async fn score(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> LayerBlock {
        let metrics = self.collect_metrics(input, errors).await;
        let messages = self.build_prompt(input.tech_name, &metrics);
        let freshness = metrics["freshness"].as_f64().unwrap_or(0.33);
        let adjustment = Self::freshness_adjustment(freshness);

        let mut block = run_scorer(input.llm, &messages, input.temperature, metrics).await;
        block.score = (block.score + adjustment).clamp(0.0, 100.0);
        block
    }
}
