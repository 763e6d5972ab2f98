use async_trait::async_trait;
use chrono::Duration;
use hypecycle_ai::Message;
use hypecycle_core::Layer;
use hypecycle_graph::GraphAccessors;
use serde_json::{json, Value};

use super::{retried_or_default, system_message, user_message, LayerScorer, ScoringInput};

/// Innovation layer scorer (spec §4.C.1): patent/paper activity and a
/// 6-month-over-6-month temporal trend.
pub struct InnovationScorer;

#[async_trait]
impl LayerScorer for InnovationScorer {
    fn layer(&self) -> Layer {
        Layer::Innovation
    }

    async fn collect_metrics(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> Value {
        let end = input.anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let start = end - Duration::days(Layer::Innovation.temporal_window_days());

        let patents =
            retried_or_default(errors, || input.graph.patent_activity(input.tech_id, start, end)).await;
        let papers =
            retried_or_default(errors, || input.graph.paper_activity(input.tech_id, start, end)).await;
        let community = retried_or_default(errors, || {
            input.graph.community_context(input.tech_id, input.community_version)
        })
        .await;
        let trend =
            retried_or_default(errors, || input.graph.temporal_trend(input.tech_id, end, 180)).await;

        json!({
            "patent_count": patents.activity.patent_count,
            "citation_sum": patents.activity.citation_sum,
            "pagerank_weighted_count": patents.activity.pagerank_weighted_count,
            "avg_pagerank": patents.activity.avg_pagerank,
            "paper_count": papers.paper_count,
            "paper_citation_sum": papers.citation_sum,
            "community_patent_count": community.community_patent_count,
            "community_paper_count": community.community_paper_count,
            "temporal_trend": trend,
        })
    }

    fn build_prompt(&self, tech_name: &str, metrics: &Value) -> Vec<Message> {
        vec![
            system_message(
                "You are scoring the Innovation layer of a technology hype-cycle analysis. \
                 Anchors: patent_count 0 and papers<5 -> 0-15; patent_count 1-5 and papers 5-20 \
                 -> 15-35; patent_count 6-20 and papers 20-60 -> 35-55; patent_count 21-50 or \
                 papers 61-120 -> 55-75; patent_count>50 or papers>120 -> 75-95. A weighted \
                 pagerank sum over 150 with more than 30 patents raises the score into 70-90. \
                 Return a score in [0,100], a short reasoning, and a confidence level.",
            ),
            user_message(format!(
                "Technology: {tech_name}\nMetrics: {}",
                serde_json::to_string_pretty(metrics).unwrap_or_default()
            )),
        ]
    }
}
