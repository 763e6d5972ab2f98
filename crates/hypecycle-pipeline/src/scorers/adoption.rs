use async_trait::async_trait;
use chrono::Duration;
use hypecycle_ai::Message;
use hypecycle_core::Layer;
use hypecycle_graph::GraphAccessors;
use serde_json::{json, Value};

use super::{retried_or_default, system_message, user_message, LayerScorer, ScoringInput};

/// Adoption layer scorer (spec §4.C.2): contract/regulatory activity,
/// revenue-mentioning filings, and company breadth.
pub struct AdoptionScorer;

#[async_trait]
impl LayerScorer for AdoptionScorer {
    fn layer(&self) -> Layer {
        Layer::Adoption
    }

    async fn collect_metrics(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> Value {
        let end = input.anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let start = end - Duration::days(Layer::Adoption.temporal_window_days());

        let contracts =
            retried_or_default(errors, || input.graph.contract_activity(input.tech_id, start, end)).await;
        let regulation =
            retried_or_default(errors, || input.graph.regulation_activity(input.tech_id, start, end)).await;
        let revenue_mentions =
            retried_or_default(errors, || input.graph.revenue_mentions(input.tech_id, start, end)).await;
        let companies = retried_or_default(errors, || input.graph.companies_developing(input.tech_id)).await;

        json!({
            "contract_count": contracts.activity.contract_count,
            "total_contract_value_usd": contracts.activity.total_value_usd,
            "avg_contract_value_usd": contracts.activity.avg_value,
            "regulation_approval_count": regulation.approval_count,
            "revenue_mentions": revenue_mentions,
            "company_count": companies.company_count,
            "top_companies": companies.top_companies.iter().map(|c| &c.name).collect::<Vec<_>>(),
        })
    }

    fn build_prompt(&self, tech_name: &str, metrics: &Value) -> Vec<Message> {
        vec![
            system_message(
                "You are scoring the Adoption layer of a technology hype-cycle analysis. \
                 Anchors: contracts>=20 and approvals>=5 and companies>30 -> 60-80; \
                 contracts<3 and approvals<=1 -> 0-30; otherwise 30-60, weighted by total \
                 contract value. Return a score in [0,100], a short reasoning, and a \
                 confidence level.",
            ),
            user_message(format!(
                "Technology: {tech_name}\nMetrics: {}",
                serde_json::to_string_pretty(metrics).unwrap_or_default()
            )),
        ]
    }
}
