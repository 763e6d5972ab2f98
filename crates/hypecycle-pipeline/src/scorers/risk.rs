use async_trait::async_trait;
use chrono::Duration;
use hypecycle_ai::Message;
use hypecycle_core::Layer;
use hypecycle_graph::GraphAccessors;
use serde_json::{json, Value};

use super::{retried_or_default, system_message, user_message, LayerScorer, ScoringInput};

/// Risk layer scorer (spec §4.C.4): SEC risk-keyword mentions, insider
/// trading signal, and institutional holdings.
pub struct RiskScorer;

#[async_trait]
impl LayerScorer for RiskScorer {
    fn layer(&self) -> Layer {
        Layer::Risk
    }

    async fn collect_metrics(&self, input: &ScoringInput<'_>, errors: &mut Vec<String>) -> Value {
        let end = input.anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let start = end - Duration::days(Layer::Risk.temporal_window_days());

        let risk_mentions =
            retried_or_default(errors, || input.graph.sec_risk_mentions(input.tech_id, start, end)).await;
        let insider =
            retried_or_default(errors, || input.graph.insider_trading(input.tech_id, start, end)).await;
        let holdings_pct =
            retried_or_default(errors, || input.graph.institutional_holdings_pct(input.tech_id)).await;

        json!({
            "risk_mentions": risk_mentions,
            "insider_buy_count": insider.buy_count,
            "insider_sell_count": insider.sell_count,
            "insider_net_position": insider.net_position,
            "institutional_holdings_pct": holdings_pct,
        })
    }

    fn build_prompt(&self, tech_name: &str, metrics: &Value) -> Vec<Message> {
        vec![
            system_message(
                "You are scoring the Risk layer of a technology hype-cycle analysis. Anchors: \
                 risk_mentions>40 and sell_count>3*buy_count -> 70-90; risk_mentions<5 and \
                 holdings_pct>0.35 -> 0-25; otherwise 30-60, calibrated such that \
                 risk_mentions around 15-20 with holdings_pct around 0.15 corresponds to 50. \
                 Return a score in [0,100], a short reasoning, and a confidence level.",
            ),
            user_message(format!(
                "Technology: {tech_name}\nMetrics: {}",
                serde_json::to_string_pretty(metrics).unwrap_or_default()
            )),
        ]
    }
}
