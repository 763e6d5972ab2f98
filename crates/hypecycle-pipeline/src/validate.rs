//! Output validator (component J, spec §4.J): applies the §8.1 invariants
//! to a finished [`TechAnalysisState`] and records a validation status.
//! Structural and numeric only — it never re-runs a computation, and a
//! failed record is still emitted, just flagged.

use hypecycle_core::{TechAnalysisState, ValidationBlock, ValidationStatus};

/// Validates `state` and returns its validation block (spec §4.J). Callers
/// are expected to have already run every prior stage; graph/LLM
/// degradation errors accumulated along the way are passed in via
/// `prior_errors` and merged with any invariant violations found here.
pub fn validate(state: &TechAnalysisState, prior_errors: &[String]) -> ValidationBlock {
    let mut errors: Vec<String> = prior_errors.to_vec();

    for (name, layer) in [
        ("innovation", &state.innovation),
        ("adoption", &state.adoption),
        ("narrative", &state.narrative),
        ("risk", &state.risk),
    ] {
        match layer {
            Some(block) if (0.0..=100.0).contains(&block.score) => {}
            Some(_) => errors.push(format!("{name}_score_out_of_range")),
            None => errors.push(format!("{name}_block_missing")),
        }
    }

    let Some(hype) = &state.hype else {
        errors.push("hype_block_missing".to_string());
        return finish(errors);
    };
    if !(0.0..=100.0).contains(&hype.hype_score) {
        errors.push("hype_score_out_of_range".to_string());
    }
    if hype.layer_divergence < 0.0 {
        errors.push("negative_layer_divergence".to_string());
    }

    let Some(phase) = &state.phase else {
        errors.push("phase_block_missing".to_string());
        return finish(errors);
    };
    if !(0.0..=1.0).contains(&phase.phase_confidence) {
        errors.push("phase_confidence_out_of_range".to_string());
    }

    let Some(chart) = &state.chart else {
        errors.push("chart_block_missing".to_string());
        return finish(errors);
    };
    if !(0.0..=5.0).contains(&chart.chart_x) {
        errors.push("chart_x_out_of_range".to_string());
    }
    if !(0.0..=100.0).contains(&chart.chart_y) {
        errors.push("chart_y_out_of_range".to_string());
    }
    let range = phase.hype_cycle_phase.x_range();
    if chart.chart_x < range.0 || chart.chart_x > range.1 {
        errors.push("chart_x_outside_phase_range".to_string());
    }

    if let Some(evidence) = &state.evidence {
        for (name, citations) in [
            ("innovation", &evidence.innovation),
            ("adoption", &evidence.adoption),
            ("narrative", &evidence.narrative),
            ("risk", &evidence.risk),
        ] {
            if citations.len() > 5 {
                errors.push(format!("{name}_evidence_exceeds_five_citations"));
            }
        }
    } else {
        errors.push("evidence_block_missing".to_string());
    }

    finish(errors)
}

fn finish(errors: Vec<String>) -> ValidationBlock {
    let status = if errors.is_empty() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    };
    ValidationBlock {
        validation_status: status,
        validation_errors: errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypecycle_core::{
        ChartBlock, Confidence, EvidenceBlock, HypeBlock, LayerBlock, Phase, PhaseBlock, PhasePosition,
    };

    fn complete_state() -> TechAnalysisState {
        let mut state = TechAnalysisState::new("t1", "Tech One", "ai", false, "v1", 5);
        for layer in hypecycle_core::Layer::ALL {
            state.set_layer_block(
                layer,
                LayerBlock {
                    score: 50.0,
                    reasoning: "ok".into(),
                    metrics: serde_json::json!({}),
                    confidence: Confidence::Medium,
                },
            );
        }
        state.set_hype(HypeBlock {
            hype_score: 50.0,
            hype_reasoning: "layers aligned".into(),
            layer_divergence: 0.0,
            hype_confidence: Confidence::Medium,
        });
        state.set_phase(PhaseBlock {
            hype_cycle_phase: Phase::Slope,
            phase_reasoning: "default".into(),
            phase_confidence: 0.45,
            phase_position: PhasePosition::Mid,
        });
        state.set_chart(ChartBlock {
            chart_x: 3.375,
            chart_y: 45.45,
            weighted_score: 50.0,
            hype_cycle_phase_display: Phase::Slope.display_name().to_string(),
        });
        state.set_evidence(EvidenceBlock::default());
        state
    }

    #[test]
    fn complete_state_is_valid() {
        let state = complete_state();
        let block = validate(&state, &[]);
        assert_eq!(block.validation_status, ValidationStatus::Valid);
        assert!(block.validation_errors.is_empty());
    }

    #[test]
    fn prior_errors_mark_the_record_invalid() {
        let state = complete_state();
        let block = validate(&state, &["graph_unavailable".to_string()]);
        assert_eq!(block.validation_status, ValidationStatus::Invalid);
        assert_eq!(block.validation_errors, vec!["graph_unavailable".to_string()]);
    }

    #[test]
    fn out_of_range_chart_x_is_flagged() {
        let mut state = complete_state();
        state.chart.as_mut().unwrap().chart_x = 10.0;
        let block = validate(&state, &[]);
        assert_eq!(block.validation_status, ValidationStatus::Invalid);
        assert!(block.validation_errors.contains(&"chart_x_out_of_range".to_string()));
    }
}
