//! Chart formatter (component I, spec §4.I): assembles the per-technology
//! chart record and the batch-level chart document (spec §6.1).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use hypecycle_core::{
    ChartDocument, ChartMetadata, DocType, LayerWeights, Phase, PhaseInfo, Position, Scores,
    TechAnalysisState, TechChartRecord, TemporalWindow, ValidationInfo, ValidationStatus,
};

/// Formats one technology's final state into its chart record (spec §4.I,
/// §6.1 "Per-tech record"). Panics if any required block is missing —
/// callers must run the validator first and only format records that
/// reached this stage.
pub fn format_tech_record(state: &TechAnalysisState) -> TechChartRecord {
    let innovation = state.layer_block(hypecycle_core::Layer::Innovation);
    let adoption = state.layer_block(hypecycle_core::Layer::Adoption);
    let narrative = state.layer_block(hypecycle_core::Layer::Narrative);
    let risk = state.layer_block(hypecycle_core::Layer::Risk);
    let hype = state.hype.as_ref().expect("hype block must be set before formatting");
    let phase = state.phase.as_ref().expect("phase block must be set before formatting");
    let chart = state.chart.as_ref().expect("chart block must be set before formatting");
    let narrative_gen = state
        .narrative_gen
        .as_ref()
        .expect("narrative block must be set before formatting");
    let _evidence = state
        .evidence
        .as_ref()
        .expect("evidence block must be set before formatting");
    let validation = state
        .validation
        .as_ref()
        .expect("validation block must be set before formatting");

    // Keyed by doc type (patent, technical_paper, ...), not by intelligence
    // layer (spec §6.1 `evidence_counts`).
    let evidence_counts: HashMap<String, usize> = doc_type_counts(state)
        .iter()
        .map(|(doc_type, count)| (doc_type.as_str().to_string(), *count))
        .collect();

    TechChartRecord {
        id: state.tech_id.clone(),
        name: state.tech_name.clone(),
        domain: state.domain.clone(),
        phase: PhaseInfo {
            code: phase.hype_cycle_phase,
            display: phase.hype_cycle_phase.display_name().to_string(),
            position: phase.phase_position,
            confidence: phase.phase_confidence,
        },
        scores: Scores {
            innovation: innovation.score,
            adoption: adoption.score,
            narrative: narrative.score,
            risk: risk.score,
            hype: hype.hype_score,
            overall_weighted: chart.weighted_score,
        },
        position: Position {
            x: chart.chart_x,
            y: chart.chart_y,
        },
        summary: narrative_gen.executive_summary.clone(),
        key_insight: narrative_gen.key_insight.clone(),
        recommendation: narrative_gen.recommendation.clone(),
        evidence_counts,
        validation: ValidationInfo {
            status: match validation.validation_status {
                ValidationStatus::Valid => "valid".to_string(),
                ValidationStatus::Invalid => "invalid".to_string(),
            },
            errors: validation.validation_errors.clone(),
        },
    }
}

/// Assembles the full batch-level chart document (spec §6.1 top level).
pub fn format_chart_document(
    records: Vec<TechChartRecord>,
    community_version: &str,
    layer_weights: &LayerWeights,
    anchor_date: NaiveDate,
    generated_at: DateTime<Utc>,
) -> ChartDocument {
    let mut phase_distribution: HashMap<String, usize> = HashMap::new();
    for record in &records {
        *phase_distribution.entry(record.phase.display.clone()).or_insert(0) += 1;
    }

    let mut weights = HashMap::new();
    weights.insert("innovation".to_string(), layer_weights.innovation);
    weights.insert("adoption".to_string(), layer_weights.adoption);
    weights.insert("narrative".to_string(), layer_weights.narrative);
    weights.insert("risk".to_string(), layer_weights.risk);

    let anchor_end = anchor_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let mut temporal_windows = HashMap::new();
    for layer in hypecycle_core::Layer::ALL {
        let key = match layer {
            hypecycle_core::Layer::Innovation => "innovation",
            hypecycle_core::Layer::Adoption => "adoption",
            hypecycle_core::Layer::Narrative => "narrative",
            hypecycle_core::Layer::Risk => "risk",
        };
        temporal_windows.insert(
            key.to_string(),
            TemporalWindow {
                start: anchor_end - chrono::Duration::days(layer.temporal_window_days()),
                end: anchor_end,
            },
        );
    }

    ChartDocument {
        chart_type: "hype_cycle".to_string(),
        generated_at,
        version: "1.0".to_string(),
        metadata: ChartMetadata {
            total_technologies: records.len(),
            phase_distribution,
            layer_weights: weights,
            community_version: community_version.to_string(),
            temporal_windows,
        },
        technologies: records,
    }
}

/// Per-doc-type counts for §3.1 "document counts", set by the orchestrator
/// once the evidence compiler's top-K lists are known (spec §4.H/§4.K).
pub fn doc_type_counts(state: &TechAnalysisState) -> &HashMap<DocType, usize> {
    &state.document_counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_display_names_are_used_as_distribution_keys() {
        assert_eq!(Phase::Peak.display_name(), "Peak of Inflated Expectations");
    }
}
