use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Confidence, DocType, Phase, PhasePosition};

/// One layer's scoring block (spec §3.1 "per-layer block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerBlock {
    pub score: f64,
    pub reasoning: String,
    pub metrics: serde_json::Value,
    pub confidence: Confidence,
}

/// Hype derivation block (spec §3.1 "hype block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypeBlock {
    pub hype_score: f64,
    pub hype_reasoning: String,
    pub layer_divergence: f64,
    pub hype_confidence: Confidence,
}

/// Phase classification block (spec §3.1 "phase block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseBlock {
    pub hype_cycle_phase: Phase,
    pub phase_reasoning: String,
    pub phase_confidence: f64,
    pub phase_position: PhasePosition,
}

/// Executive narrative block (spec §3.1 "narrative block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeBlock {
    pub executive_summary: String,
    pub key_insight: String,
    pub recommendation: String,
}

/// Final chart coordinates (spec §3.1 "chart block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBlock {
    pub chart_x: f64,
    pub chart_y: f64,
    pub weighted_score: f64,
    pub hype_cycle_phase_display: String,
}

/// A single evidence citation (spec §4.H).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: String,
    pub doc_type: DocType,
    pub title: String,
    pub url: Option<String>,
    pub date: Option<chrono::DateTime<chrono::Utc>>,
    pub score: f64,
    pub metadata: HashMap<String, String>,
}

/// Per-layer evidence (spec §3.1 "evidence block").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceBlock {
    pub innovation: Vec<Citation>,
    pub adoption: Vec<Citation>,
    pub narrative: Vec<Citation>,
    pub risk: Vec<Citation>,
}

/// Validation block (spec §3.1 "validation block").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationBlock {
    pub validation_status: ValidationStatus,
    pub validation_errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Invalid,
}

/// The single per-technology state record accumulated across the DAG
/// (spec §3.1). Every field group is written by exactly one stage and is
/// read-only afterward; that invariant is enforced by the setter methods
/// below, which panic (a programmer error, not a runtime condition) if a
/// block is written twice — matching "no stage mutates prior keys". The one
/// documented exception is `phase.phase_position`: stage 7 writes a
/// placeholder and stage 9 corrects it through `set_phase_position`, since
/// the real sub-classification depends on the ensemble positioner's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechAnalysisState {
    pub tech_id: String,
    pub tech_name: String,
    pub domain: String,

    pub enable_external_search: bool,
    pub community_version: String,
    pub min_document_count: usize,

    pub innovation: Option<LayerBlock>,
    pub adoption: Option<LayerBlock>,
    pub narrative: Option<LayerBlock>,
    pub risk: Option<LayerBlock>,

    pub hype: Option<HypeBlock>,
    pub phase: Option<PhaseBlock>,
    pub narrative_gen: Option<NarrativeBlock>,
    pub chart: Option<ChartBlock>,
    pub evidence: Option<EvidenceBlock>,
    pub validation: Option<ValidationBlock>,

    /// Per-doc-type counts used by the evidence compiler (spec §3.1
    /// "document counts").
    pub document_counts: HashMap<DocType, usize>,
}

impl TechAnalysisState {
    pub fn new(
        tech_id: impl Into<String>,
        tech_name: impl Into<String>,
        domain: impl Into<String>,
        enable_external_search: bool,
        community_version: impl Into<String>,
        min_document_count: usize,
    ) -> Self {
        Self {
            tech_id: tech_id.into(),
            tech_name: tech_name.into(),
            domain: domain.into(),
            enable_external_search,
            community_version: community_version.into(),
            min_document_count,
            innovation: None,
            adoption: None,
            narrative: None,
            risk: None,
            hype: None,
            phase: None,
            narrative_gen: None,
            chart: None,
            evidence: None,
            validation: None,
            document_counts: HashMap::new(),
        }
    }

    pub fn layer_block(&self, layer: crate::enums::Layer) -> &LayerBlock {
        match layer {
            crate::enums::Layer::Innovation => self.innovation.as_ref(),
            crate::enums::Layer::Adoption => self.adoption.as_ref(),
            crate::enums::Layer::Narrative => self.narrative.as_ref(),
            crate::enums::Layer::Risk => self.risk.as_ref(),
        }
        .expect("layer block must be written before it is read")
    }

    pub fn set_layer_block(&mut self, layer: crate::enums::Layer, block: LayerBlock) {
        let slot = match layer {
            crate::enums::Layer::Innovation => &mut self.innovation,
            crate::enums::Layer::Adoption => &mut self.adoption,
            crate::enums::Layer::Narrative => &mut self.narrative,
            crate::enums::Layer::Risk => &mut self.risk,
        };
        assert!(slot.is_none(), "{layer:?} block written twice");
        *slot = Some(block);
    }

    pub fn set_hype(&mut self, block: HypeBlock) {
        assert!(self.hype.is_none(), "hype block written twice");
        self.hype = Some(block);
    }

    pub fn set_phase(&mut self, block: PhaseBlock) {
        assert!(self.phase.is_none(), "phase block written twice");
        self.phase = Some(block);
    }

    /// Corrects the phase block's `phase_position` placeholder once the
    /// ensemble positioner (stage 9) has computed the real sub-classification
    /// (spec §4.G depends on stage 7's phase, so stage 7 must write a
    /// placeholder first). The one documented exception to "written once":
    /// every other field of the phase block is still write-once.
    pub fn set_phase_position(&mut self, position: PhasePosition) {
        let block = self.phase.as_mut().expect("phase block must be set before its position is corrected");
        assert_eq!(
            block.phase_position,
            PhasePosition::Early,
            "phase_position corrected twice"
        );
        block.phase_position = position;
    }

    pub fn set_narrative_gen(&mut self, block: NarrativeBlock) {
        assert!(self.narrative_gen.is_none(), "narrative block written twice");
        self.narrative_gen = Some(block);
    }

    pub fn set_chart(&mut self, block: ChartBlock) {
        assert!(self.chart.is_none(), "chart block written twice");
        self.chart = Some(block);
    }

    pub fn set_evidence(&mut self, block: EvidenceBlock) {
        assert!(self.evidence.is_none(), "evidence block written twice");
        self.evidence = Some(block);
    }

    pub fn set_validation(&mut self, block: ValidationBlock) {
        assert!(self.validation.is_none(), "validation block written twice");
        self.validation = Some(block);
    }

    pub fn set_document_counts(&mut self, counts: HashMap<DocType, usize>) {
        assert!(self.document_counts.is_empty(), "document counts written twice");
        self.document_counts = counts;
    }
}
