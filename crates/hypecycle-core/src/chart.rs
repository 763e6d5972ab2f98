use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::{Phase, PhasePosition};

/// Per-technology chart record (spec §6.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechChartRecord {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub phase: PhaseInfo,
    pub scores: Scores,
    pub position: Position,
    pub summary: String,
    pub key_insight: String,
    pub recommendation: String,
    pub evidence_counts: HashMap<String, usize>,
    pub validation: ValidationInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseInfo {
    pub code: Phase,
    pub display: String,
    pub position: PhasePosition,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scores {
    pub innovation: f64,
    pub adoption: f64,
    pub narrative: f64,
    pub risk: f64,
    pub hype: f64,
    pub overall_weighted: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationInfo {
    pub status: String,
    pub errors: Vec<String>,
}

/// Time window used for a layer's metric windowing (spec §6.1 metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalWindow {
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartMetadata {
    pub total_technologies: usize,
    pub phase_distribution: HashMap<String, usize>,
    pub layer_weights: HashMap<String, f64>,
    pub community_version: String,
    pub temporal_windows: HashMap<String, TemporalWindow>,
}

/// Top-level chart document emitted per batch (spec §6.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDocument {
    pub chart_type: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub technologies: Vec<TechChartRecord>,
    pub metadata: ChartMetadata,
}
