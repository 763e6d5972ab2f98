use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::enums::Layer;
use crate::error::PipelineError;

/// Verbosity levels for the orchestrator's logging hook (spec §4.K).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Silent,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Per-layer weights used by the ensemble positioner (spec §4.G). Must sum
/// to 1.0 (validated by [`LayerWeights::validate`]).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayerWeights {
    pub innovation: f64,
    pub adoption: f64,
    pub narrative: f64,
    pub risk: f64,
}

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            innovation: 0.30,
            adoption: 0.35,
            narrative: 0.15,
            risk: 0.20,
        }
    }
}

impl LayerWeights {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let sum = self.innovation + self.adoption + self.narrative + self.risk;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(PipelineError::Configuration(format!(
                "layer_weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }

    pub fn get(&self, layer: Layer) -> f64 {
        match layer {
            Layer::Innovation => self.innovation,
            Layer::Adoption => self.adoption,
            Layer::Narrative => self.narrative,
            Layer::Risk => self.risk,
        }
    }
}

/// Proportions of the four community-maturity strata the sampler targets
/// (spec §4.B). Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StratumProportions {
    pub early: f64,
    pub mid: f64,
    pub late: f64,
    pub hype: f64,
}

impl Default for StratumProportions {
    fn default() -> Self {
        Self {
            early: 0.20,
            mid: 0.40,
            late: 0.20,
            hype: 0.20,
        }
    }
}

impl StratumProportions {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let sum = self.early + self.mid + self.late + self.hype;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(PipelineError::Configuration(format!(
                "stratum_proportions must sum to 1.0, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Per-stage LLM temperatures (spec §4.L).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageTemperatures {
    pub innovation: f32,
    pub adoption: f32,
    pub narrative: f32,
    pub risk: f32,
    pub narrative_generator: f32,
}

impl Default for StageTemperatures {
    fn default() -> Self {
        Self {
            innovation: 0.2,
            adoption: 0.2,
            narrative: 0.3,
            risk: 0.2,
            narrative_generator: 0.4,
        }
    }
}

/// The single immutable configuration record threaded through the
/// orchestrator (Design Note "configuration object, not globals"). Nothing
/// downstream of `PipelineConfig` reads a process-wide singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Community partition version to query (v0..v5).
    #[serde(default = "default_community_version")]
    pub community_version: String,

    /// Number of technologies the sampler should select.
    #[serde(default = "default_tech_count")]
    pub tech_count: usize,

    /// Minimum document count a technology must have to qualify for sampling.
    #[serde(default = "default_min_document_count")]
    pub min_document_count: usize,

    /// Whether the narrative scorer's freshness probe may call the external
    /// search collaborator (spec §4.C.3, §6.3).
    #[serde(default)]
    pub enable_external_search: bool,

    #[serde(default)]
    pub stratum_proportions: StratumProportions,

    #[serde(default)]
    pub layer_weights: LayerWeights,

    #[serde(default)]
    pub temperatures: StageTemperatures,

    /// ISO-8601 analysis anchor date; `None` means "today" (spec §6.2). A
    /// concrete date must be injected by the caller for determinism — the
    /// core never reads the system clock (mirrors the `DeterministicClock`
    /// discipline other pipeline-shaped crates in this ecosystem use).
    pub analysis_anchor_date: Option<chrono::NaiveDate>,

    /// Bound on cross-technology concurrency (spec §2.1, §5.1).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub verbosity: Verbosity,

    /// Minimum community member_count for the sampler to consider it
    /// (spec §4.B step 1).
    #[serde(default = "default_min_members")]
    pub min_community_members: usize,

    /// Which registered `LlmProvider` backend to construct (spec §6.3 "LLM
    /// backend"). One of `anthropic`, `openai-compatible`, or `fake` for
    /// offline/deterministic runs.
    #[serde(default = "default_llm_provider")]
    pub llm_provider: String,

    /// Free-form overrides for accessor-specific tuning, kept as a bag so
    /// new knobs don't require a config schema migration.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

fn default_community_version() -> String {
    "v1".to_string()
}
fn default_tech_count() -> usize {
    100
}
fn default_min_document_count() -> usize {
    5
}
fn default_concurrency() -> usize {
    20
}
fn default_min_members() -> usize {
    3
}
fn default_llm_provider() -> String {
    "anthropic".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            community_version: default_community_version(),
            tech_count: default_tech_count(),
            min_document_count: default_min_document_count(),
            enable_external_search: false,
            stratum_proportions: StratumProportions::default(),
            layer_weights: LayerWeights::default(),
            temperatures: StageTemperatures::default(),
            analysis_anchor_date: None,
            concurrency: default_concurrency(),
            verbosity: Verbosity::default(),
            min_community_members: default_min_members(),
            llm_provider: default_llm_provider(),
            extra: HashMap::new(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.layer_weights.validate()?;
        self.stratum_proportions.validate()?;
        if self.concurrency == 0 {
            return Err(PipelineError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration layered defaults -> optional `hypecycle.toml` ->
    /// `HYPECYCLE_*` environment variables, following the teacher's layered
    /// `config` crate convention (`config_manager.rs`).
    pub fn load(config_file: Option<&str>) -> Result<Self, PipelineError> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&PipelineConfig::default()).map_err(
                |e| PipelineError::Configuration(format!("failed to seed defaults: {e}")),
            )?);

        if let Some(path) = config_file {
            builder = builder.add_source(::config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("HYPECYCLE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: PipelineConfig = builder
            .build()
            .map_err(|e| PipelineError::Configuration(format!("failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| PipelineError::Configuration(format!("failed to deserialize config: {e}")))?;

        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_bad_weights() {
        let mut cfg = PipelineConfig::default();
        cfg.layer_weights.risk = 0.5;
        assert!(cfg.validate().is_err());
    }
}
