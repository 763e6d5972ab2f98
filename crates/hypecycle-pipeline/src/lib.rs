//! The twelve-stage per-technology analysis pipeline (spec §4) and its
//! batch orchestrator (spec §4.K, §6.2).

pub mod chart_formatter;
pub mod ensemble;
pub mod evidence;
pub mod external_search;
pub mod hype;
pub mod narrative_gen;
pub mod orchestrator;
pub mod phase;
pub mod sampler;
pub mod scorers;
pub mod validate;

pub use chart_formatter::{doc_type_counts, format_chart_document, format_tech_record};
pub use ensemble::{position, weighted_score, ChartPosition};
pub use evidence::compile_evidence;
pub use external_search::{ExternalSearchProvider, NullExternalSearch};
pub use hype::derive_hype;
pub use narrative_gen::generate_narrative;
pub use orchestrator::{Pipeline, TechRef};
pub use phase::{classify_phase, phase_confidence};
pub use sampler::{classify_community, select_technologies};
pub use scorers::{AdoptionScorer, InnovationScorer, LayerScorer, NarrativeScorer, RiskScorer, ScoringInput};
pub use validate::validate;
