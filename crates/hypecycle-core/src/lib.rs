//! Core types and traits shared by the hype cycle analytical pipeline:
//! the error taxonomy (§7), the enumerations (§3.3), the per-technology
//! state record (§3.1), the immutable pipeline configuration (§6.2), and
//! the chart JSON DTOs (§6.1). No I/O lives in this crate.

pub mod chart;
pub mod config;
pub mod enums;
pub mod error;
pub mod state;

pub use chart::{
    ChartDocument, ChartMetadata, PhaseInfo, Position, Scores, TechChartRecord, TemporalWindow,
    ValidationInfo,
};
pub use config::{LayerWeights, PipelineConfig, StageTemperatures, StratumProportions, Verbosity};
pub use enums::{
    CommunityMaturityClass, Confidence, DocType, Layer, NetPosition, Phase, PhasePosition,
    Recommendation, TemporalTrend,
};
pub use error::{GraphError, LlmError, PipelineError, Result};
pub use state::{
    ChartBlock, Citation, EvidenceBlock, HypeBlock, LayerBlock, NarrativeBlock, PhaseBlock,
    TechAnalysisState, ValidationBlock, ValidationStatus,
};
