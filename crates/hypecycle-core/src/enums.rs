use serde::{Deserialize, Serialize};

/// One of the four independent intelligence layers (spec §2.1, §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Innovation,
    Adoption,
    Narrative,
    Risk,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Innovation, Layer::Adoption, Layer::Narrative, Layer::Risk];

    /// Temporal window, in days, anchored to the analysis date (spec §3.3).
    pub fn temporal_window_days(self) -> i64 {
        match self {
            Layer::Innovation => 730,
            Layer::Adoption => 540,
            Layer::Narrative | Layer::Risk => 180,
        }
    }
}

/// Per-layer confidence, drawn from a closed set (spec §3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// The five hype cycle lifecycle phases (spec §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    InnovationTrigger,
    Peak,
    Trough,
    Slope,
    Plateau,
}

impl Phase {
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::InnovationTrigger => "Innovation Trigger",
            Phase::Peak => "Peak of Inflated Expectations",
            Phase::Trough => "Trough of Disillusionment",
            Phase::Slope => "Slope of Enlightenment",
            Phase::Plateau => "Plateau of Productivity",
        }
    }

    /// `(start, end)` of this phase's chart-x sub-range (spec §4.G).
    pub fn x_range(self) -> (f64, f64) {
        match self {
            Phase::InnovationTrigger => (0.0, 0.7),
            Phase::Peak => (0.7, 1.4),
            Phase::Trough => (1.4, 2.7),
            Phase::Slope => (2.7, 4.2),
            Phase::Plateau => (4.2, 5.0),
        }
    }

    pub fn all() -> [Phase; 5] {
        [
            Phase::InnovationTrigger,
            Phase::Peak,
            Phase::Trough,
            Phase::Slope,
            Phase::Plateau,
        ]
    }
}

/// Position within a phase's sub-range, a thirds partition (spec §4.G, §8.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhasePosition {
    Early,
    Mid,
    Late,
}

impl PhasePosition {
    /// Classify `x` within `(start, end)` using a strict thirds partition.
    pub fn from_x_in_range(x: f64, range: (f64, f64)) -> Self {
        let (start, end) = range;
        let width = end - start;
        if width <= 0.0 {
            return PhasePosition::Mid;
        }
        let frac = (x - start) / width;
        if frac < 1.0 / 3.0 {
            PhasePosition::Early
        } else if frac < 2.0 / 3.0 {
            PhasePosition::Mid
        } else {
            PhasePosition::Late
        }
    }
}

/// The sampler's internal maturity classification of a community (spec §4.B).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityMaturityClass {
    EarlyStage,
    MidStage,
    LateStage,
    HypeStage,
}

/// Document kinds present on `Document` nodes (spec §3.2); exactly seven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Patent,
    TechnicalPaper,
    GovernmentContract,
    Regulation,
    SecFiling,
    News,
    Github,
}

impl DocType {
    pub const ALL: [DocType; 7] = [
        DocType::Patent,
        DocType::TechnicalPaper,
        DocType::GovernmentContract,
        DocType::Regulation,
        DocType::SecFiling,
        DocType::News,
        DocType::Github,
    ];

    /// Wire form, matching the `#[serde(rename_all = "snake_case")]` above
    /// (spec §6.1 `evidence_counts` keys).
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Patent => "patent",
            DocType::TechnicalPaper => "technical_paper",
            DocType::GovernmentContract => "government_contract",
            DocType::Regulation => "regulation",
            DocType::SecFiling => "sec_filing",
            DocType::News => "news",
            DocType::Github => "github",
        }
    }
}

/// Recommendation emitted by the narrative generator (spec §4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Invest,
    Monitor,
    Avoid,
    Caution,
}

/// Direction of a three-way comparison against a fixed ratio band, used by
/// `temporal_trend` and `insider_trading` accessors (spec §4.A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TemporalTrend {
    Growing,
    #[default]
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NetPosition {
    Buying,
    #[default]
    Neutral,
    Selling,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_position_thirds() {
        let range = (2.7, 4.2); // slope, width 1.5
        assert_eq!(
            PhasePosition::from_x_in_range(3.375, range),
            PhasePosition::Mid
        );
        assert_eq!(
            PhasePosition::from_x_in_range(2.71, range),
            PhasePosition::Early
        );
        assert_eq!(
            PhasePosition::from_x_in_range(4.19, range),
            PhasePosition::Late
        );
    }

    #[test]
    fn temporal_windows_match_spec() {
        assert_eq!(Layer::Innovation.temporal_window_days(), 730);
        assert_eq!(Layer::Adoption.temporal_window_days(), 540);
        assert_eq!(Layer::Narrative.temporal_window_days(), 180);
        assert_eq!(Layer::Risk.temporal_window_days(), 180);
    }
}
