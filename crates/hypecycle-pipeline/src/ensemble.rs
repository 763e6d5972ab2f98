//! Ensemble positioner (component G, spec §4.G): maps layer scores and
//! phase onto chart coordinates, plus the weighted overall score.

use hypecycle_core::{LayerWeights, Phase, PhasePosition};

pub struct ChartPosition {
    pub chart_x: f64,
    pub chart_y: f64,
    pub position: PhasePosition,
}

/// `narrative_drop`: the gap between a per-phase historical narrative high
/// and the current narrative score. No historical-high store exists in
/// this pipeline (spec §9 Open Question 2), so the documented fallback
/// `100 - narrative` is used unconditionally.
fn narrative_drop(narrative: f64) -> f64 {
    100.0 - narrative
}

/// Computes `chart_x` within the phase's sub-range (spec §4.G "Chart X").
fn chart_x(phase: Phase, innovation: f64, adoption: f64, hype: f64, narrative: f64) -> f64 {
    match phase {
        Phase::InnovationTrigger => 0.0 + 0.7 * (innovation / 100.0),
        Phase::Peak => 0.7 + 0.7 * (hype / 100.0),
        Phase::Trough => 1.4 + (0.01 * narrative_drop(narrative)).min(1.3),
        Phase::Slope => 2.7 + 1.5 * (adoption / 100.0),
        Phase::Plateau => 4.2 + (adoption / 100.0).min(0.8),
    }
}

/// Computes `chart_y` (spec §4.G "Chart Y").
fn chart_y(phase: Phase, innovation: f64, adoption: f64, narrative: f64) -> f64 {
    let base_y = 0.7 * narrative + 0.2 * innovation + 0.1 * adoption;
    let multiplier = match phase {
        Phase::InnovationTrigger => 0.8,
        Phase::Peak => 1.3,
        Phase::Trough => 0.5,
        Phase::Slope => 0.9,
        Phase::Plateau => 0.85,
    };
    (base_y * multiplier).clamp(0.0, 100.0)
}

/// Positions a technology on the chart (spec §4.G). `chart_x` is clamped
/// into the phase's declared sub-range as a defensive measure even though
/// the formulas above should already stay within range (spec §8.1
/// invariant 3).
pub fn position(phase: Phase, innovation: f64, adoption: f64, narrative: f64, hype: f64) -> ChartPosition {
    let range = phase.x_range();
    let x = chart_x(phase, innovation, adoption, hype, narrative).clamp(range.0, range.1);
    let y = chart_y(phase, innovation, adoption, narrative);
    let position = PhasePosition::from_x_in_range(x, range);

    ChartPosition {
        chart_x: x,
        chart_y: y,
        position,
    }
}

/// `weighted_score = innovation*w_i + adoption*w_a + narrative*w_n + (100 -
/// risk)*w_r` (spec §4.G "Weighted overall"). Risk inverts: low risk adds
/// to the score.
pub fn weighted_score(innovation: f64, adoption: f64, narrative: f64, risk: f64, weights: &LayerWeights) -> f64 {
    innovation * weights.innovation
        + adoption * weights.adoption
        + narrative * weights.narrative
        + (100.0 - risk) * weights.risk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_2_aligned_slope() {
        let pos = position(Phase::Slope, 55.0, 45.0, 50.0, 32.92);
        assert!((pos.chart_x - 3.375).abs() < 1e-9);
        assert!((pos.chart_y - 45.45).abs() < 1e-9);
        assert_eq!(pos.position, hypecycle_core::PhasePosition::Mid);
    }

    #[test]
    fn scenario_3_innovation_trigger() {
        let pos = position(Phase::InnovationTrigger, 60.0, 15.0, 30.0, 0.0);
        assert!((pos.chart_x - 0.42).abs() < 1e-9);
        assert!((pos.chart_y - 27.6).abs() < 1e-9);
        assert_eq!(pos.position, hypecycle_core::PhasePosition::Mid);
    }

    #[test]
    fn scenario_4_plateau() {
        let pos = position(Phase::Plateau, 40.0, 55.0, 25.0, 0.0);
        assert!((pos.chart_x - 4.75).abs() < 1e-9);
    }

    #[test]
    fn scenario_5_dead_tech_trough() {
        let pos = position(Phase::Trough, 2.0, 1.0, 5.0, 0.0);
        assert!((pos.chart_x - 2.35).abs() < 1e-9);
    }
}
