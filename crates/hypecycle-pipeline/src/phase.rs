//! Phase classifier (component E, spec §4.E): a pure, total function from
//! layer scores and hype to one of five lifecycle phases. Rules are
//! evaluated top-to-bottom; the first match wins, and rule 7 is a
//! catch-all, so the function never fails to classify.

use hypecycle_core::Phase;

/// Classifies a technology's phase from its (already-clamped) scores (spec
/// §4.E). Pure: `classify(s) == classify(s)` always.
pub fn classify_phase(innovation: f64, adoption: f64, narrative: f64, risk: f64, hype: f64) -> Phase {
    if innovation > 20.0 && adoption < 25.0 && narrative < 45.0 {
        return Phase::InnovationTrigger;
    }
    if narrative > 45.0 && hype > 40.0 && adoption < 25.0 {
        return Phase::Peak;
    }
    if adoption >= 10.0 && innovation >= 5.0 && narrative <= 45.0 && risk <= 20.0 {
        return Phase::Plateau;
    }
    if adoption > 20.0 && innovation > 12.0 && narrative > 20.0 && hype < 50.0 {
        return Phase::Slope;
    }
    if innovation < 5.0 && adoption < 5.0 && narrative < 20.0 {
        return Phase::Trough;
    }

    let tier2_hits = [narrative < 35.0, adoption < 18.0, innovation < 18.0, hype < 28.0]
        .iter()
        .filter(|&&hit| hit)
        .count();
    if tier2_hits >= 3 {
        return Phase::Trough;
    }

    Phase::Slope
}

/// `spread = max(innovation, adoption, narrative) - min(...)` (spec §4.E
/// "Confidence").
pub fn phase_confidence(innovation: f64, adoption: f64, narrative: f64) -> f64 {
    let values = [innovation, adoption, narrative];
    let max = values.iter().cloned().fold(f64::MIN, f64::max);
    let min = values.iter().cloned().fold(f64::MAX, f64::min);
    let spread = max - min;
    if spread > 30.0 {
        0.85
    } else if spread > 15.0 {
        0.65
    } else {
        0.45
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_classic_peak_is_actually_slope_at_the_boundary() {
        // spec §8.4 scenario 1: adoption=25 is not < 25, so rules 1 and 2
        // both fail despite the "classic Peak" label; strict `<` forces
        // the default branch.
        let phase = classify_phase(35.0, 25.0, 85.0, 45.0, 100.0);
        assert_eq!(phase, Phase::Slope);
    }

    #[test]
    fn scenario_2_aligned_slope() {
        let phase = classify_phase(55.0, 45.0, 50.0, 35.0, 32.92);
        assert_eq!(phase, Phase::Slope);
    }

    #[test]
    fn scenario_3_innovation_trigger() {
        let phase = classify_phase(60.0, 15.0, 30.0, 20.0, 0.0);
        assert_eq!(phase, Phase::InnovationTrigger);
    }

    #[test]
    fn scenario_4_plateau() {
        let phase = classify_phase(40.0, 55.0, 25.0, 15.0, 0.0);
        assert_eq!(phase, Phase::Plateau);
    }

    #[test]
    fn scenario_5_dead_tech_trough() {
        let phase = classify_phase(2.0, 1.0, 5.0, 50.0, 0.0);
        assert_eq!(phase, Phase::Trough);
    }

    #[test]
    fn all_zero_scores_trough_via_rule_5() {
        // spec §8.3: narrative=innovation=adoption=risk=0 -> hype=50 -> trough
        let phase = classify_phase(0.0, 0.0, 0.0, 0.0, 50.0);
        assert_eq!(phase, Phase::Trough);
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(phase_confidence(10.0, 50.0, 20.0), 0.85);
        assert_eq!(phase_confidence(10.0, 28.0, 20.0), 0.65);
        assert_eq!(phase_confidence(10.0, 15.0, 20.0), 0.45);
    }
}
