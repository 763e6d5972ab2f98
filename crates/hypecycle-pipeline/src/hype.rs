//! Hype deriver (component D, spec §4.D): a pure function from the four
//! layer scores to a hype score that measures disagreement between layers,
//! not any single layer's height.

use hypecycle_core::{Confidence, HypeBlock};

/// Sample standard deviation (n-1 denominator) of the four raw layer scores.
fn sample_stdev(values: [f64; 4]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Derives the hype block from four already-clamped layer scores (spec
/// §4.D). Pure: `derive(a, b, c, d) == derive(a, b, c, d)` always.
pub fn derive_hype(innovation: f64, adoption: f64, narrative: f64, risk: f64) -> HypeBlock {
    let avg_of_four_raw = (innovation + adoption + narrative + risk) / 4.0;
    let divergence = sample_stdev([innovation, adoption, narrative, risk]);
    let narrative_premium = narrative - avg_of_four_raw;
    let substance_deficit = avg_of_four_raw - (innovation + adoption) / 2.0;

    let (hype_score, reasoning) = if narrative > 60.0 && (innovation < 40.0 || adoption < 40.0) {
        (
            (50.0 + 2.0 * narrative_premium + 1.5 * substance_deficit).clamp(0.0, 100.0),
            "narrative exceeds fundamentals",
        )
    } else if divergence < 15.0 {
        ((50.0 - 2.0 * divergence).clamp(0.0, 100.0), "layers aligned")
    } else {
        (
            (50.0 + 1.5 * (divergence - 15.0)).clamp(0.0, 100.0),
            "mixed signals",
        )
    };

    let confidence = if divergence > 20.0 || (narrative - innovation).abs() > 30.0 {
        Confidence::High
    } else {
        Confidence::Medium
    };

    HypeBlock {
        hype_score,
        hype_reasoning: reasoning.to_string(),
        layer_divergence: divergence,
        hype_confidence: confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_case_avg_25_layers_aligned() {
        // spec §8.3 second boundary scenario
        let block = derive_hype(0.0, 0.0, 0.0, 0.0);
        assert_eq!(block.layer_divergence, 0.0);
        assert_eq!(block.hype_score, 50.0);
        assert_eq!(block.hype_reasoning, "layers aligned");
    }

    #[test]
    fn scenario_1_classic_peak() {
        // spec §8.4 scenario 1
        let block = derive_hype(35.0, 25.0, 85.0, 45.0);
        assert_eq!(block.hype_score, 100.0);
        assert_eq!(block.hype_reasoning, "narrative exceeds fundamentals");
    }

    #[test]
    fn scenario_2_aligned_slope() {
        // spec §8.4 scenario 2: stdev is given there to two significant
        // figures ("≈8.5"); we check against the precise value instead of
        // the document's rounded derivative (50 - 2*8.5 = 33).
        let block = derive_hype(55.0, 45.0, 50.0, 35.0);
        assert!((block.layer_divergence - 8.540).abs() < 0.01);
        assert!((block.hype_score - 32.92).abs() < 0.1);
        assert_eq!(block.hype_reasoning, "layers aligned");
    }
}
