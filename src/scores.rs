// Score mapping from raw classification output to presentation metrics

use crate::models::{RawAnalysisResult, ScoreTriple};

/// Emotions that count as attentive
const ATTENTIVE_EMOTIONS: [&str; 2] = ["happy", "surprise"];

/// Maps the remote service's raw classification into the three presentation
/// scores. Pure and total: unknown emotions and NaN ages take the else
/// branch, so any well-formed input produces a renderable result.
pub fn map_scores(result: &RawAnalysisResult) -> ScoreTriple {
    let laziness = if result.emotion == "neutral" { 0.7 } else { 0.3 };

    let attentiveness = if ATTENTIVE_EMOTIONS.contains(&result.emotion.as_str()) {
        0.8
    } else {
        0.4
    };

    // NaN compares false, so a NaN age lands on the 0.5 branch
    let concentration = if result.age < 30.0 { 0.9 } else { 0.5 };

    ScoreTriple::new(laziness, attentiveness, concentration)
}
