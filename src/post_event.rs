// ===============================
// src/post_event.rs (post-event adjuster)
// ===============================
use crate::domain::{EventAnalysis, EventRecord};

// Pola historis per jenis event (disederhanakan, bukan hasil training):
//   surprising_positive  -> cenderung lanjut naik
//   positive_anticipated -> reversal setelah recovery gap down
//   negative_anticipated -> sedikit lanjut setelah panic
//   surprising_negative  -> kemungkinan selling berlanjut
const CONTINUATION: [(&str, f64); 4] = [
    ("surprising_positive", 0.3),
    ("positive_anticipated", -0.1),
    ("negative_anticipated", 0.1),
    ("surprising_negative", -0.2),
];

pub fn expected_continuation(classification: &str) -> f64 {
    CONTINUATION
        .iter()
        .find(|(c, _)| *c == classification)
        .map(|(_, f)| *f)
        .unwrap_or(0.0)
}

/// Strength 10 or more means full confidence.
pub fn confidence(strength: f64) -> f64 {
    (strength.abs() / 10.0).min(1.0)
}

pub fn analyze(event: Option<&EventRecord>) -> Option<EventAnalysis> {
    let event = event?;
    let strength = event.strength.unwrap_or(0.0);
    Some(EventAnalysis {
        classification: event.classification.clone(),
        strength,
        residual_return: event.residual_return.unwrap_or(0.0),
        expected_continuation: expected_continuation(&event.classification),
        confidence: confidence(strength),
    })
}
