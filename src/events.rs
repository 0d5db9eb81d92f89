// ===============================
// src/events.rs (event aggregator)
// ===============================
//
// Ringkas daftar event jadi beberapa statistik sentiment.
// Catatan: nilai 0 diperlakukan sama dengan field kosong (tidak ikut rata-rata
// maupun hitungan positive/negative).
//
use std::collections::BTreeMap;

use crate::domain::{EventContext, EventRecord};

fn present(v: Option<f64>) -> Option<f64> {
    v.filter(|x| *x != 0.0 && !x.is_nan())
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.0
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// `None` for an empty list, otherwise a fresh context.
pub fn aggregate(events: &[EventRecord]) -> Option<EventContext> {
    if events.is_empty() {
        return None;
    }

    let returns: Vec<f64> = events.iter().filter_map(|e| present(e.residual_return)).collect();
    let strengths: Vec<f64> = events.iter().filter_map(|e| present(e.strength)).collect();

    let positive_count = returns.iter().filter(|r| **r > 0.0).count();
    let negative_count = returns.iter().filter(|r| **r < 0.0).count();
    let sentiment_bias =
        (positive_count as f64 - negative_count as f64) / returns.len().max(1) as f64;

    let mut classification_histogram = BTreeMap::new();
    for e in events {
        *classification_histogram.entry(e.classification.clone()).or_insert(0) += 1;
    }

    Some(EventContext {
        count: events.len(),
        mean_residual_return: mean(&returns),
        mean_strength: mean(&strengths),
        sentiment_bias,
        positive_count,
        negative_count,
        classification_histogram,
    })
}
