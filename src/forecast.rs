// ===============================
// src/forecast.rs (base forecast generator)
// ===============================
use std::time::Instant;
use tracing::debug;

use crate::cache::ForecasterCache;
use crate::domain::{ForecastSummary, SampleMatrix};
use crate::engine::ForecastEngine;
use crate::error::EngineError;
use crate::metrics::INFERENCE_LATENCY;

/// Percentile `p` (0..=100) of `values` with linear interpolation between
/// order statistics. `values` must be non-empty.
#[cfg(test)]
fn percentile(values: &[f64], p: f64) -> f64 {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(&v, p)
}

fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let (a, b) = (sorted[lo], sorted[hi]);
    if lo == hi {
        return a;
    }
    let v = a + (b - a) * (rank - lo as f64);
    // NaN dari engine diteruskan apa adanya (clamp panik kalau bound NaN)
    if a.is_nan() || b.is_nan() {
        return v;
    }
    // clamp menjaga monotonic antar percentile walau ada rounding
    v.clamp(a.min(b), a.max(b))
}

/// Reduce a sample matrix into median + 10/25/75/90 bands per forecast step.
pub fn summarize(samples: SampleMatrix, last_price: f64, prediction_length: usize) -> ForecastSummary {
    let steps = samples.num_steps();
    let mut median = Vec::with_capacity(steps);
    let mut low_10 = Vec::with_capacity(steps);
    let mut low_25 = Vec::with_capacity(steps);
    let mut high_75 = Vec::with_capacity(steps);
    let mut high_90 = Vec::with_capacity(steps);

    for i in 0..steps {
        let mut col = samples.column(i);
        col.sort_by(|a, b| a.total_cmp(b));
        low_10.push(percentile_sorted(&col, 10.0));
        low_25.push(percentile_sorted(&col, 25.0));
        median.push(percentile_sorted(&col, 50.0));
        high_75.push(percentile_sorted(&col, 75.0));
        high_90.push(percentile_sorted(&col, 90.0));
    }

    ForecastSummary {
        median,
        low_10,
        high_90,
        low_25,
        high_75,
        samples,
        last_price,
        prediction_length,
    }
}

/// Acquire the handle for `model_size`, sample `num_samples` paths and
/// summarize them. Input checks happen in the orchestrator.
pub fn forecast<E: ForecastEngine>(
    cache: &ForecasterCache<E>,
    prices: &[f64],
    prediction_length: usize,
    num_samples: usize,
    model_size: &str,
) -> Result<ForecastSummary, EngineError> {
    let handle = cache.acquire(model_size)?;

    let started = Instant::now();
    let samples = handle.predict(prices, prediction_length, num_samples)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.0;
    INFERENCE_LATENCY.observe(elapsed_ms);
    debug!(
        samples = samples.num_samples(),
        steps = samples.num_steps(),
        elapsed_ms,
        "predict done"
    );

    let last_price = prices.last().copied().unwrap_or_default();
    Ok(summarize(samples, last_price, prediction_length))
}
