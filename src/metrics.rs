// ===============================
// src/metrics.rs
// ===============================
use once_cell::sync::Lazy;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::path::Path;
use tokio::fs;

// Single custom registry (we register everything here)
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

// -------- Forecast metrics --------
pub static FORECASTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("forecasts_total", "completed forecasts (label: mode)"),
        &["mode"],
    )
    .unwrap()
});

pub static FORECAST_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("forecast_errors_total", "failed invocations (label: kind)"),
        &["kind"],
    )
    .unwrap()
});

// -------- Model cache --------
pub static MODEL_LOADS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("model_loads_total", "forecaster loads (label: model)"),
        &["model"],
    )
    .unwrap()
});

pub static MODEL_CACHE_HITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("model_cache_hits_total", "acquire calls served by cached handle").unwrap()
});

// Latency of one predict call (milliseconds)
pub static INFERENCE_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("inference_latency_ms", "Latency of forecaster predict (ms)")
            .buckets(vec![1.0, 5.0, 25.0, 100.0, 500.0, 2_000.0, 10_000.0]),
    )
    .unwrap()
});

pub static EVENTS_AGGREGATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("events_aggregated_total", "event records reduced into a context").unwrap()
});

pub fn init() {
    // Register all metrics to the custom registry
    for m in [
        REGISTRY.register(Box::new(FORECASTS.clone())),
        REGISTRY.register(Box::new(FORECAST_ERRORS.clone())),
        REGISTRY.register(Box::new(MODEL_LOADS.clone())),
        REGISTRY.register(Box::new(MODEL_CACHE_HITS.clone())),
        REGISTRY.register(Box::new(INFERENCE_LATENCY.clone())),
        REGISTRY.register(Box::new(EVENTS_AGGREGATED.clone())),
    ] {
        let _ = m;
    }
}

// Encode all metrics in Prometheus text format
pub fn encode_metrics() -> Vec<u8> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();
    let mut buf = Vec::new();
    if encoder.encode(&families, &mut buf).is_err() || buf.is_empty() {
        buf.extend_from_slice(b"# no metrics\n");
    }
    buf
}

/// Proses ini one-shot (tidak ada yang scrape), jadi metrics ditulis ke file
/// untuk textfile collector.
pub async fn write_textfile(path: &str) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, encode_metrics()).await
}
