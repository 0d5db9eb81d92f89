// ===============================
// src/main.rs
// ===============================
/*
 cd /home/kukuhtw/rust/event_forecast_rust

 # forecast biasa, 14 hari
 echo '{"prices":[100,101,99,102,103]}' | cargo run --release -- --days 14

 # dengan event (aggregated) dan post-event
 cargo run --release -- --mode with_events --model base --input data/aapl.json
 cargo run --release -- --mode post_event --input data/aapl_post.json

*/
/*
=============================================================================
Project : event_forecast_rust — probabilistic price forecasts with event
          conditioning, in Rust
Module  : main.rs
Version : 0.1.0
Author  : Kukuh Tripamungkas Wicaksono (Kukuh TW)
Email   : kukuhtw@gmail.com
WhatsApp: https://wa.me/628129893706
LinkedIn: https://id.linkedin.com/in/kukuhtw
License : MIT (see LICENSE)

Summary : Loads a cached probabilistic forecaster, turns its sampled paths
          into median + percentile bands, and attaches event context
          (aggregated sentiment or post-event continuation) to the result.

(c) 2025 Kukuh TW. All rights reserved where applicable.
=============================================================================
*/
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use event_forecast_rust::config::{self, Args};
use event_forecast_rust::domain::{ForecastRequest, ForecastResult};
use event_forecast_rust::error::AppError;
use event_forecast_rust::metrics::{self, FORECAST_ERRORS};
use event_forecast_rust::orchestrator::ForecastService;
use event_forecast_rust::random_walk::RandomWalkEngine;
use event_forecast_rust::recorder::{self, RunRecord};

async fn read_input(input: &str) -> Result<String, AppError> {
    let mut buf = String::new();
    if input == "-" {
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .map_err(|source| AppError::Io { path: "<stdin>".into(), source })?;
    } else {
        buf = tokio::fs::read_to_string(input)
            .await
            .map_err(|source| AppError::Io { path: input.to_string(), source })?;
    }
    Ok(buf)
}

async fn run(args: &Args) -> Result<ForecastResult, AppError> {
    let raw = read_input(&args.input).await?;
    let req: ForecastRequest = serde_json::from_str(&raw)?;

    // load + predict bisa blocking lama -> jalankan di blocking pool
    let service = ForecastService::new(RandomWalkEngine::new(args.seed));
    let (mode, days, samples, model) = (args.mode, args.days, args.samples, args.model.clone());
    let result =
        tokio::task::spawn_blocking(move || service.run(mode, &req, days, samples, &model))
            .await??;
    Ok(result)
}

#[tokio::main]
async fn main() -> ExitCode {
    // ---- Logging (stderr; stdout khusus untuk satu dokumen JSON) ----
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // ---- Load config ----
    let args = config::load();
    metrics::init();

    info!(
        mode = args.mode.as_str(),
        model = %args.model,
        model_id = args.model_id(),
        days = args.days,
        samples = args.samples,
        input = %args.input,
        seed = ?args.seed,
        "startup config"
    );

    let mut rec = RunRecord::new(args.mode.as_str(), &args.model, args.model_id(), args.days);

    let (doc, code) = match run(&args).await {
        Ok(result) => {
            rec.last_price = Some(result.summary.last_price);
            match serde_json::to_string(&result) {
                Ok(s) => {
                    rec.ok = true;
                    (s, ExitCode::SUCCESS)
                }
                Err(e) => {
                    error!(?e, "serialize result failed");
                    rec.error = Some(e.to_string());
                    (serde_json::json!({ "error": e.to_string() }).to_string(), ExitCode::FAILURE)
                }
            }
        }
        Err(e) => {
            FORECAST_ERRORS.with_label_values(&[e.kind()]).inc();
            error!(kind = e.kind(), error = %e, "forecast failed");
            rec.error = Some(e.to_string());
            (serde_json::json!({ "error": e.to_string() }).to_string(), ExitCode::FAILURE)
        }
    };

    // Tepat satu dokumen JSON di stdout
    println!("{doc}");

    // ---- Recorder & metrics (opsional) ----
    if let Some(path) = args.record_file.as_deref() {
        recorder::append(path, &rec).await;
    }
    if let Some(path) = args.metrics_file.as_deref() {
        if let Err(e) = metrics::write_textfile(path).await {
            error!(?e, %path, "metrics textfile write failed");
        }
    }

    code
}
