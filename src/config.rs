// ===============================
// src/config.rs
// ===============================
/*
=============================================================================
Project : event_forecast_rust — probabilistic price forecasts with event
          conditioning, in Rust
Module  : config.rs
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
use clap::Parser;
use dotenvy::dotenv;
use std::env;

use crate::domain::ModelSize;
use crate::orchestrator::Mode;

pub const DEFAULT_DAYS: usize = 14;
pub const DEFAULT_SAMPLES: usize = 20;

/// Flag CLI. Yang tidak diisi jatuh ke ENV, lalu ke default.
#[derive(Parser, Debug, Default)]
#[command(name = "event_forecast_rust", about = "Probabilistic price forecasting with event context")]
pub struct Cli {
    /// Forecasting mode [env: FORECAST_MODE]
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Model size: tiny|mini|small|base|large, unknown -> small [env: FORECAST_MODEL]
    #[arg(long)]
    pub model: Option<String>,

    /// Days to forecast [env: FORECAST_DAYS]
    #[arg(long)]
    pub days: Option<usize>,

    /// Sample paths in forecast mode [env: FORECAST_SAMPLES]
    #[arg(long)]
    pub samples: Option<usize>,

    /// Input JSON file or - for stdin [env: FORECAST_INPUT]
    #[arg(long)]
    pub input: Option<String>,

    /// Seed for the built-in random-walk engine [env: ENGINE_SEED]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Append one JSON line per run [env: RECORD_FILE]
    #[arg(long)]
    pub record_file: Option<String>,

    /// Write prometheus text metrics at exit [env: METRICS_FILE]
    #[arg(long)]
    pub metrics_file: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Args {
    pub mode: Mode,
    pub model: String,
    pub days: usize,
    pub samples: usize,
    pub input: String,
    pub seed: Option<u64>,

    // files
    pub record_file: Option<String>,
    pub metrics_file: Option<String>,
}

impl Args {
    pub fn model_id(&self) -> &'static str {
        ModelSize::resolve(&self.model).identifier()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Gabungkan flag CLI dengan ENV (flag menang).
pub fn resolve(cli: Cli) -> Args {
    let mode = cli
        .mode
        .or_else(|| env_string("FORECAST_MODE").and_then(|s| Mode::parse_one(&s)))
        .unwrap_or(Mode::Forecast);
    let model = cli
        .model
        .or_else(|| env_string("FORECAST_MODEL"))
        .unwrap_or_else(|| "small".to_string());
    let days = cli.days.or_else(|| env_parse("FORECAST_DAYS")).unwrap_or(DEFAULT_DAYS);
    let samples = cli
        .samples
        .or_else(|| env_parse("FORECAST_SAMPLES"))
        .unwrap_or(DEFAULT_SAMPLES);
    let input = cli
        .input
        .or_else(|| env_string("FORECAST_INPUT"))
        .unwrap_or_else(|| "-".to_string());
    let seed = cli.seed.or_else(|| env_parse("ENGINE_SEED"));

    let record_file = cli.record_file.or_else(|| env_string("RECORD_FILE"));
    let metrics_file = cli.metrics_file.or_else(|| env_string("METRICS_FILE"));

    Args { mode, model, days, samples, input, seed, record_file, metrics_file }
}

pub fn load() -> Args {
    // Pastikan .env dibaca (agar FORECAST_MODEL, RECORD_FILE, dll ter-load)
    let _ = dotenv();
    resolve(Cli::parse())
}
