// ===============================
// src/error.rs
// ===============================
use thiserror::Error;

/// Failures raised by the forecasting engine. Fatal: never retried.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model load failed ({identifier}): {reason}")]
    ModelLoad { identifier: String, reason: String },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("bad sample matrix: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No prices provided")]
    EmptyPrices,
    #[error("prediction length must be positive")]
    InvalidLength,
    #[error("number of samples must be positive")]
    InvalidSamples,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ForecastError {
    /// Label untuk metrics `forecast_errors_total{kind}`
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::EmptyPrices
            | ForecastError::InvalidLength
            | ForecastError::InvalidSamples => "input",
            ForecastError::Engine(EngineError::ModelLoad { .. }) => "model_load",
            ForecastError::Engine(_) => "inference",
        }
    }
}

/// Errors of the process shell (input reading, JSON, blocking task).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("read input {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("forecast task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Io { .. } | AppError::Json(_) => "input",
            AppError::Forecast(e) => e.kind(),
            AppError::Join(_) => "internal",
        }
    }
}
