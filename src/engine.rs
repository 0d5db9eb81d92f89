// ===============================
// src/engine.rs
// ===============================
//
// Boundary ke forecasting engine eksternal:
// - ForecastEngine : load model by identifier, di device pilihan engine
// - Forecaster     : handle hasil load, menghasilkan SampleMatrix
//
// Engine asli (weights, tensor, CUDA/CPU) di luar crate ini; yang built-in
// hanya random_walk::RandomWalkEngine.
//
use std::fmt;
use std::sync::Arc;

use crate::domain::SampleMatrix;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => f.write_str("cpu"),
            Device::Cuda => f.write_str("cuda"),
        }
    }
}

/// A loaded model. `predict` returns `num_samples` paths of
/// `prediction_length` steps continuing `context`.
pub trait Forecaster: Send + Sync {
    fn predict(
        &self,
        context: &[f64],
        prediction_length: usize,
        num_samples: usize,
    ) -> Result<SampleMatrix, EngineError>;
}

pub trait ForecastEngine: Send + Sync {
    fn device(&self) -> Device;

    /// Potentially slow and blocking.
    fn load_model(&self, identifier: &str) -> Result<Arc<dyn Forecaster>, EngineError>;
}
