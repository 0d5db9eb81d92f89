// ===============================
// src/random_walk.rs
// ===============================
//
// Engine mock (random walk), pengganti engine forecasting eksternal:
// - volatilitas per langkah diambil dari stdev log-return context
//   (fallback 1% kalau context terlalu pendek / flat)
// - tiap sample path mulai dari harga terakhir, langkah multiplicative
// - seed opsional supaya hasil bisa direproduksi
//
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::domain::SampleMatrix;
use crate::engine::{Device, ForecastEngine, Forecaster};
use crate::error::EngineError;

const FALLBACK_VOL: f64 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct RandomWalkEngine {
    pub seed: Option<u64>,
}

impl RandomWalkEngine {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl ForecastEngine for RandomWalkEngine {
    fn device(&self) -> Device {
        Device::Cpu
    }

    fn load_model(&self, identifier: &str) -> Result<Arc<dyn Forecaster>, EngineError> {
        Ok(Arc::new(RandomWalkForecaster { identifier: identifier.to_string(), seed: self.seed }))
    }
}

pub struct RandomWalkForecaster {
    identifier: String,
    seed: Option<u64>,
}

/// Stdev of log returns over the positive part of `context`.
pub fn step_volatility(context: &[f64]) -> f64 {
    let rets: Vec<f64> = context
        .windows(2)
        .filter(|w| w[0] > 0.0 && w[1] > 0.0)
        .map(|w| (w[1] / w[0]).ln())
        .collect();
    if rets.len() < 2 {
        return FALLBACK_VOL;
    }
    let mean = rets.iter().sum::<f64>() / rets.len() as f64;
    let var = rets.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (rets.len() - 1) as f64;
    let sd = var.sqrt();
    if sd.is_finite() && sd > 0.0 {
        sd
    } else {
        FALLBACK_VOL
    }
}

impl Forecaster for RandomWalkForecaster {
    fn predict(
        &self,
        context: &[f64],
        prediction_length: usize,
        num_samples: usize,
    ) -> Result<SampleMatrix, EngineError> {
        let anchor = context
            .last()
            .copied()
            .ok_or_else(|| EngineError::Inference(format!("{}: empty context", self.identifier)))?;

        let mut rng = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        // uniform(-h, h) punya stdev h/sqrt(3)
        let half_width = step_volatility(context) * 3f64.sqrt();

        let rows: Vec<Vec<f64>> = (0..num_samples)
            .map(|_| {
                let mut px = anchor;
                (0..prediction_length)
                    .map(|_| {
                        px *= rng.gen_range(-half_width..=half_width).exp();
                        px
                    })
                    .collect()
            })
            .collect();
        SampleMatrix::from_rows(rows)
    }
}
