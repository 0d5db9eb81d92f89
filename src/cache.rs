// ===============================
// src/cache.rs (forecaster handle cache)
// ===============================
//
// Simpan maksimal satu handle forecaster + identifier model asalnya.
// Cek-lalu-ganti dilakukan di bawah satu lock, jadi dua caller tidak akan
// load dua model berbeda bersamaan dan membuang salah satunya.
//
use std::sync::{Arc, Mutex, PoisonError};
use tracing::info;

use crate::domain::ModelSize;
use crate::engine::{ForecastEngine, Forecaster};
use crate::error::EngineError;
use crate::metrics::{MODEL_CACHE_HITS, MODEL_LOADS};

struct Loaded {
    identifier: &'static str,
    handle: Arc<dyn Forecaster>,
}

pub struct ForecasterCache<E> {
    engine: E,
    slot: Mutex<Option<Loaded>>,
}

impl<E: ForecastEngine> ForecasterCache<E> {
    pub fn new(engine: E) -> Self {
        Self { engine, slot: Mutex::new(None) }
    }

    /// Return the handle for `model_size`, loading it (and dropping the
    /// previous one) when the resolved identifier changed.
    pub fn acquire(&self, model_size: &str) -> Result<Arc<dyn Forecaster>, EngineError> {
        let identifier = ModelSize::resolve(model_size).identifier();

        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(loaded) = slot.as_ref() {
            if loaded.identifier == identifier {
                MODEL_CACHE_HITS.inc();
                return Ok(loaded.handle.clone());
            }
        }

        let device = self.engine.device();
        info!(model = %identifier, device = %device, "loading forecaster");

        // handle lama dilepas sebelum load baru (tidak ada dua model di memori)
        *slot = None;
        let handle = self.engine.load_model(identifier)?;
        MODEL_LOADS.with_label_values(&[identifier]).inc();

        *slot = Some(Loaded { identifier, handle: handle.clone() });
        Ok(handle)
    }

    #[cfg(test)]
    pub(crate) fn cached_identifier(&self) -> Option<&'static str> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|l| l.identifier)
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }
}
