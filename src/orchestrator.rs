// ===============================
// src/orchestrator.rs
// ===============================
//
// Tiga mode:
// 1) forecast    -> base forecast saja
// 2) with_events -> base forecast + event_context (bisa null)
// 3) post_event  -> base forecast (harga termasuk hari event) + event_analysis
//
// Validasi input cuma di sini; kalau prices kosong, forecaster tidak disentuh.
//
use clap::ValueEnum;
use tracing::info;

use crate::cache::ForecasterCache;
use crate::domain::{EventRecord, ForecastRequest, ForecastResult};
use crate::engine::ForecastEngine;
use crate::error::ForecastError;
use crate::metrics::{EVENTS_AGGREGATED, FORECASTS};
use crate::{events, forecast, post_event};

/// Samples requested by the event-aware modes.
pub const EVENT_MODE_SAMPLES: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[value(name = "forecast")]
    Forecast,
    #[value(name = "with_events")]
    WithEvents,
    #[value(name = "post_event")]
    PostEvent,
}

impl Mode {
    pub fn parse_one(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forecast" | "plain" => Some(Mode::Forecast),
            "with_events" | "aggregated" => Some(Mode::WithEvents),
            "post_event" => Some(Mode::PostEvent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Forecast => "forecast",
            Mode::WithEvents => "with_events",
            Mode::PostEvent => "post_event",
        }
    }
}

pub struct ForecastService<E> {
    cache: ForecasterCache<E>,
}

impl<E: ForecastEngine> ForecastService<E> {
    pub fn new(engine: E) -> Self {
        Self { cache: ForecasterCache::new(engine) }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &ForecasterCache<E> {
        &self.cache
    }

    fn check(prices: &[f64], prediction_length: usize, num_samples: usize) -> Result<(), ForecastError> {
        if prices.is_empty() {
            return Err(ForecastError::EmptyPrices);
        }
        if prediction_length == 0 {
            return Err(ForecastError::InvalidLength);
        }
        if num_samples == 0 {
            return Err(ForecastError::InvalidSamples);
        }
        Ok(())
    }

    pub fn forecast(
        &self,
        prices: &[f64],
        prediction_length: usize,
        num_samples: usize,
        model_size: &str,
    ) -> Result<ForecastResult, ForecastError> {
        Self::check(prices, prediction_length, num_samples)?;
        let summary =
            forecast::forecast(&self.cache, prices, prediction_length, num_samples, model_size)?;
        FORECASTS.with_label_values(&[Mode::Forecast.as_str()]).inc();
        Ok(ForecastResult::plain(summary))
    }

    pub fn forecast_with_events(
        &self,
        prices: &[f64],
        events: &[EventRecord],
        prediction_length: usize,
        model_size: &str,
    ) -> Result<ForecastResult, ForecastError> {
        Self::check(prices, prediction_length, EVENT_MODE_SAMPLES)?;
        let summary = forecast::forecast(
            &self.cache,
            prices,
            prediction_length,
            EVENT_MODE_SAMPLES,
            model_size,
        )?;
        let ctx = events::aggregate(events);
        EVENTS_AGGREGATED.inc_by(events.len() as u64);
        FORECASTS.with_label_values(&[Mode::WithEvents.as_str()]).inc();
        Ok(ForecastResult::with_context(summary, ctx))
    }

    /// `prices` harus sudah termasuk harga di hari event.
    pub fn forecast_post_event(
        &self,
        prices: &[f64],
        event: Option<&EventRecord>,
        prediction_length: usize,
        model_size: &str,
    ) -> Result<ForecastResult, ForecastError> {
        Self::check(prices, prediction_length, EVENT_MODE_SAMPLES)?;
        let summary = forecast::forecast(
            &self.cache,
            prices,
            prediction_length,
            EVENT_MODE_SAMPLES,
            model_size,
        )?;
        let analysis = post_event::analyze(event);
        FORECASTS.with_label_values(&[Mode::PostEvent.as_str()]).inc();
        Ok(ForecastResult::with_analysis(summary, analysis))
    }

    /// Dispatch one request in the selected mode. `num_samples` only
    /// applies to `Mode::Forecast`.
    pub fn run(
        &self,
        mode: Mode,
        req: &ForecastRequest,
        prediction_length: usize,
        num_samples: usize,
        model_size: &str,
    ) -> Result<ForecastResult, ForecastError> {
        info!(
            mode = mode.as_str(),
            prices = req.prices.len(),
            events = req.events.len(),
            has_event = req.event.is_some(),
            days = prediction_length,
            model = %model_size,
            "forecast request"
        );
        match mode {
            Mode::Forecast => self.forecast(&req.prices, prediction_length, num_samples, model_size),
            Mode::WithEvents => {
                self.forecast_with_events(&req.prices, &req.events, prediction_length, model_size)
            }
            Mode::PostEvent => self.forecast_post_event(
                &req.prices,
                req.event.as_ref(),
                prediction_length,
                model_size,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::StubEngine;
    use crate::domain::EventAttachment;

    const PRICES: [f64; 5] = [100.0, 101.0, 99.0, 102.0, 103.0];

    fn service() -> ForecastService<StubEngine> {
        ForecastService::new(StubEngine::new(vec![
            vec![104.0, 105.0, 100.0],
            vec![102.0, 101.0, 108.0],
            vec![101.0, 103.0, 104.0],
            vec![103.0, 107.0, 102.0],
        ]))
    }

    #[test]
    fn empty_prices_never_reach_forecaster() {
        let svc = service();
        let err = svc.forecast(&[], 7, 20, "small").unwrap_err();
        assert!(matches!(err, ForecastError::EmptyPrices));
        assert_eq!(err.to_string(), "No prices provided");

        assert!(svc.forecast_with_events(&[], &[], 7, "small").is_err());
        assert!(svc.forecast_post_event(&[], None, 7, "small").is_err());
        assert_eq!(svc.cache().engine().load_count(), 0);
        assert_eq!(svc.cache().engine().predict_count(), 0);
    }

    #[test]
    fn zero_length_or_samples_rejected() {
        let svc = service();
        assert!(matches!(
            svc.forecast(&PRICES, 0, 20, "small"),
            Err(ForecastError::InvalidLength)
        ));
        assert!(matches!(
            svc.forecast(&PRICES, 3, 0, "small"),
            Err(ForecastError::InvalidSamples)
        ));
        assert_eq!(svc.cache().engine().predict_count(), 0);
    }

    #[test]
    fn with_no_events_equals_plain_plus_null_context() {
        let svc = service();
        let plain = svc.forecast(&PRICES, 3, 20, "small").unwrap();
        let agg = svc.forecast_with_events(&PRICES, &[], 3, "small").unwrap();
        assert_eq!(agg.summary, plain.summary);
        assert_eq!(agg.attachment, Some(EventAttachment::Context(None)));
        assert_eq!(plain.attachment, None);
        // model dipakai ulang
        assert_eq!(svc.cache().engine().load_count(), 1);
    }

    #[test]
    fn with_events_attaches_context() {
        let svc = service();
        let events = vec![
            EventRecord::new("surprising_positive", Some(5.0), Some(0.04)),
            EventRecord::new("surprising_negative", Some(3.0), Some(-0.02)),
        ];
        let res = svc.forecast_with_events(&PRICES, &events, 3, "base").unwrap();
        let ctx = res.event_context().unwrap();
        assert_eq!(ctx.count, 2);
        assert_eq!(ctx.sentiment_bias, 0.0);
        assert_eq!(res.summary.last_price, 103.0);
    }

    #[test]
    fn post_event_without_event_mirrors_base() {
        let svc = service();
        let plain = svc.forecast(&PRICES, 3, 20, "small").unwrap();
        let post = svc.forecast_post_event(&PRICES, None, 3, "small").unwrap();
        assert_eq!(post, plain);

        let ev = EventRecord::new("surprising_positive", Some(12.0), Some(0.08));
        let post = svc.forecast_post_event(&PRICES, Some(&ev), 3, "small").unwrap();
        let a = post.event_analysis().unwrap();
        assert_eq!(a.expected_continuation, 0.3);
        assert_eq!(a.confidence, 1.0);
        assert_eq!(a.residual_return, 0.08);
    }

    #[test]
    fn run_dispatches_by_mode() {
        let svc = service();
        let req: ForecastRequest = serde_json::from_str(
            r#"{"prices": [100, 101, 99, 102, 103],
                "events": [{"classification": "negative_anticipated", "residual_return": -0.01}],
                "event": {"classification": "surprising_negative", "strength": 2}}"#,
        )
        .unwrap();

        let r = svc.run(Mode::Forecast, &req, 3, 20, "small").unwrap();
        assert!(r.attachment.is_none());

        let r = svc.run(Mode::WithEvents, &req, 3, 20, "small").unwrap();
        assert_eq!(r.event_context().unwrap().negative_count, 1);

        let r = svc.run(Mode::PostEvent, &req, 3, 20, "small").unwrap();
        let a = r.event_analysis().unwrap();
        assert_eq!(a.expected_continuation, -0.2);
        assert!((a.confidence - 0.2).abs() < 1e-12);
    }

    #[test]
    fn mode_names() {
        assert_eq!(Mode::parse_one("WITH_EVENTS"), Some(Mode::WithEvents));
        assert_eq!(Mode::parse_one("post_event"), Some(Mode::PostEvent));
        assert_eq!(Mode::parse_one("nope"), None);
        assert_eq!(Mode::PostEvent.as_str(), "post_event");
    }
}
