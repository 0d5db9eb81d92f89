// ===============================
// src/domain.rs
// ===============================
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::EngineError;

/// Ukuran model forecaster. String yang tidak dikenal jatuh ke `Small`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    Tiny,
    Mini,
    Small,
    Base,
    Large,
}

impl ModelSize {
    pub fn resolve(s: &str) -> ModelSize {
        match s.trim().to_ascii_lowercase().as_str() {
            "tiny" => ModelSize::Tiny,
            "mini" => ModelSize::Mini,
            "small" => ModelSize::Small,
            "base" => ModelSize::Base,
            "large" => ModelSize::Large,
            _ => ModelSize::Small,
        }
    }

    // mini/large belum ada versi bolt -> pakai t5
    pub fn identifier(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "amazon/chronos-bolt-tiny",
            ModelSize::Mini => "amazon/chronos-t5-mini",
            ModelSize::Small => "amazon/chronos-bolt-small",
            ModelSize::Base => "amazon/chronos-bolt-base",
            ModelSize::Large => "amazon/chronos-t5-large",
        }
    }
}

/// One simulated future path per row, all rows the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SampleMatrix {
    rows: Vec<Vec<f64>>,
}

impl SampleMatrix {
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, EngineError> {
        let width = match rows.first() {
            Some(r) if !r.is_empty() => r.len(),
            _ => return Err(EngineError::Shape("sample matrix is empty".into())),
        };
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(EngineError::Shape(format!(
                "row {} has {} steps, expected {}",
                i,
                r.len(),
                width
            )));
        }
        Ok(Self { rows })
    }

    pub fn num_samples(&self) -> usize {
        self.rows.len()
    }

    pub fn num_steps(&self) -> usize {
        self.rows[0].len()
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of every sample at forecast step `i`.
    pub fn column(&self, i: usize) -> Vec<f64> {
        self.rows.iter().map(|r| r[i]).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub median: Vec<f64>,
    pub low_10: Vec<f64>,
    pub high_90: Vec<f64>,
    pub low_25: Vec<f64>,
    pub high_75: Vec<f64>,
    pub samples: SampleMatrix,
    pub last_price: f64,
    pub prediction_length: usize,
}

/// Event annotation. Semua field boleh kosong; angka 0 dianggap "tidak ada"
/// saat agregasi.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventRecord {
    #[serde(default = "unknown_classification", deserialize_with = "lenient_classification")]
    pub classification: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub strength: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub residual_return: Option<f64>,
}

impl Default for EventRecord {
    fn default() -> Self {
        Self { classification: unknown_classification(), strength: None, residual_return: None }
    }
}

impl EventRecord {
    pub fn new(classification: &str, strength: Option<f64>, residual_return: Option<f64>) -> Self {
        Self { classification: classification.to_string(), strength, residual_return }
    }
}

pub const UNKNOWN_CLASSIFICATION: &str = "unknown";

fn unknown_classification() -> String {
    UNKNOWN_CLASSIFICATION.to_string()
}

fn lenient_classification<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(d)?;
    Ok(match v {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => unknown_classification(),
        other => other.to_string(),
    })
}

// Angka boleh dikirim sebagai number atau string numerik; selain itu
// (termasuk "NaN" / "inf") = absent
fn lenient_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(d)?;
    Ok(match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventContext {
    #[serde(rename = "num_events")]
    pub count: usize,
    #[serde(rename = "avg_event_return")]
    pub mean_residual_return: f64,
    #[serde(rename = "avg_event_strength")]
    pub mean_strength: f64,
    /// -1 (all negative) .. 1 (all positive)
    #[serde(rename = "event_bias")]
    pub sentiment_bias: f64,
    #[serde(rename = "positive_events")]
    pub positive_count: usize,
    #[serde(rename = "negative_events")]
    pub negative_count: usize,
    #[serde(rename = "event_types")]
    pub classification_histogram: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnalysis {
    pub classification: String,
    pub strength: f64,
    pub residual_return: f64,
    pub expected_continuation: f64,
    pub confidence: f64,
}

/// Mode-specific attachment. Flattened into the result as a single key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventAttachment {
    #[serde(rename = "event_context")]
    Context(Option<EventContext>),
    #[serde(rename = "event_analysis")]
    Analysis(EventAnalysis),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    #[serde(flatten)]
    pub summary: ForecastSummary,
    #[serde(flatten)]
    pub attachment: Option<EventAttachment>,
}

impl ForecastResult {
    pub fn plain(summary: ForecastSummary) -> Self {
        Self { summary, attachment: None }
    }

    pub fn with_context(summary: ForecastSummary, ctx: Option<EventContext>) -> Self {
        Self { summary, attachment: Some(EventAttachment::Context(ctx)) }
    }

    pub fn with_analysis(summary: ForecastSummary, analysis: Option<EventAnalysis>) -> Self {
        Self { summary, attachment: analysis.map(EventAttachment::Analysis) }
    }

    pub fn event_context(&self) -> Option<&EventContext> {
        match &self.attachment {
            Some(EventAttachment::Context(ctx)) => ctx.as_ref(),
            _ => None,
        }
    }

    pub fn event_analysis(&self) -> Option<&EventAnalysis> {
        match &self.attachment {
            Some(EventAttachment::Analysis(a)) => Some(a),
            _ => None,
        }
    }
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Input document read by the CLI shell.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub prices: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub event: Option<EventRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_size_falls_back_to_small() {
        assert_eq!(ModelSize::resolve("unknown-size"), ModelSize::Small);
        assert_eq!(ModelSize::resolve(" LARGE "), ModelSize::Large);
        assert_eq!(
            ModelSize::resolve("xxl").identifier(),
            ModelSize::resolve("small").identifier()
        );
    }

    #[test]
    fn ragged_sample_matrix_is_rejected() {
        let err = SampleMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, EngineError::Shape(_)));
        assert!(SampleMatrix::from_rows(vec![]).is_err());
        assert!(SampleMatrix::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn event_record_tolerates_sparse_and_odd_fields() {
        let ev: EventRecord = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(ev.classification, "unknown");
        assert_eq!(ev.strength, None);
        assert_eq!(ev.residual_return, None);

        let ev: EventRecord = serde_json::from_str(
            r#"{"classification": null, "strength": "4.5", "residual_return": [1]}"#,
        )
        .unwrap();
        assert_eq!(ev.classification, "unknown");
        assert_eq!(ev.strength, Some(4.5));
        assert_eq!(ev.residual_return, None);

        let ev: EventRecord = serde_json::from_str(
            r#"{"strength": "NaN", "residual_return": "inf"}"#,
        )
        .unwrap();
        assert_eq!(ev.strength, None);
        assert_eq!(ev.residual_return, None);
        let ev: EventRecord = serde_json::from_str(r#"{"residual_return": " -inf "}"#).unwrap();
        assert_eq!(ev.residual_return, None);
    }

    #[test]
    fn request_defaults_when_keys_missing() {
        let req: ForecastRequest = serde_json::from_str(r#"{"prices": [1, 2.5]}"#).unwrap();
        assert_eq!(req.prices, vec![1.0, 2.5]);
        assert!(req.events.is_empty());
        assert!(req.event.is_none());

        let req: ForecastRequest =
            serde_json::from_str(r#"{"prices": null, "events": null, "event": null}"#).unwrap();
        assert!(req.prices.is_empty());
        assert!(req.events.is_empty());
        assert!(req.event.is_none());
    }

    fn summary() -> ForecastSummary {
        ForecastSummary {
            median: vec![1.0],
            low_10: vec![1.0],
            high_90: vec![1.0],
            low_25: vec![1.0],
            high_75: vec![1.0],
            samples: SampleMatrix::from_rows(vec![vec![1.0]]).unwrap(),
            last_price: 1.0,
            prediction_length: 1,
        }
    }

    #[test]
    fn result_serializes_exactly_one_mode_key() {
        let plain = serde_json::to_value(ForecastResult::plain(summary())).unwrap();
        assert!(plain.get("event_context").is_none());
        assert!(plain.get("event_analysis").is_none());
        assert_eq!(plain["samples"], serde_json::json!([[1.0]]));
        assert_eq!(plain["prediction_length"], 1);

        let agg = serde_json::to_value(ForecastResult::with_context(summary(), None)).unwrap();
        assert!(agg["event_context"].is_null());
        assert!(agg.as_object().unwrap().contains_key("event_context"));
        assert!(agg.get("event_analysis").is_none());

        let post = serde_json::to_value(ForecastResult::with_analysis(
            summary(),
            Some(EventAnalysis {
                classification: "x".into(),
                strength: 1.0,
                residual_return: 0.0,
                expected_continuation: 0.0,
                confidence: 0.1,
            }),
        ))
        .unwrap();
        assert_eq!(post["event_analysis"]["classification"], "x");
        assert!(post.get("event_context").is_none());
    }
}
