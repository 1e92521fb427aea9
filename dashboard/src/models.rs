//! Wire types exchanged with the traffic backend.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::TrendAggregate;

/// One recent observation forwarded verbatim to the predict endpoint.
pub type RawSample = serde_json::Value;

// =============================================================================
// Short-term prediction
// =============================================================================

/// Congestion class reported by the prediction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficClassification {
    Light,
    Normal,
    Heavy,
    Extreme,
}

impl TrafficClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClassification::Light => "Light",
            TrafficClassification::Normal => "Normal",
            TrafficClassification::Heavy => "Heavy",
            TrafficClassification::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for TrafficClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Light" => Ok(Self::Light),
            "Normal" => Ok(Self::Normal),
            "Heavy" => Ok(Self::Heavy),
            "Extreme" => Ok(Self::Extreme),
            _ => Err(format!("Unknown traffic classification: {}", s)),
        }
    }
}

/// Response body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_total_traffic: f64,
    pub traffic_classification: TrafficClassification,
}

/// Request body of `POST /api/predict`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest<'a> {
    pub recent_data: &'a [RawSample],
}

// =============================================================================
// Long-term trends
// =============================================================================

/// One day of forecast traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    #[serde(
        rename = "Date",
        deserialize_with = "deserialize_trend_date",
        serialize_with = "serialize_trend_date"
    )]
    pub date: NaiveDate,
    #[serde(
        rename = "Predicted_Traffic",
        default,
        deserialize_with = "deserialize_null_as_zero"
    )]
    pub predicted_traffic: f64,
}

impl TrendPoint {
    pub fn new(date: NaiveDate, predicted_traffic: f64) -> Self {
        Self {
            date,
            predicted_traffic,
        }
    }
}

/// Response body of `GET /api/trends`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    #[serde(default)]
    pub daily: Vec<TrendPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly: Option<Vec<TrendPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly: Option<Vec<TrendPoint>>,
}

impl TrendResult {
    /// Series summarizing `aggregate`, and the label it is shown under.
    ///
    /// Falls back to the daily series (labelled as a daily average) when the
    /// requested pre-aggregated view is absent.
    pub fn summary_series(&self, aggregate: TrendAggregate) -> (&[TrendPoint], &'static str) {
        let view = match aggregate {
            TrendAggregate::NextDay => Some(self.daily.as_slice()),
            TrendAggregate::Daily => None,
            TrendAggregate::Weekly => self.weekly.as_deref(),
            TrendAggregate::Monthly => self.monthly.as_deref(),
        };
        match view {
            Some(points) => (points, aggregate.label()),
            None => (self.daily.as_slice(), TrendAggregate::Daily.label()),
        }
    }
}

/// Arithmetic mean of the predicted traffic, `0.0` for an empty series.
pub fn average_traffic(points: &[TrendPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum: f64 = points.iter().map(|p| p.predicted_traffic).sum();
    sum / points.len() as f64
}

fn deserialize_null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

fn serialize_trend_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(crate::date_range::DATE_FORMAT))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrendDate {
    Text(String),
    EpochMillis(i64),
}

/// Accepts `YYYY-MM-DD`, ISO date-times, RFC 2822 dates and epoch millis.
fn deserialize_trend_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTrendDate::deserialize(deserializer)? {
        RawTrendDate::Text(text) => parse_trend_date(&text).map_err(serde::de::Error::custom),
        RawTrendDate::EpochMillis(millis) => DateTime::from_timestamp_millis(millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {}", millis))),
    }
}

/// Parse the textual date forms the trends endpoint is known to emit.
pub fn parse_trend_date(text: &str) -> Result<NaiveDate, String> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, crate::date_range::DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(dt.date());
    }
    // Flask serializes datetimes as "Thu, 11 Jan 2024 00:00:00 GMT".
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Ok(dt.date_naive());
    }
    Err(format!("Unrecognized trend date: {}", text))
}

// =============================================================================
// Config
// =============================================================================

/// Response body of `GET /api/config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(day: u32, value: f64) -> TrendPoint {
        TrendPoint::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), value)
    }

    #[test]
    fn test_average_of_three() {
        let daily = vec![point(11, 10.0), point(12, 20.0), point(13, 30.0)];
        assert_eq!(average_traffic(&daily), 20.0);
        assert_eq!(average_traffic(&[]), 0.0);
    }

    #[test]
    fn test_trend_point_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        for raw in [
            json!({"Date": "2024-01-11", "Predicted_Traffic": 5.0}),
            json!({"Date": "2024-01-11T00:00:00", "Predicted_Traffic": 5.0}),
            json!({"Date": "2024-01-11T00:00:00.000Z", "Predicted_Traffic": 5.0}),
            json!({"Date": "Thu, 11 Jan 2024 00:00:00 GMT", "Predicted_Traffic": 5.0}),
            json!({"Date": 1_704_931_200_000i64, "Predicted_Traffic": 5.0}),
        ] {
            let parsed: TrendPoint = serde_json::from_value(raw.clone()).unwrap();
            assert_eq!(parsed.date, expected, "failed for {}", raw);
        }
    }

    #[test]
    fn test_trend_point_missing_traffic_is_zero() {
        let parsed: TrendPoint =
            serde_json::from_value(json!({"Date": "2024-01-11", "Predicted_Traffic": null}))
                .unwrap();
        assert_eq!(parsed.predicted_traffic, 0.0);

        let parsed: TrendPoint = serde_json::from_value(json!({"Date": "2024-01-11"})).unwrap();
        assert_eq!(parsed.predicted_traffic, 0.0);
    }

    #[test]
    fn test_trend_point_rejects_garbage_date() {
        let result: Result<TrendPoint, _> =
            serde_json::from_value(json!({"Date": "next tuesday", "Predicted_Traffic": 1.0}));
        assert!(result.is_err());
    }

    #[test]
    fn test_trend_point_serializes_wire_names() {
        let value = serde_json::to_value(point(11, 42.0)).unwrap();
        assert_eq!(value, json!({"Date": "2024-01-11", "Predicted_Traffic": 42.0}));
    }

    #[test]
    fn test_summary_series_selection() {
        let result = TrendResult {
            daily: vec![point(11, 10.0), point(12, 20.0)],
            weekly: Some(vec![point(11, 100.0)]),
            monthly: None,
        };

        let (series, label) = result.summary_series(TrendAggregate::NextDay);
        assert_eq!(series.len(), 2);
        assert_eq!(label, "Next Day");

        let (series, label) = result.summary_series(TrendAggregate::Weekly);
        assert_eq!(series[0].predicted_traffic, 100.0);
        assert_eq!(label, "Avg. Weekly");

        let (series, label) = result.summary_series(TrendAggregate::Monthly);
        assert_eq!(series.len(), 2);
        assert_eq!(label, "Avg. Daily");
    }

    #[test]
    fn test_prediction_result_wire_format() {
        let parsed: PredictionResult = serde_json::from_value(json!({
            "predicted_total_traffic": 1234.6,
            "traffic_classification": "Heavy"
        }))
        .unwrap();
        assert_eq!(parsed.traffic_classification, TrafficClassification::Heavy);

        let bad: Result<PredictionResult, _> = serde_json::from_value(json!({
            "predicted_total_traffic": 1.0,
            "traffic_classification": "Gridlock"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_classification_from_str() {
        assert_eq!(
            "Extreme".parse::<TrafficClassification>().unwrap(),
            TrafficClassification::Extreme
        );
        assert!("light".parse::<TrafficClassification>().is_err());
    }
}
