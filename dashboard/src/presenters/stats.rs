//! Stat card rendering.
//!
//! The visible state of the cards is fully described by [`StatCards`]. Every
//! render computes a complete `StatCards` value and writes all four fields,
//! so a render never leaves text behind from an earlier one.

use crate::catalog::{HorizonKind, TrendAggregate};
use crate::models::{average_traffic, PredictionResult, TrendResult};
use crate::surfaces::StatsSurface;

/// Peak-hours text shown alongside short-term predictions.
pub const DEFAULT_PEAK_HOURS: &str = "7-10 AM & 5-8 PM";

const PLACEHOLDER_COUNT: &str = "N/A";
const PLACEHOLDER_PENDING: &str = "...";
const LOADING: &str = "Loading...";
const PEAK_HOURS_LABEL: &str = "Peak Hours";
const DATA_POINTS_LABEL: &str = "Data Points";
const FORECAST_LABEL: &str = "Forecast";

/// Text of the count, classification and peak cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatCards {
    pub count: String,
    pub classification: String,
    pub peak: String,
    pub peak_label: String,
}

fn idle_label(kind: HorizonKind) -> &'static str {
    match kind {
        HorizonKind::ShortTerm => PEAK_HOURS_LABEL,
        HorizonKind::LongTerm => DATA_POINTS_LABEL,
    }
}

impl StatCards {
    /// Provisional cards while a fetch is in flight.
    pub fn loading(kind: HorizonKind) -> Self {
        let count = match kind {
            HorizonKind::ShortTerm => PLACEHOLDER_PENDING,
            HorizonKind::LongTerm => PLACEHOLDER_COUNT,
        };
        Self {
            count: count.to_string(),
            classification: LOADING.to_string(),
            peak: PLACEHOLDER_PENDING.to_string(),
            peak_label: idle_label(kind).to_string(),
        }
    }

    /// Error message in the classification card, placeholders elsewhere.
    pub fn error(kind: HorizonKind, message: &str) -> Self {
        Self {
            count: PLACEHOLDER_COUNT.to_string(),
            classification: message.to_string(),
            peak: PLACEHOLDER_PENDING.to_string(),
            peak_label: idle_label(kind).to_string(),
        }
    }

    pub fn prediction(prediction: &PredictionResult, peak_hours: &str) -> Self {
        Self {
            count: format!("{:.0}", prediction.predicted_total_traffic.round()),
            classification: prediction.traffic_classification.to_string(),
            peak: peak_hours.to_string(),
            peak_label: PEAK_HOURS_LABEL.to_string(),
        }
    }

    /// Average of the series selected by `aggregate`, and forecast length.
    pub fn trend(trend: &TrendResult, aggregate: TrendAggregate) -> Self {
        let (series, label) = trend.summary_series(aggregate);
        Self {
            count: format!("{:.0}", average_traffic(series).round()),
            classification: label.to_string(),
            peak: format!("{} Days", trend.daily.len()),
            peak_label: FORECAST_LABEL.to_string(),
        }
    }
}

/// Drives a [`StatsSurface`].
pub struct StatsPresenter {
    surface: Box<dyn StatsSurface>,
    peak_hours: String,
    current: Option<StatCards>,
}

impl StatsPresenter {
    pub fn new(surface: Box<dyn StatsSurface>) -> Self {
        Self {
            surface,
            peak_hours: DEFAULT_PEAK_HOURS.to_string(),
            current: None,
        }
    }

    pub fn with_peak_hours(mut self, peak_hours: impl Into<String>) -> Self {
        self.peak_hours = peak_hours.into();
        self
    }

    /// Cards as last rendered.
    pub fn current(&self) -> Option<&StatCards> {
        self.current.as_ref()
    }

    pub fn render(&mut self, cards: StatCards) {
        self.surface.set_count(&cards.count);
        self.surface.set_classification(&cards.classification);
        self.surface.set_peak(&cards.peak);
        self.surface.set_peak_label(&cards.peak_label);
        self.current = Some(cards);
    }

    pub fn render_loading(&mut self, kind: HorizonKind) {
        self.render(StatCards::loading(kind));
    }

    pub fn render_prediction(&mut self, prediction: &PredictionResult) {
        let cards = StatCards::prediction(prediction, &self.peak_hours);
        self.render(cards);
    }

    pub fn render_trend(&mut self, trend: &TrendResult, aggregate: TrendAggregate) {
        self.render(StatCards::trend(trend, aggregate));
    }

    pub fn render_error(&mut self, kind: HorizonKind, message: &str) {
        self.render(StatCards::error(kind, message));
    }
}
