//! Catalog of selectable prediction horizons.
//!
//! The catalog is built once at startup and never mutated. Each entry is a
//! [`HorizonDescriptor`]; long-term entries additionally carry a
//! [`TrendWindow`] describing how many days past tomorrow the trend query
//! spans and which aggregate summarizes the result. The orchestrator branches
//! only on [`HorizonKind`] and the trend window, so adding a horizon of an
//! existing kind is a catalog change only.

use std::collections::HashSet;
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

/// Id selected when nothing else is configured.
pub const DEFAULT_HORIZON_ID: &str = "15min";

/// Short-term (model prediction) or long-term (trend) horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizonKind {
    ShortTerm,
    LongTerm,
}

impl HorizonKind {
    /// Style tag applied to the active button of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            HorizonKind::ShortTerm => "short",
            HorizonKind::LongTerm => "long",
        }
    }
}

impl fmt::Display for HorizonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizonKind::ShortTerm => f.write_str("short-term"),
            HorizonKind::LongTerm => f.write_str("long-term"),
        }
    }
}

/// Which series of a trend response summarizes a long-term horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendAggregate {
    /// The single next day, read from the daily series.
    NextDay,
    /// Average over the daily series.
    Daily,
    /// Average over the weekly series.
    Weekly,
    /// Average over the monthly series.
    Monthly,
}

impl TrendAggregate {
    /// Classification card label for this aggregate.
    pub fn label(&self) -> &'static str {
        match self {
            TrendAggregate::NextDay => "Next Day",
            TrendAggregate::Daily => "Avg. Daily",
            TrendAggregate::Weekly => "Avg. Weekly",
            TrendAggregate::Monthly => "Avg. Monthly",
        }
    }
}

/// Trend query span for a long-term horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendWindow {
    /// Days added to the start date (tomorrow) to get the end date.
    pub extra_days: u32,
    pub aggregate: TrendAggregate,
}

/// A selectable horizon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HorizonDescriptor {
    pub id: String,
    pub label: String,
    pub kind: HorizonKind,
    /// Present for long-term horizons only.
    pub trend: Option<TrendWindow>,
}

impl HorizonDescriptor {
    pub fn short_term(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: HorizonKind::ShortTerm,
            trend: None,
        }
    }

    pub fn long_term(
        id: impl Into<String>,
        label: impl Into<String>,
        extra_days: u32,
        aggregate: TrendAggregate,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: HorizonKind::LongTerm,
            trend: Some(TrendWindow {
                extra_days,
                aggregate,
            }),
        }
    }
}

/// Immutable set of horizons, in display order.
#[derive(Debug, Clone)]
pub struct RangeCatalog {
    horizons: Vec<HorizonDescriptor>,
}

impl RangeCatalog {
    /// Build a catalog, validating its invariants.
    ///
    /// # Errors
    /// Returns [`DashboardError::InvalidCatalog`] if the list is empty, an id
    /// is repeated, or a descriptor's trend window does not match its kind.
    pub fn new(horizons: Vec<HorizonDescriptor>) -> DashboardResult<Self> {
        if horizons.is_empty() {
            return Err(DashboardError::InvalidCatalog(
                "catalog must contain at least one horizon".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for horizon in &horizons {
            if !seen.insert(horizon.id.as_str()) {
                return Err(DashboardError::InvalidCatalog(format!(
                    "duplicate horizon id '{}'",
                    horizon.id
                )));
            }
            match (horizon.kind, horizon.trend.is_some()) {
                (HorizonKind::ShortTerm, true) => {
                    return Err(DashboardError::InvalidCatalog(format!(
                        "short-term horizon '{}' must not carry a trend window",
                        horizon.id
                    )))
                }
                (HorizonKind::LongTerm, false) => {
                    return Err(DashboardError::InvalidCatalog(format!(
                        "long-term horizon '{}' requires a trend window",
                        horizon.id
                    )))
                }
                _ => {}
            }
        }

        Ok(Self { horizons })
    }

    /// The seven horizons offered by the dashboard.
    pub fn standard() -> Self {
        Self {
            horizons: vec![
                HorizonDescriptor::short_term("15min", "Next 15 min"),
                HorizonDescriptor::short_term("1hr", "1 Hour"),
                HorizonDescriptor::short_term("2hr", "2 Hours"),
                HorizonDescriptor::short_term("3hr", "3 Hours"),
                HorizonDescriptor::long_term("nextday", "Next Day", 0, TrendAggregate::NextDay),
                HorizonDescriptor::long_term("weekly", "Weekly", 6, TrendAggregate::Weekly),
                HorizonDescriptor::long_term(
                    "monthly",
                    "Monthly Trend",
                    29,
                    TrendAggregate::Monthly,
                ),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&HorizonDescriptor> {
        self.horizons.iter().find(|h| h.id == id)
    }

    /// Look up a horizon, failing with [`DashboardError::UnknownHorizon`].
    pub fn require(&self, id: &str) -> DashboardResult<&HorizonDescriptor> {
        self.get(id)
            .ok_or_else(|| DashboardError::UnknownHorizon(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HorizonDescriptor> {
        self.horizons.iter()
    }

    pub fn of_kind(&self, kind: HorizonKind) -> impl Iterator<Item = &HorizonDescriptor> {
        self.horizons.iter().filter(move |h| h.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.horizons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizons.is_empty()
    }
}

impl Default for RangeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_layout() {
        let catalog = RangeCatalog::standard();
        let short: Vec<_> = catalog
            .of_kind(HorizonKind::ShortTerm)
            .map(|h| h.id.as_str())
            .collect();
        let long: Vec<_> = catalog
            .of_kind(HorizonKind::LongTerm)
            .map(|h| h.id.as_str())
            .collect();

        assert_eq!(short, vec!["15min", "1hr", "2hr", "3hr"]);
        assert_eq!(long, vec!["nextday", "weekly", "monthly"]);
        assert_eq!(catalog.get("monthly").unwrap().label, "Monthly Trend");
        assert!(catalog.contains(DEFAULT_HORIZON_ID));
    }

    #[test]
    fn test_standard_catalog_passes_validation() {
        let horizons: Vec<_> = RangeCatalog::standard().iter().cloned().collect();
        assert!(RangeCatalog::new(horizons).is_ok());
    }

    #[test]
    fn test_duplicate_ids_rejected_across_kinds() {
        let result = RangeCatalog::new(vec![
            HorizonDescriptor::short_term("1hr", "1 Hour"),
            HorizonDescriptor::long_term("1hr", "Also 1 Hour", 0, TrendAggregate::Daily),
        ]);
        assert!(matches!(result, Err(DashboardError::InvalidCatalog(_))));
    }

    #[test]
    fn test_kind_and_window_must_agree() {
        let mut bad = HorizonDescriptor::short_term("x", "X");
        bad.trend = Some(TrendWindow {
            extra_days: 1,
            aggregate: TrendAggregate::Daily,
        });
        assert!(RangeCatalog::new(vec![bad]).is_err());

        let mut bad = HorizonDescriptor::long_term("y", "Y", 1, TrendAggregate::Daily);
        bad.trend = None;
        assert!(RangeCatalog::new(vec![bad]).is_err());

        assert!(RangeCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_require_unknown() {
        let catalog = RangeCatalog::standard();
        assert!(matches!(
            catalog.require("yearly"),
            Err(DashboardError::UnknownHorizon(id)) if id == "yearly"
        ));
    }
}
