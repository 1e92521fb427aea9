//! Calendar window for long-term trend queries.
//!
//! Windows always start tomorrow. The end date is the start plus the
//! horizon's `extra_days`, so `nextday` spans one day, `weekly` seven and
//! `monthly` thirty. "Today" is a parameter; callers in production pass
//! [`today_local`].

use std::fmt;

use chrono::{Days, Local, NaiveDate};

use crate::catalog::{HorizonDescriptor, RangeCatalog};
use crate::error::{DashboardError, DashboardResult};

/// Wire format for trend query dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive `[start, end]` pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `start` formatted as `YYYY-MM-DD`.
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end` formatted as `YYYY-MM-DD`.
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}

/// The local calendar day at call time.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Source of "today" for trend windows.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The system's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        today_local()
    }
}

/// A clock stuck on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Trend window for a long-term descriptor.
///
/// # Errors
/// Returns [`DashboardError::NotLongTerm`] for descriptors without a trend
/// window.
pub fn window_for(horizon: &HorizonDescriptor, today: NaiveDate) -> DashboardResult<DateRange> {
    let window = horizon
        .trend
        .ok_or_else(|| DashboardError::NotLongTerm(horizon.id.clone()))?;

    let out_of_range = || DashboardError::DateOutOfRange(format!("{} from {}", horizon.id, today));
    let start = today
        .checked_add_days(Days::new(1))
        .ok_or_else(out_of_range)?;
    let end = start
        .checked_add_days(Days::new(u64::from(window.extra_days)))
        .ok_or_else(out_of_range)?;

    Ok(DateRange { start, end })
}

/// Trend window for a horizon id looked up in `catalog`.
pub fn trend_dates(
    catalog: &RangeCatalog,
    horizon_id: &str,
    today: NaiveDate,
) -> DashboardResult<DateRange> {
    window_for(catalog.require(horizon_id)?, today)
}
