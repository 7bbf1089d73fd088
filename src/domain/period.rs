/// Period calendar
///
/// Classifies the time elapsed between two completion timestamps relative to a
/// habit's period. Everything here is a pure function of its arguments.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::Period;

/// Where a timestamp falls relative to a previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodPosition {
    /// Still inside the period of the previous timestamp
    SamePeriod,
    /// Inside the renewal window: continues a streak
    NextPeriod,
    /// Past the renewal window: at least one period was missed
    Gap,
}

/// Whole days elapsed from `previous` to `current`
///
/// Fractional days are dropped, so 23h59m counts as 0 and 24h as 1. Negative
/// when `current` precedes `previous`.
pub fn elapsed_days(previous: NaiveDateTime, current: NaiveDateTime) -> i64 {
    (current - previous).num_days()
}

/// Classify `current` against `previous` for the given period
///
/// A negative delta (clock skew or a backdated event) is treated as the same
/// period so that it can never extend or break a streak.
pub fn classify(period: Period, previous: NaiveDateTime, current: NaiveDateTime) -> PeriodPosition {
    classify_delta(period, elapsed_days(previous, current))
}

/// Classify an already computed day delta
pub fn classify_delta(period: Period, delta_days: i64) -> PeriodPosition {
    if delta_days <= 0 {
        PeriodPosition::SamePeriod
    } else if delta_days <= period.renewal_window_days() {
        PeriodPosition::NextPeriod
    } else {
        PeriodPosition::Gap
    }
}
