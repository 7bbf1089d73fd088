/// Streak engine
///
/// Given the persisted streak state of a habit and the current time, this
/// module computes what a completion or a liveness check does to the streak.
/// The functions are pure: they never read the clock and never write
/// anything. The store applies their results.

use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use crate::domain::{classify, elapsed_days, DomainError, Period, PeriodPosition};

/// The streak-relevant part of a habit record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreakState {
    pub period: Period,
    /// When the habit was last completed (None if never completed)
    pub last_completed_at: Option<NaiveDateTime>,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl StreakState {
    /// State of a habit that has never been completed
    pub fn new(period: Period) -> Self {
        Self {
            period,
            last_completed_at: None,
            current_streak: 0,
            longest_streak: 0,
        }
    }
}

/// Result of recording a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionOutcome {
    pub new_current_streak: u32,
    pub new_longest_streak: u32,
    /// True when the completion arrived after the renewal window and restarted the streak
    pub streak_broken: bool,
}

/// Result of a liveness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StalenessCheck {
    /// The current streak must be forced to zero
    pub reset: bool,
    /// Days since the last completion when `reset` is set, otherwise 0
    pub days_missed: i64,
}

/// Conceptual streak state of a habit at a given moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakStatus {
    NeverCompleted,
    ActiveStreak,
    Broken,
}

/// Compute the streak after a completion at `now`
///
/// The caller is expected to append the completion and set
/// `last_completed_at = now` together with the returned values.
pub fn record_completion(
    state: &StreakState,
    now: NaiveDateTime,
) -> Result<CompletionOutcome, DomainError> {
    if state.longest_streak < state.current_streak {
        return Err(DomainError::ConstraintViolation(format!(
            "longest streak {} is below current streak {}",
            state.longest_streak, state.current_streak
        )));
    }

    let (new_current, broken) = match state.last_completed_at {
        None => (1, false),
        Some(last) => match classify(state.period, last, now) {
            // Re-completing inside the same period leaves the count alone
            PeriodPosition::SamePeriod => (state.current_streak.max(1), false),
            PeriodPosition::NextPeriod => (state.current_streak.saturating_add(1), false),
            PeriodPosition::Gap => (1, true),
        },
    };

    Ok(CompletionOutcome {
        new_current_streak: new_current,
        new_longest_streak: state.longest_streak.max(new_current),
        streak_broken: broken,
    })
}

/// Decide whether the streak has lapsed by `now`
pub fn check_staleness(state: &StreakState, now: NaiveDateTime) -> StalenessCheck {
    let Some(last) = state.last_completed_at else {
        return StalenessCheck { reset: false, days_missed: 0 };
    };

    let delta = elapsed_days(last, now);
    if delta > state.period.renewal_window_days() {
        StalenessCheck { reset: true, days_missed: delta }
    } else {
        StalenessCheck { reset: false, days_missed: 0 }
    }
}

/// Whether the habit already counts as done for the period containing `now`
///
/// Weekly habits use a strict `< 7` here while the renewal window includes day
/// 7, so a weekly habit completed exactly a week ago is both renewable and no
/// longer "done".
pub fn is_completed_this_period(state: &StreakState, now: NaiveDateTime) -> bool {
    let Some(last) = state.last_completed_at else {
        return false;
    };

    let delta = elapsed_days(last, now);
    match state.period {
        Period::Daily => delta == 0,
        Period::Weekly => delta < 7,
    }
}

/// Where the habit sits in the streak lifecycle at `now`
pub fn streak_status(state: &StreakState, now: NaiveDateTime) -> StreakStatus {
    if state.last_completed_at.is_none() {
        return StreakStatus::NeverCompleted;
    }
    if state.current_streak == 0 || check_staleness(state, now).reset {
        StreakStatus::Broken
    } else {
        StreakStatus::ActiveStreak
    }
}
