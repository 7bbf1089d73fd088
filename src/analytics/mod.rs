/// Analytics queries over the habit set
///
/// Read-only projections over habits that were already loaded from the
/// store. Nothing in here touches the database or the clock.

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Habit, HabitType, Period};

/// Errors returned by analytics lookups
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No habit named '{name}'")]
    NotFound { name: String },
}

/// Name, period and current streak of a habit with a running streak
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStreak {
    pub name: String,
    pub period: Period,
    pub current_streak: u32,
}

/// Habits that are not archived
pub fn active_habits(habits: &[Habit]) -> Vec<&Habit> {
    habits.iter().filter(|h| h.is_active).collect()
}

/// Habits with the given period
pub fn filter_by_period(habits: &[Habit], period: Period) -> Vec<&Habit> {
    habits.iter().filter(|h| h.period == period).collect()
}

/// Habits of the given type
pub fn filter_by_type(habits: &[Habit], habit_type: HabitType) -> Vec<&Habit> {
    habits.iter().filter(|h| h.habit_type == habit_type).collect()
}

/// Every habit whose longest streak equals the maximum over the set
pub fn habits_with_longest_streak(habits: &[Habit]) -> Vec<&Habit> {
    let Some(max_streak) = habits.iter().map(|h| h.longest_streak).max() else {
        return Vec::new();
    };

    habits
        .iter()
        .filter(|h| h.longest_streak == max_streak)
        .collect()
}

/// Running streaks, in input order
pub fn current_streaks(habits: &[Habit]) -> Vec<CurrentStreak> {
    habits
        .iter()
        .filter(|h| h.current_streak > 0)
        .map(|h| CurrentStreak {
            name: h.name.clone(),
            period: h.period,
            current_streak: h.current_streak,
        })
        .collect()
}

/// First habit whose name matches case-insensitively
///
/// Names are not unique; on duplicates the first one in input order wins.
pub fn find_by_name<'a>(habits: &'a [Habit], name: &str) -> Result<&'a Habit, AnalyticsError> {
    let wanted = name.trim().to_lowercase();
    habits
        .iter()
        .find(|h| h.name.to_lowercase() == wanted)
        .ok_or_else(|| AnalyticsError::NotFound { name: name.to_string() })
}
