/// Habit entity and related functionality
///
/// This module defines the Habit record the store persists, the NewHabit
/// request used to create one, and the validation rules for both.

use serde::{Deserialize, Serialize};
use chrono::NaiveDateTime;
use crate::domain::{
    CompletionOutcome, DomainError, HabitId, HabitType, Period, StalenessCheck, StreakState,
};

/// Longest accepted habit name, in characters
pub const MAX_NAME_LEN: usize = 100;

/// A habit the user wants to keep (or break) every day or every week
///
/// Besides the descriptive fields, the record carries the derived streak
/// statistics. Those are only ever changed through the streak engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Identifier assigned by the store
    pub id: HabitId,
    /// Display name (e.g., "Read a book")
    pub name: String,
    /// Daily or weekly recurrence
    pub period: Period,
    /// Positive or negative habit
    pub habit_type: HabitType,
    /// When this habit was created
    pub created_at: NaiveDateTime,
    /// Last completion, `None` until the first one
    pub last_completed_at: Option<NaiveDateTime>,
    /// Consecutive periods completed up to the last completion
    pub current_streak: u32,
    /// Best streak ever achieved, never decreases
    pub longest_streak: u32,
    /// Archived habits have this set to false
    pub is_active: bool,
}

impl Habit {
    /// Streak-relevant view of this habit, as consumed by the engine
    pub fn streak_state(&self) -> StreakState {
        StreakState {
            period: self.period,
            last_completed_at: self.last_completed_at,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        }
    }

    /// Apply the result of a completion computed at `now`
    pub fn apply_completion(&mut self, outcome: &CompletionOutcome, now: NaiveDateTime) {
        self.current_streak = outcome.new_current_streak;
        self.longest_streak = outcome.new_longest_streak;
        self.last_completed_at = Some(now);
    }

    /// Apply a staleness verdict; returns true when the record changed
    pub fn apply_staleness(&mut self, check: &StalenessCheck) -> bool {
        if check.reset && self.current_streak != 0 {
            self.current_streak = 0;
            return true;
        }
        false
    }

    /// Check the record-level invariants before it is written
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if self.longest_streak < self.current_streak {
            return Err(DomainError::ConstraintViolation(format!(
                "habit {}: longest streak {} is below current streak {}",
                self.id, self.longest_streak, self.current_streak
            )));
        }
        if self.last_completed_at.is_none() && self.current_streak != 0 {
            return Err(DomainError::ConstraintViolation(format!(
                "habit {}: streak of {} without any completion",
                self.id, self.current_streak
            )));
        }
        Ok(())
    }

    /// Validate habit name according to business rules
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(format!(
                "Habit name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(())
    }
}

/// Everything needed to create a habit; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub period: Period,
    pub habit_type: HabitType,
    pub created_at: NaiveDateTime,
}

impl NewHabit {
    /// Create a new habit request with validation
    pub fn new(
        name: String,
        period: Period,
        habit_type: HabitType,
        created_at: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        Habit::validate_name(&name)?;

        Ok(Self {
            name: name.trim().to_string(),
            period,
            habit_type,
            created_at,
        })
    }
}
