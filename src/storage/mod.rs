/// Storage layer for persisting habit data
///
/// This module owns all durable state. Streak values are never computed here:
/// the store loads a record, asks the streak engine for the next state and
/// writes the result back in a single transaction.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDateTime;
use thiserror::Error;
use crate::domain::{
    Completion, CompletionOutcome, DomainError, Habit, HabitId, HabitType, NewHabit, Period,
    StalenessCheck,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: HabitId },

    #[error("Habit {habit_id} is already completed for this period")]
    AlreadyCompleted { habit_id: HabitId },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Every operation that depends on time takes `now` from the caller; the
/// store never reads the clock itself.
pub trait HabitStorage {
    /// Insert a new habit and return it with its assigned id
    fn create_habit(&self, habit: &NewHabit) -> Result<Habit, StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: HabitId) -> Result<Habit, StorageError>;

    /// Replace name, period and type of a habit; streak data is kept
    fn update_habit_details(
        &self,
        habit_id: HabitId,
        name: &str,
        period: Period,
        habit_type: HabitType,
    ) -> Result<Habit, StorageError>;

    /// Soft delete: mark the habit inactive
    fn archive_habit(&self, habit_id: HabitId) -> Result<(), StorageError>;

    /// Undo an archive
    fn reactivate_habit(&self, habit_id: HabitId) -> Result<(), StorageError>;

    /// Remove the habit and, through the cascade, its completions
    fn delete_habit(&self, habit_id: HabitId) -> Result<(), StorageError>;

    /// List habits, archived ones only when asked for
    fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, StorageError>;

    /// Names of all active habits
    fn habit_names(&self) -> Result<Vec<String>, StorageError>;

    /// Record a completion at `now` and update the streak
    fn complete_habit(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<CompletionOutcome, StorageError>;

    /// Reset the current streak if the habit missed its window
    fn check_staleness(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<StalenessCheck, StorageError>;

    /// Whether the habit is already done for the period containing `now`
    fn is_completed_this_period(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<bool, StorageError>;

    /// Completion log of a habit, oldest first
    fn completions_for_habit(&self, habit_id: HabitId) -> Result<Vec<Completion>, StorageError>;
}
