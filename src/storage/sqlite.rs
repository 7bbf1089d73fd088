/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::Path;
use rusqlite::{params, Connection, OptionalExtension, Row};
use chrono::NaiveDateTime;

use crate::domain::{
    format_timestamp, parse_timestamp, streak, truncate_to_minute, Completion, CompletionId,
    CompletionOutcome, DomainError, Habit, HabitId, HabitType, NewHabit, Period, StalenessCheck,
};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str = "id, name, habit_period, habit_type, created_at, last_completed_at, \
     current_streak, longest_streak, is_active";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {}", db_path.display());
        Ok(storage)
    }

    /// Open a private in-memory database (used by tests)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        // Completions cascade with their habit
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Convert a `habits` row into a Habit
    ///
    /// An unreadable `last_completed_at` is a data-quality problem, not a fatal
    /// one: the habit is treated as never completed and a warning is logged.
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id = HabitId(row.get(0)?);

        let period_str: String = row.get(2)?;
        let period = period_str.parse::<Period>().map_err(|_| {
            rusqlite::Error::InvalidColumnType(2, "Invalid period".to_string(), rusqlite::types::Type::Text)
        })?;

        let type_str: String = row.get(3)?;
        let habit_type = type_str.parse::<HabitType>().map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "Invalid habit type".to_string(), rusqlite::types::Type::Text)
        })?;

        let created_at_str: String = row.get(4)?;
        let created_at = parse_timestamp(&created_at_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(4, "Invalid datetime".to_string(), rusqlite::types::Type::Text)
        })?;

        let mut current_streak: u32 = row.get(6)?;
        let last_completed_str: Option<String> = row.get(5)?;
        let last_completed_at = match last_completed_str {
            None => None,
            Some(text) => match parse_timestamp(&text) {
                Ok(ts) => Some(ts),
                Err(e) => {
                    tracing::warn!(habit_id = %id, "Ignoring unreadable last completion: {}", e);
                    current_streak = 0;
                    None
                }
            },
        };

        Ok(Habit {
            id,
            name: row.get(1)?,
            period,
            habit_type,
            created_at,
            last_completed_at,
            current_streak,
            longest_streak: row.get(7)?,
            is_active: row.get(8)?,
        })
    }

    /// Load one habit through any connection (plain or inside a transaction)
    fn load_habit(conn: &Connection, habit_id: HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        conn.query_row(&sql, params![habit_id.0], Self::habit_from_row)
            .optional()?
            .ok_or(StorageError::HabitNotFound { habit_id })
    }

    fn set_active(&self, habit_id: HabitId, active: bool) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = ?2 WHERE id = ?1",
            params![habit_id.0, active],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id });
        }
        Ok(())
    }
}

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &NewHabit) -> Result<Habit, StorageError> {
        let created_at = truncate_to_minute(habit.created_at);

        self.conn.execute(
            "INSERT INTO habits (
                name, habit_period, habit_type, created_at, last_completed_at,
                current_streak, longest_streak, is_active
            ) VALUES (?1, ?2, ?3, ?4, NULL, 0, 0, 1)",
            params![
                habit.name,
                habit.period.as_str(),
                habit.habit_type.as_str(),
                format_timestamp(&created_at),
            ],
        )?;

        let id = HabitId(self.conn.last_insert_rowid());
        tracing::debug!("Created habit: {} ({})", habit.name, id);

        Ok(Habit {
            id,
            name: habit.name.clone(),
            period: habit.period,
            habit_type: habit.habit_type,
            created_at,
            last_completed_at: None,
            current_streak: 0,
            longest_streak: 0,
            is_active: true,
        })
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: HabitId) -> Result<Habit, StorageError> {
        Self::load_habit(&self.conn, habit_id)
    }

    fn update_habit_details(
        &self,
        habit_id: HabitId,
        name: &str,
        period: Period,
        habit_type: HabitType,
    ) -> Result<Habit, StorageError> {
        Habit::validate_name(name)?;

        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?2, habit_period = ?3, habit_type = ?4 WHERE id = ?1",
            params![habit_id.0, name.trim(), period.as_str(), habit_type.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id });
        }

        tracing::debug!("Updated habit: {} ({})", name, habit_id);
        self.get_habit(habit_id)
    }

    fn archive_habit(&self, habit_id: HabitId) -> Result<(), StorageError> {
        self.set_active(habit_id, false)?;
        tracing::debug!("Archived habit: {}", habit_id);
        Ok(())
    }

    fn reactivate_habit(&self, habit_id: HabitId) -> Result<(), StorageError> {
        self.set_active(habit_id, true)?;
        tracing::debug!("Reactivated habit: {}", habit_id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.0],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound { habit_id });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, include_archived: bool) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);

        if !include_archived {
            sql.push_str(" WHERE is_active = 1");
        }

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map([], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn habit_names(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT name FROM habits WHERE is_active = 1 ORDER BY id ASC")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Record a completion and update the streak atomically
    ///
    /// A second completion inside the same period is rejected with
    /// `AlreadyCompleted` and nothing is written.
    fn complete_habit(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<CompletionOutcome, StorageError> {
        let now = truncate_to_minute(now);
        let tx = self.conn.unchecked_transaction()?;

        let mut habit = Self::load_habit(&tx, habit_id)?;
        let state = habit.streak_state();

        // The log only grows forward in time
        if let Some(last) = state.last_completed_at {
            if now < last {
                return Err(StorageError::Domain(DomainError::ConstraintViolation(format!(
                    "habit {}: completion at {} precedes the last one at {}",
                    habit_id,
                    format_timestamp(&now),
                    format_timestamp(&last)
                ))));
            }
        }

        if streak::is_completed_this_period(&state, now) {
            return Err(StorageError::AlreadyCompleted { habit_id });
        }

        let outcome = streak::record_completion(&state, now)?;
        habit.apply_completion(&outcome, now);
        habit.check_invariants()?;

        let now_str = format_timestamp(&now);
        tx.execute(
            "INSERT INTO completions (habit_id, completed_at) VALUES (?1, ?2)",
            params![habit_id.0, now_str],
        )?;
        tx.execute(
            "UPDATE habits SET last_completed_at = ?2, current_streak = ?3, longest_streak = ?4
             WHERE id = ?1",
            params![habit_id.0, now_str, habit.current_streak, habit.longest_streak],
        )?;
        tx.commit()?;

        tracing::debug!(
            habit_id = %habit_id,
            streak = outcome.new_current_streak,
            broken = outcome.streak_broken,
            "Recorded completion"
        );
        Ok(outcome)
    }

    fn check_staleness(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<StalenessCheck, StorageError> {
        let mut habit = self.get_habit(habit_id)?;
        let check = streak::check_staleness(&habit.streak_state(), now);

        if habit.apply_staleness(&check) {
            habit.check_invariants()?;
            self.conn.execute(
                "UPDATE habits SET current_streak = 0 WHERE id = ?1",
                params![habit_id.0],
            )?;
            tracing::info!(
                habit_id = %habit_id,
                days_missed = check.days_missed,
                "Reset broken streak"
            );
        }

        Ok(check)
    }

    fn is_completed_this_period(
        &self,
        habit_id: HabitId,
        now: NaiveDateTime,
    ) -> Result<bool, StorageError> {
        let habit = self.get_habit(habit_id)?;
        Ok(streak::is_completed_this_period(&habit.streak_state(), now))
    }

    fn completions_for_habit(&self, habit_id: HabitId) -> Result<Vec<Completion>, StorageError> {
        // Surface NotFound instead of an empty log for unknown ids
        self.get_habit(habit_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, completed_at FROM completions
             WHERE habit_id = ?1 ORDER BY id ASC"
        )?;

        let rows = stmt.query_map(params![habit_id.0], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut completions = Vec::new();
        for row in rows {
            let (id, owner, completed_at_str) = row?;
            match parse_timestamp(&completed_at_str) {
                Ok(completed_at) => completions.push(Completion {
                    id: CompletionId(id),
                    habit_id: HabitId(owner),
                    completed_at,
                }),
                Err(e) => {
                    tracing::warn!(habit_id = %habit_id, completion_id = id, "Skipping unreadable completion: {}", e);
                }
            }
        }

        Ok(completions)
    }
}
