/// Tool for completing habits
///
/// This module implements the habit_complete MCP tool.

use chrono::NaiveDateTime;
use serde::Serialize;
use crate::domain::HabitId;
use crate::storage::HabitStorage;
use crate::tools::{plural, HabitIdParams, ToolError};

/// Response from completing a habit
#[derive(Debug, Serialize)]
pub struct CompleteHabitResponse {
    pub habit_id: HabitId,
    pub new_streak: u32,
    pub longest_streak: u32,
    pub streak_broken: bool,
    pub message: String,
}

/// Mark a habit as completed at `now`
pub fn complete_habit<S: HabitStorage>(
    storage: &S,
    params: HabitIdParams,
    now: NaiveDateTime,
) -> Result<CompleteHabitResponse, ToolError> {
    let habit_id = params.id();
    let habit = storage.get_habit(habit_id)?;
    let outcome = storage.complete_habit(habit_id, now)?;

    let streak = plural(outcome.new_current_streak, habit.period.unit());
    let message = if outcome.streak_broken {
        format!(
            "You missed '{}' last time, starting a new streak from today. Current streak: {}",
            habit.name, streak
        )
    } else if outcome.new_current_streak == 1 {
        format!("New streak started for '{}'!", habit.name)
    } else {
        format!("Completed '{}'. Current streak: {}", habit.name, streak)
    };

    Ok(CompleteHabitResponse {
        habit_id,
        new_streak: outcome.new_current_streak,
        longest_streak: outcome.new_longest_streak,
        streak_broken: outcome.streak_broken,
        message,
    })
}
