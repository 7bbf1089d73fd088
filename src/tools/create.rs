/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{Habit, HabitType, NewHabit, Period};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit
    pub name: String,
    /// "daily" or "weekly"
    pub period: String,
    /// "positive" or "negative"
    pub habit_type: String,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
    now: NaiveDateTime,
) -> Result<CreateHabitResponse, ToolError> {
    let period: Period = params.period.parse()?;
    let habit_type: HabitType = params.habit_type.parse()?;

    let new_habit = NewHabit::new(params.name, period, habit_type, now)?;
    let habit = storage.create_habit(&new_habit)?;

    let message = format!(
        "Habit '{}' created successfully ({}, {}). Habit ID: {}",
        habit.name, habit.period, habit.habit_type, habit.id
    );

    Ok(CreateHabitResponse { habit, message })
}
