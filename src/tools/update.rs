/// Tools for changing existing habits
///
/// This module implements habit_update (name, period and type), plus
/// habit_archive, habit_reactivate and habit_delete.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{HabitId, HabitType, Period};
use crate::storage::HabitStorage;
use crate::tools::{HabitIdParams, ToolError};

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    /// ID of the habit to edit
    pub habit_id: i64,
    /// New name
    pub name: String,
    /// New period: "daily" or "weekly"
    pub period: String,
    /// New type: "positive" or "negative"
    pub habit_type: String,
}

/// Response from changing a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Replace name, period and type of a habit
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let period: Period = params.period.parse()?;
    let habit_type: HabitType = params.habit_type.parse()?;

    let habit = storage.update_habit_details(HabitId(params.habit_id), &params.name, period, habit_type)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Updated habit '{}' ({}, {})", habit.name, habit.period, habit.habit_type),
    })
}

/// Archive a habit; its history is kept
pub fn archive_habit<S: HabitStorage>(
    storage: &S,
    params: HabitIdParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit = storage.get_habit(params.id())?;
    storage.archive_habit(habit.id)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Archived habit '{}'", habit.name),
    })
}

/// Bring an archived habit back into the default listings
pub fn reactivate_habit<S: HabitStorage>(
    storage: &S,
    params: HabitIdParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit = storage.get_habit(params.id())?;
    storage.reactivate_habit(habit.id)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Reactivated habit '{}'", habit.name),
    })
}

/// Delete a habit together with all of its completions
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: HabitIdParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit = storage.get_habit(params.id())?;
    storage.delete_habit(habit.id)?;

    Ok(UpdateHabitResponse {
        success: true,
        message: format!("Deleted habit '{}'", habit.name),
    })
}
