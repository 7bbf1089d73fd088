/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool.

use chrono::NaiveDateTime;
use serde::Serialize;
use crate::domain::{format_timestamp, streak, Habit, Period, StreakStatus};
use crate::storage::HabitStorage;
use crate::tools::{plural, HabitIdParams, ToolError};

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habit: Habit,
    pub status: StreakStatus,
    pub completed_this_period: bool,
    pub completions: Vec<String>,
    pub message: String,
}

/// Show streak details and the completion log of one habit
///
/// This is read-only: a lapsed streak is reported as broken but the stored
/// value is left for the next listing pass to reset.
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    params: HabitIdParams,
    now: NaiveDateTime,
) -> Result<StatusResponse, ToolError> {
    let habit = storage.get_habit(params.id())?;
    let completions = storage
        .completions_for_habit(habit.id)?
        .iter()
        .map(|c| format_timestamp(&c.completed_at))
        .collect::<Vec<_>>();

    let state = habit.streak_state();
    let status = streak::streak_status(&state, now);
    let completed_this_period = streak::is_completed_this_period(&state, now);

    let mut message = format!(
        "Habit: {} ({}, {})\nCurrent Streak: {}\nLongest Streak: {}\nCompletions: {}",
        habit.name,
        habit.period,
        habit.habit_type,
        habit.current_streak,
        habit.longest_streak,
        completions.len()
    );
    if let Some(last) = &habit.last_completed_at {
        message.push_str(&format!("\nLast completed: {}", format_timestamp(last)));
    }
    message.push('\n');
    message.push_str(&motivational_message(habit.current_streak, habit.period, status));

    Ok(StatusResponse {
        habit,
        status,
        completed_this_period,
        completions,
        message,
    })
}

/// Encouragement matching the streak length
fn motivational_message(current_streak: u32, period: Period, status: StreakStatus) -> String {
    let run = plural(current_streak, period.unit());
    match (status, current_streak) {
        (StreakStatus::NeverCompleted, _) => "Ready to start your streak! Every journey begins with a single step.".to_string(),
        (StreakStatus::Broken, _) | (_, 0) => "Streak lapsed. Complete it today to start a new one.".to_string(),
        (_, 1) => "Great start! Keep the momentum going.".to_string(),
        (_, 2..=6) => format!("Nice work! {} in a row.", run),
        (_, 7..=29) => format!("Excellent! {} strong. You're in the groove now!", run),
        _ => format!("Incredible! {} of consistency.", run),
    }
}
