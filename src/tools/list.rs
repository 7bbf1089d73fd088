/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool. Listing doubles as the
/// liveness pass: every listed habit gets a staleness check first, so broken
/// streaks are reset before they are shown.

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{format_timestamp, streak_status, HabitId, HabitType, Period, StreakStatus};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Include archived habits (default: false)
    pub include_archived: Option<bool>,
}

/// Information about a habit in the list
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: HabitId,
    pub name: String,
    pub period: Period,
    pub habit_type: HabitType,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_this_period: bool,
    pub status: StreakStatus,
    pub last_completed_at: Option<String>,
    pub is_active: bool,
}

/// A streak that was found broken during this listing
#[derive(Debug, Serialize)]
pub struct MissedStreak {
    pub habit_id: HabitId,
    pub name: String,
    pub period: Period,
    pub days_missed: i64,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
    pub missed: Vec<MissedStreak>,
    pub message: String,
}

/// List habits, resetting lapsed streaks on the way
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    now: NaiveDateTime,
) -> Result<ListHabitsResponse, ToolError> {
    let include_archived = params.include_archived.unwrap_or(false);
    let habits = storage.list_habits(include_archived)?;

    let mut summaries = Vec::with_capacity(habits.len());
    let mut missed = Vec::new();

    for mut habit in habits {
        let check = storage.check_staleness(habit.id, now)?;
        // Only announce streaks this pass actually broke
        if habit.apply_staleness(&check) {
            missed.push(MissedStreak {
                habit_id: habit.id,
                name: habit.name.clone(),
                period: habit.period,
                days_missed: check.days_missed,
            });
        }

        let completed_this_period = storage.is_completed_this_period(habit.id, now)?;

        summaries.push(HabitSummary {
            habit_id: habit.id,
            status: streak_status(&habit.streak_state(), now),
            name: habit.name,
            period: habit.period,
            habit_type: habit.habit_type,
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            completed_this_period,
            last_completed_at: habit.last_completed_at.as_ref().map(format_timestamp),
            is_active: habit.is_active,
        });
    }

    let message = render(&summaries, &missed);

    Ok(ListHabitsResponse {
        habits: summaries,
        missed,
        message,
    })
}

fn render(summaries: &[HabitSummary], missed: &[MissedStreak]) -> String {
    if summaries.is_empty() {
        return "No habits found. Please create a habit first.".to_string();
    }

    let mut lines: Vec<String> = missed
        .iter()
        .map(|m| {
            format!(
                "You missed your {} streak for habit '{}'! Missed by {} day(s).",
                m.period.display_name().to_lowercase(),
                m.name,
                m.days_missed
            )
        })
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }

    for h in summaries {
        lines.push(format!(
            "[{}] {} {} - {}, {} | streak {} (best {}){}",
            h.habit_id,
            if h.completed_this_period { "[x]" } else { "[ ]" },
            h.name,
            h.period,
            h.habit_type,
            h.current_streak,
            h.longest_streak,
            if h.is_active { "" } else { " (archived)" }
        ));
    }

    lines.join("\n")
}
