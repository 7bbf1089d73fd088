/// Tool for analysing the habit set
///
/// This module implements the habit_analyze MCP tool on top of the analytics
/// queries. Only active habits are analysed.

use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{self, CurrentStreak};
use crate::domain::{Habit, HabitType, Period};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Which analysis to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisQuery {
    /// Habits with the given period (needs `period`)
    ByPeriod,
    /// Habits of the given type (needs `habit_type`)
    ByType,
    /// Habits holding the longest streak
    LongestStreak,
    /// Every running streak
    CurrentStreaks,
    /// Current and longest streak of one habit (needs `name`)
    HabitStreak,
}

/// Parameters for analysing habits
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AnalyzeParams {
    pub query: AnalysisQuery,
    /// "daily" or "weekly", for `by_period`
    pub period: Option<String>,
    /// "positive" or "negative", for `by_type`
    pub habit_type: Option<String>,
    /// Habit name, for `habit_streak`
    pub name: Option<String>,
}

/// Rows produced by an analysis
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Habits(Vec<Habit>),
    Streaks(Vec<CurrentStreak>),
}

/// Response from analysing habits
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub result: AnalysisResult,
    pub message: String,
}

/// Run one of the analytics queries over the active habits
pub fn analyze_habits<S: HabitStorage>(
    storage: &S,
    params: AnalyzeParams,
) -> Result<AnalyzeResponse, ToolError> {
    let habits = owned(analytics::active_habits(&storage.list_habits(true)?));

    if habits.is_empty() {
        return Ok(AnalyzeResponse {
            result: AnalysisResult::Habits(Vec::new()),
            message: "No habits found, please create a habit first.".to_string(),
        });
    }

    match params.query {
        AnalysisQuery::ByPeriod => {
            let period: Period = required(params.period, "period")?;
            let found = owned(analytics::filter_by_period(&habits, period));
            let message = if found.is_empty() {
                format!("No habits found for period: {}.", period)
            } else {
                lines(&found, |h| format!("{} - {}", h.name, h.period))
            };
            Ok(AnalyzeResponse { result: AnalysisResult::Habits(found), message })
        }
        AnalysisQuery::ByType => {
            let habit_type: HabitType = required(params.habit_type, "habit_type")?;
            let found = owned(analytics::filter_by_type(&habits, habit_type));
            let message = if found.is_empty() {
                format!("No habits found for type: {}.", habit_type)
            } else {
                lines(&found, |h| format!("{} - {}", h.name, h.habit_type))
            };
            Ok(AnalyzeResponse { result: AnalysisResult::Habits(found), message })
        }
        AnalysisQuery::LongestStreak => {
            let found = owned(analytics::habits_with_longest_streak(&habits));
            let ranked = found
                .iter()
                .enumerate()
                .map(|(idx, h)| format!("{}. {} - {} {}", idx + 1, h.name, h.longest_streak, plural_unit(h)))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(AnalyzeResponse {
                result: AnalysisResult::Habits(found),
                message: format!("Habits by longest streak:\n{}", ranked),
            })
        }
        AnalysisQuery::CurrentStreaks => {
            let streaks = analytics::current_streaks(&habits);
            let message = if streaks.is_empty() {
                "No active habits with a current streak...".to_string()
            } else {
                streaks
                    .iter()
                    .map(|s| format!("{} ({}): Current Streak = {}", s.name, s.period, s.current_streak))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            Ok(AnalyzeResponse { result: AnalysisResult::Streaks(streaks), message })
        }
        AnalysisQuery::HabitStreak => {
            let name = params
                .name
                .ok_or_else(|| ToolError::InvalidParams("'name' is required for habit_streak".to_string()))?;
            let habit = analytics::find_by_name(&habits, &name)?.clone();
            let message = format!(
                "Habit: {}\nCurrent Streak: {}\nLongest Streak: {}",
                habit.name, habit.current_streak, habit.longest_streak
            );
            Ok(AnalyzeResponse { result: AnalysisResult::Habits(vec![habit]), message })
        }
    }
}

/// Parse a filter argument that the chosen query cannot do without
fn required<T>(value: Option<String>, field: &str) -> Result<T, ToolError>
where
    T: FromStr,
    ToolError: From<T::Err>,
{
    let raw = value.ok_or_else(|| ToolError::InvalidParams(format!("'{}' is required for this query", field)))?;
    Ok(raw.parse::<T>()?)
}

fn owned(habits: Vec<&Habit>) -> Vec<Habit> {
    habits.into_iter().cloned().collect()
}

fn lines(habits: &[Habit], render: impl Fn(&Habit) -> String) -> String {
    habits.iter().map(render).collect::<Vec<_>>().join("\n")
}

fn plural_unit(habit: &Habit) -> String {
    let unit = habit.period.unit();
    if habit.longest_streak == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}
