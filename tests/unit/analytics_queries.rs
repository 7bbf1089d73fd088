/// Analytics over in-memory habit sets
use chrono::{NaiveDate, NaiveDateTime};
use habit_streak_tracker::analytics::*;
use habit_streak_tracker::*;

fn created() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn habit(id: i64, name: &str, period: Period, habit_type: HabitType, current: u32, longest: u32) -> Habit {
    Habit {
        id: HabitId(id),
        name: name.to_string(),
        period,
        habit_type,
        created_at: created(),
        last_completed_at: if longest > 0 { Some(created()) } else { None },
        current_streak: current,
        longest_streak: longest,
        is_active: true,
    }
}

fn sample() -> Vec<Habit> {
    vec![
        habit(1, "Read a book", Period::Daily, HabitType::Positive, 5, 5),
        habit(2, "Limit device usage", Period::Daily, HabitType::Negative, 0, 2),
        habit(3, "Deep cleaning", Period::Weekly, HabitType::Positive, 1, 5),
        habit(4, "Call family", Period::Weekly, HabitType::Positive, 1, 1),
    ]
}

#[test]
fn test_filter_by_type_split() {
    let habits = sample();
    assert_eq!(filter_by_type(&habits, HabitType::Positive).len(), 3);
    assert_eq!(filter_by_type(&habits, HabitType::Negative).len(), 1);
}

#[test]
fn test_longest_streak_ties() {
    let habits = sample();
    let names: Vec<&str> = habits_with_longest_streak(&habits)
        .iter()
        .map(|h| h.name.as_str())
        .collect();
    assert_eq!(names, vec!["Read a book", "Deep cleaning"]);
}

#[test]
fn test_current_streaks_skip_zero() {
    let habits = sample();
    let streaks = current_streaks(&habits);
    assert_eq!(streaks.len(), 3);
    assert!(streaks.iter().all(|s| s.current_streak > 0));
    assert_eq!(streaks[0].period, Period::Daily);
}

#[test]
fn test_period_filter_and_archived() {
    let mut habits = sample();
    habits[3].is_active = false;

    assert_eq!(filter_by_period(&habits, Period::Weekly).len(), 2);
    assert_eq!(active_habits(&habits).len(), 3);
}

#[test]
fn test_find_by_name() {
    let habits = sample();
    assert_eq!(find_by_name(&habits, "  read A BOOK ").unwrap().id, HabitId(1));
    assert_eq!(
        find_by_name(&habits, "Juggle"),
        Err(AnalyticsError::NotFound { name: "Juggle".to_string() })
    );
}

#[test]
fn test_empty_set() {
    assert!(habits_with_longest_streak(&[]).is_empty());
    assert!(current_streaks(&[]).is_empty());
}
