/// End-to-end habit lifecycle on a SQLite file
use chrono::{Duration, NaiveDate, NaiveDateTime};
use habit_streak_tracker::tools::{self, AnalysisQuery, AnalyzeParams, HabitIdParams, ListHabitsParams};
use habit_streak_tracker::*;
use tempfile::NamedTempFile;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 4, 7)
        .unwrap()
        .and_hms_opt(7, 45, 12)
        .unwrap()
}

fn new_habit(name: &str, period: Period) -> NewHabit {
    NewHabit::new(name.to_string(), period, HabitType::Positive, t0()).unwrap()
}

#[test]
fn test_daily_streak_survives_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let path = temp_file.path().to_path_buf();

    let id = {
        let storage = SqliteStorage::new(&path).expect("Failed to create storage");
        let habit = storage.create_habit(&new_habit("Meditate", Period::Daily)).unwrap();
        for day in 0..5 {
            storage.complete_habit(habit.id, t0() + Duration::days(day)).unwrap();
        }
        habit.id
    };

    let storage = SqliteStorage::new(&path).expect("Failed to reopen storage");
    let habit = storage.get_habit(id).unwrap();
    assert_eq!(habit.current_streak, 5);
    assert_eq!(habit.longest_streak, 5);
    // Stored at minute resolution
    assert_eq!(habit.last_completed_at.unwrap().format("%H:%M:%S").to_string(), "07:45:00");
    assert_eq!(storage.completions_for_habit(id).unwrap().len(), 5);
}

#[test]
fn test_same_period_completion_is_rejected() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let habit = storage.create_habit(&new_habit("Journal", Period::Weekly)).unwrap();

    storage.complete_habit(habit.id, t0()).unwrap();
    let again = storage.complete_habit(habit.id, t0() + Duration::days(3));
    assert!(matches!(again, Err(StorageError::AlreadyCompleted { .. })));
    assert_eq!(storage.completions_for_habit(habit.id).unwrap().len(), 1);

    // Day seven renews the weekly streak
    let outcome = storage.complete_habit(habit.id, t0() + Duration::days(7)).unwrap();
    assert_eq!(outcome.new_current_streak, 2);
}

#[test]
fn test_weekly_staleness_resets_once() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let habit = storage.create_habit(&new_habit("Deep cleaning", Period::Weekly)).unwrap();
    storage.complete_habit(habit.id, t0()).unwrap();
    storage.complete_habit(habit.id, t0() + Duration::days(7)).unwrap();

    let late = t0() + Duration::days(15);
    let check = storage.check_staleness(habit.id, late).unwrap();
    assert!(check.reset);
    assert_eq!(check.days_missed, 8);

    let stored = storage.get_habit(habit.id).unwrap();
    assert_eq!(stored.current_streak, 0);
    assert_eq!(stored.longest_streak, 2);

    let again = storage.check_staleness(habit.id, late).unwrap();
    assert_eq!(again.reset, check.reset);
    assert_eq!(storage.get_habit(habit.id).unwrap().longest_streak, 2);
}

#[test]
fn test_tools_workflow() {
    let storage = SqliteStorage::open_in_memory().unwrap();

    let created = tools::create_habit(
        &storage,
        tools::CreateHabitParams {
            name: "Read a book".to_string(),
            period: "Daily".to_string(),
            habit_type: "positive".to_string(),
        },
        t0(),
    )
    .unwrap();
    let id = created.habit.id.0;

    for day in 0..3 {
        tools::complete_habit(&storage, HabitIdParams { habit_id: id }, t0() + Duration::days(day)).unwrap();
    }

    let listed = tools::list_habits(&storage, ListHabitsParams::default(), t0() + Duration::days(2)).unwrap();
    assert_eq!(listed.habits.len(), 1);
    assert!(listed.habits[0].completed_this_period);
    assert!(listed.missed.is_empty());

    let longest = tools::analyze_habits(
        &storage,
        AnalyzeParams {
            query: AnalysisQuery::LongestStreak,
            period: None,
            habit_type: None,
            name: None,
        },
    )
    .unwrap();
    assert!(longest.message.contains("Read a book - 3 days"));

    tools::archive_habit(&storage, HabitIdParams { habit_id: id }).unwrap();
    let listed = tools::list_habits(&storage, ListHabitsParams::default(), t0() + Duration::days(2)).unwrap();
    assert!(listed.habits.is_empty());

    let listed = tools::list_habits(
        &storage,
        ListHabitsParams { include_archived: Some(true) },
        t0() + Duration::days(2),
    )
    .unwrap();
    assert_eq!(listed.habits.len(), 1);
    assert!(!listed.habits[0].is_active);
}

#[test]
fn test_delete_removes_completions() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    let habit = storage.create_habit(&new_habit("Stretch", Period::Daily)).unwrap();
    storage.complete_habit(habit.id, t0()).unwrap();

    storage.delete_habit(habit.id).unwrap();
    assert!(matches!(storage.get_habit(habit.id), Err(StorageError::HabitNotFound { .. })));
    assert!(matches!(
        storage.completions_for_habit(habit.id),
        Err(StorageError::HabitNotFound { .. })
    ));
    assert!(storage.list_habits(true).unwrap().is_empty());
}
