/// Behaviour of the pure streak engine over whole completion sequences
use chrono::{Duration, NaiveDate, NaiveDateTime};
use habit_streak_tracker::*;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 3)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}

/// Apply a completion to a state the way the store does
fn complete(state: &mut StreakState, now: NaiveDateTime) -> CompletionOutcome {
    let outcome = record_completion(state, now).unwrap();
    state.current_streak = outcome.new_current_streak;
    state.longest_streak = outcome.new_longest_streak;
    state.last_completed_at = Some(now);
    outcome
}

#[test]
fn test_first_completion_starts_streak() {
    let mut state = StreakState::new(Period::Daily);
    let outcome = complete(&mut state, t0());

    assert_eq!(outcome.new_current_streak, 1);
    assert!(!outcome.streak_broken);
    assert_eq!(state.longest_streak, 1);
}

#[test]
fn test_five_consecutive_daily_completions() {
    let mut state = StreakState::new(Period::Daily);
    for day in 0..5 {
        complete(&mut state, t0() + Duration::days(day));
    }

    assert_eq!(state.current_streak, 5);
    assert_eq!(state.longest_streak, 5);
}

#[test]
fn test_daily_one_day_later_extends() {
    let state = StreakState {
        period: Period::Daily,
        last_completed_at: Some(t0()),
        current_streak: 4,
        longest_streak: 4,
    };

    let outcome = record_completion(&state, t0() + Duration::days(1)).unwrap();
    assert_eq!(outcome.new_current_streak, 5);
    assert!(!outcome.streak_broken);
}

#[test]
fn test_daily_two_days_later_breaks() {
    let state = StreakState {
        period: Period::Daily,
        last_completed_at: Some(t0()),
        current_streak: 3,
        longest_streak: 6,
    };

    let outcome = record_completion(&state, t0() + Duration::days(2)).unwrap();
    assert_eq!(outcome.new_current_streak, 1);
    assert!(outcome.streak_broken);
    assert_eq!(outcome.new_longest_streak, 6);
}

#[test]
fn test_weekly_eight_days_is_stale() {
    let mut state = StreakState {
        period: Period::Weekly,
        last_completed_at: Some(t0()),
        current_streak: 3,
        longest_streak: 3,
    };

    let check = check_staleness(&state, t0() + Duration::days(8));
    assert!(check.reset);
    assert_eq!(check.days_missed, 8);

    state.current_streak = 0;
    assert_eq!(streak_status(&state, t0() + Duration::days(8)), StreakStatus::Broken);
}

#[test]
fn test_staleness_is_idempotent() {
    let mut state = StreakState {
        period: Period::Daily,
        last_completed_at: Some(t0()),
        current_streak: 2,
        longest_streak: 7,
    };
    let later = t0() + Duration::days(3);

    let first = check_staleness(&state, later);
    if first.reset {
        state.current_streak = 0;
    }
    let second = check_staleness(&state, later);

    assert_eq!(first.reset, second.reset);
    assert_eq!(state.longest_streak, 7);
}

#[test]
fn test_completed_this_period_daily() {
    let state = StreakState {
        period: Period::Daily,
        last_completed_at: Some(t0()),
        current_streak: 1,
        longest_streak: 1,
    };
    assert!(is_completed_this_period(&state, t0() + Duration::hours(3)));

    let fabricated = StreakState {
        last_completed_at: Some(t0() - Duration::days(8)),
        ..state
    };
    assert!(!is_completed_this_period(&fabricated, t0()));
}

#[test]
fn test_weekly_day_seven_renews_but_is_not_done() {
    let state = StreakState {
        period: Period::Weekly,
        last_completed_at: Some(t0()),
        current_streak: 2,
        longest_streak: 2,
    };
    let day_seven = t0() + Duration::days(7);

    assert!(!is_completed_this_period(&state, day_seven));
    let outcome = record_completion(&state, day_seven).unwrap();
    assert_eq!(outcome.new_current_streak, 3);
    assert!(!outcome.streak_broken);
}

#[test]
fn test_longest_never_below_current_over_mixed_sequence() {
    let mut state = StreakState::new(Period::Daily);
    let offsets = [0, 1, 2, 5, 6, 6, 7, 15, 16, 17, 18];

    for day in offsets {
        complete(&mut state, t0() + Duration::days(day));
        assert!(state.longest_streak >= state.current_streak);
    }
    assert_eq!(state.current_streak, 4);
    assert_eq!(state.longest_streak, 4);
}

#[test]
fn test_corrupt_state_is_rejected() {
    let state = StreakState {
        period: Period::Weekly,
        last_completed_at: Some(t0()),
        current_streak: 5,
        longest_streak: 2,
    };

    let result = record_completion(&state, t0() + Duration::days(7));
    assert!(matches!(result, Err(DomainError::ConstraintViolation(_))));
}
