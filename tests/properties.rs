//! Property-based tests for the scoring and scheduling invariants.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use pattern_progress::ExerciseType;
use pattern_progress::models::answer_matcher::{
    edit_distance, highlight_spans, normalize, similarity,
};
use pattern_progress::models::pattern_progress::MAX_INTERVAL_DAYS;
use pattern_progress::models::{mastery, quality, sm2, streak};

fn arb_exercise_type() -> impl Strategy<Value = ExerciseType> {
    prop_oneof![
        Just(ExerciseType::Comparison),
        Just(ExerciseType::Discrimination),
        Just(ExerciseType::Dictation),
        Just(ExerciseType::Speed),
    ]
}

proptest! {
    #[test]
    fn mastery_moves_in_the_right_direction(
        current in 0u8..=100,
        exercise_type in arb_exercise_type(),
    ) {
        let up = mastery::new_mastery(current, true, exercise_type).unwrap();
        let down = mastery::new_mastery(current, false, exercise_type).unwrap();
        prop_assert!(up >= current);
        prop_assert!(up <= 100);
        prop_assert!(down <= current);
    }

    #[test]
    fn normalize_is_idempotent(text in "[a-zA-Z0-9 .,!?;:'\"()\\[\\]{}\\-\t]{0,40}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn edit_distance_is_symmetric(a in "[a-z ]{0,12}", b in "[a-z ]{0,12}") {
        prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
        prop_assert_eq!(edit_distance(&a, &a), 0);
        prop_assert_eq!(edit_distance(&a, ""), a.chars().count());
    }

    #[test]
    fn similarity_stays_in_range(a in "[a-zA-Z !?]{0,16}", b in "[a-zA-Z !?]{0,16}") {
        prop_assert!(similarity(&a, &b) <= 100);
    }

    #[test]
    fn highlight_reconstructs_input(text in "[a-zA-Z ]{0,30}", pattern in "[a-z]{1,4}") {
        let segments = highlight_spans(&text, &[pattern]);
        let rebuilt: String = segments.iter().map(|s| s.text.as_str()).collect();
        prop_assert_eq!(rebuilt, text);
    }

    #[test]
    fn incorrect_quality_is_always_one(ms in 0u64..200_000, avg in 1u64..20_000) {
        prop_assert_eq!(quality::quality(false, ms, avg), 1);
        let q = quality::quality(true, ms, avg);
        prop_assert!((3..=5).contains(&q));
    }

    #[test]
    fn ease_factor_never_below_floor(
        q in 0u8..=5,
        ease_tenths in 13u32..=40,
        interval in 0i32..400,
        reps in 0u32..10,
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let next = sm2::schedule(q, ease_tenths as f64 / 10.0, interval, reps, now).unwrap();
        prop_assert!(next.ease_factor >= 1.3);
        prop_assert!(next.interval_days >= 1);
        prop_assert_eq!(next.next_review_at, now + Duration::days(next.interval_days as i64));
    }

    #[test]
    fn any_prior_interval_schedules_within_cap(
        q in 0u8..=5,
        ease_tenths in 13u32..=60,
        interval in 0i32..=i32::MAX,
        reps in any::<u32>(),
    ) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let next = sm2::schedule(q, ease_tenths as f64 / 10.0, interval, reps, now).unwrap();
        prop_assert!((1..=MAX_INTERVAL_DAYS).contains(&next.interval_days));
        prop_assert_eq!(next.next_review_at, now + Duration::days(next.interval_days as i64));
    }

    #[test]
    fn streak_update_is_idempotent_within_a_day(
        current in 0u32..50,
        extra in 0u32..50,
        gap in -3i64..10,
        hours in 0i64..24,
    ) {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours);
        let state = streak::StreakState {
            current_streak: current,
            longest_streak: current + extra,
            last_practice_date: Some((now - Duration::days(gap)).date_naive()),
        };
        let (after, first) = state.record_practice(now).unwrap();
        prop_assert!(first.new_longest >= first.new_current);

        let (again, second) = after.record_practice(now).unwrap();
        prop_assert_eq!(&again, &after);
        prop_assert!(second.continued);
        prop_assert!(!second.broken);
    }
}
