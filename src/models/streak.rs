//! Daily practice streaks.
//!
//! Days are compared in UTC with the time of day discarded. A streak moves at most
//! once per calendar day, so calling `update` again on the same day changes nothing.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_practice_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakUpdate {
    #[serde(rename = "current")]
    pub new_current: u32,
    #[serde(rename = "longest")]
    pub new_longest: u32,
    pub continued: bool,
    pub broken: bool,
    pub is_new_record: bool,
}

pub fn update(
    current_streak: u32,
    longest_streak: u32,
    last_practice_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<StreakUpdate> {
    if longest_streak < current_streak {
        return Err(EngineError::invariant(format!(
            "longest streak {} is below current streak {}",
            longest_streak, current_streak
        )));
    }

    let today = now.date_naive();
    let (new_current, continued, broken) = match last_practice_date {
        Some(last) if last == today => (current_streak, true, false),
        None => (current_streak + 1, true, false),
        Some(last) if today.signed_duration_since(last).num_days() == 1 => {
            (current_streak + 1, true, false)
        }
        // A gap of two or more days, or a date in the future.
        Some(_) => (1, false, current_streak > 0),
    };

    log::trace!(
        "streak: last={:?} today={} {}->{} continued={} broken={}",
        last_practice_date,
        today,
        current_streak,
        new_current,
        continued,
        broken
    );

    Ok(StreakUpdate {
        new_current,
        new_longest: longest_streak.max(new_current),
        continued,
        broken,
        is_new_record: new_current > longest_streak,
    })
}

impl StreakState {
    /// Applies a practice event at `now`, returning the new state and what happened.
    pub fn record_practice(&self, now: DateTime<Utc>) -> Result<(StreakState, StreakUpdate)> {
        let outcome = update(
            self.current_streak,
            self.longest_streak,
            self.last_practice_date,
            now,
        )?;
        let state = StreakState {
            current_streak: outcome.new_current,
            longest_streak: outcome.new_longest,
            last_practice_date: Some(now.date_naive()),
        };
        Ok((state, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_first_practice_starts_streak() {
        let out = update(0, 0, None, now()).unwrap();
        assert_eq!(out.new_current, 1);
        assert_eq!(out.new_longest, 1);
        assert!(out.continued);
        assert!(!out.broken);
        assert!(out.is_new_record);
    }

    #[test]
    fn test_same_day_is_unchanged() {
        let out = update(3, 7, Some(now().date_naive()), now()).unwrap();
        assert_eq!(out.new_current, 3);
        assert_eq!(out.new_longest, 7);
        assert!(out.continued);
        assert!(!out.broken);
        assert!(!out.is_new_record);
    }

    #[test]
    fn test_yesterday_continues() {
        let yesterday = (now() - Duration::days(1)).date_naive();
        let out = update(4, 4, Some(yesterday), now()).unwrap();
        assert_eq!(out.new_current, 5);
        assert_eq!(out.new_longest, 5);
        assert!(out.is_new_record);
    }

    #[test]
    fn test_time_of_day_is_ignored() {
        // 23:59 yesterday -> 00:01 today still counts as consecutive
        let late = Utc.with_ymd_and_hms(2024, 6, 14, 23, 59, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 6, 15, 0, 1, 0).unwrap();
        let out = update(2, 2, Some(late.date_naive()), early).unwrap();
        assert_eq!(out.new_current, 3);
    }

    #[test]
    fn test_gap_breaks_streak() {
        let two_days_ago = (now() - Duration::days(2)).date_naive();
        let out = update(5, 10, Some(two_days_ago), now()).unwrap();
        assert_eq!(out.new_current, 1);
        assert_eq!(out.new_longest, 10);
        assert!(!out.continued);
        assert!(out.broken);
        assert!(!out.is_new_record);
    }

    #[test]
    fn test_future_date_is_treated_as_broken() {
        let tomorrow = (now() + Duration::days(1)).date_naive();
        let out = update(2, 2, Some(tomorrow), now()).unwrap();
        assert_eq!(out.new_current, 1);
        assert!(!out.continued);
        assert!(out.broken);
    }

    #[test]
    fn test_gap_with_zero_streak_is_not_broken() {
        let long_ago = (now() - Duration::days(30)).date_naive();
        let out = update(0, 3, Some(long_ago), now()).unwrap();
        assert_eq!(out.new_current, 1);
        assert!(!out.broken);
    }

    #[test]
    fn test_record_practice_twice_same_day() {
        let state = StreakState {
            current_streak: 1,
            longest_streak: 1,
            last_practice_date: Some((now() - Duration::days(1)).date_naive()),
        };
        let (state, first) = state.record_practice(now()).unwrap();
        assert_eq!(first.new_current, 2);

        let (again, second) = state.record_practice(now() + Duration::hours(3)).unwrap();
        assert_eq!(again, state);
        assert!(second.continued);
        assert_eq!(second.new_current, 2);
    }

    #[test]
    fn test_longest_below_current_fails() {
        assert!(matches!(
            update(5, 2, None, now()),
            Err(EngineError::Invariant(_))
        ));
    }
}
