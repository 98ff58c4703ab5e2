//! crates/recall_core/src/scheduling.rs
//!
//! The review interval rule. Given the current interval in days and a 1-4 score,
//! compute the next interval and when the question is due again. There is no ease
//! factor: the interval is the only state carried between reviews.

use chrono::{DateTime, Duration, Utc};

/// The interval assumed when none (or zero) is supplied.
pub const DEFAULT_INTERVAL_DAYS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Score {
    /// Maps the wire value; anything outside 1..=4 has no meaning.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(Score::Poor),
            2 => Some(Score::Fair),
            3 => Some(Score::Good),
            4 => Some(Score::Excellent),
            _ => None,
        }
    }
}

/// The outcome of scheduling one review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub new_interval: u32,
    pub next_review_date: DateTime<Utc>,
}

/// Computes the next interval in days.
///
/// - poor resets to one day
/// - fair halves the interval, never below one day
/// - good keeps it
/// - excellent grows it by 30%, rounded down
/// - unknown scores keep it
pub fn next_interval(current_interval: Option<u32>, score: i64) -> u32 {
    let current = match current_interval {
        Some(days) if days > 0 => days,
        _ => DEFAULT_INTERVAL_DAYS,
    };

    match Score::from_raw(score) {
        Some(Score::Poor) => DEFAULT_INTERVAL_DAYS,
        Some(Score::Fair) => (current / 2).max(DEFAULT_INTERVAL_DAYS),
        Some(Score::Good) | None => current,
        // Integer arithmetic keeps floor(current * 1.3) exact.
        Some(Score::Excellent) => {
            u32::try_from(u64::from(current) * 13 / 10).unwrap_or(u32::MAX)
        }
    }
}

/// `now` plus `interval_days`, saturating at the latest representable instant.
pub fn next_review_at(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
    now.checked_add_signed(Duration::days(i64::from(interval_days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn schedule(current_interval: Option<u32>, score: i64, now: DateTime<Utc>) -> Schedule {
    let new_interval = next_interval(current_interval, score);
    Schedule {
        new_interval,
        next_review_date: next_review_at(now, new_interval),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn documented_examples() {
        assert_eq!(next_interval(Some(14), 2), 7);
        assert_eq!(next_interval(Some(1), 2), 1);
        assert_eq!(next_interval(Some(10), 4), 13);
        assert_eq!(next_interval(Some(1), 4), 1);
        assert_eq!(next_interval(Some(3), 4), 3);
        assert_eq!(next_interval(Some(30), 1), 1);
    }

    #[test]
    fn missing_or_zero_interval_counts_as_one_day() {
        assert_eq!(next_interval(None, 3), 1);
        assert_eq!(next_interval(Some(0), 3), 1);
        assert_eq!(next_interval(None, 4), 1);
    }

    #[test]
    fn unknown_scores_pass_the_interval_through() {
        assert_eq!(next_interval(Some(9), 0), 9);
        assert_eq!(next_interval(Some(9), 5), 9);
        assert_eq!(next_interval(Some(9), -3), 9);
    }

    #[test]
    fn huge_intervals_saturate_instead_of_overflowing() {
        assert_eq!(next_interval(Some(u32::MAX), 4), u32::MAX);
        let now = Utc.with_ymd_and_hms(2025, 9, 22, 0, 0, 0).unwrap();
        assert_eq!(next_review_at(now, u32::MAX), DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn schedule_adds_whole_days_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 9, 22, 8, 30, 0).unwrap();
        let outcome = schedule(Some(10), 4, now);
        assert_eq!(outcome.new_interval, 13);
        assert_eq!(
            outcome.next_review_date,
            Utc.with_ymd_and_hms(2025, 10, 5, 8, 30, 0).unwrap()
        );
    }

    proptest! {
        #[test]
        fn poor_always_resets(current in 1u32..100_000) {
            prop_assert_eq!(next_interval(Some(current), 1), 1);
        }

        #[test]
        fn fair_halves_with_a_floor_of_one(current in 1u32..100_000) {
            prop_assert_eq!(next_interval(Some(current), 2), std::cmp::max(1, current / 2));
        }

        #[test]
        fn good_is_identity(current in 1u32..100_000) {
            prop_assert_eq!(next_interval(Some(current), 3), current);
        }

        #[test]
        fn excellent_matches_float_formula(current in 1u32..100_000) {
            let expected = (f64::from(current) * 1.3).floor() as u32;
            prop_assert_eq!(next_interval(Some(current), 4), expected);
        }
    }
}
