//! Booking cost estimation.
//!
//! Both estimators are pure and deterministic. Monetary totals are rounded
//! to two decimals with round-half-away-from-zero (`f64::round` semantics);
//! this is the pinned rounding rule for the whole service.

use chrono::NaiveDate;

fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Cost of an hourly service: `rate_per_hour * duration_minutes / 60`,
/// rounded to two decimals.
///
/// Callers must reject `duration_minutes <= 0` before quoting; the estimator
/// itself does not clamp.
#[must_use]
pub fn estimate_hourly(rate_per_hour: f64, duration_minutes: i32) -> f64 {
    round_currency(rate_per_hour * f64::from(duration_minutes) / 60.0)
}

/// Number of billed days for a daily service. Spans shorter than one whole
/// day still bill a single day.
#[must_use]
pub fn billed_days(pickup: NaiveDate, dropoff: NaiveDate) -> i64 {
    (dropoff - pickup).num_days().max(1)
}

/// Cost of a daily service: `rate_per_day * billed_days`, rounded to two
/// decimals. `dropoff >= pickup` is a caller precondition; a same-day span
/// bills the one-day minimum.
#[must_use]
pub fn estimate_daily(rate_per_day: f64, pickup: NaiveDate, dropoff: NaiveDate) -> f64 {
    round_currency(rate_per_day * billed_days(pickup, dropoff) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn hourly_ninety_minutes_at_300() {
        assert_eq!(estimate_hourly(300.0, 90), 450.0);
    }

    #[test]
    fn hourly_rounds_to_two_decimals() {
        // 20 minutes at 100/hr = 33.333... -> 33.33
        assert_eq!(estimate_hourly(100.0, 20), 33.33);
        // 80 minutes at 350/hr = 466.666... -> 466.67
        assert_eq!(estimate_hourly(350.0, 80), 466.67);
    }

    #[test]
    fn daily_two_night_span() {
        assert_eq!(
            estimate_daily(800.0, date(2024, 1, 1), date(2024, 1, 3)),
            1600.0
        );
    }

    #[test]
    fn daily_same_day_bills_minimum_one_day() {
        assert_eq!(
            estimate_daily(800.0, date(2024, 1, 1), date(2024, 1, 1)),
            800.0
        );
    }

    #[test]
    fn billed_days_never_below_one() {
        assert_eq!(billed_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
        assert_eq!(billed_days(date(2024, 1, 1), date(2024, 1, 2)), 1);
        assert_eq!(billed_days(date(2024, 1, 1), date(2024, 1, 8)), 7);
    }

    #[test]
    fn estimators_are_deterministic() {
        for _ in 0..3 {
            assert_eq!(estimate_hourly(320.0, 45), 240.0);
            assert_eq!(
                estimate_daily(750.0, date(2024, 6, 10), date(2024, 6, 14)),
                3000.0
            );
        }
    }
}
