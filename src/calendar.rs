//! Working-day arithmetic over inclusive calendar date ranges.
//!
//! Saturday and Sunday are the only non-working days. Public holidays are
//! expressed through a sprint's capacity factor, not here.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// True if `date` falls on a weekday.
pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Count the working days in `start..=end`.
///
/// Returns 0 when `end` precedes `start`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if end < start {
        return 0;
    }
    let span = (end - start).num_days() + 1;
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    // Walk the leftover partial week.
    let mut day = start + Duration::days(full_weeks * 7);
    while day <= end {
        if is_working_day(day) {
            count += 1;
        }
        day += Duration::days(1);
    }
    count as u32
}

/// List the working dates in `start..=end`, in order.
pub fn working_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d))
        .collect()
}

/// Calendar date of working day `offset` (0-based) within `start..=end`.
///
/// Returns `None` when the offset lies beyond the range's last working day.
pub fn offset_date(start: NaiveDate, end: NaiveDate, offset: u32) -> Option<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_working_day(*d))
        .nth(offset as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_from_monday_has_five_working_days() {
        // 2024-03-04 is a Monday.
        assert_eq!(working_days(date(2024, 3, 4), date(2024, 3, 10)), 5);
    }

    #[test]
    fn test_single_weekend_day_is_zero() {
        assert_eq!(working_days(date(2024, 3, 9), date(2024, 3, 9)), 0);
        assert_eq!(working_days(date(2024, 3, 10), date(2024, 3, 10)), 0);
    }

    #[test]
    fn test_single_weekday_is_one() {
        assert_eq!(working_days(date(2024, 3, 6), date(2024, 3, 6)), 1);
    }

    #[test]
    fn test_end_before_start_is_zero() {
        assert_eq!(working_days(date(2024, 3, 10), date(2024, 3, 4)), 0);
    }

    #[test]
    fn test_two_week_sprint() {
        // Friday 2024-03-01 through Thursday 2024-03-14.
        assert_eq!(working_days(date(2024, 3, 1), date(2024, 3, 14)), 10);
    }

    #[test]
    fn test_working_dates_skip_weekend() {
        let dates = working_dates(date(2024, 3, 8), date(2024, 3, 11));
        assert_eq!(dates, vec![date(2024, 3, 8), date(2024, 3, 11)]);
    }

    #[test]
    fn test_offset_date() {
        let start = date(2024, 3, 1);
        let end = date(2024, 3, 14);
        assert_eq!(offset_date(start, end, 0), Some(date(2024, 3, 1)));
        assert_eq!(offset_date(start, end, 1), Some(date(2024, 3, 4)));
        assert_eq!(offset_date(start, end, 9), Some(date(2024, 3, 14)));
        assert_eq!(offset_date(start, end, 10), None);
    }

    proptest! {
        #[test]
        fn prop_working_days_matches_day_walk(start_offset in 0i64..3650, len in 0i64..120) {
            let start = date(2020, 1, 1) + Duration::days(start_offset);
            let end = start + Duration::days(len);
            let walked = working_dates(start, end).len() as u32;
            prop_assert_eq!(working_days(start, end), walked);
        }

        #[test]
        fn prop_any_seven_days_have_five_working_days(start_offset in 0i64..3650) {
            let start = date(2020, 1, 1) + Duration::days(start_offset);
            prop_assert_eq!(working_days(start, start + Duration::days(6)), 5);
        }
    }
}
