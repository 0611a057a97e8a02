//! Calendar arithmetic shared by the bill tracker and the maintenance tracker.
//!
//! Every function takes `today` as an argument instead of reading the system
//! clock, so list handlers compute one consistent snapshot per request and
//! tests pin the date.

use chrono::{Datelike, Days, Months, NaiveDate};

/// Next occurrence of a monthly bill anchored to `day_of_month`.
///
/// The anchor is clamped into [1, 31] before use, and again to the target
/// month's last day (a bill on the 31st falls on Feb 28/29, Apr 30, ...).
/// If today's day-of-month has already passed the anchor, the occurrence is
/// in the next month, rolling December into January of the next year.
pub fn next_due_date(day_of_month: i64, today: NaiveDate) -> NaiveDate {
    let anchor = day_of_month.clamp(1, 31) as u32;

    let (year, month) = if today.day() <= anchor {
        (today.year(), today.month())
    } else if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };

    let day = anchor.min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(today)
}

/// Signed whole days from `today` until `due`: 0 = due today, negative = past.
///
/// Callers re-derive a bill's date via [`next_due_date`] on every render; a
/// past due date is never advanced here.
pub fn days_remaining(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Days past the service deadline: positive = overdue, <= 0 = healthy.
///
/// The deadline is `last_service + interval_days` in calendar days. An
/// unparseable `last_service` yields 0 so a single bad row cannot break a
/// whole list render.
pub fn days_overdue(last_service: &str, interval_days: i64, today: NaiveDate) -> i64 {
    let Some(last) = parse_date(last_service) else {
        return 0;
    };
    let Some(due) = chrono::Duration::try_days(interval_days)
        .and_then(|delta| last.checked_add_signed(delta))
    else {
        return 0;
    };
    today.signed_duration_since(due).num_days()
}

/// Elapsed share of a service interval as a whole percentage, clamped to
/// [0, 100]. A non-positive interval reads as fully elapsed; an unparseable
/// `last_service` reads as 0.
pub fn service_progress(last_service: &str, interval_days: i64, today: NaiveDate) -> i64 {
    let Some(last) = parse_date(last_service) else {
        return 0;
    };
    if interval_days <= 0 {
        return 100;
    }
    let elapsed = today.signed_duration_since(last).num_days();
    (elapsed * 100 / interval_days).clamp(0, 100)
}

/// Lenient ISO date parse, accepting `YYYY-MM-DD` and `YYYY/MM/DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s.trim(), "%Y/%m/%d"))
        .ok()
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn anchor_in_future_stays_in_current_month() {
        assert_eq!(next_due_date(5, date(2024, 3, 10)), date(2024, 4, 5));
        assert_eq!(next_due_date(15, date(2024, 3, 10)), date(2024, 3, 15));
    }

    #[test]
    fn same_day_is_due_today() {
        let today = date(2024, 3, 15);
        assert_eq!(next_due_date(15, today), today);
        assert_eq!(days_remaining(next_due_date(15, today), today), 0);
    }

    #[test]
    fn passed_anchor_rolls_to_next_month() {
        assert_eq!(next_due_date(3, date(2024, 5, 20)), date(2024, 6, 3));
    }

    #[test]
    fn december_rolls_into_january() {
        assert_eq!(next_due_date(5, date(2023, 12, 31)), date(2024, 1, 5));
    }

    #[test]
    fn long_anchor_clamps_to_short_months() {
        // non-leap February
        assert_eq!(next_due_date(31, date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(next_due_date(30, date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(next_due_date(29, date(2023, 2, 1)), date(2023, 2, 28));
        // leap February
        assert_eq!(next_due_date(31, date(2024, 2, 1)), date(2024, 2, 29));
        // 30-day month
        assert_eq!(next_due_date(31, date(2024, 4, 2)), date(2024, 4, 30));
    }

    #[test]
    fn out_of_range_anchor_is_clamped() {
        assert_eq!(next_due_date(0, date(2024, 3, 10)), date(2024, 4, 1));
        assert_eq!(next_due_date(-7, date(2024, 3, 10)), date(2024, 4, 1));
        assert_eq!(next_due_date(99, date(2024, 4, 2)), date(2024, 4, 30));
    }

    #[test]
    fn next_due_date_is_idempotent() {
        let today = date(2024, 7, 19);
        assert_eq!(next_due_date(31, today), next_due_date(31, today));
    }

    #[test]
    fn days_remaining_counts_whole_days() {
        assert_eq!(days_remaining(date(2024, 4, 5), date(2024, 3, 10)), 26);
        assert_eq!(days_remaining(date(2024, 2, 29), date(2024, 2, 1)), 28);
        assert_eq!(days_remaining(date(2024, 3, 1), date(2024, 3, 4)), -3);
    }

    #[test]
    fn overdue_sign_convention() {
        // last serviced N=10 days ago with an M=7 day interval -> overdue by 3
        let today = date(2024, 6, 20);
        assert_eq!(days_overdue("2024-06-10", 7, today), 3);
        // not yet due: 4 days elapsed of 7 -> -3
        assert_eq!(days_overdue("2024-06-16", 7, today), -3);
        // due exactly today
        assert_eq!(days_overdue("2024-06-13", 7, today), 0);
    }

    #[test]
    fn zero_interval_is_due_same_day() {
        let today = date(2024, 6, 20);
        assert_eq!(days_overdue("2024-06-20", 0, today), 0);
        assert_eq!(days_overdue("2024-06-19", 0, today), 1);
    }

    #[test]
    fn bad_service_date_fails_open() {
        let today = date(2024, 6, 20);
        assert_eq!(days_overdue("not-a-date", 30, today), 0);
        assert_eq!(days_overdue("", 30, today), 0);
        assert_eq!(service_progress("not-a-date", 30, today), 0);
    }

    #[test]
    fn slash_dates_parse_too() {
        let today = date(2024, 6, 20);
        assert_eq!(days_overdue("2024/06/10", 7, today), 3);
    }

    #[test]
    fn progress_is_clamped() {
        let today = date(2024, 6, 20);
        assert_eq!(service_progress("2024-06-13", 7, today), 100);
        assert_eq!(service_progress("2024-06-13", 14, today), 50);
        assert_eq!(service_progress("2024-06-20", 14, today), 0);
        // long overdue still caps at 100
        assert_eq!(service_progress("2023-01-01", 30, today), 100);
        // future-dated service reads as 0, not negative
        assert_eq!(service_progress("2024-07-01", 30, today), 0);
        // zero interval is fully elapsed by construction
        assert_eq!(service_progress("2024-06-20", 0, today), 100);
    }
}
