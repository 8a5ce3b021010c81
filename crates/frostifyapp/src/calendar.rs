//! Calendar-day helpers.
//!
//! Service orders are scheduled on a day, not an instant. Comparisons here look at
//! year/month/day only; time of day never matters.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// The caller's current calendar day, in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The local calendar day `now` falls on.
pub fn local_day(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// Whether two instants fall on the same calendar day in their own time zone.
pub fn is_same_day<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Strictly after `today`.
pub fn is_future_date(date: NaiveDate, today: NaiveDate) -> bool {
    date > today
}

/// Strictly before `today`.
pub fn is_past_date(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}
