//! Pure date-bucketing helpers shared by every view.
//!
//! All bucketing compares calendar-date components (`NaiveDate`), never
//! timestamps, so a task's date can never shift across timezones.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

/// The Monday at the start of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The Sunday at the end of the week containing `date`.
pub fn end_of_week(date: NaiveDate) -> NaiveDate {
    start_of_week(date) + Days::new(6)
}

/// Inclusive containment in the week of `anchor`.
pub fn in_week(date: NaiveDate, anchor: NaiveDate) -> bool {
    date >= start_of_week(anchor) && date <= end_of_week(anchor)
}

/// True iff `a` and `b` fall on the same calendar day, ignoring time-of-day.
pub fn same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// The seven days of the week containing `anchor`, Monday first.
pub fn week_days(anchor: NaiveDate) -> Vec<NaiveDate> {
    let start = start_of_week(anchor);
    (0..7).map(|i| start + Days::new(i)).collect()
}

fn first_of_month(anchor: NaiveDate) -> NaiveDate {
    anchor.with_day(1).unwrap_or(anchor)
}

/// Every calendar day in the month containing `anchor`.
pub fn days_of_month(anchor: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(anchor);
    let next_month = first + Months::new(1);
    let mut days = Vec::new();
    let mut day = first;
    while day < next_month {
        days.push(day);
        day = day + Days::new(1);
    }
    days
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_month: bool,
}

/// The fixed 6x7 calendar grid for the month containing `anchor`.
///
/// Always 42 cells, always starting on the Monday on/before the 1st, with
/// leading/trailing filler from adjacent months flagged `in_month == false`.
/// A UI-grid convention, not a calendar truth.
pub fn month_grid(anchor: NaiveDate) -> Vec<GridDay> {
    let first = first_of_month(anchor);
    let grid_start = start_of_week(first);
    (0..42)
        .map(|i| {
            let date = grid_start + Days::new(i);
            GridDay {
                date,
                in_month: date.year() == anchor.year() && date.month() == anchor.month(),
            }
        })
        .collect()
}
