use chrono::NaiveDate;

use crate::dates::{days_of_month, month_grid};
use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    /// Count of tasks on this day, for dot/badge rendering.
    pub task_count: usize,
}

#[derive(Debug, Clone)]
pub struct MonthOverview {
    pub anchor: NaiveDate,
    /// Fixed 42-cell grid, Monday-started.
    pub cells: Vec<DayCell>,
}

pub fn build(tasks: &[Task], anchor: NaiveDate) -> MonthOverview {
    let cells = month_grid(anchor)
        .into_iter()
        .map(|day| DayCell {
            date: day.date,
            in_month: day.in_month,
            task_count: tasks.iter().filter(|t| t.date == day.date).count(),
        })
        .collect();

    MonthOverview { anchor, cells }
}

/// Count of tasks scheduled inside the anchor month, filler days excluded.
pub fn month_total(tasks: &[Task], anchor: NaiveDate) -> usize {
    days_of_month(anchor)
        .iter()
        .map(|day| tasks.iter().filter(|t| t.date == *day).count())
        .sum()
}

/// Detail list for a selected date: incomplete tasks first, stable on ties.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    let mut on_day: Vec<Task> = tasks.iter().filter(|t| t.date == date).cloned().collect();
    on_day.sort_by_key(|t| t.completed);
    on_day
}
