use chrono::{NaiveDate, NaiveTime};

use crate::dates::{in_week, same_day, week_days};
use crate::model::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub percent: u32,
}

impl WeekStats {
    fn over(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u32
        };
        Self {
            total,
            completed,
            pending: total - completed,
            percent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeekDashboard {
    pub anchor: NaiveDate,
    pub days: Vec<NaiveDate>,
    /// Tasks shown in the list: the whole week, or a single selected day.
    pub tasks: Vec<Task>,
    /// Stats always cover the whole week, even when a day is selected.
    pub stats: WeekStats,
}

pub fn build(tasks: &[Task], anchor: NaiveDate, selected_day: Option<NaiveDate>) -> WeekDashboard {
    let this_week: Vec<Task> = tasks
        .iter()
        .filter(|t| in_week(t.date, anchor))
        .cloned()
        .collect();

    let stats = WeekStats::over(&this_week);

    let tasks = match selected_day {
        Some(day) => {
            let day_start = day.and_time(NaiveTime::MIN);
            this_week
                .into_iter()
                .filter(|t| same_day(t.scheduled_at(), day_start))
                .collect()
        }
        None => this_week,
    };

    WeekDashboard {
        anchor,
        days: week_days(anchor),
        tasks,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn task(id: &str, title: &str, date: NaiveDate, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            notes: None,
            date,
            time: None,
            priority: Priority::Low,
            completed,
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_filter_includes_both_boundary_days() {
        // Anchor 2024-03-04 is a Monday; its week runs through 2024-03-10.
        let tasks = vec![
            task("1", "Monday task", d(2024, 3, 4), false),
            task("2", "Sunday task", d(2024, 3, 10), false),
            task("3", "Next week", d(2024, 3, 11), false),
        ];

        let dashboard = build(&tasks, d(2024, 3, 4), None);
        let ids: Vec<&str> = dashboard.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_selected_day_narrows_list_but_not_stats() {
        let tasks = vec![
            task("1", "Monday", d(2024, 3, 4), true),
            task("2", "Friday", d(2024, 3, 8), false),
        ];

        let dashboard = build(&tasks, d(2024, 3, 4), Some(d(2024, 3, 8)));
        assert_eq!(dashboard.tasks.len(), 1);
        assert_eq!(dashboard.tasks[0].id, "2");
        assert_eq!(dashboard.stats.total, 2);
        assert_eq!(dashboard.stats.completed, 1);
        assert_eq!(dashboard.stats.pending, 1);
        assert_eq!(dashboard.stats.percent, 50);
    }

    #[test]
    fn test_selected_day_ignores_time_of_day() {
        let mut evening = task("1", "Evening", d(2024, 3, 8), false);
        evening.time = NaiveTime::from_hms_opt(22, 30, 0);

        let dashboard = build(&[evening], d(2024, 3, 4), Some(d(2024, 3, 8)));
        assert_eq!(dashboard.tasks.len(), 1);
    }

    #[test]
    fn test_percent_is_zero_for_empty_week() {
        let dashboard = build(&[], d(2024, 3, 4), None);
        assert_eq!(dashboard.stats.percent, 0);
        assert_eq!(dashboard.stats.total, 0);
    }

    #[test]
    fn test_percent_rounds() {
        let tasks = vec![
            task("1", "a", d(2024, 3, 4), true),
            task("2", "b", d(2024, 3, 5), false),
            task("3", "c", d(2024, 3, 6), false),
        ];
        // 1/3 = 33.33..% rounds to 33
        assert_eq!(build(&tasks, d(2024, 3, 4), None).stats.percent, 33);
    }

    #[test]
    fn test_days_ribbon_matches_anchor_week() {
        let dashboard = build(&[], d(2024, 3, 7), None);
        assert_eq!(dashboard.days.first(), Some(&d(2024, 3, 4)));
        assert_eq!(dashboard.days.last(), Some(&d(2024, 3, 10)));
    }
}
