use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaskdeckError};

pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = TaskdeckError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(TaskdeckError::Validation(format!(
                "Unknown priority '{}' (expected high, medium, or low)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Scheduled instant; tasks without a time sit at midnight. Day-level
    /// comparisons still go through `dates::same_day`, which ignores the
    /// time component.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }

    /// Presentation-facing status string; the stored encoding is the
    /// `completed` flag.
    pub fn status_label(&self) -> &str {
        if self.completed {
            "Completed"
        } else {
            "In Progress"
        }
    }
}

/// Unvalidated, unpersisted task payload supplied to `add`.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub priority: Priority,
}

impl TaskDraft {
    /// Trims the title, rejects a blank one, and defaults the date to today.
    pub fn validated(self) -> Result<ValidDraft> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(TaskdeckError::Validation("title must not be blank".into()));
        }

        Ok(ValidDraft {
            title,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            date: self.date.unwrap_or_else(|| Local::now().date_naive()),
            time: self.time,
            priority: self.priority,
        })
    }
}

/// A draft that passed validation; the store assigns the id on insert.
#[derive(Debug, Clone)]
pub struct ValidDraft {
    pub title: String,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub priority: Priority,
}

impl ValidDraft {
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            notes: self.notes,
            date: self.date,
            time: self.time,
            priority: self.priority,
            completed: false,
        }
    }
}
