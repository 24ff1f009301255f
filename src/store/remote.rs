use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, TaskdeckError};
use crate::model::{Priority, Task, TaskId, ValidDraft};
use crate::store::TaskStore;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct RemoteConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn from_table(table: &toml::Table) -> Result<Self> {
        let base_url = table
            .get("base_url")
            .and_then(|v| v.as_str())
            .map(|s| s.trim_end_matches('/').to_string())
            .ok_or_else(|| TaskdeckError::Config("store.remote.base_url is required".into()))?;

        let timeout_secs = table
            .get("timeout_secs")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as u64)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Wire representation of a task as the remote API speaks it: `_id` instead
/// of `id`, a status string instead of the `completed` flag, and plain
/// strings for date and time. Translated here and nowhere else.
#[derive(Debug, Serialize, Deserialize)]
struct WireTask {
    #[serde(rename = "_id")]
    id: TaskId,
    #[serde(flatten)]
    fields: WireFields,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFields {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<String>,
    #[serde(default = "default_status")]
    status: String,
}

fn default_status() -> String {
    "In Progress".to_string()
}

impl WireTask {
    fn into_task(self) -> Result<Task> {
        Ok(Task {
            id: self.id,
            title: self.fields.title,
            notes: self.fields.description,
            date: parse_wire_date(&self.fields.date)?,
            time: self.fields.time.as_deref().and_then(parse_wire_time),
            priority: self
                .fields
                .priority
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or(Priority::Low),
            completed: self.fields.status == "Completed",
        })
    }
}

impl WireFields {
    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.notes.clone(),
            date: task.date.format("%Y-%m-%d").to_string(),
            time: task.time.map(|t| t.format("%H:%M").to_string()),
            priority: Some(task.priority.label().to_string()),
            status: task.status_label().to_string(),
        }
    }

    fn from_draft(draft: &ValidDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.notes.clone(),
            date: draft.date.format("%Y-%m-%d").to_string(),
            time: draft.time.map(|t| t.format("%H:%M").to_string()),
            priority: Some(draft.priority.label().to_string()),
            status: "In Progress".to_string(),
        }
    }
}

/// Accepts plain `YYYY-MM-DD` and full ISO timestamps; only the calendar-date
/// prefix is ever used, so a timestamp's zone can never shift the date.
fn parse_wire_date(s: &str) -> Result<NaiveDate> {
    let prefix = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| TaskdeckError::Persistence {
        store: "remote".to_string(),
        message: format!("unparseable task date '{}'", s),
    })
}

fn parse_wire_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

pub struct RemoteStore {
    config: RemoteConfig,
    client: Client,
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        // A hung call must fail (and trigger rollback upstream) rather than
        // leave an optimistic mutation unconfirmed forever.
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn check(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(TaskdeckError::Persistence {
            store: "remote".to_string(),
            message: format!("HTTP {} {}", status, body.trim()),
        })
    }
}

#[async_trait]
impl TaskStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn load(&self) -> Result<Vec<Task>> {
        let response = self.client.get(self.url("/tasks")).send().await?;
        let wire: Vec<WireTask> = self.check(response).await?.json().await?;
        wire.into_iter().map(WireTask::into_task).collect()
    }

    async fn insert(&self, draft: &ValidDraft) -> Result<Task> {
        let response = self
            .client
            .post(self.url("/tasks"))
            .json(&WireFields::from_draft(draft))
            .send()
            .await?;
        let created: WireTask = self.check(response).await?.json().await?;
        created.into_task()
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        let response = self
            .client
            .put(self.url(&format!("/tasks/{}", task.id)))
            .json(&WireFields::from_task(task))
            .send()
            .await?;
        let updated: WireTask = self.check(response).await?.json().await?;
        updated.into_task()
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/tasks/{}", id)))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }
}
