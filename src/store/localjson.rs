use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, TaskdeckError};
use crate::model::{Task, TaskId, ValidDraft};
use crate::store::TaskStore;

pub struct LocalJsonConfig {
    pub path: PathBuf,
}

impl LocalJsonConfig {
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join(".taskdeck")
    }

    pub fn with_default_path() -> Result<Self> {
        Self::at(Self::default_dir().join("tasks.json"))
    }

    pub fn from_table(table: &toml::Table) -> Result<Self> {
        let path = table
            .get("path")
            .and_then(|v| v.as_str())
            .map(|s| shellexpand::tilde(s).into_owned())
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::default_dir().join("tasks.json"));

        Self::at(path)
    }

    fn at(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    TaskdeckError::Config(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        Ok(Self { path })
    }
}

/// Stores the full task collection as one JSON array in a single file.
/// Every mutation rewrites the entire array.
pub struct LocalJsonStore {
    config: LocalJsonConfig,
}

impl LocalJsonStore {
    pub fn new(config: LocalJsonConfig) -> Self {
        Self { config }
    }

    fn read_all(&self) -> Result<Vec<Task>> {
        if !self.config.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.config.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        Ok(tasks)
    }

    fn write_all(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.config.path, json)?;
        Ok(())
    }

    /// Ids are store-assigned: one past the highest numeric id in the file.
    fn next_id(tasks: &[Task]) -> TaskId {
        let max = tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}

#[async_trait]
impl TaskStore for LocalJsonStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn load(&self) -> Result<Vec<Task>> {
        self.read_all()
    }

    async fn insert(&self, draft: &ValidDraft) -> Result<Task> {
        let mut tasks = self.read_all()?;
        let task = draft.clone().into_task(Self::next_id(&tasks));
        tasks.push(task.clone());
        self.write_all(&tasks)?;
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Task> {
        let mut tasks = self.read_all()?;
        let slot = tasks.iter_mut().find(|t| t.id == task.id).ok_or_else(|| {
            TaskdeckError::Persistence {
                store: "local".to_string(),
                message: format!("task '{}' missing from store file", task.id),
            }
        })?;
        *slot = task.clone();
        self.write_all(&tasks)?;
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let mut tasks = self.read_all()?;
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        if tasks.len() == before {
            return Err(TaskdeckError::Persistence {
                store: "local".to_string(),
                message: format!("task '{}' missing from store file", id),
            });
        }
        self.write_all(&tasks)?;
        Ok(())
    }
}
