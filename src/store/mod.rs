use async_trait::async_trait;

use crate::config::Config;
use crate::error::{Result, TaskdeckError};
use crate::model::{Task, TaskId, ValidDraft};

pub mod localjson;
pub mod remote;

/// Backing store behind the task repository.
///
/// Every implementation owns its identity scheme: `insert` assigns the id on
/// first successful save, and the id is opaque to everything above this trait.
#[async_trait]
pub trait TaskStore: Send + Sync {
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Vec<Task>>;
    async fn insert(&self, draft: &ValidDraft) -> Result<Task>;
    async fn update(&self, task: &Task) -> Result<Task>;
    async fn delete(&self, id: &TaskId) -> Result<()>;
}

pub fn from_config(config: &Config) -> Result<Box<dyn TaskStore>> {
    match config.store.backend.as_str() {
        "local" => {
            let local_config = match config.store.local {
                Some(ref table) => localjson::LocalJsonConfig::from_table(table)?,
                None => localjson::LocalJsonConfig::with_default_path()?,
            };
            Ok(Box::new(localjson::LocalJsonStore::new(local_config)))
        }
        "remote" => {
            let table = config.store.remote.as_ref().ok_or_else(|| {
                TaskdeckError::Config("store.backend = \"remote\" requires a [store.remote] section".into())
            })?;
            let remote_config = remote::RemoteConfig::from_table(table)?;
            Ok(Box::new(remote::RemoteStore::new(remote_config)?))
        }
        other => Err(TaskdeckError::Config(format!(
            "Unknown store backend '{}' (expected \"local\" or \"remote\")",
            other
        ))),
    }
}
