use thiserror::Error;

use crate::model::TaskId;

#[derive(Debug, Error)]
pub enum TaskdeckError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid task: {0}")]
    Validation(String),

    #[error("No task with id '{0}'")]
    NotFound(TaskId),

    #[error("Store '{store}' error: {message}")]
    Persistence { store: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TaskdeckError {
    fn from(e: serde_json::Error) -> Self {
        TaskdeckError::Json(e.to_string())
    }
}

impl From<reqwest::Error> for TaskdeckError {
    fn from(e: reqwest::Error) -> Self {
        TaskdeckError::Persistence {
            store: "remote".to_string(),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskdeckError>;
