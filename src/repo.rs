use tracing::{info, warn};

use crate::error::{Result, TaskdeckError};
use crate::model::{Task, TaskDraft, TaskId};
use crate::store::TaskStore;

/// Single source of truth for the task collection.
///
/// Every mutation goes through the backing store; the in-memory collection
/// never reflects a write that did not durably succeed. Mutations on a
/// store-backed collection are optimistic: memory first, then the store,
/// with the pre-mutation state restored if the store write fails. The
/// `&mut self` receiver serializes all mutations, so writes for one task id
/// can never interleave.
pub struct TaskRepository {
    store: Box<dyn TaskStore>,
    tasks: Vec<Task>,
}

impl TaskRepository {
    pub fn new(store: Box<dyn TaskStore>) -> Self {
        Self {
            store,
            tasks: Vec::new(),
        }
    }

    /// Loads the full collection from the backing store.
    ///
    /// Fails soft: a store that cannot be read leaves an empty collection
    /// and a warning in the log, so the fallback is distinguishable from a
    /// genuinely empty store.
    pub async fn load(&mut self) {
        match self.store.load().await {
            Ok(tasks) => {
                info!(count = tasks.len(), store = self.store.name(), "loaded tasks");
                self.tasks = tasks;
            }
            Err(e) => {
                warn!(
                    store = self.store.name(),
                    "load failed, starting with an empty collection: {}", e
                );
                self.tasks.clear();
            }
        }
    }

    /// Current snapshot, insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Validates the draft, persists it, then inserts into the collection.
    /// The store assigns the id; a store failure leaves memory untouched.
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task> {
        let valid = draft.validated()?;
        let task = self.store.insert(&valid).await?;

        debug_assert!(
            self.get(&task.id).is_none(),
            "store assigned a duplicate id"
        );
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Optimistically replaces the task, then writes through to the store.
    /// On store failure the previous version is restored and the error
    /// surfaced, so an `Err` always means "rolled back, try again".
    pub async fn update(&mut self, task: Task) -> Result<Task> {
        if task.title.trim().is_empty() {
            return Err(TaskdeckError::Validation("title must not be blank".into()));
        }

        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == task.id)
            .ok_or_else(|| TaskdeckError::NotFound(task.id.clone()))?;

        let previous = std::mem::replace(&mut self.tasks[pos], task.clone());
        match self.store.update(&task).await {
            Ok(saved) => {
                self.tasks[pos] = saved.clone();
                Ok(saved)
            }
            Err(e) => {
                warn!(id = %task.id, "update failed, rolling back: {}", e);
                self.tasks[pos] = previous;
                Err(e)
            }
        }
    }

    /// Flips the completion flag through the same optimistic path as
    /// `update`. Toggling twice restores the original state.
    pub async fn toggle_completion(&mut self, id: &TaskId) -> Result<Task> {
        let mut task = self
            .get(id)
            .cloned()
            .ok_or_else(|| TaskdeckError::NotFound(id.clone()))?;
        task.completed = !task.completed;
        self.update(task).await
    }

    /// Optimistically removes the task, then deletes it from the store.
    /// On failure the task is restored at its original position.
    pub async fn remove(&mut self, id: &TaskId) -> Result<()> {
        let pos = self
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskdeckError::NotFound(id.clone()))?;

        let removed = self.tasks.remove(pos);
        if let Err(e) = self.store.delete(id).await {
            warn!(id = %id, "delete failed, rolling back: {}", e);
            self.tasks.insert(pos, removed);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, ValidDraft};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Mutex;

    /// In-memory store whose writes can be made to fail on demand.
    struct FlakyStore {
        tasks: Mutex<Vec<Task>>,
        next_id: AtomicU64,
        fail_writes: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                tasks: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                fail_writes: AtomicBool::new(false),
            }
        }

        fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn write_error(&self) -> TaskdeckError {
            TaskdeckError::Persistence {
                store: "flaky".to_string(),
                message: "write refused".to_string(),
            }
        }
    }

    #[async_trait]
    impl TaskStore for &'static FlakyStore {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn load(&self) -> crate::error::Result<Vec<Task>> {
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn insert(&self, draft: &ValidDraft) -> crate::error::Result<Task> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(self.write_error());
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
            let task = draft.clone().into_task(id);
            self.tasks.lock().unwrap().push(task.clone());
            Ok(task)
        }

        async fn update(&self, task: &Task) -> crate::error::Result<Task> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(self.write_error());
            }
            let mut tasks = self.tasks.lock().unwrap();
            let slot = tasks.iter_mut().find(|t| t.id == task.id).unwrap();
            *slot = task.clone();
            Ok(task.clone())
        }

        async fn delete(&self, id: &TaskId) -> crate::error::Result<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(self.write_error());
            }
            self.tasks.lock().unwrap().retain(|t| &t.id != id);
            Ok(())
        }
    }

    fn repo_with_flaky_store() -> (TaskRepository, &'static FlakyStore) {
        let store: &'static FlakyStore = Box::leak(Box::new(FlakyStore::new()));
        (TaskRepository::new(Box::new(store)), store)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_add_inserts_and_returns_created_task() {
        let (mut repo, _) = repo_with_flaky_store();

        let task = repo
            .add(TaskDraft {
                title: "Pay rent".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 5),
                priority: Priority::High,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(repo.tasks().len(), 1);
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::High);
    }

    #[tokio::test]
    async fn test_add_blank_title_is_validation_error() {
        let (mut repo, _) = repo_with_flaky_store();

        let result = repo.add(draft("   ")).await;
        assert!(matches!(result, Err(TaskdeckError::Validation(_))));
        assert!(repo.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_add_store_failure_leaves_memory_untouched() {
        let (mut repo, store) = repo_with_flaky_store();

        store.fail_writes(true);
        let result = repo.add(draft("Pay rent")).await;
        assert!(matches!(result, Err(TaskdeckError::Persistence { .. })));
        assert!(repo.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (mut repo, _) = repo_with_flaky_store();
        let task = repo.add(draft("Pay rent")).await.unwrap();

        let mut ghost = task.clone();
        ghost.id = "999".to_string();
        let result = repo.update(ghost).await;
        assert!(matches!(result, Err(TaskdeckError::NotFound(_))));
        assert_eq!(repo.tasks(), std::slice::from_ref(&task));
    }

    #[tokio::test]
    async fn test_update_rolls_back_on_store_failure() {
        let (mut repo, store) = repo_with_flaky_store();
        let task = repo.add(draft("Pay rent")).await.unwrap();
        let before = repo.tasks().to_vec();

        store.fail_writes(true);
        let mut edited = task.clone();
        edited.title = "Pay rent on time".to_string();
        let result = repo.update(edited).await;

        assert!(matches!(result, Err(TaskdeckError::Persistence { .. })));
        assert_eq!(repo.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_state() {
        let (mut repo, _) = repo_with_flaky_store();
        let task = repo.add(draft("Pay rent")).await.unwrap();

        let toggled = repo.toggle_completion(&task.id).await.unwrap();
        assert!(toggled.completed);
        let restored = repo.toggle_completion(&task.id).await.unwrap();
        assert!(!restored.completed);
    }

    #[tokio::test]
    async fn test_toggle_rolls_back_on_store_failure() {
        let (mut repo, store) = repo_with_flaky_store();
        let task = repo.add(draft("Pay rent")).await.unwrap();

        store.fail_writes(true);
        assert!(repo.toggle_completion(&task.id).await.is_err());
        assert!(!repo.get(&task.id).unwrap().completed);
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_not_found() {
        let (mut repo, _) = repo_with_flaky_store();
        repo.add(draft("Pay rent")).await.unwrap();

        let result = repo.remove(&"999".to_string()).await;
        assert!(matches!(result, Err(TaskdeckError::NotFound(_))));
        assert_eq!(repo.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_restores_position_on_store_failure() {
        let (mut repo, store) = repo_with_flaky_store();
        repo.add(draft("First")).await.unwrap();
        let middle = repo.add(draft("Second")).await.unwrap();
        repo.add(draft("Third")).await.unwrap();
        let before = repo.tasks().to_vec();

        store.fail_writes(true);
        assert!(repo.remove(&middle.id).await.is_err());
        assert_eq!(repo.tasks(), before.as_slice());
    }

    #[tokio::test]
    async fn test_load_failure_falls_back_to_empty() {
        let (mut repo, _store) = repo_with_flaky_store();
        repo.add(draft("Pay rent")).await.unwrap();

        // Make the next load fail at the store boundary.
        struct BrokenStore;

        #[async_trait]
        impl TaskStore for BrokenStore {
            fn name(&self) -> &str {
                "broken"
            }
            async fn load(&self) -> crate::error::Result<Vec<Task>> {
                Err(TaskdeckError::Persistence {
                    store: "broken".to_string(),
                    message: "unreachable".to_string(),
                })
            }
            async fn insert(&self, _: &ValidDraft) -> crate::error::Result<Task> {
                unreachable!()
            }
            async fn update(&self, _: &Task) -> crate::error::Result<Task> {
                unreachable!()
            }
            async fn delete(&self, _: &TaskId) -> crate::error::Result<()> {
                unreachable!()
            }
        }

        let mut broken_repo = TaskRepository::new(Box::new(BrokenStore));
        broken_repo.load().await;
        assert!(broken_repo.tasks().is_empty());

        // A healthy store round-trips what was written.
        repo.load().await;
        assert_eq!(repo.tasks().len(), 1);
    }

    #[tokio::test]
    async fn test_collection_contains_exactly_the_succeeded_tasks() {
        let (mut repo, store) = repo_with_flaky_store();

        repo.add(draft("First")).await.unwrap();
        store.fail_writes(true);
        let _ = repo.add(draft("Second")).await;
        store.fail_writes(false);
        let third = repo.add(draft("Third")).await.unwrap();
        repo.remove(&third.id).await.unwrap();
        repo.add(draft("Fourth")).await.unwrap();

        let titles: Vec<&str> = repo.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Fourth"]);

        let ids: std::collections::HashSet<&TaskId> =
            repo.tasks().iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), repo.tasks().len());
    }
}
