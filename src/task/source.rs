//! Where task snapshots come from.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::task::Task;

/// Failure to obtain a snapshot from the task store.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The store could not be reached or refused the query.
    #[error("task store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with something that is not a task list.
    #[error("task store returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only access to an external task store.
///
/// Every call is a fresh, full snapshot.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// All pending tasks, in store order.
    async fn fetch_pending(&self) -> Result<Vec<Task>, SourceError>;

    /// A single task of any status. `Ok(None)` means no such task.
    async fn fetch_by_uuid(&self, uuid: &str) -> Result<Option<Task>, SourceError>;
}

pub type SharedTaskSource = Arc<dyn TaskSource>;

/// Fixed task list (non-persistent, for testing and embedding).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskSource {
    tasks: Vec<Task>,
}

impl InMemoryTaskSource {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl TaskSource for InMemoryTaskSource {
    async fn fetch_pending(&self) -> Result<Vec<Task>, SourceError> {
        Ok(self.tasks.clone())
    }

    async fn fetch_by_uuid(&self, uuid: &str) -> Result<Option<Task>, SourceError> {
        Ok(self.tasks.iter().find(|t| t.uuid == uuid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_lookup_is_exact() {
        let source = InMemoryTaskSource::new(vec![
            Task::new("abc", "first", 1.0),
            Task::new("abcd", "second", 2.0),
        ]);

        let found = source.fetch_by_uuid("abcd").await.unwrap().unwrap();
        assert_eq!(found.description, "second");
        assert!(source.fetch_by_uuid("ab").await.unwrap().is_none());
        assert_eq!(source.fetch_pending().await.unwrap().len(), 2);
    }
}
