use crate::core::models::{Task, TaskStatus};
use crate::core::store::DataStore;

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSummary {
    pub status: TaskStatus,
    pub count: usize,
}

/// Read-only view of agent tasks. The agent runtime owns task state; the
/// dashboard only mirrors the latest snapshot.
pub struct TaskView {
    store: DataStore<Task>,
}

impl TaskView {
    pub fn new() -> Self {
        Self {
            store: DataStore::new(),
        }
    }

    pub fn apply_list(&mut self, fetched: Vec<Task>) {
        self.store.replace(fetched);
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.items()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_loaded()
    }

    pub fn summary(&self) -> Vec<TaskSummary> {
        TaskStatus::ALL
            .iter()
            .map(|status| TaskSummary {
                status: *status,
                count: self
                    .store
                    .items()
                    .iter()
                    .filter(|t| t.status == *status)
                    .count(),
            })
            .collect()
    }
}

impl Default for TaskView {
    fn default() -> Self {
        Self::new()
    }
}
