//! In-memory task registry
//!
//! The registry is the single authoritative store for conversion task records.
//! Pipeline stages mutate records through atomic closures, API handlers read
//! cloned snapshots, and bounded eviction keeps memory use proportional to the
//! configured capacity.

use crate::types::{Task, TaskId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Concurrent map of task id to task record
///
/// All reads return cloned snapshots so callers never hold the internal lock
/// while inspecting a task. All writes go through [`update`](Self::update),
/// which applies a mutator under the write lock so concurrent stage updates
/// and cancel requests cannot interleave partially.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new task record
    ///
    /// Replaces any existing record with the same id; ids come from a v4 UUID
    /// generator so collisions do not occur in practice.
    pub async fn insert(&self, task: Task) {
        self.tasks.write().await.insert(task.id.clone(), task);
    }

    /// Get a snapshot of a task by id
    ///
    /// The returned task is a point-in-time clone; it does not observe later
    /// mutations.
    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }

    /// Whether a task with this id exists
    pub async fn contains(&self, id: &TaskId) -> bool {
        self.tasks.read().await.contains_key(id)
    }

    /// Number of tasks currently held
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Whether the registry holds no tasks
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    /// Snapshots of all tasks, newest first
    pub async fn list(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        all
    }

    /// Apply a mutation to a task under the write lock
    ///
    /// The closure sees the live record, so read-modify-write sequences
    /// (progress guards, cancel flags, terminal transitions) are atomic with
    /// respect to every other writer. Returns false if the id is unknown,
    /// without running the closure.
    pub async fn update<F>(&self, id: &TaskId, mutate: F) -> bool
    where
        F: FnOnce(&mut Task),
    {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(id) {
            Some(task) => {
                mutate(task);
                true
            }
            None => false,
        }
    }

    /// Remove a task record, returning it if present
    pub async fn remove(&self, id: &TaskId) -> Option<Task> {
        self.tasks.write().await.remove(id)
    }

    /// Evict the oldest terminal tasks if the registry is at or over capacity
    ///
    /// A no-op when the current size is below `capacity`. Otherwise removes up
    /// to `evict_batch` terminal tasks in ascending `created_at` order (id as
    /// tie-break) and returns the removed records so the caller can delete
    /// their artifacts. In-flight tasks are never evicted, so the registry can
    /// exceed capacity when too few tasks are terminal; the bound is advisory.
    pub async fn evict_oldest_terminal(&self, capacity: usize, evict_batch: usize) -> Vec<Task> {
        let mut tasks = self.tasks.write().await;
        if tasks.len() < capacity || evict_batch == 0 {
            return Vec::new();
        }

        let mut terminal: Vec<(chrono::DateTime<chrono::Utc>, TaskId)> = tasks
            .values()
            .filter(|t| t.is_terminal())
            .map(|t| (t.created_at, t.id.clone()))
            .collect();
        terminal.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        terminal
            .into_iter()
            .take(evict_batch)
            .filter_map(|(_, id)| tasks.remove(&id))
            .collect()
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskFailure, TaskState};
    use chrono::{Duration as ChronoDuration, Utc};

    fn task_with_age(name: &str, seconds_old: i64) -> Task {
        let mut task = Task::new(TaskId::generate(), name, 100);
        task.created_at = Utc::now() - ChronoDuration::seconds(seconds_old);
        task
    }

    fn completed(mut task: Task) -> Task {
        task.state = TaskState::Completed;
        task.progress = 100;
        task.error = Some(TaskFailure::cancelled());
        task
    }

    #[tokio::test]
    async fn insert_then_get_returns_snapshot() {
        let registry = TaskRegistry::new();
        let task = Task::new(TaskId::generate(), "report.txt", 2048);
        let id = task.id.clone();

        registry.insert(task).await;

        let snapshot = registry.get(&id).await.expect("task should exist");
        assert_eq!(snapshot.original_filename, "report.txt");
        assert_eq!(snapshot.state, TaskState::Initializing);
        assert_eq!(snapshot.progress, 0);
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let registry = TaskRegistry::new();
        assert!(registry.get(&TaskId::generate()).await.is_none());
    }

    #[tokio::test]
    async fn snapshot_does_not_observe_later_mutations() {
        let registry = TaskRegistry::new();
        let task = Task::new(TaskId::generate(), "a.txt", 10);
        let id = task.id.clone();
        registry.insert(task).await;

        let before = registry.get(&id).await.unwrap();
        registry
            .update(&id, |t| {
                t.progress = 40;
                t.state = TaskState::Synthesizing;
            })
            .await;

        assert_eq!(before.progress, 0, "earlier snapshot must stay frozen");
        let after = registry.get(&id).await.unwrap();
        assert_eq!(after.progress, 40);
        assert_eq!(after.state, TaskState::Synthesizing);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_false_without_running_closure() {
        let registry = TaskRegistry::new();
        let mut ran = false;

        let found = registry
            .update(&TaskId::generate(), |_| {
                ran = true;
            })
            .await;

        assert!(!found);
        assert!(!ran, "mutator must not run for unknown ids");
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let registry = TaskRegistry::new();
        registry.insert(task_with_age("old.txt", 30)).await;
        registry.insert(task_with_age("mid.txt", 20)).await;
        registry.insert(task_with_age("new.txt", 10)).await;

        let listed = registry.list().await;
        let names: Vec<&str> = listed
            .iter()
            .map(|t| t.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["new.txt", "mid.txt", "old.txt"]);
    }

    #[tokio::test]
    async fn eviction_is_a_no_op_below_capacity() {
        let registry = TaskRegistry::new();
        for i in 0..5 {
            registry
                .insert(completed(task_with_age(&format!("{i}.txt"), i)))
                .await;
        }

        let evicted = registry.evict_oldest_terminal(100, 50).await;

        assert!(evicted.is_empty());
        assert_eq!(registry.len().await, 5);
    }

    #[tokio::test]
    async fn eviction_removes_only_terminal_tasks() {
        let registry = TaskRegistry::new();
        // Two terminal, two still running; capacity already exceeded
        registry.insert(completed(task_with_age("t1.txt", 40))).await;
        registry.insert(completed(task_with_age("t2.txt", 30))).await;
        let running_a = task_with_age("r1.txt", 50);
        let running_b = task_with_age("r2.txt", 20);
        let running_ids = [running_a.id.clone(), running_b.id.clone()];
        registry.insert(running_a).await;
        registry.insert(running_b).await;

        let evicted = registry.evict_oldest_terminal(4, 10).await;

        assert_eq!(evicted.len(), 2, "only the two terminal tasks are evictable");
        assert!(evicted.iter().all(|t| t.is_terminal()));
        for id in &running_ids {
            assert!(
                registry.contains(id).await,
                "in-flight tasks must never be evicted"
            );
        }
    }

    #[tokio::test]
    async fn eviction_takes_oldest_terminal_first() {
        let registry = TaskRegistry::new();
        registry
            .insert(completed(task_with_age("oldest.txt", 300)))
            .await;
        registry
            .insert(completed(task_with_age("middle.txt", 200)))
            .await;
        registry
            .insert(completed(task_with_age("newest.txt", 100)))
            .await;

        let evicted = registry.evict_oldest_terminal(3, 2).await;

        let names: Vec<&str> = evicted
            .iter()
            .map(|t| t.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["oldest.txt", "middle.txt"]);
        assert_eq!(registry.len().await, 1);
        let remaining = registry.list().await;
        assert_eq!(remaining[0].original_filename, "newest.txt");
    }

    #[tokio::test]
    async fn full_capacity_eviction_scenario() {
        // 100 terminal tasks fill the registry to capacity; a 101st submission
        // triggers a single batch eviction of the 50 oldest.
        let registry = TaskRegistry::new();
        for i in 0..100 {
            registry
                .insert(completed(task_with_age(&format!("{i}.txt"), 1000 - i)))
                .await;
        }
        assert_eq!(registry.len().await, 100);

        let evicted = registry.evict_oldest_terminal(100, 50).await;
        registry.insert(task_with_age("new.txt", 0)).await;

        assert_eq!(evicted.len(), 50);
        assert_eq!(registry.len().await, 51);
        // The 50 oldest (largest age) were the ones removed
        for task in &evicted {
            let index: i64 = task
                .original_filename
                .trim_end_matches(".txt")
                .parse()
                .unwrap();
            assert!(
                index < 50,
                "evicted {} but only the 50 oldest should go",
                task.original_filename
            );
        }
    }

    #[tokio::test]
    async fn eviction_returns_records_for_artifact_cleanup() {
        let registry = TaskRegistry::new();
        let mut task = completed(task_with_age("audio.txt", 10));
        task.error = None;
        task.artifact = Some(crate::types::ResultArtifact {
            file_name: "abc_audio.wav".to_string(),
            size_bytes: 4096,
            duration_secs: 12.0,
        });
        registry.insert(task).await;

        let evicted = registry.evict_oldest_terminal(1, 1).await;

        assert_eq!(evicted.len(), 1);
        let artifact = evicted[0].artifact.as_ref().expect("artifact preserved");
        assert_eq!(artifact.file_name, "abc_audio.wav");
    }

    #[tokio::test]
    async fn concurrent_updates_are_serialized() {
        use std::sync::Arc;

        let registry = Arc::new(TaskRegistry::new());
        let task = Task::new(TaskId::generate(), "busy.txt", 1);
        let id = task.id.clone();
        registry.insert(task).await;

        let mut handles = Vec::new();
        for _ in 0..50 {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                registry
                    .update(&id, |t| {
                        t.metrics.pages_processed += 1;
                    })
                    .await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let final_task = registry.get(&id).await.unwrap();
        assert_eq!(
            final_task.metrics.pages_processed, 50,
            "every increment must land exactly once"
        );
    }
}
