use std::collections::BTreeSet;
use std::time::Duration;

use checklist_shared::{NewTask, Task, TaskId, TaskPatch, UserId};
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

/// In-process stand-in for the remote API.
///
/// Backs the CLI's `--offline` mode and the controller tests. Failures can be
/// injected per operation or per task id, and an artificial latency makes
/// requests suspend like real network calls.
#[derive(Debug)]
pub struct MemoryTaskStore {
    user_id: UserId,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: TaskId,
    failing_operations: BTreeSet<Operation>,
    failing_tasks: BTreeSet<TaskId>,
    latency: Option<Duration>,
    calls: usize,
}

impl MemoryTaskStore {
    pub fn new(user_id: UserId) -> Self {
        Self::with_tasks(user_id, Vec::new())
    }

    /// Seeds the store. Tasks of other users may be included; they are held
    /// but never listed for `user_id`.
    pub fn with_tasks(user_id: UserId, tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|task| task.id).max().unwrap_or(0) + 1;
        Self {
            user_id,
            inner: Mutex::new(Inner {
                tasks,
                next_id,
                ..Inner::default()
            }),
        }
    }

    pub fn fail(&self, operation: Operation) {
        self.inner.lock().failing_operations.insert(operation);
    }

    pub fn recover(&self, operation: Operation) {
        self.inner.lock().failing_operations.remove(&operation);
    }

    /// Updates and deletes of `id` fail until [`MemoryTaskStore::heal_task`].
    pub fn fail_task(&self, id: TaskId) {
        self.inner.lock().failing_tasks.insert(id);
    }

    pub fn heal_task(&self, id: TaskId) {
        self.inner.lock().failing_tasks.remove(&id);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.inner.lock().latency = Some(latency);
    }

    /// Requests that reached the store. Rejected titles never count.
    pub fn calls(&self) -> usize {
        self.inner.lock().calls
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.lock().tasks.clone()
    }

    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.inner.lock().tasks.iter().find(|task| task.id == id).cloned()
    }

    async fn request(&self, operation: Operation, id: Option<TaskId>) -> Result<(), StoreError> {
        let latency = {
            let mut inner = self.inner.lock();
            inner.calls += 1;
            inner.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let inner = self.inner.lock();
        let task_fails = id.is_some_and(|id| inner.failing_tasks.contains(&id));
        if inner.failing_operations.contains(&operation) || task_fails {
            debug!(?operation, task_id = ?id, "injected failure");
            return Err(StoreError::transport(
                operation_name(operation),
                "injected failure",
            ));
        }
        Ok(())
    }
}

fn operation_name(operation: Operation) -> &'static str {
    match operation {
        Operation::List => "list todos",
        Operation::Create => "create todo",
        Operation::Update => "update todo",
        Operation::Delete => "delete todo",
    }
}

impl TaskStore for MemoryTaskStore {
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.request(Operation::List, None).await?;
        let inner = self.inner.lock();
        Ok(inner
            .tasks
            .iter()
            .filter(|task| task.user_id == self.user_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, title), fields(user_id = %self.user_id))]
    async fn create_task(&self, title: &str) -> Result<Task, StoreError> {
        let body = NewTask::new(self.user_id, title).ok_or_else(StoreError::empty_title)?;
        self.request(Operation::Create, None).await?;

        let mut inner = self.inner.lock();
        let task = Task {
            id: inner.next_id,
            user_id: body.user_id,
            title: body.title,
            completed: body.completed,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());
        Ok(task)
    }

    #[instrument(skip(self, patch), fields(user_id = %self.user_id, task_id = id))]
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        self.request(Operation::Update, Some(id)).await?;

        let mut inner = self.inner.lock();
        let task = inner
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| StoreError::transport("update todo", format!("no todo with id {id}")))?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, task_id = id))]
    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        self.request(Operation::Delete, Some(id)).await?;

        let mut inner = self.inner.lock();
        let index = inner
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| StoreError::transport("delete todo", format!("no todo with id {id}")))?;
        inner.tasks.remove(index);
        Ok(())
    }
}
