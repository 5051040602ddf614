use std::future::Future;
use std::sync::Arc;

use checklist_shared::{Task, TaskId, TaskPatch};

use crate::error::StoreError;

/// Remote CRUD for the tasks of one user.
///
/// Implementations keep no session state between calls and never retry.
/// `create_task` rejects a blank title before anything leaves the process.
pub trait TaskStore {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>>;

    fn create_task(&self, title: &str) -> impl Future<Output = Result<Task, StoreError>>;

    fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, StoreError>>;

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), StoreError>>;
}

impl<T: TaskStore> TaskStore for Arc<T> {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, StoreError>> {
        (**self).list_tasks()
    }

    fn create_task(&self, title: &str) -> impl Future<Output = Result<Task, StoreError>> {
        (**self).create_task(title)
    }

    fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, StoreError>> {
        (**self).update_task(id, patch)
    }

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), StoreError>> {
        (**self).delete_task(id)
    }
}
