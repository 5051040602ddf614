use std::sync::Arc;
use std::time::Duration;

use checklist_shared::{
    ERROR_DISMISS_AFTER_MS, Failure, Filter, TaskId, TaskPatch, UserId, ViewState,
    normalize_title,
};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::store::TaskStore;
use crate::timer::{ErrorTimer, SharedState};

/// What became of one user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote call succeeded and state was updated.
    Applied,
    /// Nothing was sent: the task is unknown, already pending, or unchanged.
    Skipped,
    /// The request failed; state is unchanged and an error is showing.
    Failed,
}

/// Owns the session's [`ViewState`] and reconciles remote results into it.
///
/// Every store failure is caught here and turned into a banner message;
/// none propagate to the caller. The state lock is never held across an
/// `.await`.
#[derive(Debug)]
pub struct Controller<S> {
    store: S,
    state: SharedState,
    errors: ErrorTimer,
}

impl<S: TaskStore> Controller<S> {
    pub fn new(store: S, user_id: UserId) -> Self {
        Self::with_dismiss_after(
            store,
            user_id,
            Duration::from_millis(u64::from(ERROR_DISMISS_AFTER_MS)),
        )
    }

    pub fn with_dismiss_after(store: S, user_id: UserId, after: Duration) -> Self {
        let state = Arc::new(Mutex::new(ViewState::new(user_id)));
        let errors = ErrorTimer::new(Arc::clone(&state), after);
        Self {
            store,
            state,
            errors,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.lock().clone()
    }

    fn fail(&self, failure: Failure, err: &StoreError) -> Outcome {
        warn!(error = %err, message = failure.message(), "todo operation failed");
        self.errors.show(failure);
        Outcome::Failed
    }

    #[instrument(skip(self))]
    pub async fn load(&self) -> Outcome {
        match self.store.list_tasks().await {
            Ok(tasks) => {
                let loaded = tasks.len();
                let dropped = self.state.lock().replace_tasks(tasks);
                if dropped > 0 {
                    warn!(dropped, "ignored todos owned by another user");
                }
                info!(loaded, "loaded todos");
                Outcome::Applied
            }
            Err(err) => self.fail(Failure::Load, &err),
        }
    }

    #[instrument(skip(self, title), fields(title_len = title.len()))]
    pub async fn add(&self, title: &str) -> Outcome {
        if !self.state.lock().begin_add() {
            debug!("a todo is already being added");
            return Outcome::Skipped;
        }

        match self.store.create_task(title).await {
            Ok(task) => {
                let task_id = task.id;
                if self.state.lock().finish_add(Some(task)) {
                    info!(task_id, "added todo");
                } else {
                    warn!(task_id, "created todo was not added to the list");
                }
                Outcome::Applied
            }
            Err(err) => {
                self.state.lock().finish_add(None);
                let failure = if err.is_validation() {
                    Failure::EmptyTitle
                } else {
                    Failure::Add
                };
                self.fail(failure, &err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn toggle(&self, id: TaskId) -> Outcome {
        let Some(task) = self.state.lock().begin(id) else {
            debug!(task_id = id, "toggle skipped");
            return Outcome::Skipped;
        };
        self.update(id, TaskPatch::completed(!task.completed)).await
    }

    /// Edits a title. A blank title removes the todo; an unchanged one sends
    /// nothing.
    #[instrument(skip(self, title))]
    pub async fn rename(&self, id: TaskId, title: &str) -> Outcome {
        let Some(title) = normalize_title(title) else {
            return self.delete(id).await;
        };

        let Some(task) = self.state.lock().begin(id) else {
            debug!(task_id = id, "rename skipped");
            return Outcome::Skipped;
        };
        if task.title == title {
            self.state.lock().settle(id);
            return Outcome::Skipped;
        }
        self.update(id, TaskPatch::title(title)).await
    }

    async fn update(&self, id: TaskId, patch: TaskPatch) -> Outcome {
        match self.store.update_task(id, patch).await {
            Ok(task) => {
                if !self.state.lock().apply_update(task) {
                    debug!(task_id = id, "update result no longer applies");
                }
                Outcome::Applied
            }
            Err(err) => {
                self.state.lock().settle(id);
                self.fail(Failure::Update, &err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: TaskId) -> Outcome {
        if self.state.lock().begin(id).is_none() {
            debug!(task_id = id, "delete skipped");
            return Outcome::Skipped;
        }

        match self.store.delete_task(id).await {
            Ok(()) => {
                self.state.lock().remove(id);
                info!(task_id = id, "deleted todo");
                Outcome::Applied
            }
            Err(err) => {
                self.state.lock().settle(id);
                self.fail(Failure::Delete, &err)
            }
        }
    }

    /// Marks every todo done, or reopens all of them when they already are.
    ///
    /// Requests go out together and each completion is applied to its own
    /// todo as it arrives. Best effort: successes stay applied when others
    /// fail, and the batch reports a single error.
    #[instrument(skip(self))]
    pub async fn toggle_all(&self) -> Outcome {
        let (target, ids) = {
            let mut state = self.state.lock();
            let target = state.toggle_all_target();
            let mut ids = Vec::new();
            for id in state.toggle_all_candidates() {
                if state.begin(id).is_some() {
                    ids.push(id);
                }
            }
            (target, ids)
        };
        if ids.is_empty() {
            return Outcome::Skipped;
        }
        debug!(count = ids.len(), completed = target, "toggling all todos");

        let mut in_flight: FuturesUnordered<_> = ids
            .into_iter()
            .map(|id| async move {
                let result = self.store.update_task(id, TaskPatch::completed(target)).await;
                (id, result)
            })
            .collect();

        let mut first_error = None;
        while let Some((id, result)) = in_flight.next().await {
            match result {
                Ok(task) => {
                    self.state.lock().apply_update(task);
                }
                Err(err) => {
                    warn!(task_id = id, error = %err, "toggle-all update failed");
                    self.state.lock().settle(id);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => self.fail(Failure::Update, &err),
            None => Outcome::Applied,
        }
    }

    /// Deletes every completed todo, best effort like
    /// [`Controller::toggle_all`].
    #[instrument(skip(self))]
    pub async fn clear_completed(&self) -> Outcome {
        let ids = {
            let mut state = self.state.lock();
            let mut ids = Vec::new();
            for id in state.completed_ids() {
                if state.begin(id).is_some() {
                    ids.push(id);
                }
            }
            ids
        };
        if ids.is_empty() {
            return Outcome::Skipped;
        }
        debug!(count = ids.len(), "clearing completed todos");

        let mut in_flight: FuturesUnordered<_> = ids
            .into_iter()
            .map(|id| async move { (id, self.store.delete_task(id).await) })
            .collect();

        let mut first_error = None;
        while let Some((id, result)) = in_flight.next().await {
            match result {
                Ok(()) => {
                    self.state.lock().remove(id);
                }
                Err(err) => {
                    warn!(task_id = id, error = %err, "clear-completed delete failed");
                    self.state.lock().settle(id);
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => self.fail(Failure::Delete, &err),
            None => Outcome::Applied,
        }
    }

    pub fn select_filter(&self, filter: Filter) {
        debug!(%filter, "selecting filter");
        self.state.lock().set_filter(filter);
    }

    pub fn dismiss_error(&self) -> bool {
        self.errors.dismiss()
    }
}
