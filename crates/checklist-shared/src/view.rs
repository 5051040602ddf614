use crate::{
  Banner,
  Failure,
  Filter,
  Task,
  TaskId,
  UserId
};

/// Tasks passing `filter`, in stored order.
pub fn visible_tasks<'a>(
  tasks: impl IntoIterator<Item = &'a Task>,
  filter: Filter
) -> Vec<&'a Task> {
  tasks
    .into_iter()
    .filter(|task| filter.matches(task))
    .collect()
}

pub fn active_count<'a>(
  tasks: impl IntoIterator<Item = &'a Task>
) -> usize {
  tasks
    .into_iter()
    .filter(|task| !task.completed)
    .count()
}

/// Nothing to clear when every task is still
/// active.
pub fn clear_completed_disabled(
  active: usize,
  total: usize
) -> bool {
  active == total
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
)]
pub enum EntryStatus {
  #[default]
  Idle,
  Pending
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskEntry {
  pub task:   Task,
  pub status: EntryStatus
}

impl TaskEntry {
  fn idle(task: Task) -> Self {
    Self {
      task,
      status: EntryStatus::Idle
    }
  }

  pub fn is_pending(&self) -> bool {
    self.status == EntryStatus::Pending
  }
}

/// Everything the user sees for one session.
///
/// The collection only ever holds tasks owned by
/// `user_id`. Remote results are reconciled by
/// task id, never by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
  user_id: UserId,
  entries: Vec<TaskEntry>,
  filter:  Filter,
  banner:  Banner,
  adding:  bool
}

impl ViewState {
  pub fn new(user_id: UserId) -> Self {
    Self {
      user_id,
      entries: Vec::new(),
      filter: Filter::All,
      banner: Banner::default(),
      adding: false
    }
  }

  pub fn entries(&self) -> &[TaskEntry] {
    &self.entries
  }

  pub fn tasks(
    &self
  ) -> impl Iterator<Item = &Task> {
    self
      .entries
      .iter()
      .map(|entry| &entry.task)
  }

  pub fn get(
    &self,
    id: TaskId
  ) -> Option<&TaskEntry> {
    self
      .entries
      .iter()
      .find(|entry| entry.task.id == id)
  }

  fn get_mut(
    &mut self,
    id: TaskId
  ) -> Option<&mut TaskEntry> {
    self
      .entries
      .iter_mut()
      .find(|entry| entry.task.id == id)
  }

  fn owns(&self, task: &Task) -> bool {
    task.user_id == self.user_id
  }

  /// Replaces the collection with a fresh load.
  /// Returns how many foreign tasks were dropped.
  pub fn replace_tasks(
    &mut self,
    tasks: Vec<Task>
  ) -> usize {
    let total = tasks.len();
    let user_id = self.user_id;
    self.entries = tasks
      .into_iter()
      .filter(|task| task.user_id == user_id)
      .map(TaskEntry::idle)
      .collect();
    total - self.entries.len()
  }

  /// Marks the task as pending and returns a copy
  /// of it. `None` when the task is unknown or a
  /// mutation for it is already in flight.
  pub fn begin(
    &mut self,
    id: TaskId
  ) -> Option<Task> {
    let entry = self.get_mut(id)?;
    if entry.is_pending() {
      return None;
    }
    entry.status = EntryStatus::Pending;
    Some(entry.task.clone())
  }

  pub fn settle(&mut self, id: TaskId) {
    if let Some(entry) = self.get_mut(id)
    {
      entry.status = EntryStatus::Idle;
    }
  }

  /// Writes a remote result back into the entry
  /// with the same id. Results for tasks that have
  /// since disappeared are ignored.
  pub fn apply_update(
    &mut self,
    task: Task
  ) -> bool {
    if !self.owns(&task) {
      self.settle(task.id);
      return false;
    }
    match self.get_mut(task.id) {
      | Some(entry) => {
        entry.task = task;
        entry.status = EntryStatus::Idle;
        true
      }
      | None => false
    }
  }

  pub fn remove(
    &mut self,
    id: TaskId
  ) -> Option<Task> {
    let index = self
      .entries
      .iter()
      .position(|entry| entry.task.id == id)?;
    Some(self.entries.remove(index).task)
  }

  pub fn is_adding(&self) -> bool {
    self.adding
  }

  pub fn begin_add(&mut self) -> bool {
    if self.adding {
      return false;
    }
    self.adding = true;
    true
  }

  /// Ends a create, appending the created task
  /// if there is one.
  pub fn finish_add(
    &mut self,
    created: Option<Task>
  ) -> bool {
    self.adding = false;
    let Some(task) = created else {
      return false;
    };
    if !self.owns(&task)
      || self.get(task.id).is_some()
    {
      return false;
    }
    self.entries.push(TaskEntry::idle(task));
    true
  }

  pub fn filter(&self) -> Filter {
    self.filter
  }

  pub fn set_filter(
    &mut self,
    filter: Filter
  ) {
    self.filter = filter;
  }

  pub fn banner(&self) -> &Banner {
    &self.banner
  }

  pub fn error(&self) -> Option<&str> {
    self.banner.message()
  }

  pub fn show_error(
    &mut self,
    failure: Failure
  ) -> u64 {
    self.banner.show(failure.message())
  }

  pub fn expire_error(
    &mut self,
    generation: u64
  ) -> bool {
    self.banner.expire(generation)
  }

  pub fn dismiss_error(&mut self) -> bool {
    self.banner.dismiss()
  }

  pub fn visible(&self) -> Vec<&TaskEntry> {
    self
      .entries
      .iter()
      .filter(|entry| {
        self.filter.matches(&entry.task)
      })
      .collect()
  }

  pub fn total(&self) -> usize {
    self.entries.len()
  }

  pub fn has_tasks(&self) -> bool {
    !self.entries.is_empty()
  }

  pub fn active_count(&self) -> usize {
    active_count(self.tasks())
  }

  pub fn completed_count(&self) -> usize {
    self.total() - self.active_count()
  }

  /// Toggle-all shows as active only when there
  /// is something and all of it is done.
  pub fn all_completed(&self) -> bool {
    self.has_tasks()
      && self.active_count() == 0
  }

  pub fn clear_completed_disabled(
    &self
  ) -> bool {
    clear_completed_disabled(
      self.active_count(),
      self.total()
    )
  }

  /// The `completed` value toggle-all writes.
  pub fn toggle_all_target(&self) -> bool {
    !self.all_completed()
  }

  /// Tasks whose flag differs from the toggle-all
  /// target.
  pub fn toggle_all_candidates(
    &self
  ) -> Vec<TaskId> {
    let target = self.toggle_all_target();
    self
      .tasks()
      .filter(|task| {
        task.completed != target
      })
      .map(|task| task.id)
      .collect()
  }

  pub fn completed_ids(
    &self
  ) -> Vec<TaskId> {
    self
      .tasks()
      .filter(|task| task.completed)
      .map(|task| task.id)
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;

  fn task(
    id: TaskId,
    completed: bool
  ) -> Task {
    Task {
      id,
      user_id: UserId(5),
      title: format!("task {id}"),
      completed
    }
  }

  fn loaded(tasks: Vec<Task>) -> ViewState {
    let mut state =
      ViewState::new(UserId(5));
    state.replace_tasks(tasks);
    state
  }

  #[test]
  fn empty_state_has_no_footer_data() {
    let state = ViewState::new(UserId(5));
    assert!(!state.has_tasks());
    assert_eq!(state.active_count(), 0);
    assert!(!state.all_completed());
    assert!(state.clear_completed_disabled());
  }

  #[test]
  fn single_active_task_scenario() {
    let mut state = loaded(vec![Task {
      id:        1,
      user_id:   UserId(5),
      title:     "Buy milk".to_string(),
      completed: false
    }]);

    state.set_filter(Filter::Active);
    assert_eq!(state.visible().len(), 1);

    state.set_filter(Filter::Completed);
    assert!(state.visible().is_empty());

    assert_eq!(state.active_count(), 1);
    assert!(state.clear_completed_disabled());
  }

  #[test]
  fn foreign_tasks_are_dropped_on_load() {
    let mut state =
      ViewState::new(UserId(5));
    let mut other = task(9, false);
    other.user_id = UserId(6);
    let dropped = state
      .replace_tasks(vec![task(1, false), other]);
    assert_eq!(dropped, 1);
    assert_eq!(state.total(), 1);
  }

  #[test]
  fn begin_blocks_a_second_mutation() {
    let mut state =
      loaded(vec![task(1, false)]);
    assert!(state.begin(1).is_some());
    assert!(state.begin(1).is_none());
    assert!(state.begin(42).is_none());

    state.settle(1);
    assert!(state.begin(1).is_some());
  }

  #[test]
  fn update_reconciles_by_id_after_reshape() {
    let mut state = loaded(vec![
      task(1, false),
      task(2, false),
      task(3, false),
    ]);
    state.begin(3);
    state.remove(1);

    let mut done = task(3, false);
    done.completed = true;
    assert!(state.apply_update(done));

    let entry =
      state.get(3).expect("task 3");
    assert!(entry.task.completed);
    assert!(!entry.is_pending());
    assert!(
      !state.get(2).expect("task 2").task.completed
    );
  }

  #[test]
  fn update_for_removed_task_is_ignored() {
    let mut state =
      loaded(vec![task(1, false)]);
    state.remove(1);
    assert!(!state.apply_update(task(1, true)));
    assert_eq!(state.total(), 0);
  }

  #[test]
  fn add_flag_guards_concurrent_creates() {
    let mut state = loaded(vec![]);
    assert!(state.begin_add());
    assert!(!state.begin_add());
    assert!(state.finish_add(Some(task(7, false))));
    assert!(!state.is_adding());
    assert_eq!(state.total(), 1);

    assert!(state.begin_add());
    assert!(!state.finish_add(None));
    assert!(!state.is_adding());
  }

  #[test]
  fn toggle_all_targets() {
    let mixed =
      loaded(vec![task(1, true), task(2, false)]);
    assert!(mixed.toggle_all_target());
    assert_eq!(
      mixed.toggle_all_candidates(),
      vec![2]
    );

    let done =
      loaded(vec![task(1, true), task(2, true)]);
    assert!(done.all_completed());
    assert!(!done.toggle_all_target());
    assert_eq!(
      done.toggle_all_candidates(),
      vec![1, 2]
    );
  }

  fn arb_tasks()
  -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(
      any::<bool>(),
      0..24
    )
    .prop_map(|flags| {
      flags
        .into_iter()
        .enumerate()
        .map(|(index, completed)| {
          task(index as TaskId, completed)
        })
        .collect()
    })
  }

  fn arb_filter()
  -> impl Strategy<Value = Filter> {
    prop::sample::select(
      Filter::ALL.to_vec()
    )
  }

  proptest! {
    #[test]
    fn visible_set_is_the_filtered_collection(
      tasks in arb_tasks(),
      filter in arb_filter()
    ) {
      let state = {
        let mut state = loaded(tasks.clone());
        state.set_filter(filter);
        state
      };
      let visible: Vec<&Task> = state
        .visible()
        .into_iter()
        .map(|entry| &entry.task)
        .collect();
      let expected: Vec<&Task> = tasks
        .iter()
        .filter(|task| match filter {
          | Filter::All => true,
          | Filter::Active => !task.completed,
          | Filter::Completed => task.completed
        })
        .collect();
      prop_assert_eq!(&visible, &expected);
      prop_assert_eq!(
        visible_tasks(&tasks, filter),
        expected
      );
      prop_assert!(visible.len() <= tasks.len());
    }

    #[test]
    fn counters_ignore_the_filter(
      tasks in arb_tasks(),
      filter in arb_filter()
    ) {
      let mut state = loaded(tasks);
      let before = state.active_count();
      let disabled = state.clear_completed_disabled();
      state.set_filter(filter);
      prop_assert_eq!(state.active_count(), before);
      prop_assert_eq!(
        state.clear_completed_disabled(),
        disabled
      );
      prop_assert_eq!(
        disabled,
        state.completed_count() == 0
      );
    }
  }
}
