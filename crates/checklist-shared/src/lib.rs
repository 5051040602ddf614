//! Wire model and view state shared by the
//! terminal client and the browser frontend.
//!
//! Nothing in here performs I/O, so the crate
//! builds for `wasm32-unknown-unknown` as well as
//! for the host.

mod banner;
mod filter;
mod view;

use std::fmt;

use serde::{
  Deserialize,
  Serialize
};

pub use crate::banner::{
  Banner,
  ERROR_DISMISS_AFTER_MS,
  Failure
};
pub use crate::filter::Filter;
pub use crate::view::{
  EntryStatus,
  TaskEntry,
  ViewState,
  active_count,
  clear_completed_disabled,
  visible_tasks
};

pub type TaskId = u64;

/// Shown instead of the whole interactive
/// surface when no user id is configured.
pub const USER_WARNING: &str =
  "No user id is configured. Set \
   `api.user_id` in the config file or \
   export CHECKLIST_USER_ID, then reload \
   to see your todos.";

#[derive(
  Debug,
  Clone,
  Copy,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct Task {
  pub id:        TaskId,
  pub user_id:   UserId,
  pub title:     String,
  #[serde(default)]
  pub completed: bool
}

/// Body of a create request. Only built through
/// [`NewTask::new`], so the title is never blank.
#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
  pub user_id:   UserId,
  pub title:     String,
  pub completed: bool
}

impl NewTask {
  pub fn new(
    user_id: UserId,
    title: &str
  ) -> Option<Self> {
    let title = normalize_title(title)?;
    Some(Self {
      user_id,
      title,
      completed: false
    })
  }
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
  Default,
)]
pub struct TaskPatch {
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub title:     Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub completed: Option<bool>
}

impl TaskPatch {
  pub fn completed(
    completed: bool
  ) -> Self {
    Self {
      completed: Some(completed),
      ..Self::default()
    }
  }

  pub fn title(
    title: impl Into<String>
  ) -> Self {
    Self {
      title: Some(title.into()),
      ..Self::default()
    }
  }

  pub fn apply_to(
    &self,
    task: &mut Task
  ) {
    if let Some(title) =
      self.title.as_ref()
    {
      task.title = title.clone();
    }
    if let Some(completed) =
      self.completed
    {
      task.completed = completed;
    }
  }
}

/// Trims a user-entered title, returning `None`
/// when nothing is left.
pub fn normalize_title(
  raw: &str
) -> Option<String> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn task_uses_camel_case_keys() {
    let json = r#"{"id":1,"userId":5,"title":"Buy milk","completed":false}"#;
    let task: Task =
      serde_json::from_str(json)
        .expect("decode task");
    assert_eq!(task.user_id, UserId(5));
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
  }

  #[test]
  fn new_task_rejects_blank_titles() {
    assert!(
      NewTask::new(UserId(1), "")
        .is_none()
    );
    assert!(
      NewTask::new(UserId(1), "   \t")
        .is_none()
    );

    let created =
      NewTask::new(UserId(1), "  Walk  ")
        .expect("non-blank title");
    assert_eq!(created.title, "Walk");
    assert!(!created.completed);

    let body =
      serde_json::to_value(&created)
        .expect("encode");
    assert_eq!(
      body,
      serde_json::json!({
        "userId": 1,
        "title": "Walk",
        "completed": false
      })
    );
  }

  #[test]
  fn patch_serializes_only_changed_fields() {
    let body = serde_json::to_value(
      TaskPatch::completed(true)
    )
    .expect("encode");
    assert_eq!(
      body,
      serde_json::json!({ "completed": true })
    );
  }

  #[test]
  fn patch_applies_in_place() {
    let mut task = Task {
      id:        3,
      user_id:   UserId(2),
      title:     "Old".to_string(),
      completed: false
    };
    TaskPatch::title("New")
      .apply_to(&mut task);
    assert_eq!(task.title, "New");
    assert!(!task.completed);

    TaskPatch::completed(true)
      .apply_to(&mut task);
    assert!(task.completed);
  }
}
