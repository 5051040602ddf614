/// How long an error stays on screen unless
/// dismissed first.
pub const ERROR_DISMISS_AFTER_MS: u32 =
  3_000;

/// The operation whose failure is being
/// reported. Each maps to one fixed message.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Failure {
  Load,
  Add,
  EmptyTitle,
  Update,
  Delete
}

impl Failure {
  pub fn message(self) -> &'static str {
    match self {
      | Failure::Load => {
        "Unable to load todos"
      }
      | Failure::Add => {
        "Unable to add a todo"
      }
      | Failure::EmptyTitle => {
        "Title should not be empty"
      }
      | Failure::Update => {
        "Unable to update a todo"
      }
      | Failure::Delete => {
        "Unable to delete a todo"
      }
    }
  }
}

/// Transient error message.
///
/// Every call to [`Banner::show`] bumps the
/// generation; a scheduled expiry only clears
/// the message it was scheduled for, so a late
/// timer can never wipe a newer error.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct Banner {
  message:    Option<String>,
  generation: u64
}

impl Banner {
  pub fn show(
    &mut self,
    message: impl Into<String>
  ) -> u64 {
    self.generation =
      self.generation.wrapping_add(1);
    self.message = Some(message.into());
    self.generation
  }

  pub fn expire(
    &mut self,
    generation: u64
  ) -> bool {
    if self.generation != generation {
      return false;
    }
    self.message.take().is_some()
  }

  pub fn dismiss(&mut self) -> bool {
    self.message.take().is_some()
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn is_visible(&self) -> bool {
    self.message.is_some()
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }
}
