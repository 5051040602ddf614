use std::sync::Arc;
use std::time::Duration;

use checklist_shared::{Failure, ViewState};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

pub type SharedState = Arc<Mutex<ViewState>>;

/// Auto-dismiss for the error banner.
///
/// Showing an error aborts the previous countdown and starts a new one;
/// dismissing aborts it outright. The expiry itself is keyed on the banner
/// generation, so a countdown that woke up just before being aborted still
/// cannot clear a newer message.
#[derive(Debug)]
pub struct ErrorTimer {
    state: SharedState,
    after: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl ErrorTimer {
    pub fn new(state: SharedState, after: Duration) -> Self {
        Self {
            state,
            after,
            pending: Mutex::new(None),
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, failure: Failure) -> u64 {
        let generation = self.state.lock().show_error(failure);
        debug!(generation, message = failure.message(), "showing error");

        let state = Arc::clone(&self.state);
        let after = self.after;
        let countdown = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if state.lock().expire_error(generation) {
                trace!(generation, "error expired");
            }
        });

        if let Some(previous) = self.pending.lock().replace(countdown) {
            previous.abort();
        }
        generation
    }

    pub fn dismiss(&self) -> bool {
        let dismissed = self.state.lock().dismiss_error();
        if let Some(countdown) = self.pending.lock().take() {
            countdown.abort();
        }
        dismissed
    }
}

impl Drop for ErrorTimer {
    fn drop(&mut self) {
        if let Some(countdown) = self.pending.get_mut().take() {
            countdown.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use checklist_shared::UserId;

    use super::*;

    fn timer() -> (SharedState, ErrorTimer) {
        let state = Arc::new(Mutex::new(ViewState::new(UserId(1))));
        let timer = ErrorTimer::new(Arc::clone(&state), Duration::from_secs(3));
        (state, timer)
    }

    #[tokio::test(start_paused = true)]
    async fn restarts_countdown_on_new_error() {
        let (state, timer) = timer();
        timer.show(Failure::Load);
        tokio::time::sleep(Duration::from_secs(2)).await;

        timer.show(Failure::Add);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(state.lock().error(), Some("Unable to add a todo"));

        tokio::time::sleep(Duration::from_millis(1_600)).await;
        assert_eq!(state.lock().error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_the_countdown() {
        let (state, timer) = timer();
        timer.show(Failure::Delete);
        drop(timer);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(state.lock().error(), Some("Unable to delete a todo"));
    }
}
