use std::sync::Arc;
use std::time::Duration;

use checklist_core::controller::{Controller, Outcome};
use checklist_core::memory::{MemoryTaskStore, Operation};
use checklist_shared::{Filter, Task, TaskId, UserId};
use tokio::time::sleep;

fn task(id: TaskId, title: &str, completed: bool) -> Task {
    Task {
        id,
        user_id: UserId(5),
        title: title.to_string(),
        completed,
    }
}

fn controller_with(tasks: Vec<Task>) -> Controller<Arc<MemoryTaskStore>> {
    let store = Arc::new(MemoryTaskStore::with_tasks(UserId(5), tasks));
    Controller::new(store, UserId(5))
}

#[tokio::test]
async fn empty_load_hides_list_and_footer() {
    let controller = controller_with(vec![]);
    assert_eq!(controller.load().await, Outcome::Applied);

    let state = controller.snapshot();
    assert!(!state.has_tasks());
    assert!(state.visible().is_empty());
    assert_eq!(state.error(), None);
}

#[tokio::test]
async fn single_task_filters_and_counters() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;

    controller.select_filter(Filter::Active);
    assert_eq!(controller.snapshot().visible().len(), 1);

    controller.select_filter(Filter::Completed);
    let state = controller.snapshot();
    assert!(state.visible().is_empty());
    assert_eq!(state.active_count(), 1);
    assert!(state.clear_completed_disabled());
}

#[tokio::test]
async fn blank_title_is_rejected_before_any_request() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;
    let calls = controller.store().calls();
    let before: Vec<Task> = controller.snapshot().tasks().cloned().collect();

    assert_eq!(controller.add("   ").await, Outcome::Failed);

    let state = controller.snapshot();
    assert_eq!(controller.store().calls(), calls);
    assert_eq!(state.tasks().cloned().collect::<Vec<_>>(), before);
    assert!(!state.is_adding());
    assert_eq!(state.error(), Some("Title should not be empty"));
}

#[tokio::test]
async fn add_appends_the_created_task() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;

    assert_eq!(controller.add("  Walk dog ").await, Outcome::Applied);
    let titles: Vec<String> = controller
        .snapshot()
        .tasks()
        .map(|task| task.title.clone())
        .collect();
    assert_eq!(titles, vec!["Buy milk", "Walk dog"]);

    controller.store().fail(Operation::Create);
    assert_eq!(controller.add("Call mom").await, Outcome::Failed);
    assert_eq!(controller.snapshot().total(), 2);
    assert_eq!(controller.snapshot().error(), Some("Unable to add a todo"));
}

#[tokio::test]
async fn toggling_twice_restores_local_and_remote_state() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;

    controller.toggle(1).await;
    assert!(controller.snapshot().get(1).expect("task").task.completed);
    assert!(controller.store().get(1).expect("remote").completed);

    controller.toggle(1).await;
    assert!(!controller.snapshot().get(1).expect("task").task.completed);
    assert!(!controller.store().get(1).expect("remote").completed);
}

#[tokio::test(start_paused = true)]
async fn failed_delete_keeps_task_and_error_expires() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;
    controller.store().fail(Operation::Delete);

    assert_eq!(controller.delete(1).await, Outcome::Failed);
    let state = controller.snapshot();
    assert!(state.get(1).is_some_and(|entry| !entry.is_pending()));
    assert_eq!(state.error(), Some("Unable to delete a todo"));

    sleep(Duration::from_millis(2_900)).await;
    assert_eq!(controller.snapshot().error(), Some("Unable to delete a todo"));

    sleep(Duration::from_millis(200)).await;
    assert_eq!(controller.snapshot().error(), None);
    assert_eq!(controller.snapshot().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn dismissed_error_does_not_come_back() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;
    controller.store().fail(Operation::Update);

    controller.toggle(1).await;
    sleep(Duration::from_secs(1)).await;
    assert!(controller.dismiss_error());
    assert_eq!(controller.snapshot().error(), None);

    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(controller.snapshot().error(), None);
}

#[tokio::test(start_paused = true)]
async fn newer_error_outlives_the_first_countdown() {
    let controller = controller_with(vec![task(1, "Buy milk", false)]);
    controller.load().await;
    controller.store().fail(Operation::Delete);
    controller.store().fail(Operation::Update);

    controller.delete(1).await;
    sleep(Duration::from_secs(2)).await;
    controller.toggle(1).await;

    sleep(Duration::from_millis(1_100)).await;
    assert_eq!(controller.snapshot().error(), Some("Unable to update a todo"));

    sleep(Duration::from_secs(2)).await;
    assert_eq!(controller.snapshot().error(), None);
}

#[tokio::test]
async fn toggle_all_completes_the_rest_then_reopens_everything() {
    let controller = controller_with(vec![
        task(1, "Buy milk", true),
        task(2, "Walk dog", false),
        task(3, "Call mom", false),
    ]);
    controller.load().await;

    assert_eq!(controller.toggle_all().await, Outcome::Applied);
    let state = controller.snapshot();
    assert!(state.all_completed());
    assert!(state.entries().iter().all(|entry| !entry.is_pending()));

    assert_eq!(controller.toggle_all().await, Outcome::Applied);
    assert_eq!(controller.snapshot().active_count(), 3);
    assert!(controller.store().tasks().iter().all(|task| !task.completed));
}

#[tokio::test]
async fn toggle_all_partial_failure_is_best_effort() {
    let controller = controller_with(vec![
        task(1, "Buy milk", false),
        task(2, "Walk dog", false),
        task(3, "Call mom", false),
    ]);
    controller.load().await;
    controller.store().fail_task(2);

    assert_eq!(controller.toggle_all().await, Outcome::Failed);

    let state = controller.snapshot();
    let flags: Vec<bool> = state.tasks().map(|task| task.completed).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert!(state.entries().iter().all(|entry| !entry.is_pending()));
    assert_eq!(state.error(), Some("Unable to update a todo"));
}

#[tokio::test(start_paused = true)]
async fn out_of_order_completions_land_on_their_own_task() {
    let controller = controller_with(vec![
        task(1, "Buy milk", false),
        task(2, "Walk dog", false),
        task(3, "Call mom", true),
    ]);
    controller.load().await;
    controller.store().set_latency(Duration::from_millis(100));

    let reshape = async {
        sleep(Duration::from_millis(10)).await;
        // deleting task 1 shifts every position while toggle-all is in flight
        controller.state().lock().remove(1);
    };
    let (outcome, ()) = tokio::join!(controller.toggle_all(), reshape);
    assert_eq!(outcome, Outcome::Applied);

    let state = controller.snapshot();
    assert!(state.get(1).is_none());
    assert!(state.get(2).expect("task 2").task.completed);
    assert_eq!(state.get(2).expect("task 2").task.title, "Walk dog");
    assert!(state.get(3).expect("task 3").task.completed);
}

#[tokio::test]
async fn clear_completed_removes_only_successful_deletes() {
    let controller = controller_with(vec![
        task(1, "Buy milk", true),
        task(2, "Walk dog", false),
        task(3, "Call mom", true),
    ]);
    controller.load().await;
    controller.store().fail_task(3);

    assert_eq!(controller.clear_completed().await, Outcome::Failed);

    let state = controller.snapshot();
    let ids: Vec<TaskId> = state.tasks().map(|task| task.id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(state.error(), Some("Unable to delete a todo"));
    assert!(!state.clear_completed_disabled());

    controller.store().heal_task(3);
    assert_eq!(controller.clear_completed().await, Outcome::Applied);
    assert!(controller.snapshot().clear_completed_disabled());
}

#[tokio::test]
async fn foreign_tasks_never_enter_the_collection() {
    let mut foreign = task(7, "Not mine", false);
    foreign.user_id = UserId(6);
    let store = Arc::new(MemoryTaskStore::with_tasks(
        UserId(5),
        vec![task(1, "Buy milk", false), foreign],
    ));
    let controller = Controller::new(Arc::clone(&store), UserId(5));
    controller.load().await;

    assert_eq!(controller.snapshot().total(), 1);
    assert_eq!(controller.toggle(7).await, Outcome::Skipped);
}
