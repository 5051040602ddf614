use std::rc::Rc;

use checklist_shared::{
  ERROR_DISMISS_AFTER_MS,
  Failure,
  Filter,
  NewTask,
  Task,
  TaskId,
  TaskPatch,
  UserId,
  ViewState
};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  Reducible,
  UseReducerHandle,
  function_component,
  html,
  use_effect_with,
  use_node_ref,
  use_reducer
};

use crate::api::TodosApi;
use crate::components::{
  ErrorNotification,
  TodoFooter,
  TodoHeader,
  TodoList,
  UserWarning
};

const DEFAULT_API_URL: &str =
  "http://127.0.0.1:3000";

fn configured_user() -> Option<UserId> {
  option_env!("CHECKLIST_USER_ID")
    .and_then(|raw| {
      raw.trim().parse::<u64>().ok()
    })
    .map(UserId)
}

fn api_base_url() -> String {
  option_env!("CHECKLIST_API_URL")
    .unwrap_or(DEFAULT_API_URL)
    .to_string()
}

/// The filter named by the location hash. An
/// empty or unknown hash selects `All`.
fn hash_filter() -> Option<Filter> {
  let hash = web_sys::window()?
    .location()
    .hash()
    .ok()?;
  Some(hash.parse().unwrap_or_default())
}

pub enum Action {
  Loaded(Vec<Task>),
  Begin(Vec<TaskId>),
  Updated(Task),
  Settled(TaskId),
  Removed(TaskId),
  AddStarted,
  Added(Option<Task>),
  Failed(Failure),
  Expire(u64),
  Dismiss,
  SelectFilter(Filter)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
  pub view: ViewState
}

impl Reducible for Session {
  type Action = Action;

  fn reduce(
    self: Rc<Self>,
    action: Action
  ) -> Rc<Self> {
    let mut view = self.view.clone();
    match action {
      | Action::Loaded(tasks) => {
        let dropped =
          view.replace_tasks(tasks);
        if dropped > 0 {
          tracing::warn!(
            dropped,
            "ignored todos owned by another \
             user"
          );
        }
      }
      | Action::Begin(ids) => {
        for id in ids {
          view.begin(id);
        }
      }
      | Action::Updated(task) => {
        view.apply_update(task);
      }
      | Action::Settled(id) => {
        view.settle(id)
      }
      | Action::Removed(id) => {
        view.remove(id);
      }
      | Action::AddStarted => {
        view.begin_add();
      }
      | Action::Added(task) => {
        view.finish_add(task);
      }
      | Action::Failed(failure) => {
        view.show_error(failure);
      }
      | Action::Expire(generation) => {
        view.expire_error(generation);
      }
      | Action::Dismiss => {
        view.dismiss_error();
      }
      | Action::SelectFilter(filter) => {
        view.set_filter(filter)
      }
    }
    Rc::new(Self { view })
  }
}

type Handle = UseReducerHandle<Session>;

#[function_component(App)]
pub fn app() -> Html {
  let Some(user_id) = configured_user()
  else {
    tracing::warn!(
      "no user id configured"
    );
    return html! { <UserWarning /> };
  };

  html! {
      <TodoApp user_id={user_id} base_url={api_base_url()} />
  }
}

#[derive(Properties, PartialEq)]
pub struct TodoAppProps {
  pub user_id:  UserId,
  pub base_url: String
}

#[function_component(TodoApp)]
pub fn todo_app(
  props: &TodoAppProps
) -> Html {
  let user_id = props.user_id;
  let api =
    TodosApi::new(&props.base_url, user_id);
  let session = use_reducer(move || {
    Session {
      view: ViewState::new(user_id)
    }
  });
  let input_ref = use_node_ref();

  {
    let session = session.clone();
    let api = api.clone();
    use_effect_with((), move |_| {
      spawn_local(async move {
        match api.list().await {
          | Ok(tasks) => {
            tracing::info!(
              loaded = tasks.len(),
              "loaded todos"
            );
            session
              .dispatch(Action::Loaded(tasks));
          }
          | Err(err) => {
            tracing::warn!(
              error = %err,
              "failed to load todos"
            );
            session.dispatch(Action::Failed(
              Failure::Load
            ));
          }
        }
      });
      || ()
    });
  }

  {
    let session = session.clone();
    use_effect_with((), move |_| {
      let select = move || {
        if let Some(filter) = hash_filter() {
          session.dispatch(
            Action::SelectFilter(filter)
          );
        }
      };
      select();
      let listener =
        web_sys::window().map(|window| {
          EventListener::new(
            &window,
            "hashchange",
            move |_| select()
          )
        });
      move || drop(listener)
    });
  }

  {
    let session = session.clone();
    let banner = session.view.banner();
    use_effect_with(
      (banner.generation(), banner.is_visible()),
      move |&(generation, visible)| {
        // dropping the Timeout cancels it
        let timeout = visible.then(|| {
          Timeout::new(
            ERROR_DISMISS_AFTER_MS,
            move || {
              session.dispatch(
                Action::Expire(generation)
              );
            }
          )
        });
        move || drop(timeout)
      }
    );
  }

  {
    let input_ref = input_ref.clone();
    use_effect_with(
      (
        session.view.total(),
        session.view.is_adding()
      ),
      move |_| {
        if let Some(input) = input_ref
          .cast::<HtmlInputElement>()
          && input.focus().is_err()
        {
          tracing::debug!(
            "could not focus title input"
          );
        }
        || ()
      }
    );
  }

  let on_add = {
    let session = session.clone();
    let api = api.clone();
    let input_ref = input_ref.clone();
    Callback::from(move |title: String| {
      if session.view.is_adding() {
        return;
      }
      let Some(body) =
        NewTask::new(api.user_id(), &title)
      else {
        session.dispatch(Action::Failed(
          Failure::EmptyTitle
        ));
        return;
      };
      session.dispatch(Action::AddStarted);
      let session = session.clone();
      let api = api.clone();
      let input_ref = input_ref.clone();
      spawn_local(async move {
        match api.create(body).await {
          | Ok(task) => {
            tracing::info!(
              task_id = task.id,
              "added todo"
            );
            session.dispatch(Action::Added(
              Some(task)
            ));
            if let Some(input) = input_ref
              .cast::<HtmlInputElement>()
            {
              input.set_value("");
            }
          }
          | Err(err) => {
            tracing::warn!(
              error = %err,
              "failed to add todo"
            );
            session
              .dispatch(Action::Added(None));
            session.dispatch(Action::Failed(
              Failure::Add
            ));
          }
        }
      });
    })
  };

  let on_toggle = {
    let session = session.clone();
    let api = api.clone();
    Callback::from(move |id: TaskId| {
      let Some(entry) = session.view.get(id)
      else {
        return;
      };
      if entry.is_pending() {
        return;
      }
      let completed = !entry.task.completed;
      session
        .dispatch(Action::Begin(vec![id]));
      spawn_local(update_many(
        session.clone(),
        api.clone(),
        vec![id],
        completed
      ));
    })
  };

  let on_delete = {
    let session = session.clone();
    let api = api.clone();
    Callback::from(move |id: TaskId| {
      if session
        .view
        .get(id)
        .is_none_or(|entry| {
          entry.is_pending()
        })
      {
        return;
      }
      session
        .dispatch(Action::Begin(vec![id]));
      spawn_local(delete_many(
        session.clone(),
        api.clone(),
        vec![id]
      ));
    })
  };

  let on_toggle_all = {
    let session = session.clone();
    let api = api.clone();
    Callback::from(move |_: MouseEvent| {
      let view = &session.view;
      let target = view.toggle_all_target();
      let ids = idle_only(
        view,
        view.toggle_all_candidates()
      );
      if ids.is_empty() {
        return;
      }
      session
        .dispatch(Action::Begin(ids.clone()));
      spawn_local(update_many(
        session.clone(),
        api.clone(),
        ids,
        target
      ));
    })
  };

  let on_clear_completed = {
    let session = session.clone();
    let api = api.clone();
    Callback::from(move |_: MouseEvent| {
      let view = &session.view;
      let ids =
        idle_only(view, view.completed_ids());
      if ids.is_empty() {
        return;
      }
      session
        .dispatch(Action::Begin(ids.clone()));
      spawn_local(delete_many(
        session.clone(),
        api.clone(),
        ids
      ));
    })
  };

  let on_dismiss = {
    let session = session.clone();
    Callback::from(move |_: MouseEvent| {
      session.dispatch(Action::Dismiss)
    })
  };

  let view = &session.view;
  html! {
      <section class="todoapp">
          <TodoHeader
              all_completed={view.all_completed()}
              adding={view.is_adding()}
              input_ref={input_ref.clone()}
              on_add={on_add}
              on_toggle_all={on_toggle_all}
          />
          if view.has_tasks() {
              <>
              <TodoList
                  entries={view.visible().into_iter().cloned().collect::<Vec<_>>()}
                  on_toggle={on_toggle}
                  on_delete={on_delete}
              />
              <TodoFooter
                  active={view.active_count()}
                  completed={view.completed_count()}
                  filter={view.filter()}
                  clear_disabled={view.clear_completed_disabled()}
                  on_clear_completed={on_clear_completed}
              />
              </>
          }
          <ErrorNotification
              message={view.error().map(str::to_string)}
              on_dismiss={on_dismiss}
          />
      </section>
  }
}

fn idle_only(
  view: &ViewState,
  ids: Vec<TaskId>
) -> Vec<TaskId> {
  ids
    .into_iter()
    .filter(|id| {
      view
        .get(*id)
        .is_some_and(|entry| {
          !entry.is_pending()
        })
    })
    .collect()
}

/// Sends one PATCH per id and applies each
/// result as it lands. Reports one error for the
/// whole batch.
async fn update_many(
  session: Handle,
  api: TodosApi,
  ids: Vec<TaskId>,
  completed: bool
) {
  let mut in_flight: FuturesUnordered<_> = ids
    .into_iter()
    .map(|id| {
      let api = &api;
      async move {
        let patch =
          TaskPatch::completed(completed);
        (id, api.update(id, patch).await)
      }
    })
    .collect();

  let mut failed = false;
  while let Some((id, result)) =
    in_flight.next().await
  {
    match result {
      | Ok(task) => {
        session
          .dispatch(Action::Updated(task))
      }
      | Err(err) => {
        tracing::warn!(
          task_id = id,
          error = %err,
          "failed to update todo"
        );
        failed = true;
        session.dispatch(Action::Settled(id));
      }
    }
  }

  if failed {
    session.dispatch(Action::Failed(
      Failure::Update
    ));
  }
}

async fn delete_many(
  session: Handle,
  api: TodosApi,
  ids: Vec<TaskId>
) {
  let mut in_flight: FuturesUnordered<_> = ids
    .into_iter()
    .map(|id| {
      let api = &api;
      async move { (id, api.delete(id).await) }
    })
    .collect();

  let mut failed = false;
  while let Some((id, result)) =
    in_flight.next().await
  {
    match result {
      | Ok(()) => {
        tracing::info!(
          task_id = id,
          "deleted todo"
        );
        session.dispatch(Action::Removed(id));
      }
      | Err(err) => {
        tracing::warn!(
          task_id = id,
          error = %err,
          "failed to delete todo"
        );
        failed = true;
        session.dispatch(Action::Settled(id));
      }
    }
  }

  if failed {
    session.dispatch(Action::Failed(
      Failure::Delete
    ));
  }
}
