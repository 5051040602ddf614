use checklist_shared::{
  TaskEntry,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TodoItemProps {
  pub entry:     TaskEntry,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TodoItem)]
pub fn todo_item(
  props: &TodoItemProps
) -> Html {
  let task = &props.entry.task;
  let id = task.id;
  let pending = props.entry.is_pending();
  let on_toggle = props.on_toggle.clone();
  let on_delete = props.on_delete.clone();

  html! {
      <div class={classes!("todo", task.completed.then_some("completed"))}>
          <label class="todo__status-label">
              <input
                  type="checkbox"
                  class="todo__status"
                  checked={task.completed}
                  disabled={pending}
                  onchange={move |_| on_toggle.emit(id)}
              />
          </label>
          <span class="todo__title">{ &task.title }</span>
          <button
              type="button"
              class="todo__remove"
              disabled={pending}
              onclick={move |_| on_delete.emit(id)}
          >
              { "×" }
          </button>
          <div class={classes!("modal", "overlay", pending.then_some("is-active"))}>
              <div class="modal-background has-background-white-ter" />
              <div class="loader" />
          </div>
      </div>
  }
}
