use checklist_shared::{
  TaskEntry,
  TaskId
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TodoItem;

#[derive(Properties, PartialEq)]
pub struct TodoListProps {
  pub entries:   Vec<TaskEntry>,
  pub on_toggle: Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TodoList)]
pub fn todo_list(
  props: &TodoListProps
) -> Html {
  html! {
      <section class="todoapp__main">
          {
              for props.entries.iter().cloned().map(|entry| html! {
                  <TodoItem
                      key={entry.task.id}
                      entry={entry}
                      on_toggle={props.on_toggle.clone()}
                      on_delete={props.on_delete.clone()}
                  />
              })
          }
      </section>
  }
}
