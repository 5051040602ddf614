use checklist_shared::Filter;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TodoFooterProps {
  pub active:             usize,
  pub completed:          usize,
  pub filter:             Filter,
  pub clear_disabled:     bool,
  pub on_clear_completed: Callback<MouseEvent>
}

/// Counter, filter links and clear-completed.
/// Links only change the hash; the app listens
/// for `hashchange` to switch filters.
#[function_component(TodoFooter)]
pub fn todo_footer(
  props: &TodoFooterProps
) -> Html {
  html! {
      <footer class="todoapp__footer">
          <span class="todo-count">
              { format!("{} items left", props.active) }
          </span>
          <nav class="filter">
              {
                  for Filter::ALL.into_iter().map(|filter| html! {
                      <a
                          href={filter.href()}
                          class={classes!(
                              "filter__link",
                              (filter == props.filter).then_some("selected")
                          )}
                      >
                          { filter.label() }
                      </a>
                  })
              }
          </nav>
          <button
              type="button"
              class="todoapp__clear-completed"
              disabled={props.clear_disabled}
              title={format!("{} completed", props.completed)}
              onclick={props.on_clear_completed.clone()}
          >
              { "Clear completed" }
          </button>
      </footer>
  }
}
