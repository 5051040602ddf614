use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  MouseEvent,
  NodeRef,
  Properties,
  SubmitEvent,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TodoHeaderProps {
  pub all_completed: bool,
  pub adding:        bool,
  pub input_ref:     NodeRef,
  pub on_add:        Callback<String>,
  pub on_toggle_all: Callback<MouseEvent>
}

/// Toggle-all button and the title entry form.
/// Both stay even when there are no todos.
#[function_component(TodoHeader)]
pub fn todo_header(
  props: &TodoHeaderProps
) -> Html {
  let onsubmit = {
    let input_ref = props.input_ref.clone();
    let on_add = props.on_add.clone();
    move |e: SubmitEvent| {
      e.prevent_default();
      if let Some(input) =
        input_ref.cast::<HtmlInputElement>()
      {
        on_add.emit(input.value());
      }
    }
  };

  html! {
      <header class="todoapp__header">
          <button
              type="button"
              class={classes!(
                  "todoapp__toggle-all",
                  props.all_completed.then_some("active")
              )}
              onclick={props.on_toggle_all.clone()}
          />
          <form {onsubmit}>
              <input
                  ref={props.input_ref.clone()}
                  type="text"
                  class="todoapp__new-todo"
                  placeholder="What needs to be done?"
                  disabled={props.adding}
              />
          </form>
      </header>
  }
}
