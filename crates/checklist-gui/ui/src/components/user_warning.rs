use checklist_shared::USER_WARNING;
use yew::{
  Html,
  function_component,
  html
};

#[function_component(UserWarning)]
pub fn user_warning() -> Html {
  html! {
      <section class="section">
          <p class="box is-size-3">{ USER_WARNING }</p>
      </section>
  }
}
