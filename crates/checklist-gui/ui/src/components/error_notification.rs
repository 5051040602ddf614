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
pub struct ErrorNotificationProps {
  pub message:    Option<String>,
  pub on_dismiss: Callback<MouseEvent>
}

/// Always mounted; hidden while there is no
/// message.
#[function_component(ErrorNotification)]
pub fn error_notification(
  props: &ErrorNotificationProps
) -> Html {
  let hidden = props.message.is_none();
  html! {
      <div class={classes!(
          "notification",
          "is-danger",
          hidden.then_some("hidden")
      )}>
          <button
              type="button"
              class="delete"
              onclick={props.on_dismiss.clone()}
          />
          { props.message.clone().unwrap_or_default() }
      </div>
  }
}
