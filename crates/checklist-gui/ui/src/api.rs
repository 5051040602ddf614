use checklist_shared::{
  NewTask,
  Task,
  TaskId,
  TaskPatch,
  UserId
};
use gloo::net::http::{
  Request,
  Response
};
use serde::de::DeserializeOwned;

/// Browser client for the todos API. Errors are
/// flattened to strings; the caller only needs to
/// know that the call failed.
#[derive(Debug, Clone, PartialEq)]
pub struct TodosApi {
  base_url: String,
  user_id:  UserId
}

impl TodosApi {
  pub fn new(
    base_url: &str,
    user_id: UserId
  ) -> Self {
    Self {
      base_url: base_url
        .trim()
        .trim_end_matches('/')
        .to_string(),
      user_id
    }
  }

  pub fn user_id(&self) -> UserId {
    self.user_id
  }

  fn item_url(
    &self,
    id: TaskId
  ) -> String {
    format!("{}/todos/{id}", self.base_url)
  }

  pub async fn list(
    &self
  ) -> Result<Vec<Task>, String> {
    let url = format!(
      "{}/todos?userId={}",
      self.base_url, self.user_id
    );
    let response = Request::get(&url)
      .send()
      .await
      .map_err(|e| {
        format!("list todos failed: {e}")
      })?;
    decode("list todos", response).await
  }

  pub async fn create(
    &self,
    body: NewTask
  ) -> Result<Task, String> {
    let url =
      format!("{}/todos", self.base_url);
    let response = Request::post(&url)
      .json(&body)
      .map_err(|e| {
        format!(
          "failed to encode todo: {e}"
        )
      })?
      .send()
      .await
      .map_err(|e| {
        format!("create todo failed: {e}")
      })?;
    decode("create todo", response).await
  }

  pub async fn update(
    &self,
    id: TaskId,
    patch: TaskPatch
  ) -> Result<Task, String> {
    let response =
      Request::patch(&self.item_url(id))
        .json(&patch)
        .map_err(|e| {
          format!(
            "failed to encode patch: {e}"
          )
        })?
        .send()
        .await
        .map_err(|e| {
          format!(
            "update todo failed: {e}"
          )
        })?;
    decode("update todo", response).await
  }

  pub async fn delete(
    &self,
    id: TaskId
  ) -> Result<(), String> {
    let response =
      Request::delete(&self.item_url(id))
        .send()
        .await
        .map_err(|e| {
          format!(
            "delete todo failed: {e}"
          )
        })?;
    check("delete todo", response)
      .map(|_| ())
  }
}

fn check(
  operation: &str,
  response: Response
) -> Result<Response, String> {
  if response.ok() {
    return Ok(response);
  }
  tracing::warn!(
    operation,
    status = response.status(),
    "todos API returned an error status"
  );
  Err(format!(
    "{operation} failed: HTTP {}",
    response.status()
  ))
}

async fn decode<T: DeserializeOwned>(
  operation: &str,
  response: Response
) -> Result<T, String> {
  check(operation, response)?
    .json::<T>()
    .await
    .map_err(|e| {
      format!(
        "{operation}: decode error: {e}"
      )
    })
}
