use std::time::Duration;

use anyhow::{Context, anyhow};
use checklist_shared::{NewTask, Task, TaskId, TaskPatch, UserId};
use reqwest::{Client, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::StoreError;
use crate::store::TaskStore;

/// [`TaskStore`] backed by the remote todos API.
///
/// ```text
/// GET    {base}/todos?userId={id}
/// POST   {base}/todos
/// PATCH  {base}/todos/{id}
/// DELETE {base}/todos/{id}
/// ```
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: Client,
    base_url: String,
    user_id: UserId,
}

impl HttpTaskStore {
    pub fn new(base_url: &str, user_id: UserId, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(anyhow!(
                "api base url must start with http:// or https://, got `{base_url}`"
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building HTTP client for the todos API")?;

        debug!(base_url = %base_url, user_id = %user_id, ?timeout, "configured todos API client");

        Ok(Self {
            client,
            base_url,
            user_id,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn item_url(&self, id: TaskId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, StoreError> {
        let request = request.build().map_err(|err| {
            warn!(operation, error = %err, "failed building todos API request");
            StoreError::transport(operation, err)
        })?;
        let method = request.method().clone();
        let path = request_path(&request);

        let response = self.client.execute(request).await.map_err(|err| {
            warn!(operation, %method, path = %path, error = %err, "todos API request failed");
            StoreError::transport(operation, err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                operation,
                %method,
                path = %path,
                status = status.as_u16(),
                "todos API returned an error status"
            );
            return Err(StoreError::transport(operation, format!("HTTP {status}")));
        }

        debug!(operation, %method, path = %path, status = status.as_u16(), "todos API request succeeded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, StoreError> {
        response.json::<T>().await.map_err(|err| {
            warn!(operation, error = %err, "failed decoding todos API response");
            StoreError::transport(operation, err)
        })
    }
}

/// Path plus query of a request, as logged.
fn request_path(request: &Request) -> String {
    let url = request.url();
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

impl TaskStore for HttpTaskStore {
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let url = format!("{}?userId={}", self.collection_url(), self.user_id);
        let response = self.send("list todos", self.client.get(url)).await?;
        Self::decode("list todos", response).await
    }

    #[instrument(skip(self, title), fields(user_id = %self.user_id, title_len = title.len()))]
    async fn create_task(&self, title: &str) -> Result<Task, StoreError> {
        let body = NewTask::new(self.user_id, title).ok_or_else(StoreError::empty_title)?;
        let request = self.client.post(self.collection_url()).json(&body);
        let response = self.send("create todo", request).await?;
        Self::decode("create todo", response).await
    }

    #[instrument(skip(self, patch), fields(user_id = %self.user_id, task_id = id))]
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, StoreError> {
        let request = self.client.patch(self.item_url(id)).json(&patch);
        let response = self.send("update todo", request).await?;
        Self::decode("update todo", response).await
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, task_id = id))]
    async fn delete_task(&self, id: TaskId) -> Result<(), StoreError> {
        self.send("delete todo", self.client.delete(self.item_url(id)))
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_base_url_without_scheme() {
        let err = HttpTaskStore::new("example.com/api", UserId(1), Duration::from_secs(1))
            .expect_err("scheme required");
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let store = HttpTaskStore::new(
            "https://example.com/api/ ",
            UserId(7),
            Duration::from_secs(1),
        )
        .expect("valid url");
        assert_eq!(store.base_url(), "https://example.com/api");
        assert_eq!(store.item_url(3), "https://example.com/api/todos/3");
    }

    #[test]
    fn logged_path_keeps_the_user_query() {
        let store = HttpTaskStore::new("http://127.0.0.1:3000", UserId(5), Duration::from_secs(1))
            .expect("valid url");

        let list = store
            .client
            .get(format!("{}?userId=5", store.collection_url()))
            .build()
            .expect("list request");
        assert_eq!(request_path(&list), "/todos?userId=5");

        let delete = store.client.delete(store.item_url(9)).build().expect("delete request");
        assert_eq!(delete.method().as_str(), "DELETE");
        assert_eq!(request_path(&delete), "/todos/9");
    }
}
