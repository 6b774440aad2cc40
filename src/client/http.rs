//! reqwest implementation of the backend API.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` per backend, reused across calls. Non-2xx responses
//! become `BackendError::Status`, carrying the server's `error` message when
//! the body has one.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use super::backend::{BackendError, WidgetBackend};
use crate::homepage::{Homepage, NewHomepage};
use crate::widget::{NewWidget, Properties, Widget};

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    #[must_use]
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), client }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Errors
    ///
    /// Returns a `BackendError` if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<Health, BackendError> {
        self.request(Method::GET, "/api/health", None::<&()>).await
    }

    // =========================================================================
    // HOMEPAGES
    // =========================================================================

    /// # Errors
    ///
    /// Returns a `BackendError` on transport or status failure.
    pub async fn list_homepages(&self) -> Result<Vec<Homepage>, BackendError> {
        self.request(Method::GET, "/api/homepages", None::<&()>).await
    }

    /// # Errors
    ///
    /// Returns a `BackendError` on transport or status failure.
    pub async fn create_homepage(&self, name: &str, is_default: bool) -> Result<Homepage, BackendError> {
        let body = NewHomepage { name: name.to_owned(), is_default };
        self.request(Method::POST, "/api/homepages", Some(&body)).await
    }

    /// # Errors
    ///
    /// Returns a `BackendError` on transport or status failure.
    pub async fn rename_homepage(&self, homepage_id: Uuid, name: &str) -> Result<Homepage, BackendError> {
        let path = format!("/api/homepages/{homepage_id}");
        self.request(Method::PUT, &path, Some(&json!({ "name": name }))).await
    }

    /// # Errors
    ///
    /// Returns a `BackendError` on transport or status failure.
    pub async fn set_default_homepage(&self, homepage_id: Uuid) -> Result<Homepage, BackendError> {
        let path = format!("/api/homepages/{homepage_id}/default");
        self.request(Method::PATCH, &path, None::<&()>).await
    }

    /// # Errors
    ///
    /// Returns a `BackendError` on transport or status failure.
    pub async fn delete_homepage(&self, homepage_id: Uuid) -> Result<(), BackendError> {
        let path = format!("/api/homepages/{homepage_id}");
        self.request::<Value, _>(Method::DELETE, &path, None::<&()>).await?;
        Ok(())
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");

        let request = self.client.request(method, &url);
        let request = if let Some(json) = body { request.json(json) } else { request };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let value = response.json::<Value>().await.unwrap_or(Value::Null);
            let message = value
                .get("error")
                .and_then(Value::as_str)
                .map_or_else(|| value.to_string(), str::to_owned);
            return Err(BackendError::Status { status: status.as_u16(), message });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl WidgetBackend for HttpBackend {
    async fn list(&self) -> Result<Vec<Widget>, BackendError> {
        self.request(Method::GET, "/api/widgets", None::<&()>).await
    }

    async fn create(&self, request: NewWidget) -> Result<Widget, BackendError> {
        self.request(Method::POST, "/api/widgets", Some(&request)).await
    }

    async fn update(&self, widget_id: Uuid, properties: Properties) -> Result<Widget, BackendError> {
        let path = format!("/api/widgets/{widget_id}");
        self.request(Method::PUT, &path, Some(&json!({ "properties": properties }))).await
    }

    async fn update_position(&self, widget_id: Uuid, position: u32) -> Result<Widget, BackendError> {
        let path = format!("/api/widgets/{widget_id}/position");
        self.request(Method::PATCH, &path, Some(&json!({ "position": position }))).await
    }

    async fn delete(&self, widget_id: Uuid) -> Result<(), BackendError> {
        let path = format!("/api/widgets/{widget_id}");
        self.request::<Value, _>(Method::DELETE, &path, None::<&()>).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
