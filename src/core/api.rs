use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::error;

use crate::core::activity::ActivityLog;
use crate::core::dashboard::bookmarks::{BookmarkDraft, ConfirmedDelete};
use crate::core::error::{DashResult, DashboardError};
use crate::core::models::{
    Bookmark, ChatMessage, GatewayStatus, Reminder, Task, TopologySnapshot, TunnelStatus,
};

/// Body shape of every mutation response: `{"success": true, ...}`.
#[derive(Debug, serde::Deserialize)]
struct Ack {
    #[serde(default = "ack_default")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn ack_default() -> bool {
    true
}

/// Uniform JSON-over-HTTP wrapper around the dashboard backend.
///
/// No retries: every failure goes straight back to the caller and is
/// recorded in the activity feed with `error` severity.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_base: String,
    activity: ActivityLog,
}

impl ApiClient {
    pub fn new(api_base: &str, timeout: Duration, activity: ActivityLog) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            activity,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_base, endpoint.trim_start_matches('/'))
    }

    pub async fn request<T, B>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
    ) -> DashResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let result = self.send(endpoint, method.clone(), body).await;
        if let Err(e) = &result {
            error!("API {} {} failed: {}", method, endpoint, e);
            self.activity
                .error(format!("{} {} failed: {}", method, endpoint, e));
        }
        result
    }

    async fn send<T, B>(&self, endpoint: &str, method: Method, body: Option<&B>) -> DashResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut req = self.client.request(method, self.url(endpoint));
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req.send().await.map_err(|e| DashboardError::Network {
            status: e.status().map(|s| s.as_u16()).unwrap_or(0),
            message: e.to_string(),
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| DashboardError::Network {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            let message = error_detail(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
            return Err(DashboardError::Network {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&text)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> DashResult<T> {
        self.request::<T, ()>(endpoint, Method::GET, None).await
    }

    /// Collection endpoints: an empty or `null` body is an empty collection.
    async fn list<T: DeserializeOwned>(&self, endpoint: &str) -> DashResult<Vec<T>> {
        let items: Option<Vec<T>> = self.get(endpoint).await?;
        Ok(items.unwrap_or_default())
    }

    async fn mutate<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&B>,
    ) -> DashResult<()> {
        let ack: Option<Ack> = self.request(endpoint, method.clone(), body).await?;
        match ack {
            Some(Ack { success: false, error }) => {
                let err = DashboardError::Network {
                    status: 200,
                    message: error.unwrap_or_else(|| "backend rejected the request".to_string()),
                };
                error!("API {} {} rejected: {}", method, endpoint, err);
                self.activity
                    .error(format!("{} {} failed: {}", method, endpoint, err));
                Err(err)
            }
            _ => Ok(()),
        }
    }

    pub async fn health(&self) -> DashResult<GatewayStatus> {
        self.get("health").await
    }

    pub async fn tunnel_status(&self) -> DashResult<TunnelStatus> {
        self.get("cloudflare-tunnel").await
    }

    pub async fn list_bookmarks(&self) -> DashResult<Vec<Bookmark>> {
        self.list("bookmarks").await
    }

    pub async fn create_bookmark(&self, draft: &BookmarkDraft) -> DashResult<()> {
        self.mutate("bookmarks", Method::POST, Some(draft)).await
    }

    pub async fn update_bookmark(&self, id: i64, draft: &BookmarkDraft) -> DashResult<()> {
        self.mutate(&format!("bookmarks/{}", id), Method::PUT, Some(draft))
            .await
    }

    pub async fn delete_bookmark(&self, confirmed: &ConfirmedDelete) -> DashResult<()> {
        self.mutate::<()>(
            &format!("bookmarks/{}", confirmed.id()),
            Method::DELETE,
            None,
        )
        .await
    }

    pub async fn list_tasks(&self) -> DashResult<Vec<Task>> {
        self.list("tasks").await
    }

    pub async fn list_schedule(&self) -> DashResult<Vec<Reminder>> {
        self.list("schedule").await
    }

    pub async fn create_reminder(&self, reminder: &Reminder) -> DashResult<()> {
        self.mutate("schedule", Method::POST, Some(reminder)).await
    }

    pub async fn chat_history(&self) -> DashResult<Vec<ChatMessage>> {
        self.list("chat").await
    }

    pub async fn post_chat(&self, message: &ChatMessage) -> DashResult<()> {
        self.mutate("chat", Method::POST, Some(message)).await
    }

    pub async fn topology(&self) -> DashResult<TopologySnapshot> {
        self.get("topology").await
    }

    /// Ask the backend to rescan before answering.
    pub async fn refresh_topology(&self) -> DashResult<TopologySnapshot> {
        self.get("topology/refresh").await
    }
}

fn decode_body<T: DeserializeOwned>(text: &str) -> DashResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| DashboardError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body (`{"detail": ...}` or
/// `{"error": ...}`).
fn error_detail(text: &str) -> Option<String> {
    let json: Value = serde_json::from_str(text).ok()?;
    ["detail", "error", "message"]
        .iter()
        .find_map(|k| json.get(*k).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_empty_body_as_null() {
        let v: Option<Vec<Bookmark>> = decode_body("  ").unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn decode_malformed_body_is_parse_error() {
        let err = decode_body::<Vec<Bookmark>>("{not json").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn error_detail_reads_fastapi_shape() {
        assert_eq!(
            error_detail(r#"{"detail":"Bookmark not found"}"#).as_deref(),
            Some("Bookmark not found")
        );
        assert_eq!(error_detail("<html>"), None);
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let api = ApiClient::new(
            "http://127.0.0.1:18790/dashboard/api/",
            Duration::from_secs(1),
            ActivityLog::new(),
        )
        .unwrap();
        assert_eq!(
            api.url("/bookmarks"),
            "http://127.0.0.1:18790/dashboard/api/bookmarks"
        );
    }
}
