//! HttpMemoryStore -- `MemoryStore` client for an external memory engine.
//!
//! Proxies add/clear/search/list to the engine's REST surface. The engine is
//! a black box: timeouts surface as `MemoryServiceError::Timeout`, non-2xx
//! responses as `Upstream`, and connection failures as `Transport`. No
//! retry policy lives here; if the deployment wants retries they belong to
//! the engine side of the boundary.

use std::time::Duration;

use serde::Deserialize;

use mnemon_core::memory::MemoryStore;
use mnemon_types::error::MemoryServiceError;
use mnemon_types::memory::{MemoryNamespace, ScoredMemory};

/// HTTP client for an external memory engine.
pub struct HttpMemoryStore {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ClearResponse {
    deleted: u64,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    results: Vec<ScoredMemory>,
}

impl HttpMemoryStore {
    /// Create a client for the engine at `base_url` with the given request
    /// timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to create reqwest client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn map_error(error: reqwest::Error) -> MemoryServiceError {
        if error.is_timeout() {
            MemoryServiceError::Timeout
        } else {
            MemoryServiceError::Transport(error.to_string())
        }
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, MemoryServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(MemoryServiceError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

impl MemoryStore for HttpMemoryStore {
    async fn add(
        &self,
        namespace: MemoryNamespace,
        uid: &str,
        content: &str,
        session_id: Option<&str>,
    ) -> Result<String, MemoryServiceError> {
        let response = self
            .client
            .post(format!("{}/v1/memories", self.base_url))
            .json(&serde_json::json!({
                "uid": uid,
                "namespace": namespace,
                "content": content,
                "session_id": session_id,
            }))
            .send()
            .await
            .map_err(Self::map_error)?;

        let body: AddResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Self::map_error)?;
        Ok(body.id)
    }

    async fn clear(&self, uid: &str) -> Result<u64, MemoryServiceError> {
        let response = self
            .client
            .delete(format!("{}/v1/memories/{uid}", self.base_url))
            .send()
            .await
            .map_err(Self::map_error)?;

        let body: ClearResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Self::map_error)?;
        Ok(body.deleted)
    }

    async fn search(
        &self,
        uid: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let response = self
            .client
            .get(format!("{}/v1/memories/search", self.base_url))
            .query(&[
                ("uid", uid),
                ("query", query),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(Self::map_error)?;

        let body: ListResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Self::map_error)?;
        Ok(body.results)
    }

    async fn list(&self, uid: &str) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let response = self
            .client
            .get(format!("{}/v1/memories", self.base_url))
            .query(&[("uid", uid)])
            .send()
            .await
            .map_err(Self::map_error)?;

        let body: ListResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(Self::map_error)?;
        Ok(body.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let store = HttpMemoryStore::new("http://localhost:7700/", Duration::from_secs(5));
        assert_eq!(store.base_url, "http://localhost:7700");
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Port 1 is never listening.
        let store = HttpMemoryStore::new("http://127.0.0.1:1", Duration::from_secs(2));
        let err = store.list("u1").await.unwrap_err();
        assert!(matches!(err, MemoryServiceError::Transport(_)));
    }
}
