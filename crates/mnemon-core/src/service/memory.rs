//! User-memory orchestration service.
//!
//! Glues the write paths (ingest, clear, record-action) and the synchronous
//! read paths (retrieve, show-all) to the memory engine behind
//! [`MemoryStore`]. The write paths are what the task runner executes in the
//! background; the service itself is agnostic to how it is scheduled.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use mnemon_types::action::ActionRecord;
use mnemon_types::error::{ActionError, MemoryServiceError};
use mnemon_types::memory::{MemoryMessage, MemoryNamespace, ScoredMemory};

use crate::action::{self, DispatchRoute};
use crate::memory::store::MemoryStore;

/// Failure of a record-action operation: either the record itself is
/// malformed or the engine write failed.
#[derive(Debug, Error)]
pub enum RecordActionError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Memory(#[from] MemoryServiceError),
}

/// Confirmation returned after an action record has been stored.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReceipt {
    pub namespace: MemoryNamespace,
    pub entry_id: String,
}

/// Orchestrates memory operations for one deployment's users.
///
/// Generic over the engine seam so tests can run against an in-process fake
/// and production against the embedded store or an external engine client.
pub struct UserMemoryService<M: MemoryStore> {
    store: M,
}

impl<M: MemoryStore> UserMemoryService<M> {
    pub fn new(store: M) -> Self {
        Self { store }
    }

    /// Ingest conversational content into the user's profiling memory.
    ///
    /// Messages are flattened into one `role: content` block per message;
    /// the engine decides what to extract from it. Returns the
    /// engine-assigned entry id.
    pub async fn ingest(
        &self,
        uid: &str,
        messages: &[MemoryMessage],
        session_id: Option<&str>,
    ) -> Result<String, MemoryServiceError> {
        validate_uid(uid)?;
        if messages.is_empty() {
            return Err(MemoryServiceError::Validation(
                "messages must not be empty".to_string(),
            ));
        }
        if messages.iter().all(|m| m.content.trim().is_empty()) {
            return Err(MemoryServiceError::Validation(
                "messages carry no content".to_string(),
            ));
        }

        let content = messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let entry_id = self
            .store
            .add(MemoryNamespace::Profiling, uid, &content, session_id)
            .await?;
        debug!(%uid, %entry_id, "ingested conversation content");
        Ok(entry_id)
    }

    /// Wipe all tracked memories for a user. Returns the deleted count.
    ///
    /// Concurrent `ingest` and `clear` for the same uid may interleave;
    /// the engine's consistency model governs the outcome (last writer
    /// wins). No cross-user locking is imposed here.
    pub async fn clear(&self, uid: &str) -> Result<u64, MemoryServiceError> {
        validate_uid(uid)?;
        let deleted = self.store.clear(uid).await?;
        debug!(%uid, deleted, "cleared user memories");
        Ok(deleted)
    }

    /// Dispatch an action record and store its payload in the routed
    /// namespace.
    pub async fn record_action(
        &self,
        record: &ActionRecord,
    ) -> Result<ActionReceipt, RecordActionError> {
        validate_uid(&record.uid)?;

        let (namespace, content) = match action::dispatch(record)? {
            DispatchRoute::Profiling { action, payload } => {
                let body = serde_json::json!({
                    "action": action,
                    "message_id": record.message_id,
                    "reference_time": record.reference_time,
                    "payload": payload,
                });
                (MemoryNamespace::Profiling, body.to_string())
            }
            DispatchRoute::ToolMemory { payload } => {
                (MemoryNamespace::Tool, payload.to_string())
            }
        };

        let entry_id = self
            .store
            .add(namespace, &record.uid, &content, record.session_id.as_deref())
            .await?;
        debug!(uid = %record.uid, %namespace, %entry_id, "recorded action");
        Ok(ActionReceipt {
            namespace,
            entry_id,
        })
    }

    /// Retrieve scored profiling candidates for a query.
    pub async fn retrieve(
        &self,
        uid: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        validate_uid(uid)?;
        if query.trim().is_empty() {
            return Err(MemoryServiceError::Validation(
                "query must not be empty".to_string(),
            ));
        }
        self.store.search(uid, query, limit).await
    }

    /// Every profiling entry for a user.
    pub async fn show_all(&self, uid: &str) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        validate_uid(uid)?;
        self.store.list(uid).await
    }
}

fn validate_uid(uid: &str) -> Result<(), MemoryServiceError> {
    if uid.trim().is_empty() {
        return Err(MemoryServiceError::Validation(
            "uid must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dashmap::DashMap;
    use mnemon_types::action::ActionRecord;
    use serde_json::json;

    /// In-process fake of the memory engine keyed by (namespace, uid).
    #[derive(Default)]
    struct FakeStore {
        entries: DashMap<(MemoryNamespace, String), Vec<ScoredMemory>>,
        next_id: std::sync::atomic::AtomicU64,
    }

    impl MemoryStore for FakeStore {
        async fn add(
            &self,
            namespace: MemoryNamespace,
            uid: &str,
            content: &str,
            _session_id: Option<&str>,
        ) -> Result<String, MemoryServiceError> {
            let id = self
                .next_id
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let entry_id = format!("mem-{id}");
            let now = Utc::now();
            self.entries
                .entry((namespace, uid.to_string()))
                .or_default()
                .push(ScoredMemory {
                    id: entry_id.clone(),
                    memory: content.to_string(),
                    hash: format!("hash-{id}"),
                    score: 0.0,
                    created_at: now,
                    updated_at: now,
                    user_id: uid.to_string(),
                });
            Ok(entry_id)
        }

        async fn clear(&self, uid: &str) -> Result<u64, MemoryServiceError> {
            let mut deleted = 0u64;
            for namespace in [MemoryNamespace::Profiling, MemoryNamespace::Tool] {
                if let Some((_, entries)) =
                    self.entries.remove(&(namespace, uid.to_string()))
                {
                    deleted += entries.len() as u64;
                }
            }
            Ok(deleted)
        }

        async fn search(
            &self,
            uid: &str,
            _query: &str,
            limit: usize,
        ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
            let mut results = self.list(uid).await?;
            results.truncate(limit);
            Ok(results)
        }

        async fn list(&self, uid: &str) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
            Ok(self
                .entries
                .get(&(MemoryNamespace::Profiling, uid.to_string()))
                .map(|e| e.clone())
                .unwrap_or_default())
        }
    }

    fn service() -> UserMemoryService<FakeStore> {
        UserMemoryService::new(FakeStore::default())
    }

    fn messages() -> Vec<MemoryMessage> {
        vec![
            MemoryMessage {
                role: "user".to_string(),
                content: "I prefer dark mode".to_string(),
            },
            MemoryMessage {
                role: "assistant".to_string(),
                content: "Noted".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn ingest_flattens_messages_into_profiling() {
        let svc = service();
        svc.ingest("u1", &messages(), Some("s1")).await.unwrap();

        let all = svc.show_all("u1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].memory.contains("user: I prefer dark mode"));
        assert!(all[0].memory.contains("assistant: Noted"));
    }

    #[tokio::test]
    async fn ingest_rejects_empty_input() {
        let svc = service();
        assert!(matches!(
            svc.ingest("", &messages(), None).await,
            Err(MemoryServiceError::Validation(_))
        ));
        assert!(matches!(
            svc.ingest("u1", &[], None).await,
            Err(MemoryServiceError::Validation(_))
        ));
        let blank = vec![MemoryMessage {
            role: "user".to_string(),
            content: "   ".to_string(),
        }];
        assert!(matches!(
            svc.ingest("u1", &blank, None).await,
            Err(MemoryServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn clear_removes_everything_for_the_user() {
        let svc = service();
        svc.ingest("u1", &messages(), None).await.unwrap();
        svc.ingest("u2", &messages(), None).await.unwrap();

        let deleted = svc.clear("u1").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(svc.show_all("u1").await.unwrap().is_empty());
        assert_eq!(svc.show_all("u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn task_stop_never_surfaces_in_profiling_reads() {
        let svc = service();
        let stop = ActionRecord {
            uid: "u1".to_string(),
            session_id: None,
            action_type: Some("TASK_STOP".to_string()),
            action: None,
            message_id: None,
            reference_time: None,
            data: json!({"reason": "user interrupt"}),
        };
        let receipt = svc.record_action(&stop).await.unwrap();
        assert_eq!(receipt.namespace, MemoryNamespace::Tool);
        assert!(svc.show_all("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn like_action_lands_in_profiling() {
        let svc = service();
        let like = ActionRecord {
            uid: "u1".to_string(),
            session_id: Some("s1".to_string()),
            action_type: Some("LIKE".to_string()),
            action: None,
            message_id: Some("m1".to_string()),
            reference_time: None,
            data: json!({"previous": 0, "current": 1}),
        };
        let receipt = svc.record_action(&like).await.unwrap();
        assert_eq!(receipt.namespace, MemoryNamespace::Profiling);

        let all = svc.show_all("u1").await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].memory.contains("LIKE"));
        assert!(all[0].memory.contains("\"current\":1"));
    }

    #[tokio::test]
    async fn unknown_action_type_is_rejected_before_any_write() {
        let svc = service();
        let bad = ActionRecord {
            uid: "u1".to_string(),
            session_id: None,
            action_type: Some("WAVE".to_string()),
            action: None,
            message_id: None,
            reference_time: None,
            data: json!({}),
        };
        let err = svc.record_action(&bad).await.unwrap_err();
        assert!(matches!(
            err,
            RecordActionError::Action(ActionError::InvalidActionType(_))
        ));
        assert!(svc.show_all("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn retrieve_validates_query() {
        let svc = service();
        assert!(matches!(
            svc.retrieve("u1", "  ", 5).await,
            Err(MemoryServiceError::Validation(_))
        ));
    }
}
