//! Embedded in-process memory store.
//!
//! DashMap-backed stand-in for the external semantic engine: entries are
//! bucketed per namespace and user, hashed with SHA-256, and scored by
//! plain term overlap. Deterministic, dependency-free at runtime, and the
//! backend the test suites run against. Deployments wanting real semantic
//! retrieval point the config at an external engine instead.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use mnemon_core::memory::MemoryStore;
use mnemon_types::error::MemoryServiceError;
use mnemon_types::memory::{MemoryNamespace, ScoredMemory};

/// One stored entry. Score is computed per query at search time.
#[derive(Debug, Clone)]
struct StoredEntry {
    id: String,
    content: String,
    hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredEntry {
    fn to_scored(&self, uid: &str, score: f64) -> ScoredMemory {
        ScoredMemory {
            id: self.id.clone(),
            memory: self.content.clone(),
            hash: self.hash.clone(),
            score,
            created_at: self.created_at,
            updated_at: self.updated_at,
            user_id: uid.to_string(),
        }
    }
}

/// In-process `MemoryStore` keyed by `(namespace, uid)`.
pub struct EmbeddedMemoryStore {
    buckets: DashMap<(MemoryNamespace, String), Vec<StoredEntry>>,
}

impl EmbeddedMemoryStore {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
        }
    }

    /// Total entries across all users and namespaces. Derived from the
    /// buckets themselves so a concurrent add/clear interleaving can never
    /// leave the count out of sync with the stored entries.
    pub fn len(&self) -> u64 {
        self.buckets
            .iter()
            .map(|entry| entry.value().len() as u64)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EmbeddedMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Fraction of query terms present in the entry, in `[0, 1]`.
fn overlap_score(query: &str, content: &str) -> f64 {
    let content_lower = content.to_lowercase();
    let content_terms: std::collections::HashSet<&str> =
        content_lower.split_whitespace().collect();
    let query_lower = query.to_lowercase();
    let query_terms: Vec<&str> = query_lower.split_whitespace().collect();
    if query_terms.is_empty() {
        return 0.0;
    }
    let hits = query_terms
        .iter()
        .filter(|t| content_terms.contains(**t))
        .count();
    hits as f64 / query_terms.len() as f64
}

impl MemoryStore for EmbeddedMemoryStore {
    async fn add(
        &self,
        namespace: MemoryNamespace,
        uid: &str,
        content: &str,
        _session_id: Option<&str>,
    ) -> Result<String, MemoryServiceError> {
        let now = Utc::now();
        let entry = StoredEntry {
            id: Uuid::now_v7().to_string(),
            content: content.to_string(),
            hash: format!("{:x}", Sha256::digest(content.as_bytes())),
            created_at: now,
            updated_at: now,
        };
        let id = entry.id.clone();
        self.buckets
            .entry((namespace, uid.to_string()))
            .or_default()
            .push(entry);
        Ok(id)
    }

    async fn clear(&self, uid: &str) -> Result<u64, MemoryServiceError> {
        let mut deleted = 0u64;
        for namespace in [MemoryNamespace::Profiling, MemoryNamespace::Tool] {
            if let Some((_, entries)) = self.buckets.remove(&(namespace, uid.to_string())) {
                deleted += entries.len() as u64;
            }
        }
        Ok(deleted)
    }

    async fn search(
        &self,
        uid: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let mut results: Vec<ScoredMemory> = self
            .buckets
            .get(&(MemoryNamespace::Profiling, uid.to_string()))
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| e.to_scored(uid, overlap_score(query, &e.content)))
                    .filter(|m| m.score > 0.0)
                    .collect()
            })
            .unwrap_or_default();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }

    async fn list(&self, uid: &str) -> Result<Vec<ScoredMemory>, MemoryServiceError> {
        let mut results: Vec<ScoredMemory> = self
            .buckets
            .get(&(MemoryNamespace::Profiling, uid.to_string()))
            .map(|entries| entries.iter().map(|e| e.to_scored(uid, 0.0)).collect())
            .unwrap_or_default();
        results.sort_by_key(|m| m.created_at);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_and_list_profiling_entries() {
        let store = EmbeddedMemoryStore::new();
        store
            .add(MemoryNamespace::Profiling, "u1", "prefers dark mode", None)
            .await
            .unwrap();

        let entries = store.list("u1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].memory, "prefers dark mode");
        assert_eq!(entries[0].user_id, "u1");
        // SHA-256 hex digest
        assert_eq!(entries[0].hash.len(), 64);
    }

    #[tokio::test]
    async fn tool_namespace_is_invisible_to_reads() {
        let store = EmbeddedMemoryStore::new();
        store
            .add(MemoryNamespace::Tool, "u1", "stop signal", None)
            .await
            .unwrap();

        assert!(store.list("u1").await.unwrap().is_empty());
        assert!(store.search("u1", "stop signal", 10).await.unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn search_ranks_by_term_overlap() {
        let store = EmbeddedMemoryStore::new();
        store
            .add(MemoryNamespace::Profiling, "u1", "enjoys rust and coffee", None)
            .await
            .unwrap();
        store
            .add(MemoryNamespace::Profiling, "u1", "enjoys tea", None)
            .await
            .unwrap();
        store
            .add(MemoryNamespace::Profiling, "u1", "plays chess", None)
            .await
            .unwrap();

        let results = store.search("u1", "enjoys rust", 10).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].memory.contains("rust"));
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let store = EmbeddedMemoryStore::new();
        for i in 0..5 {
            store
                .add(MemoryNamespace::Profiling, "u1", &format!("note {i}"), None)
                .await
                .unwrap();
        }
        let results = store.search("u1", "note", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn clear_wipes_both_namespaces() {
        let store = EmbeddedMemoryStore::new();
        store
            .add(MemoryNamespace::Profiling, "u1", "fact", None)
            .await
            .unwrap();
        store
            .add(MemoryNamespace::Tool, "u1", "signal", None)
            .await
            .unwrap();
        store
            .add(MemoryNamespace::Profiling, "u2", "other user", None)
            .await
            .unwrap();

        let deleted = store.clear("u1").await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.list("u1").await.unwrap().is_empty());
        assert_eq!(store.list("u2").await.unwrap().len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn len_stays_consistent_under_concurrent_add_and_clear() {
        let store = std::sync::Arc::new(EmbeddedMemoryStore::new());

        let mut handles = Vec::new();
        for worker in 0..8 {
            let store = std::sync::Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let uid = format!("u{worker}");
                for i in 0..25 {
                    store
                        .add(MemoryNamespace::Profiling, &uid, &format!("note {i}"), None)
                        .await
                        .unwrap();
                    if i % 5 == 0 {
                        store.clear(&uid).await.unwrap();
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Whatever interleaving happened, the count must equal what the
        // buckets actually hold. An unsigned wraparound would show up as an
        // absurdly large value here.
        let mut listed = 0u64;
        for worker in 0..8 {
            listed += store.list(&format!("u{worker}")).await.unwrap().len() as u64;
        }
        assert_eq!(store.len(), listed);
        assert!(store.len() <= 8 * 25);

        for worker in 0..8 {
            store.clear(&format!("u{worker}")).await.unwrap();
        }
        assert!(store.is_empty());
    }
}
