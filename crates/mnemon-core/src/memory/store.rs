//! MemoryStore trait definition.
//!
//! The semantic memory engine is a black box to this crate: it ingests
//! content, clears a user's memories, and returns scored candidates. The
//! core never embeds or scores. Implementations live in mnemon-infra
//! (embedded in-process store, HTTP client for an external engine).

use mnemon_types::error::MemoryServiceError;
use mnemon_types::memory::{MemoryNamespace, ScoredMemory};

/// Boundary trait for the external memory/embedding engine.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). `search` and
/// `list` read the profiling namespace only; tool-memory writes never
/// surface through them.
pub trait MemoryStore: Send + Sync {
    /// Ingest content into the given namespace. Returns the engine-assigned
    /// entry id as confirmation.
    fn add(
        &self,
        namespace: MemoryNamespace,
        uid: &str,
        content: &str,
        session_id: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, MemoryServiceError>> + Send;

    /// Wipe all tracked memories for a user, in every namespace. Returns the
    /// count of deleted entries.
    fn clear(
        &self,
        uid: &str,
    ) -> impl std::future::Future<Output = Result<u64, MemoryServiceError>> + Send;

    /// Retrieve scored profiling candidates for a query.
    fn search(
        &self,
        uid: &str,
        query: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send;

    /// List every profiling entry for a user, unscored.
    fn list(
        &self,
        uid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send;
}
