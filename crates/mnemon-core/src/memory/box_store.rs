//! BoxMemoryStore -- object-safe dynamic dispatch wrapper for MemoryStore.
//!
//! Same three-step pattern as the rest of the codebase's boxed seams:
//! 1. Define an object-safe `MemoryStoreDyn` trait with boxed futures
//! 2. Blanket-impl `MemoryStoreDyn` for all `T: MemoryStore`
//! 3. `BoxMemoryStore` wraps `Box<dyn MemoryStoreDyn>` and implements
//!    `MemoryStore` by delegating
//!
//! This lets the application pick a backend (embedded store or external
//! engine client) at runtime while the service layer stays generic.

use std::future::Future;
use std::pin::Pin;

use mnemon_types::error::MemoryServiceError;
use mnemon_types::memory::{MemoryNamespace, ScoredMemory};

use super::store::MemoryStore;

/// Object-safe version of [`MemoryStore`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation covers
/// every `MemoryStore`.
pub trait MemoryStoreDyn: Send + Sync {
    fn add_boxed<'a>(
        &'a self,
        namespace: MemoryNamespace,
        uid: &'a str,
        content: &'a str,
        session_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, MemoryServiceError>> + Send + 'a>>;

    fn clear_boxed<'a>(
        &'a self,
        uid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, MemoryServiceError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        uid: &'a str,
        query: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send + 'a>>;

    fn list_boxed<'a>(
        &'a self,
        uid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send + 'a>>;
}

/// Blanket implementation: any `MemoryStore` automatically implements `MemoryStoreDyn`.
impl<T: MemoryStore> MemoryStoreDyn for T {
    fn add_boxed<'a>(
        &'a self,
        namespace: MemoryNamespace,
        uid: &'a str,
        content: &'a str,
        session_id: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<String, MemoryServiceError>> + Send + 'a>> {
        Box::pin(self.add(namespace, uid, content, session_id))
    }

    fn clear_boxed<'a>(
        &'a self,
        uid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<u64, MemoryServiceError>> + Send + 'a>> {
        Box::pin(self.clear(uid))
    }

    fn search_boxed<'a>(
        &'a self,
        uid: &'a str,
        query: &'a str,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send + 'a>>
    {
        Box::pin(self.search(uid, query, limit))
    }

    fn list_boxed<'a>(
        &'a self,
        uid: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send + 'a>>
    {
        Box::pin(self.list(uid))
    }
}

/// Type-erased memory store for runtime backend selection.
///
/// Since `MemoryStore` uses RPITIT it cannot be a trait object directly;
/// `BoxMemoryStore` wraps the object-safe variant and re-implements the
/// trait, so generic service code accepts it like any concrete backend.
pub struct BoxMemoryStore {
    inner: Box<dyn MemoryStoreDyn + Send + Sync>,
}

impl BoxMemoryStore {
    /// Wrap a concrete `MemoryStore` in a type-erased box.
    pub fn new<T: MemoryStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }
}

impl MemoryStore for BoxMemoryStore {
    fn add(
        &self,
        namespace: MemoryNamespace,
        uid: &str,
        content: &str,
        session_id: Option<&str>,
    ) -> impl Future<Output = Result<String, MemoryServiceError>> + Send {
        async move { self.inner.add_boxed(namespace, uid, content, session_id).await }
    }

    fn clear(&self, uid: &str) -> impl Future<Output = Result<u64, MemoryServiceError>> + Send {
        async move { self.inner.clear_boxed(uid).await }
    }

    fn search(
        &self,
        uid: &str,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send {
        async move { self.inner.search_boxed(uid, query, limit).await }
    }

    fn list(
        &self,
        uid: &str,
    ) -> impl Future<Output = Result<Vec<ScoredMemory>, MemoryServiceError>> + Send {
        async move { self.inner.list_boxed(uid).await }
    }
}
