//! ProfileRepository trait definition.
//!
//! Keyed CRUD over user profile entries plus the two guarded mutations:
//! the optimistic content update and the idempotent confirm. Implementations
//! live in mnemon-infra (e.g., `SqliteProfileRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use mnemon_types::error::RepositoryError;
use mnemon_types::profile::Profile;

/// Repository trait for user profile persistence.
///
/// All lookups are scoped by `uid`: a pid owned by another user behaves
/// exactly like a missing pid.
pub trait ProfileRepository: Send + Sync {
    /// Insert a new profile entry.
    fn insert(
        &self,
        profile: &Profile,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch one profile owned by `uid`.
    fn get(
        &self,
        uid: &str,
        pid: &str,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// All profiles owned by `uid`, ordered by creation time.
    fn list(
        &self,
        uid: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Profile>, RepositoryError>> + Send;

    /// Delete one profile owned by `uid`. `NotFound` when the pid is missing
    /// or belongs to another user.
    fn delete(
        &self,
        uid: &str,
        pid: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Conditionally replace content: applies only while the stored content
    /// still equals `content_before`. `Conflict` on mismatch, `NotFound`
    /// when the pid is missing, the updated profile on success.
    fn update_content(
        &self,
        uid: &str,
        pid: &str,
        content_before: &str,
        content_after: &str,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;

    /// Set `is_confirmed = 1` and return the resulting profile. Idempotent:
    /// confirming an already-confirmed profile is a no-op returning the same
    /// terminal state.
    fn confirm(
        &self,
        uid: &str,
        pid: &str,
    ) -> impl std::future::Future<Output = Result<Profile, RepositoryError>> + Send;
}
