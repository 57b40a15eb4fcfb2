//! Profile service: direct, synchronous profile operations.
//!
//! The `direct_*` family bypasses the task registry entirely; every call
//! returns its outcome immediately. Validation happens here, storage and
//! the optimistic-check atomicity live in the repository implementation.

use tracing::debug;

use mnemon_types::error::{ProfileError, RepositoryError};
use mnemon_types::profile::Profile;

use crate::profile::ProfileRepository;

/// Orchestrates the direct profile operations over a repository.
pub struct ProfileService<R: ProfileRepository> {
    repo: R,
}

impl<R: ProfileRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a profile with `is_confirmed = 0`. Blank uid or content is a
    /// validation error.
    pub async fn add(
        &self,
        uid: &str,
        content: &str,
        session_id: Option<String>,
    ) -> Result<Profile, ProfileError> {
        validate_uid(uid)?;
        if content.trim().is_empty() {
            return Err(ProfileError::Validation(
                "content must not be empty".to_string(),
            ));
        }

        let profile = Profile::new(uid, content, session_id);
        self.repo
            .insert(&profile)
            .await
            .map_err(|e| map_repo_error(e, &profile.pid))?;
        debug!(%uid, pid = %profile.pid, "created profile");
        Ok(profile)
    }

    /// Delete one profile. A missing pid, or a pid owned by another user,
    /// is a `NotFound` error rather than a silent no-op.
    pub async fn delete(&self, uid: &str, pid: &str) -> Result<bool, ProfileError> {
        validate_uid(uid)?;
        self.repo
            .delete(uid, pid)
            .await
            .map_err(|e| map_repo_error(e, pid))?;
        debug!(%uid, %pid, "deleted profile");
        Ok(true)
    }

    /// Optimistic content update: applies only while the stored content
    /// still equals `content_before`; a stale `content_before` is a
    /// `Conflict`, protecting user edits from concurrent background
    /// ingestion (and vice versa).
    pub async fn update(
        &self,
        uid: &str,
        pid: &str,
        content_before: &str,
        content_after: &str,
    ) -> Result<Profile, ProfileError> {
        validate_uid(uid)?;
        if content_after.trim().is_empty() {
            return Err(ProfileError::Validation(
                "content_after must not be empty".to_string(),
            ));
        }

        let profile = self
            .repo
            .update_content(uid, pid, content_before, content_after)
            .await
            .map_err(|e| map_repo_error(e, pid))?;
        debug!(%uid, %pid, "updated profile content");
        Ok(profile)
    }

    /// Set the confirmation flag. Idempotent: confirming an
    /// already-confirmed profile returns the same terminal state.
    pub async fn confirm(&self, uid: &str, pid: &str) -> Result<Profile, ProfileError> {
        validate_uid(uid)?;
        let profile = self
            .repo
            .confirm(uid, pid)
            .await
            .map_err(|e| map_repo_error(e, pid))?;
        debug!(%uid, %pid, "confirmed profile");
        Ok(profile)
    }

    /// All profiles for a user, ordered by creation time.
    pub async fn list_all(&self, uid: &str) -> Result<Vec<Profile>, ProfileError> {
        validate_uid(uid)?;
        self.repo.list(uid).await.map_err(|e| map_repo_error(e, ""))
    }
}

fn validate_uid(uid: &str) -> Result<(), ProfileError> {
    if uid.trim().is_empty() {
        return Err(ProfileError::Validation(
            "uid must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn map_repo_error(error: RepositoryError, pid: &str) -> ProfileError {
    match error {
        RepositoryError::NotFound => ProfileError::NotFound,
        RepositoryError::Conflict(_) => ProfileError::Conflict {
            pid: pid.to_string(),
        },
        other => ProfileError::Storage(other.to_string()),
    }
}
