//! SQLite profile repository implementation.
//!
//! Implements `ProfileRepository` from `mnemon-core` using sqlx with the
//! split read/write pools: raw queries, a private Row struct for
//! SQLite-to-domain mapping, reads on the reader pool, mutations on the
//! writer. The optimistic content check runs as a single conditional UPDATE
//! so two racing updaters can never both win.

use chrono::{DateTime, Utc};
use sqlx::Row;

use mnemon_core::profile::ProfileRepository;
use mnemon_types::error::RepositoryError;
use mnemon_types::profile::{Profile, ProfileMetadata};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, uid: &str, pid: &str) -> Result<Profile, RepositoryError> {
        let row = sqlx::query(
            "SELECT pid, uid, content, session_id, is_confirmed, created_at, updated_at
             FROM profiles WHERE pid = ? AND uid = ?",
        )
        .bind(pid)
        .bind(uid)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        ProfileRow::from_row(&row)
            .map_err(|e| RepositoryError::Query(e.to_string()))?
            .into_profile()
    }
}

/// Internal row type for mapping SQLite rows to the domain Profile.
struct ProfileRow {
    pid: String,
    uid: String,
    content: String,
    session_id: Option<String>,
    is_confirmed: i64,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            pid: row.try_get("pid")?,
            uid: row.try_get("uid")?,
            content: row.try_get("content")?,
            session_id: row.try_get("session_id")?,
            is_confirmed: row.try_get("is_confirmed")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_profile(self) -> Result<Profile, RepositoryError> {
        Ok(Profile {
            pid: self.pid,
            uid: self.uid,
            content: self.content,
            metadata: ProfileMetadata {
                session_id: self.session_id,
                is_confirmed: if self.is_confirmed != 0 { 1 } else { 0 },
            },
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid timestamp '{s}': {e}")))
}

impl ProfileRepository for SqliteProfileRepository {
    async fn insert(&self, profile: &Profile) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO profiles (pid, uid, content, session_id, is_confirmed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&profile.pid)
        .bind(&profile.uid)
        .bind(&profile.content)
        .bind(&profile.metadata.session_id)
        .bind(profile.metadata.is_confirmed as i64)
        .bind(profile.created_at.to_rfc3339())
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, uid: &str, pid: &str) -> Result<Profile, RepositoryError> {
        self.fetch(uid, pid).await
    }

    async fn list(&self, uid: &str) -> Result<Vec<Profile>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT pid, uid, content, session_id, is_confirmed, created_at, updated_at
             FROM profiles WHERE uid = ? ORDER BY created_at ASC",
        )
        .bind(uid)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ProfileRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_profile()
            })
            .collect()
    }

    async fn delete(&self, uid: &str, pid: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM profiles WHERE pid = ? AND uid = ?")
            .bind(pid)
            .bind(uid)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn update_content(
        &self,
        uid: &str,
        pid: &str,
        content_before: &str,
        content_after: &str,
    ) -> Result<Profile, RepositoryError> {
        let result = sqlx::query(
            "UPDATE profiles SET content = ?, updated_at = ?
             WHERE pid = ? AND uid = ? AND content = ?",
        )
        .bind(content_after)
        .bind(Utc::now().to_rfc3339())
        .bind(pid)
        .bind(uid)
        .bind(content_before)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Distinguish a missing pid from a lost optimistic race.
            return match self.fetch(uid, pid).await {
                Ok(_) => Err(RepositoryError::Conflict(format!(
                    "content of profile '{pid}' no longer matches"
                ))),
                Err(e) => Err(e),
            };
        }
        self.fetch(uid, pid).await
    }

    async fn confirm(&self, uid: &str, pid: &str) -> Result<Profile, RepositoryError> {
        let result = sqlx::query(
            "UPDATE profiles SET is_confirmed = 1, updated_at = ? WHERE pid = ? AND uid = ?",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(pid)
        .bind(uid)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.fetch(uid, pid).await
    }
}
