//! User profile types.
//!
//! A profile is a durable, user-owned text artifact with a confirmation
//! flag, managed independently of the task lifecycle. Direct profile
//! operations are synchronous -- they never go through the task registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to a profile entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Session the profile was created under, if any.
    #[serde(default)]
    pub session_id: Option<String>,
    /// Confirmation flag, encoded 0/1 on the wire. Monotonic: moves 0 -> 1
    /// via confirm and is never pushed back by the documented surface.
    pub is_confirmed: u8,
}

/// A user-owned profile entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifier assigned at creation. Immutable.
    pub pid: String,
    /// Owning user. Immutable; no cross-user visibility.
    pub uid: String,
    /// Text payload, mutable only via the update operation.
    pub content: String,
    pub metadata: ProfileMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a new unconfirmed profile with a fresh time-sortable pid.
    pub fn new(uid: &str, content: &str, session_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            pid: Uuid::now_v7().to_string(),
            uid: uid.to_string(),
            content: content.to_string(),
            metadata: ProfileMetadata {
                session_id,
                is_confirmed: 0,
            },
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request body for `direct_add_profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddProfileRequest {
    pub content: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Request body for `direct_update_profile`.
///
/// The update is optimistic: it only applies when the stored content still
/// equals `content_before`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub content_before: String,
    pub content_after: String,
}
