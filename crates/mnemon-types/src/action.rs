//! Action records: tagged user-interaction events.
//!
//! An [`ActionRecord`] arrives over the wire with a closed `action_type` tag
//! (a legacy `action` alias is still accepted) and a tag-dependent `data`
//! payload. The payload shapes form a sum type ([`ActionPayload`]); missing
//! payload fields degrade to `null` rather than failing -- only the tag
//! itself is validated against the closed set.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;

/// Closed set of recognized action tags.
///
/// Wire names are uppercase (`LIKE`, `TASK_STOP`, ...). `TaskStop` is the
/// only tag routed to the tool-memory destination; every other tag carries
/// user-profiling data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Like,
    Dislike,
    Favorite,
    Query,
    FollowUp,
    Edit,
    Operation,
    RoadmapEdit,
    TaskStop,
}

impl ActionType {
    /// The payload shape this tag's `data` field is decoded against.
    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            ActionType::Like | ActionType::Dislike | ActionType::Favorite => PayloadKind::Change,
            ActionType::Query | ActionType::FollowUp => PayloadKind::Query,
            ActionType::Edit | ActionType::Operation => PayloadKind::Operation,
            ActionType::RoadmapEdit => PayloadKind::Roadmap,
            ActionType::TaskStop => PayloadKind::Free,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::Like => "LIKE",
            ActionType::Dislike => "DISLIKE",
            ActionType::Favorite => "FAVORITE",
            ActionType::Query => "QUERY",
            ActionType::FollowUp => "FOLLOW_UP",
            ActionType::Edit => "EDIT",
            ActionType::Operation => "OPERATION",
            ActionType::RoadmapEdit => "ROADMAP_EDIT",
            ActionType::TaskStop => "TASK_STOP",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ActionType {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LIKE" => Ok(ActionType::Like),
            "DISLIKE" => Ok(ActionType::Dislike),
            "FAVORITE" => Ok(ActionType::Favorite),
            "QUERY" => Ok(ActionType::Query),
            "FOLLOW_UP" => Ok(ActionType::FollowUp),
            "EDIT" => Ok(ActionType::Edit),
            "OPERATION" => Ok(ActionType::Operation),
            "ROADMAP_EDIT" => Ok(ActionType::RoadmapEdit),
            "TASK_STOP" => Ok(ActionType::TaskStop),
            other => Err(ActionError::InvalidActionType(other.to_string())),
        }
    }
}

/// Which payload shape a tag's `data` decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Change,
    Query,
    Operation,
    Roadmap,
    /// No fixed schema (TASK_STOP); the payload is stored verbatim.
    Free,
}

/// An inbound user-interaction event, as received at the system boundary.
///
/// `action_type` and the legacy `action` alias are both accepted here; the
/// dispatcher normalizes them into one canonical tag before routing. Every
/// field except `uid` is optional on the wire -- absent keys are never
/// assumed to exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Legacy alias for `action_type`; normalized away at dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_time: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ActionRecord {
    /// The canonical tag string: `action_type` wins over the legacy alias.
    pub fn tag(&self) -> Option<&str> {
        self.action_type.as_deref().or(self.action.as_deref())
    }
}

/// Before/after state change carried by feedback and favorite tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(default)]
    pub previous: serde_json::Value,
    #[serde(default)]
    pub current: serde_json::Value,
}

/// Free-text query carried by conversational tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    #[serde(default)]
    pub query: Option<String>,
}

/// Structured edit carried by edit/operation tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    #[serde(default)]
    pub operation_type: Option<String>,
    #[serde(default)]
    pub operation_data: serde_json::Value,
}

/// Roadmap content change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Decoded, tag-dependent action payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionPayload {
    Change(ChangeRecord),
    Query(QueryRecord),
    Operation(OperationRecord),
    Roadmap(Roadmap),
    /// Verbatim payload for tags with no fixed schema.
    Free { data: serde_json::Value },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_type_roundtrip() {
        for tag in [
            ActionType::Like,
            ActionType::Dislike,
            ActionType::Favorite,
            ActionType::Query,
            ActionType::FollowUp,
            ActionType::Edit,
            ActionType::Operation,
            ActionType::RoadmapEdit,
            ActionType::TaskStop,
        ] {
            let s = tag.to_string();
            let parsed: ActionType = s.parse().unwrap();
            assert_eq!(tag, parsed);
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = "SHRUG".parse::<ActionType>().unwrap_err();
        assert!(err.to_string().contains("SHRUG"));
    }

    #[test]
    fn test_legacy_alias_wins_only_when_action_type_absent() {
        let record: ActionRecord = serde_json::from_value(json!({
            "uid": "u1",
            "action": "LIKE",
        }))
        .unwrap();
        assert_eq!(record.tag(), Some("LIKE"));

        let record: ActionRecord = serde_json::from_value(json!({
            "uid": "u1",
            "action": "DISLIKE",
            "action_type": "LIKE",
        }))
        .unwrap();
        assert_eq!(record.tag(), Some("LIKE"));
    }

    #[test]
    fn test_change_record_missing_fields_degrade_to_null() {
        let change: ChangeRecord = serde_json::from_value(json!({"current": 1})).unwrap();
        assert_eq!(change.previous, serde_json::Value::Null);
        assert_eq!(change.current, json!(1));
    }

    #[test]
    fn test_payload_kind_table() {
        assert_eq!(ActionType::Like.payload_kind(), PayloadKind::Change);
        assert_eq!(ActionType::Query.payload_kind(), PayloadKind::Query);
        assert_eq!(ActionType::Edit.payload_kind(), PayloadKind::Operation);
        assert_eq!(ActionType::RoadmapEdit.payload_kind(), PayloadKind::Roadmap);
        assert_eq!(ActionType::TaskStop.payload_kind(), PayloadKind::Free);
    }

    #[test]
    fn test_action_type_serde_wire_names() {
        let json = serde_json::to_string(&ActionType::TaskStop).unwrap();
        assert_eq!(json, "\"TASK_STOP\"");
        let json = serde_json::to_string(&ActionType::FollowUp).unwrap();
        assert_eq!(json, "\"FOLLOW_UP\"");
    }
}
