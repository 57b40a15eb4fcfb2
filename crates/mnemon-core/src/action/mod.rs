//! Action dispatcher: classify, validate, and route one action record.
//!
//! Stateless. Normalizes the legacy `action` alias into the canonical tag,
//! rejects tags outside the closed set, decodes the tag's payload shape, and
//! selects the destination namespace: `TASK_STOP` goes to tool memory,
//! everything else to the user-profiling path.

use mnemon_types::action::{
    ActionPayload, ActionRecord, ActionType, ChangeRecord, OperationRecord, PayloadKind,
    QueryRecord, Roadmap,
};
use mnemon_types::error::ActionError;

/// Where a dispatched action record is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchRoute {
    /// User-profiling memory path, with the tag-specific payload shape.
    Profiling {
        action: ActionType,
        payload: ActionPayload,
    },
    /// Tool-memory path; the payload is carried verbatim.
    ToolMemory { payload: serde_json::Value },
}

/// Classify and route a single action record.
///
/// Payload validation is deliberately lenient: missing fields degrade to
/// `null` (never assume a key exists), but the tag itself must be one of the
/// closed set.
pub fn dispatch(record: &ActionRecord) -> Result<DispatchRoute, ActionError> {
    let tag = record.tag().ok_or(ActionError::MissingTag)?;
    let action: ActionType = tag.parse()?;

    if action == ActionType::TaskStop {
        return Ok(DispatchRoute::ToolMemory {
            payload: record.data.clone(),
        });
    }

    Ok(DispatchRoute::Profiling {
        action,
        payload: decode_payload(action, &record.data),
    })
}

/// Decode `data` against the tag's payload shape.
///
/// A payload that does not deserialize (wrong type, not an object) falls
/// back to the shape's all-null default rather than failing dispatch.
fn decode_payload(action: ActionType, data: &serde_json::Value) -> ActionPayload {
    match action.payload_kind() {
        PayloadKind::Change => ActionPayload::Change(
            serde_json::from_value::<ChangeRecord>(data.clone()).unwrap_or_default(),
        ),
        PayloadKind::Query => ActionPayload::Query(
            serde_json::from_value::<QueryRecord>(data.clone()).unwrap_or_default(),
        ),
        PayloadKind::Operation => ActionPayload::Operation(
            serde_json::from_value::<OperationRecord>(data.clone()).unwrap_or_default(),
        ),
        PayloadKind::Roadmap => ActionPayload::Roadmap(
            serde_json::from_value::<Roadmap>(data.clone()).unwrap_or_default(),
        ),
        PayloadKind::Free => ActionPayload::Free { data: data.clone() },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(tag: Option<&str>, legacy: Option<&str>, data: serde_json::Value) -> ActionRecord {
        ActionRecord {
            uid: "u1".to_string(),
            session_id: Some("s1".to_string()),
            action_type: tag.map(str::to_string),
            action: legacy.map(str::to_string),
            message_id: Some("m1".to_string()),
            reference_time: None,
            data,
        }
    }

    #[test]
    fn like_routes_to_profiling_with_change_payload() {
        let route = dispatch(&record(
            Some("LIKE"),
            None,
            json!({"previous": 0, "current": 1}),
        ))
        .unwrap();

        match route {
            DispatchRoute::Profiling { action, payload } => {
                assert_eq!(action, ActionType::Like);
                assert_eq!(
                    payload,
                    ActionPayload::Change(ChangeRecord {
                        previous: json!(0),
                        current: json!(1),
                    })
                );
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn task_stop_routes_to_tool_memory() {
        let data = json!({"anything": ["goes", 1]});
        let route = dispatch(&record(Some("TASK_STOP"), None, data.clone())).unwrap();
        assert_eq!(route, DispatchRoute::ToolMemory { payload: data });
    }

    #[test]
    fn legacy_action_field_is_normalized() {
        let route = dispatch(&record(None, Some("QUERY"), json!({"query": "rust"}))).unwrap();
        match route {
            DispatchRoute::Profiling { action, payload } => {
                assert_eq!(action, ActionType::Query);
                assert_eq!(
                    payload,
                    ActionPayload::Query(QueryRecord {
                        query: Some("rust".to_string()),
                    })
                );
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_invalid_action_type() {
        let err = dispatch(&record(Some("WAVE"), None, json!({}))).unwrap_err();
        assert!(matches!(err, ActionError::InvalidActionType(_)));
    }

    #[test]
    fn missing_tag_is_rejected() {
        let err = dispatch(&record(None, None, json!({}))).unwrap_err();
        assert!(matches!(err, ActionError::MissingTag));
    }

    #[test]
    fn missing_change_fields_degrade_to_null() {
        let route = dispatch(&record(Some("FAVORITE"), None, json!({}))).unwrap();
        match route {
            DispatchRoute::Profiling { payload, .. } => {
                assert_eq!(payload, ActionPayload::Change(ChangeRecord::default()));
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn non_object_payload_falls_back_to_default_shape() {
        let route = dispatch(&record(Some("EDIT"), None, json!("not an object"))).unwrap();
        match route {
            DispatchRoute::Profiling { payload, .. } => {
                assert_eq!(payload, ActionPayload::Operation(OperationRecord::default()));
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }

    #[test]
    fn roadmap_edit_decodes_content_and_metadata() {
        let route = dispatch(&record(
            Some("ROADMAP_EDIT"),
            None,
            json!({"content": "Q3 plan", "metadata": {"version": 2}}),
        ))
        .unwrap();
        match route {
            DispatchRoute::Profiling { payload, .. } => {
                assert_eq!(
                    payload,
                    ActionPayload::Roadmap(Roadmap {
                        content: Some("Q3 plan".to_string()),
                        metadata: json!({"version": 2}),
                    })
                );
            }
            other => panic!("unexpected route: {other:?}"),
        }
    }
}
