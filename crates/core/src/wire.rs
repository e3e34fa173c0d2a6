//! Wire shapes for the status workflow endpoints.

use serde::{Deserialize, Serialize};

use crate::status::ReportStatus;

/// Response of the valid-transitions endpoint.
///
/// Ephemeral: fetched per menu interaction and never cached across
/// interactions, so the client cannot act on stale permissions. The
/// `valid_transitions` list is kept in server order; ordering may encode
/// server-side priority and must not be re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionsResult {
    /// The report's current status as the server sees it.
    pub current_status: ReportStatus,
    /// Statuses the calling user may move the report to next.
    pub valid_transitions: Vec<ReportStatus>,
    /// The caller's effective role name.
    pub role: String,
}

/// Body of the change-status PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub new_status: ReportStatus,
    /// Optional free-text comment; omitted entirely when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_request_serializes_status_and_comment() {
        let body = StatusChangeRequest {
            new_status: ReportStatus::Review,
            comments: Some("ready".to_string()),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"new_status": "review", "comments": "ready"})
        );
    }

    #[test]
    fn change_request_omits_absent_comment() {
        let body = StatusChangeRequest {
            new_status: ReportStatus::Approved,
            comments: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"new_status":"approved"}"#);
    }

    #[test]
    fn transitions_result_deserializes_in_server_order() {
        let raw = r#"{
            "current_status": "review",
            "valid_transitions": ["rejected", "approved"],
            "role": "division_admin"
        }"#;
        let result: TransitionsResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.current_status, ReportStatus::Review);
        assert_eq!(
            result.valid_transitions,
            vec![ReportStatus::Rejected, ReportStatus::Approved]
        );
        assert_eq!(result.role, "division_admin");
    }
}
