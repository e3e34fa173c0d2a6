use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Workflow status of a report.
///
/// The transition graph between statuses is owned by the Central Server;
/// the client never decides which transitions are legal. This enum only
/// names the states so they can be displayed, compared, and sent back
/// verbatim in status-change requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Review,
    Approved,
    Rejected,
    Received,
    Archived,
}

impl ReportStatus {
    /// Wire name of the status, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Review => "review",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Received => "received",
            ReportStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(ReportStatus::Draft),
            "review" => Ok(ReportStatus::Review),
            "approved" => Ok(ReportStatus::Approved),
            "rejected" => Ok(ReportStatus::Rejected),
            "received" => Ok(ReportStatus::Received),
            "archived" => Ok(ReportStatus::Archived),
            other => Err(CoreError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}
