//! Report workflow endpoints.
//!
//! [`ReportsBackend`] is the seam between the status controller and the
//! network: the controller is written against the trait, the transport
//! implements it over HTTP, and tests substitute scripted fakes.

use bento_core::{ReportId, StatusChangeRequest, TransitionsResult};

use crate::error::ClientError;
use crate::transport::Transport;

/// The two server operations the status workflow needs.
pub trait ReportsBackend {
    /// Ask the server which transitions the calling user may perform on
    /// this report. The answer is role-dependent and must not be cached
    /// across menu interactions.
    fn valid_transitions(&self, report: &ReportId) -> Result<TransitionsResult, ClientError>;

    /// Move the report to a new status. The server enforces the
    /// transition graph; the client never pre-validates the target
    /// beyond membership in the last fetched transition list.
    fn change_status(
        &self,
        report: &ReportId,
        change: &StatusChangeRequest,
    ) -> Result<(), ClientError>;
}

/// HTTP implementation of [`ReportsBackend`].
pub struct ReportsApi<'a> {
    transport: &'a Transport,
}

impl<'a> ReportsApi<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        ReportsApi { transport }
    }
}

impl ReportsBackend for ReportsApi<'_> {
    fn valid_transitions(&self, report: &ReportId) -> Result<TransitionsResult, ClientError> {
        // path_segments() raises MissingCategory before any network call
        let segments = report.path_segments()?;
        self.transport
            .get_json(&format!("/reports/{}/valid-transitions", segments))
    }

    fn change_status(
        &self,
        report: &ReportId,
        change: &StatusChangeRequest,
    ) -> Result<(), ClientError> {
        let segments = report.path_segments()?;
        self.transport
            .patch_json(&format!("/reports/{}/status", segments), change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bento_core::{CoreError, ReportKind, ReportStatus};
    use bento_session::MemorySessionStore;

    fn transport() -> Transport {
        let store: Arc<dyn bento_session::SessionStore> = Arc::new(MemorySessionStore::new());
        Transport::new("https://bento.test", store)
    }

    #[test]
    fn liquidation_without_category_short_circuits_before_any_request() {
        // The transport points at an unroutable host; reaching the
        // network would fail with a different error kind.
        let t = transport();
        let api = ReportsApi::new(&t);
        let id = ReportId::new(ReportKind::Liquidation, 9, 2025, 3);

        match api.valid_transitions(&id) {
            Err(ClientError::Precondition(CoreError::MissingCategory)) => {}
            other => panic!("expected MissingCategory, got {:?}", other.map(|_| ())),
        }

        let change = StatusChangeRequest {
            new_status: ReportStatus::Review,
            comments: None,
        };
        match api.change_status(&id, &change) {
            Err(ClientError::Precondition(CoreError::MissingCategory)) => {}
            other => panic!("expected MissingCategory, got {:?}", other),
        }
    }
}
