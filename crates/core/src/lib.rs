//! Core data model for the Bento reporting client.
//!
//! These types are shared by the session store, the HTTP client, and the
//! CLI. Nothing here performs I/O: report identities, workflow statuses,
//! credential records, and the wire shapes exchanged with the Central
//! Server are plain serde types plus the local validation that must run
//! before any request is built.

mod credentials;
mod error;
mod report;
mod status;
mod wire;

pub use credentials::CredentialRecord;
pub use error::CoreError;
pub use report::{ReportId, ReportKind};
pub use status::ReportStatus;
pub use wire::{StatusChangeRequest, TransitionsResult};
