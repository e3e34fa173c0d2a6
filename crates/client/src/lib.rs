//! HTTP client layer for the Bento reporting workflow.
//!
//! Two cooperating pieces live here:
//!
//! - [`Transport`]: the authenticated request path. Attaches the bearer
//!   token from an injected [`bento_session::SessionStore`], applies a
//!   bounded retry policy to idempotent requests, and on a 401 performs
//!   at most one token refresh (on a structurally retry-free client)
//!   before terminating the session.
//! - [`StatusController`]: the per-report state machine driving the
//!   status-change flow. The set of legal transitions is always fetched
//!   from the Central Server; the transition graph is never encoded
//!   client-side.

mod auth;
mod controller;
mod error;
mod reports;
mod transport;

pub use auth::AuthApi;
pub use controller::{ControllerState, MenuOutcome, StatusController};
pub use error::ClientError;
pub use reports::{ReportsApi, ReportsBackend};
pub use transport::{Method, RetryPolicy, Transport, RETRYABLE_STATUSES};
