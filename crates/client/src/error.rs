use bento_core::{CoreError, ReportStatus};
use bento_session::SessionError;

/// All errors the client layer can surface.
///
/// The taxonomy separates the cases a caller must react to differently:
/// transient transport failures (retried, then [`RetryExhausted`]),
/// a terminated session ([`AuthenticationFailed`] means "log in again"),
/// business rejections carrying the server's detail message ([`Api`]),
/// and local preconditions raised before any network call
/// ([`Precondition`]).
///
/// [`RetryExhausted`]: ClientError::RetryExhausted
/// [`AuthenticationFailed`]: ClientError::AuthenticationFailed
/// [`Api`]: ClientError::Api
/// [`Precondition`]: ClientError::Precondition
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A network-level failure below the HTTP layer, propagated unchanged.
    #[error("network error: {message}")]
    Network { message: String },

    /// A retryable status kept recurring until the retry budget ran out.
    #[error("request failed with status {status} after {attempts} attempts")]
    RetryExhausted { status: u16, attempts: u32 },

    /// The session could not be renewed and has been terminated.
    /// The caller must log in again.
    #[error("authentication failed, session terminated")]
    AuthenticationFailed,

    /// The server rejected the request. `detail` is the server-provided
    /// message when present, otherwise a generic fallback. Never retried.
    #[error("server rejected request (status {status}): {detail}")]
    Api { status: u16, detail: String },

    /// The response body did not parse as the expected shape.
    #[error("could not decode server response: {message}")]
    Decode { message: String },

    /// A controller operation was invoked from the wrong state.
    #[error("{operation} is not valid while {state}")]
    InvalidState {
        operation: &'static str,
        state: String,
    },

    /// The chosen target status was not among the server-offered
    /// transitions.
    #[error("'{target}' is not among the offered transitions")]
    InvalidTransition { target: ReportStatus },

    /// A local precondition failed before any network call was made.
    #[error(transparent)]
    Precondition(#[from] CoreError),

    /// The session store could not be read or written.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ClientError {
    /// True for the one error kind that requires a fresh login.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::AuthenticationFailed)
    }
}
