use bento_core::CredentialRecord;

use crate::error::SessionError;

/// Persistent session state shared by every outbound request.
///
/// This is the one cross-component shared mutable resource in the
/// client: login, refresh, and logout write it; every request's
/// before-send hook reads it. There is no locking discipline beyond
/// what an implementation provides internally; semantics are
/// last-writer-wins, and a refresh racing a logout is not defended
/// against.
///
/// Two records live in the store and are cleared together on logout:
/// the [`CredentialRecord`] and an opaque cached user-profile blob.
///
/// Implementations must be `Send + Sync` so a single store can be
/// shared behind an `Arc` by the transport and the CLI.
pub trait SessionStore: Send + Sync {
    /// Read the credential record, if a session exists.
    fn load(&self) -> Result<Option<CredentialRecord>, SessionError>;

    /// Replace the credential record wholesale.
    fn store(&self, record: &CredentialRecord) -> Result<(), SessionError>;

    /// Read the cached user profile, if one was stored.
    fn load_profile(&self) -> Result<Option<serde_json::Value>, SessionError>;

    /// Replace the cached user profile.
    fn store_profile(&self, profile: &serde_json::Value) -> Result<(), SessionError>;

    /// Delete both the credential record and the cached profile.
    fn clear(&self) -> Result<(), SessionError>;
}
