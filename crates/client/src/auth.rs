//! Login, logout, and profile endpoints.
//!
//! Token refresh is not here: it belongs to the transport's 401
//! recovery path and runs on the retry-free executor.

use std::time::{SystemTime, UNIX_EPOCH};

use bento_core::CredentialRecord;
use serde::Deserialize;

use crate::error::ClientError;
use crate::transport::Transport;

/// Token object returned by `/auth/token` and `/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds, when the server reports one.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert into a credential record, carrying over the previous
    /// refresh token when the response omits one.
    pub fn into_record(self, previous_refresh: Option<&str>) -> CredentialRecord {
        let mut record = CredentialRecord::new(self.access_token);
        record.refresh_token = self
            .refresh_token
            .or_else(|| previous_refresh.map(|s| s.to_string()));
        if let Some(token_type) = self.token_type {
            record.token_type = token_type;
        }
        record.expires_at = self.expires_in.map(|secs| now_unix() + secs);
        record
    }
}

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Auth endpoints over an authenticated transport.
pub struct AuthApi<'a> {
    transport: &'a Transport,
}

impl<'a> AuthApi<'a> {
    pub fn new(transport: &'a Transport) -> Self {
        AuthApi { transport }
    }

    /// Password-grant login. On success the credential record is stored
    /// and returned; any previously stored session is replaced.
    ///
    /// A 401 here surfaces as an API error rather than a refresh
    /// attempt, because no credential record backs the request yet.
    pub fn login(&self, username: &str, password: &str) -> Result<CredentialRecord, ClientError> {
        let token: TokenResponse = self.transport.post_form(
            "/auth/token",
            &[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ],
        )?;
        let record = token.into_record(None);
        self.transport.session().store(&record)?;
        Ok(record)
    }

    /// Fetch the caller's profile and cache it beside the credentials.
    pub fn fetch_profile(&self) -> Result<serde_json::Value, ClientError> {
        let profile: serde_json::Value = self.transport.get_json("/users/me")?;
        self.transport.session().store_profile(&profile)?;
        Ok(profile)
    }

    /// The cached profile from the last `fetch_profile`, if any.
    pub fn cached_profile(&self) -> Result<Option<serde_json::Value>, ClientError> {
        Ok(self.transport.session().load_profile()?)
    }

    /// Local logout: delete the credential record and the cached
    /// profile together. No server call is made.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.transport.session().clear()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_keeps_previous_refresh_when_omitted() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"fresh"}"#).unwrap();
        let record = token.into_record(Some("ref-old"));
        assert_eq!(record.access_token, "fresh");
        assert_eq!(record.refresh_token.as_deref(), Some("ref-old"));
        assert_eq!(record.token_type, "bearer");
    }

    #[test]
    fn token_response_prefers_its_own_refresh_token() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"fresh","refresh_token":"ref-new"}"#)
                .unwrap();
        let record = token.into_record(Some("ref-old"));
        assert_eq!(record.refresh_token.as_deref(), Some("ref-new"));
    }

    #[test]
    fn expires_in_becomes_an_absolute_expiry() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","expires_in":3600}"#).unwrap();
        let before = now_unix();
        let record = token.into_record(None);
        let expires_at = record.expires_at.unwrap();
        assert!(expires_at >= before + 3600);
        assert!(expires_at <= now_unix() + 3600);
    }

    #[test]
    fn login_without_remember_me_cannot_refresh() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","token_type":"bearer"}"#).unwrap();
        let record = token.into_record(None);
        assert!(!record.can_refresh());
    }
}
