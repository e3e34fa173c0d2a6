use serde::{Deserialize, Serialize};

fn default_token_type() -> String {
    "bearer".to_string()
}

/// The token material persisted between runs.
///
/// Created on login, replaced wholesale on refresh, deleted on logout.
/// If `refresh_token` is absent the session is not remember-me: a failed
/// access token cannot be silently renewed and the session must be
/// terminated instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Unix-seconds expiry of the access token, when the server reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl CredentialRecord {
    pub fn new(access_token: impl Into<String>) -> Self {
        CredentialRecord {
            access_token: access_token.into(),
            refresh_token: None,
            token_type: default_token_type(),
            expires_at: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Whether the session can be silently renewed after a 401.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Whether the access token is past its reported expiry.
    ///
    /// Advisory only: the client refreshes on 401, not proactively, so
    /// this is display metadata rather than control flow.
    pub fn is_expired(&self, now_unix: i64) -> bool {
        matches!(self.expires_at, Some(at) if at <= now_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trips_through_json() {
        let record = CredentialRecord::new("tok-abc").with_refresh_token("ref-xyz");
        let json = serde_json::to_string(&record).unwrap();
        let back: CredentialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.can_refresh());
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let back: CredentialRecord = serde_json::from_str(r#"{"access_token":"t"}"#).unwrap();
        assert_eq!(back.token_type, "bearer");
        assert!(!back.can_refresh());
        assert!(back.refresh_token.is_none());
    }

    #[test]
    fn absent_refresh_token_is_omitted_not_null() {
        let record = CredentialRecord::new("t");
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn expiry_is_advisory_metadata() {
        let mut record = CredentialRecord::new("t");
        assert!(!record.is_expired(1_700_000_000));
        record.expires_at = Some(1_700_000_000);
        assert!(record.is_expired(1_700_000_000));
        assert!(!record.is_expired(1_699_999_999));
    }
}
