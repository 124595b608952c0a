// Access token returned by a provider's token endpoint.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of exchanging an authorization code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Token endpoint response (snake_case wire format).
#[derive(Debug, Deserialize)]
struct RawTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: None,
            expires_at: None,
            scopes: Vec::new(),
        }
    }

    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    /// Parse a raw token endpoint JSON response.
    ///
    /// Returns `None` when the response carries no `access_token` (e.g. an
    /// `{"error": "invalid_grant"}` body). Scopes may be space- or
    /// comma-separated (GitHub uses commas).
    pub fn from_raw(data: &serde_json::Value) -> Option<Self> {
        let raw: RawTokenResponse = serde_json::from_value(data.clone()).ok()?;
        let access_token = raw.access_token.filter(|t| !t.is_empty())?;

        // An `expires_in` too large for a timestamp is treated as no expiry.
        let expires_at = raw.expires_in.and_then(|secs| {
            chrono::Duration::try_seconds(secs).and_then(|d| Utc::now().checked_add_signed(d))
        });

        let scopes = raw
            .scope
            .map(|s| {
                s.split([' ', ','])
                    .filter(|part| !part.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            access_token,
            token_type: raw.token_type,
            expires_at,
            scopes,
        })
    }

    /// A token without an expiry never expires.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let raw = serde_json::json!({
            "access_token": "ya29.abc",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "openid email profile",
            "id_token": "ey.jwt.token"
        });

        let token = AccessToken::from_raw(&raw).unwrap();
        assert_eq!(token.access_token, "ya29.abc");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.scopes, vec!["openid", "email", "profile"]);
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_parse_github_scopes() {
        let raw = serde_json::json!({
            "access_token": "gho_123",
            "token_type": "bearer",
            "scope": "read:user,user:email"
        });

        let token = AccessToken::from_raw(&raw).unwrap();
        assert_eq!(token.scopes, vec!["read:user", "user:email"]);
        assert!(token.expires_at.is_none());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_error_response_has_no_token() {
        let raw = serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad verification code."
        });
        assert!(AccessToken::from_raw(&raw).is_none());
    }

    #[test]
    fn test_out_of_range_expires_in() {
        for secs in [i64::MAX, i64::MIN] {
            let raw = serde_json::json!({ "access_token": "t", "expires_in": secs });
            let token = AccessToken::from_raw(&raw).unwrap();
            assert_eq!(token.access_token, "t");
            assert!(token.expires_at.is_none());
            assert!(!token.is_expired());
        }
    }

    #[test]
    fn test_expired_token() {
        let past = Utc::now() - chrono::Duration::seconds(5);
        let token = AccessToken::new("t").with_expiry(past);
        assert!(token.is_expired());
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = AccessToken::new("very-secret-token");
        assert!(!format!("{token:?}").contains("very-secret-token"));
    }
}
