// Static code exchange for tests.
//
// Answers from a table of (provider, code) -> profile JSON. Issued tokens
// encode the pair they were minted for, so `fetch_profile` can look the
// profile back up without shared mutable state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use social_auth_core::{Result, SocialAuthError};
use social_auth_oauth2::{AccessToken, CodeExchange, CodeExchangeRequest, ProfileRequest};

const TOKEN_PREFIX: &str = "static";

/// A `CodeExchange` backed by canned profiles.
#[derive(Debug, Default)]
pub struct StaticCodeExchange {
    profiles: HashMap<(String, String), serde_json::Value>,
    unreachable: bool,
    exchanges: AtomicUsize,
}

impl StaticCodeExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `code` for `provider` and answer with `profile`.
    pub fn with_profile(
        mut self,
        provider: impl Into<String>,
        code: impl Into<String>,
        profile: serde_json::Value,
    ) -> Self {
        self.profiles.insert((provider.into(), code.into()), profile);
        self
    }

    /// Fail every exchange as if the provider were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Number of `exchange_code` calls made so far.
    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeExchange for StaticCodeExchange {
    async fn exchange_code(&self, request: &CodeExchangeRequest<'_>) -> Result<AccessToken> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(anyhow::anyhow!("connection refused: {}", request.token_endpoint).into());
        }

        let key = (request.provider.to_string(), request.code.to_string());
        if !self.profiles.contains_key(&key) {
            tracing::debug!(provider = request.provider, "rejecting unknown code");
            return Err(SocialAuthError::exchange_failed(
                request.provider,
                "invalid_grant",
            ));
        }

        Ok(
            AccessToken::new(format!("{TOKEN_PREFIX}:{}:{}", request.provider, request.code))
                .with_expiry(Utc::now() + Duration::seconds(3600)),
        )
    }

    async fn fetch_profile(&self, request: &ProfileRequest<'_>) -> Result<serde_json::Value> {
        let mut parts = request.token.access_token.splitn(3, ':');
        let (Some(TOKEN_PREFIX), Some(provider), Some(code)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(SocialAuthError::exchange_failed(
                request.provider,
                "unrecognized access token",
            ));
        };

        self.profiles
            .get(&(provider.to_string(), code.to_string()))
            .cloned()
            .ok_or_else(|| SocialAuthError::exchange_failed(request.provider, "invalid_token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles;

    fn request<'a>(provider: &'a str, code: &'a str) -> CodeExchangeRequest<'a> {
        CodeExchangeRequest {
            provider,
            token_endpoint: "https://example.test/token",
            client_id: "id",
            client_secret: "secret",
            code,
            redirect_uri: "https://app.test/callback",
        }
    }

    #[tokio::test]
    async fn test_known_code_round_trips_profile() {
        let exchange = StaticCodeExchange::new().with_profile(
            "google",
            "good",
            profiles::google("sub-1", "a@example.com"),
        );

        let token = exchange.exchange_code(&request("google", "good")).await.unwrap();
        assert!(!token.is_expired());

        let profile = exchange
            .fetch_profile(&ProfileRequest {
                provider: "google",
                userinfo_endpoint: "https://example.test/userinfo",
                token: &token,
            })
            .await
            .unwrap();
        assert_eq!(profile["sub"], "sub-1");
        assert_eq!(exchange.exchange_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_code_is_rejected() {
        let exchange = StaticCodeExchange::new();
        let err = exchange.exchange_code(&request("github", "bad")).await.unwrap_err();
        assert!(matches!(err, SocialAuthError::ExchangeFailed { .. }));
    }

    #[tokio::test]
    async fn test_codes_are_scoped_to_provider() {
        let exchange = StaticCodeExchange::new().with_profile(
            "github",
            "shared",
            profiles::github(1, "gh@example.com"),
        );
        assert!(exchange.exchange_code(&request("google", "shared")).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable() {
        let exchange = StaticCodeExchange::unreachable();
        let err = exchange.exchange_code(&request("google", "any")).await.unwrap_err();
        assert!(matches!(err, SocialAuthError::Other(_)));
        assert_eq!(exchange.exchange_count(), 1);
    }
}
