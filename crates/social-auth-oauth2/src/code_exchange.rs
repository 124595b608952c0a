// Code exchange contract.
//
// The two provider round trips behind a callback: trade the authorization
// code for an access token at the token endpoint, then fetch the user's
// profile with that token. Implementations own transport concerns
// (HTTP client, timeouts, retries); providers only map the results.

use std::fmt;

use async_trait::async_trait;
use social_auth_core::Result;

use crate::tokens::AccessToken;

/// Everything a token endpoint needs to redeem an authorization code.
#[derive(Clone, Copy)]
pub struct CodeExchangeRequest<'a> {
    /// Provider name (e.g. "google").
    pub provider: &'a str,
    pub token_endpoint: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    /// The authorization code from the callback.
    pub code: &'a str,
    /// Must match the redirect URI used in the authorization request.
    pub redirect_uri: &'a str,
}

impl fmt::Debug for CodeExchangeRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeExchangeRequest")
            .field("provider", &self.provider)
            .field("token_endpoint", &self.token_endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("code", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// A profile fetch with a freshly exchanged token.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRequest<'a> {
    pub provider: &'a str,
    pub userinfo_endpoint: &'a str,
    pub token: &'a AccessToken,
}

/// Performs the token and profile round trips for a provider.
///
/// Errors of any kind are reported to the caller as `ExchangeFailed` by
/// the provider; implementations may return whichever variant describes
/// the cause best.
#[async_trait]
pub trait CodeExchange: Send + Sync + fmt::Debug {
    /// Redeem an authorization code for an access token.
    async fn exchange_code(&self, request: &CodeExchangeRequest<'_>) -> Result<AccessToken>;

    /// Fetch the raw profile JSON of the token's owner.
    async fn fetch_profile(&self, request: &ProfileRequest<'_>) -> Result<serde_json::Value>;
}
