// The OAuthProvider trait, implemented by every external identity provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use social_auth_core::{Result, SocialUser};

/// Per-request options for the authorization URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUrlOptions {
    /// Opaque CSRF state echoed back by the provider.
    ///
    /// It is only passed through; verifying it on the callback is the
    /// caller's job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationUrlOptions {
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
        }
    }
}

/// An external identity provider (Facebook, Google, GitHub, ...).
#[async_trait]
pub trait OAuthProvider: Send + Sync + std::fmt::Debug {
    /// Stable identifier used as the registry key (e.g. "google").
    fn name(&self) -> &str;

    /// Human-readable provider name.
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Build the URL the user is redirected to for authentication.
    ///
    /// An empty `redirect_uri` falls back to the provider's configured
    /// default.
    fn authorization_url(
        &self,
        redirect_uri: &str,
        options: &AuthorizationUrlOptions,
    ) -> Result<url::Url>;

    /// Exchange an authorization code for the authenticated identity.
    ///
    /// Fails with `ExchangeFailed` when the code is invalid or expired, or
    /// the provider cannot be reached.
    async fn get_user(&self, code: &str, redirect_uri: &str) -> Result<SocialUser>;
}
