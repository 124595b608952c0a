// Provider registry: Facebook, Google and GitHub as ProviderConfig constants,
// plus the GenericOAuthProvider that implements OAuthProvider from a config.

use std::sync::Arc;

use async_trait::async_trait;
use social_auth_core::{ProviderOptions, Result, SocialAuthError, SocialUser};

use crate::authorization_url::{create_authorization_url, AuthorizationUrlParams};
use crate::code_exchange::{CodeExchange, CodeExchangeRequest, ProfileRequest};
use crate::provider::{AuthorizationUrlOptions, OAuthProvider};

/// Profile field mapping: tells GenericOAuthProvider how to extract
/// user fields from the provider's profile JSON.
#[derive(Debug, Clone, Copy)]
pub struct ProfileMapping {
    /// Dot-separated JSON path to the user ID (e.g. "id", "sub").
    pub id: &'static str,
    /// JSON path to the email.
    pub email: &'static str,
    /// JSON path to the display name.
    pub name: &'static str,
    /// JSON path to the avatar URL.
    pub avatar: &'static str,
}

/// Static configuration for a social provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub authorization_endpoint: &'static str,
    pub token_endpoint: &'static str,
    pub userinfo_endpoint: &'static str,
    /// Scope requested on every authorization URL.
    pub scope: &'static str,
    /// `response_type` value, or `None` when the provider takes none.
    pub response_type: Option<&'static str>,
    /// Fixed extra authorization parameters, appended after `scope`.
    pub extra_auth_params: &'static [(&'static str, &'static str)],
    pub profile_mapping: ProfileMapping,
}

/// A generic OAuth provider backed by a `ProviderConfig`.
#[derive(Debug, Clone)]
pub struct GenericOAuthProvider {
    config: &'static ProviderConfig,
    options: ProviderOptions,
    exchange: Arc<dyn CodeExchange>,
}

impl GenericOAuthProvider {
    pub fn new(
        config: &'static ProviderConfig,
        options: ProviderOptions,
        exchange: Arc<dyn CodeExchange>,
    ) -> Self {
        Self {
            config,
            options,
            exchange,
        }
    }

    pub fn facebook(options: ProviderOptions, exchange: Arc<dyn CodeExchange>) -> Self {
        Self::new(&FACEBOOK, options, exchange)
    }

    pub fn google(options: ProviderOptions, exchange: Arc<dyn CodeExchange>) -> Self {
        Self::new(&GOOGLE, options, exchange)
    }

    pub fn github(options: ProviderOptions, exchange: Arc<dyn CodeExchange>) -> Self {
        Self::new(&GITHUB, options, exchange)
    }

    pub fn config(&self) -> &'static ProviderConfig {
        self.config
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    fn resolve_redirect_uri<'a>(&'a self, redirect_uri: &'a str) -> &'a str {
        if redirect_uri.is_empty() {
            &self.options.redirect_uri
        } else {
            redirect_uri
        }
    }

    /// Normalize any collaborator error into `ExchangeFailed`.
    fn exchange_error(&self, err: SocialAuthError) -> SocialAuthError {
        match err {
            SocialAuthError::ExchangeFailed { .. } => err,
            other => SocialAuthError::exchange_failed(self.config.id, other.to_string()),
        }
    }

    /// Extracts a string from a nested JSON path like "picture.data.url".
    fn extract_field(data: &serde_json::Value, path: &str) -> Option<String> {
        let mut current = data;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn map_profile(&self, profile: serde_json::Value) -> Result<SocialUser> {
        let mapping = &self.config.profile_mapping;

        let id = Self::extract_field(&profile, mapping.id).ok_or_else(|| {
            SocialAuthError::exchange_failed(self.config.id, "profile response has no user id")
        })?;
        let email = Self::extract_field(&profile, mapping.email).unwrap_or_default();
        let name = Self::extract_field(&profile, mapping.name);
        let avatar = Self::extract_field(&profile, mapping.avatar);

        let data = match profile {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        let mut user = SocialUser::new(self.config.id, id, email).with_data(data);
        if let Some(name) = name {
            user = user.with_name(name);
        }
        if let Some(avatar) = avatar {
            user = user.with_avatar(avatar);
        }
        Ok(user)
    }
}

#[async_trait]
impl OAuthProvider for GenericOAuthProvider {
    fn name(&self) -> &str {
        self.config.id
    }

    fn display_name(&self) -> &str {
        self.config.name
    }

    fn authorization_url(
        &self,
        redirect_uri: &str,
        options: &AuthorizationUrlOptions,
    ) -> Result<url::Url> {
        let redirect_uri = self.resolve_redirect_uri(redirect_uri);

        let url = create_authorization_url(AuthorizationUrlParams {
            authorization_endpoint: self.config.authorization_endpoint,
            client_id: &self.options.client_id,
            redirect_uri,
            response_type: self.config.response_type,
            scope: Some(self.config.scope),
            additional_params: self.config.extra_auth_params,
            state: options.state.as_deref(),
        })
        .map_err(|e| {
            SocialAuthError::InvalidAuthorizationUrl(format!(
                "{}: {e}",
                self.config.authorization_endpoint
            ))
        })?;

        tracing::debug!(
            provider = self.config.id,
            has_state = options.state.is_some(),
            "built authorization url"
        );
        Ok(url)
    }

    async fn get_user(&self, code: &str, redirect_uri: &str) -> Result<SocialUser> {
        if code.is_empty() {
            return Err(SocialAuthError::exchange_failed(
                self.config.id,
                "authorization code is empty",
            ));
        }

        let token = self
            .exchange
            .exchange_code(&CodeExchangeRequest {
                provider: self.config.id,
                token_endpoint: self.config.token_endpoint,
                client_id: &self.options.client_id,
                client_secret: &self.options.client_secret,
                code,
                redirect_uri: self.resolve_redirect_uri(redirect_uri),
            })
            .await
            .map_err(|e| self.exchange_error(e))?;

        if token.is_expired() {
            return Err(SocialAuthError::exchange_failed(
                self.config.id,
                "access token expired before the profile could be fetched",
            ));
        }

        let profile = self
            .exchange
            .fetch_profile(&ProfileRequest {
                provider: self.config.id,
                userinfo_endpoint: self.config.userinfo_endpoint,
                token: &token,
            })
            .await
            .map_err(|e| self.exchange_error(e))?;

        let user = self.map_profile(profile)?;
        tracing::debug!(
            provider = self.config.id,
            provider_id = user.provider_id(),
            "exchanged authorization code"
        );
        Ok(user)
    }
}

// =============================================================================
// Provider configs
// =============================================================================

// --- Facebook ---
pub static FACEBOOK: ProviderConfig = ProviderConfig {
    id: "facebook",
    name: "Facebook",
    authorization_endpoint: "https://www.facebook.com/v18.0/dialog/oauth",
    token_endpoint: "https://graph.facebook.com/v18.0/oauth/access_token",
    userinfo_endpoint: "https://graph.facebook.com/me?fields=id,name,email,picture",
    scope: "email",
    response_type: Some("code"),
    extra_auth_params: &[],
    profile_mapping: ProfileMapping {
        id: "id",
        email: "email",
        name: "name",
        avatar: "picture.data.url",
    },
};

// --- Google ---
pub static GOOGLE: ProviderConfig = ProviderConfig {
    id: "google",
    name: "Google",
    authorization_endpoint: "https://accounts.google.com/o/oauth2/v2/auth",
    token_endpoint: "https://oauth2.googleapis.com/token",
    userinfo_endpoint: "https://www.googleapis.com/oauth2/v3/userinfo",
    scope: "openid email profile",
    response_type: Some("code"),
    extra_auth_params: &[("access_type", "online")],
    profile_mapping: ProfileMapping {
        id: "sub",
        email: "email",
        name: "name",
        avatar: "picture",
    },
};

// --- GitHub ---
pub static GITHUB: ProviderConfig = ProviderConfig {
    id: "github",
    name: "GitHub",
    authorization_endpoint: "https://github.com/login/oauth/authorize",
    token_endpoint: "https://github.com/login/oauth/access_token",
    userinfo_endpoint: "https://api.github.com/user",
    scope: "user:email",
    response_type: None,
    extra_auth_params: &[],
    profile_mapping: ProfileMapping {
        id: "id",
        email: "email",
        name: "name",
        avatar: "avatar_url",
    },
};

/// Lookup a provider config by its ID string.
pub fn get_provider_config(id: &str) -> Option<&'static ProviderConfig> {
    match id {
        "facebook" => Some(&FACEBOOK),
        "google" => Some(&GOOGLE),
        "github" => Some(&GITHUB),
        _ => None,
    }
}

/// All provider IDs.
pub const PROVIDER_IDS: &[&str] = &["facebook", "google", "github"];
