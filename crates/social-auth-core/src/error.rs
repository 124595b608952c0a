// Error kinds shared by every social-auth crate.
//
// `ErrorCode` is the stable, serializable classification; `SocialAuthError`
// carries the context (provider name, reason) for a single failure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable error classification, serialized as `SCREAMING_SNAKE_CASE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ProviderNotFound,
    ExchangeFailed,
    AccountAlreadyLinked,
    InvalidAuthorizationUrl,
    InvalidConfiguration,
    StorageError,
    InternalError,
}

impl ErrorCode {
    /// Whether a caller may reasonably retry the failed operation unchanged.
    ///
    /// Only an exchange failure can be transient (network, provider outage);
    /// whether it actually is depends on the cause, so the caller decides.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExchangeFailed)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ProviderNotFound => "Provider not found",
            Self::ExchangeFailed => "Authorization code exchange failed",
            Self::AccountAlreadyLinked => "Social account already linked to another user",
            Self::InvalidAuthorizationUrl => "Invalid authorization URL",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::StorageError => "Link storage error",
            Self::InternalError => "Internal error",
        };
        write!(f, "{msg}")
    }
}

/// Error returned by provider, registry and login operations.
#[derive(Debug, thiserror::Error)]
pub enum SocialAuthError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Exchange failed for provider '{provider}': {reason}")]
    ExchangeFailed { provider: String, reason: String },

    #[error("Account {provider}:{provider_id} is already linked to user '{user_id}'")]
    AccountAlreadyLinked {
        provider: String,
        provider_id: String,
        user_id: String,
    },

    #[error("Invalid authorization URL: {0}")]
    InvalidAuthorizationUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SocialAuthError {
    pub fn exchange_failed(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExchangeFailed {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ProviderNotFound(_) => ErrorCode::ProviderNotFound,
            Self::ExchangeFailed { .. } => ErrorCode::ExchangeFailed,
            Self::AccountAlreadyLinked { .. } => ErrorCode::AccountAlreadyLinked,
            Self::InvalidAuthorizationUrl(_) => ErrorCode::InvalidAuthorizationUrl,
            Self::Config(_) => ErrorCode::InvalidConfiguration,
            Self::Storage(_) => ErrorCode::StorageError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// JSON body suitable for an HTTP error response.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

/// Unified result type for social-auth operations.
pub type Result<T> = std::result::Result<T, SocialAuthError>;
