#![doc = include_str!("../README.md")]

pub mod authorization_url;
pub mod code_exchange;
pub mod provider;
pub mod providers;
pub mod tokens;

// Re-exports
pub use authorization_url::{create_authorization_url, AuthorizationUrlParams};
pub use code_exchange::{CodeExchange, CodeExchangeRequest, ProfileRequest};
pub use provider::{AuthorizationUrlOptions, OAuthProvider};
pub use providers::{get_provider_config, GenericOAuthProvider, ProviderConfig, PROVIDER_IDS};
pub use tokens::AccessToken;
