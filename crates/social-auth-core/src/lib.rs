#![doc = include_str!("../README.md")]

pub mod db;
pub mod env;
pub mod error;
pub mod options;
pub mod social_user;

// Re-exports for convenience
pub use db::link_store::{LinkStore, LinkedAccounts};
pub use error::{ErrorCode, Result, SocialAuthError};
pub use options::{ProviderOptions, SocialAuthOptions};
pub use social_user::SocialUser;
