// Link store trait: the registry mapping internal user ids to the external
// provider accounts linked to them.
//
// Invariants every implementation upholds:
// - at most one provider id per (user id, provider) pair;
// - at most one user id per (provider, provider id) pair, so lookups by
//   external identity are unambiguous;
// - a link and its reverse lookup entry change together.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

/// provider name -> provider id, for a single user.
pub type LinkedAccounts = HashMap<String, String>;

#[async_trait]
pub trait LinkStore: Send + Sync + fmt::Debug {
    /// Link `(provider, provider_id)` to `user_id`.
    ///
    /// Replaces any previous link the user had for `provider`. Linking the
    /// same identity to the same user again is a no-op. Fails with
    /// `AccountAlreadyLinked` if the identity belongs to another user.
    async fn link(&self, user_id: &str, provider: &str, provider_id: &str) -> Result<()>;

    /// Remove the user's link for `provider`. Returns whether a link existed.
    async fn unlink(&self, user_id: &str, provider: &str) -> Result<bool>;

    /// All links for `user_id`; empty when the user has none.
    async fn linked_accounts(&self, user_id: &str) -> Result<LinkedAccounts>;

    /// The internal user linked to `(provider, provider_id)`, if any.
    async fn find_user(&self, provider: &str, provider_id: &str) -> Result<Option<String>>;

    async fn is_linked(&self, user_id: &str, provider: &str) -> Result<bool> {
        Ok(self.linked_accounts(user_id).await?.contains_key(provider))
    }

    /// Total number of links across all users.
    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}
