// In-memory link store: HashMap-based LinkStore.
//
// Two maps behind one `tokio::sync::RwLock`:
// - by_user:    user id -> (provider -> provider id)
// - by_account: (provider, provider id) -> user id
// Every write updates both under the same guard, so lookups by external
// identity are O(1) and never disagree with the per-user view.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use social_auth_core::{LinkStore, LinkedAccounts, Result, SocialAuthError};

type AccountKey = (String, String);

#[derive(Debug, Default, Clone)]
struct Links {
    by_user: HashMap<String, LinkedAccounts>,
    by_account: HashMap<AccountKey, String>,
}

fn account_key(provider: &str, provider_id: &str) -> AccountKey {
    (provider.to_string(), provider_id.to_string())
}

/// In-memory link store.
///
/// Cloning is cheap and clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryLinkStore {
    links: Arc<RwLock<Links>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of every user's links (for debugging/testing).
    pub async fn snapshot(&self) -> HashMap<String, LinkedAccounts> {
        self.links.read().await.by_user.clone()
    }

    /// Remove all links.
    pub async fn clear(&self) {
        let mut links = self.links.write().await;
        links.by_user.clear();
        links.by_account.clear();
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn link(&self, user_id: &str, provider: &str, provider_id: &str) -> Result<()> {
        let mut guard = self.links.write().await;
        let links = &mut *guard;

        let key = account_key(provider, provider_id);
        if let Some(owner) = links.by_account.get(&key) {
            if owner == user_id {
                return Ok(());
            }
            tracing::debug!(provider, owner = %owner, user_id, "identity already linked");
            return Err(SocialAuthError::AccountAlreadyLinked {
                provider: provider.to_string(),
                provider_id: provider_id.to_string(),
                user_id: owner.clone(),
            });
        }

        let accounts = links.by_user.entry(user_id.to_string()).or_default();
        if let Some(previous) = accounts.insert(provider.to_string(), provider_id.to_string()) {
            links.by_account.remove(&account_key(provider, &previous));
        }
        links.by_account.insert(key, user_id.to_string());
        tracing::debug!(user_id, provider, "linked account");
        Ok(())
    }

    async fn unlink(&self, user_id: &str, provider: &str) -> Result<bool> {
        let mut guard = self.links.write().await;
        let links = &mut *guard;

        let Some(accounts) = links.by_user.get_mut(user_id) else {
            return Ok(false);
        };
        let Some(provider_id) = accounts.remove(provider) else {
            return Ok(false);
        };
        if accounts.is_empty() {
            links.by_user.remove(user_id);
        }
        links.by_account.remove(&account_key(provider, &provider_id));
        tracing::debug!(user_id, provider, "unlinked account");
        Ok(true)
    }

    async fn linked_accounts(&self, user_id: &str) -> Result<LinkedAccounts> {
        Ok(self
            .links
            .read()
            .await
            .by_user
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_user(&self, provider: &str, provider_id: &str) -> Result<Option<String>> {
        Ok(self
            .links
            .read()
            .await
            .by_account
            .get(&account_key(provider, provider_id))
            .cloned())
    }

    async fn is_linked(&self, user_id: &str, provider: &str) -> Result<bool> {
        Ok(self
            .links
            .read()
            .await
            .by_user
            .get(user_id)
            .is_some_and(|accounts| accounts.contains_key(provider)))
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.links.read().await.by_account.len())
    }
}
