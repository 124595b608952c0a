// Social manager: provider registry and dispatcher.
//
// Owns the registered providers (keyed by `OAuthProvider::name`) and the
// account link store. Providers are registered through `&mut self` while
// the manager is being built; once shared behind an `Arc` the registry is
// read-only and only the link store changes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use social_auth_core::{LinkStore, LinkedAccounts, Result, SocialAuthError, SocialUser};
use social_auth_oauth2::{AuthorizationUrlOptions, OAuthProvider};

/// Registry of social providers plus the account link store.
pub struct SocialManager {
    providers: HashMap<String, Arc<dyn OAuthProvider>>,
    link_store: Arc<dyn LinkStore>,
}

impl fmt::Debug for SocialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocialManager")
            .field("providers", &self.provider_names())
            .field("link_store", &self.link_store)
            .finish()
    }
}

impl SocialManager {
    pub fn new(link_store: Arc<dyn LinkStore>) -> Self {
        Self {
            providers: HashMap::new(),
            link_store,
        }
    }

    /// Register a provider under its name, replacing any provider already
    /// registered with that name.
    pub fn register_provider(&mut self, provider: Arc<dyn OAuthProvider>) {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            tracing::debug!(provider = %name, "replaced registered provider");
        } else {
            tracing::debug!(provider = %name, "registered provider");
        }
    }

    pub fn provider(&self, name: &str) -> Option<&Arc<dyn OAuthProvider>> {
        self.providers.get(name)
    }

    /// Registered provider names, sorted.
    pub fn provider_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn link_store(&self) -> &Arc<dyn LinkStore> {
        &self.link_store
    }

    fn require_provider(&self, name: &str) -> Result<&Arc<dyn OAuthProvider>> {
        self.providers
            .get(name)
            .ok_or_else(|| SocialAuthError::ProviderNotFound(name.to_string()))
    }

    /// Build the authorization redirect URL for `provider`.
    pub fn authorization_url(
        &self,
        provider: &str,
        redirect_uri: &str,
        options: &AuthorizationUrlOptions,
    ) -> Result<String> {
        let url = self
            .require_provider(provider)?
            .authorization_url(redirect_uri, options)?;
        Ok(url.into())
    }

    /// Exchange a callback `code` for the authenticated social identity.
    pub async fn handle_callback(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SocialUser> {
        let handler = self.require_provider(provider)?;
        match handler.get_user(code, redirect_uri).await {
            Ok(user) => Ok(user),
            Err(err) => {
                tracing::warn!(provider, error = %err, "callback exchange failed");
                Err(err)
            }
        }
    }

    /// Link `social`'s external identity to `user_id`.
    ///
    /// Overwrites any earlier link the user had for the same provider.
    /// Fails with `AccountAlreadyLinked` when the identity belongs to a
    /// different user.
    pub async fn link_account(&self, user_id: &str, social: &SocialUser) -> Result<()> {
        self.link_store
            .link(user_id, social.provider(), social.provider_id())
            .await?;
        tracing::info!(user_id, provider = social.provider(), "account linked");
        Ok(())
    }

    /// Remove the user's link for `provider`. Unlinking a missing link is
    /// a no-op; the return value says whether anything was removed.
    pub async fn unlink_account(&self, user_id: &str, provider: &str) -> Result<bool> {
        let removed = self.link_store.unlink(user_id, provider).await?;
        if removed {
            tracing::info!(user_id, provider, "account unlinked");
        }
        Ok(removed)
    }

    pub async fn linked_accounts(&self, user_id: &str) -> Result<LinkedAccounts> {
        self.link_store.linked_accounts(user_id).await
    }

    pub async fn is_account_linked(&self, user_id: &str, provider: &str) -> Result<bool> {
        self.link_store.is_linked(user_id, provider).await
    }

    /// The internal user linked to `(provider, provider_id)`, if any.
    pub async fn find_user_by_social_account(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> Result<Option<String>> {
        let user_id = self.link_store.find_user(provider, provider_id).await?;
        tracing::debug!(provider, found = user_id.is_some(), "social account lookup");
        Ok(user_id)
    }
}
