// Manager initialization from `SocialAuthOptions`.
//
// Every configured provider id must name a known provider config; each one
// gets a `GenericOAuthProvider` sharing the supplied code exchange.

use std::sync::Arc;

use social_auth_core::{LinkStore, Result, SocialAuthError, SocialAuthOptions};
use social_auth_oauth2::{get_provider_config, CodeExchange, GenericOAuthProvider, PROVIDER_IDS};

use crate::manager::SocialManager;

impl SocialManager {
    /// Build a manager with one provider per entry in `options.providers`.
    ///
    /// Fails with a `Config` error for an unknown provider id or a provider
    /// without a client id.
    pub fn from_options(
        options: &SocialAuthOptions,
        exchange: Arc<dyn CodeExchange>,
        link_store: Arc<dyn LinkStore>,
    ) -> Result<Self> {
        let mut manager = Self::new(link_store);

        for (id, provider_options) in &options.providers {
            let config = get_provider_config(id).ok_or_else(|| {
                SocialAuthError::Config(format!(
                    "unknown provider '{id}' (known: {})",
                    PROVIDER_IDS.join(", ")
                ))
            })?;
            if provider_options.client_id.is_empty() {
                return Err(SocialAuthError::Config(format!(
                    "provider '{id}' has no client id"
                )));
            }

            manager.register_provider(Arc::new(GenericOAuthProvider::new(
                config,
                provider_options.clone(),
                exchange.clone(),
            )));
        }

        tracing::info!(providers = ?manager.provider_names(), "social auth initialized");
        Ok(manager)
    }
}
