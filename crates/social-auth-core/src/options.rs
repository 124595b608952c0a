// Provider configuration: client credentials and the default redirect URI,
// loadable from JSON or from `SOCIAL_AUTH_<PROVIDER>_*` environment variables.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SocialAuthError};

const ENV_PREFIX: &str = "SOCIAL_AUTH_";
const CLIENT_ID_SUFFIX: &str = "_CLIENT_ID";
const CLIENT_SECRET_SUFFIX: &str = "_CLIENT_SECRET";
const REDIRECT_URI_SUFFIX: &str = "_REDIRECT_URI";

/// Credentials and defaults for a single OAuth provider.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOptions {
    /// OAuth client ID.
    pub client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,

    /// Redirect URI used when a caller does not supply one.
    #[serde(default)]
    pub redirect_uri: String,
}

impl ProviderOptions {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }
}

// The secret must never reach logs.
impl fmt::Debug for ProviderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderOptions")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Top-level configuration: provider id -> credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAuthOptions {
    #[serde(default)]
    pub providers: HashMap<String, ProviderOptions>,
}

impl SocialAuthOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, id: impl Into<String>, options: ProviderOptions) -> Self {
        self.providers.insert(id.into(), options);
        self
    }

    /// Parse options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SocialAuthError::Config(format!("invalid options JSON: {e}")))
    }

    /// Load options from the process environment.
    ///
    /// A provider is configured when `SOCIAL_AUTH_<PROVIDER>_CLIENT_ID` is set;
    /// `_CLIENT_SECRET` and `_REDIRECT_URI` are optional.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit variable set.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let mut providers = HashMap::new();
        for (key, client_id) in &vars {
            let Some(provider) = key
                .strip_prefix(ENV_PREFIX)
                .and_then(|rest| rest.strip_suffix(CLIENT_ID_SUFFIX))
            else {
                continue;
            };
            if provider.is_empty() || client_id.is_empty() {
                continue;
            }

            let lookup = |suffix: &str| {
                vars.get(&format!("{ENV_PREFIX}{provider}{suffix}"))
                    .cloned()
                    .unwrap_or_default()
            };

            tracing::debug!(provider = %provider.to_lowercase(), "provider credentials found in environment");
            providers.insert(
                provider.to_lowercase(),
                ProviderOptions {
                    client_id: client_id.clone(),
                    client_secret: lookup(CLIENT_SECRET_SUFFIX),
                    redirect_uri: lookup(REDIRECT_URI_SUFFIX),
                },
            );
        }

        Self { providers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vars() {
        let opts = SocialAuthOptions::from_vars([
            ("SOCIAL_AUTH_GOOGLE_CLIENT_ID", "g-client"),
            ("SOCIAL_AUTH_GOOGLE_CLIENT_SECRET", "g-secret"),
            ("SOCIAL_AUTH_GOOGLE_REDIRECT_URI", "https://app.test/cb/google"),
            ("SOCIAL_AUTH_GITHUB_CLIENT_ID", "gh-client"),
            ("SOCIAL_AUTH_FACEBOOK_CLIENT_SECRET", "orphan-secret"),
            ("PATH", "/usr/bin"),
        ]);

        assert_eq!(opts.providers.len(), 2);
        let google = &opts.providers["google"];
        assert_eq!(google.client_id, "g-client");
        assert_eq!(google.client_secret, "g-secret");
        assert_eq!(google.redirect_uri, "https://app.test/cb/google");

        let github = &opts.providers["github"];
        assert_eq!(github.client_id, "gh-client");
        assert!(github.client_secret.is_empty());
        assert!(!opts.providers.contains_key("facebook"));
    }

    #[test]
    fn test_empty_client_id_is_ignored() {
        let opts = SocialAuthOptions::from_vars([("SOCIAL_AUTH_GITHUB_CLIENT_ID", "")]);
        assert!(opts.providers.is_empty());
    }

    #[test]
    fn test_from_json() {
        let opts = SocialAuthOptions::from_json(
            r#"{
                "providers": {
                    "github": { "clientId": "abc", "clientSecret": "xyz" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(opts.providers["github"].client_id, "abc");
        assert_eq!(opts.providers["github"].redirect_uri, "");
    }

    #[test]
    fn test_from_json_invalid() {
        let err = SocialAuthOptions::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SocialAuthError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let opts = ProviderOptions::new("id", "super-secret", "https://app.test/cb");
        let debug = format!("{opts:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
