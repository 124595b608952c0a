// The identity an external provider returns after a successful callback.

use serde::{Deserialize, Serialize};

/// Opaque, provider-specific profile fields.
pub type ProfileData = serde_json::Map<String, serde_json::Value>;

/// An authenticated external identity.
///
/// Built once per successful code exchange and never mutated afterwards.
/// `provider_id` is unique only within `provider`'s namespace. `email` is
/// best-effort: it is empty when the provider did not expose one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialUser {
    provider: String,
    provider_id: String,
    email: String,
    name: Option<String>,
    avatar: Option<String>,
    #[serde(default)]
    data: ProfileData,
}

impl SocialUser {
    pub fn new(
        provider: impl Into<String>,
        provider_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            provider_id: provider_id.into(),
            email: email.into(),
            name: None,
            avatar: None,
            data: ProfileData::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_data(mut self, data: ProfileData) -> Self {
        self.data = data;
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn data(&self) -> &ProfileData {
        &self.data
    }

    /// Flat field export (`provider`, `provider_id`, `email`, `name`,
    /// `avatar`, `data`) for callers that persist or render the record.
    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        map.insert("provider".into(), self.provider.clone().into());
        map.insert("provider_id".into(), self.provider_id.clone().into());
        map.insert("email".into(), self.email.clone().into());
        map.insert("name".into(), self.name.clone().into());
        map.insert("avatar".into(), self.avatar.clone().into());
        map.insert("data".into(), serde_json::Value::Object(self.data.clone()));
        map
    }
}
