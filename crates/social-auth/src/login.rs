// Social login orchestration.
//
// Resolves a provider callback to an internal user in a fixed order:
// 1. exchange the code for a `SocialUser` (failures propagate, no retry)
// 2. existing link for (provider, provider id) -> finder by id, or
//    unresolved when there is no finder
// 3. finder by email -> link and return
// 4. creator -> link and return
// 5. otherwise unresolved
//
// The internal user type `U` is opaque here; callers provide a function
// that extracts its stable id for linking.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use social_auth_core::{Result, SocialUser};

use crate::manager::SocialManager;

/// What a `UserFinder` is asked to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookup<'a> {
    /// Internal user id taken from an existing link.
    Id(&'a str),
    /// Email reported by the provider.
    Email(&'a str),
}

/// Finds an existing internal user.
#[async_trait]
pub trait UserFinder<U>: Send + Sync {
    async fn find(&self, lookup: UserLookup<'_>) -> Result<Option<U>>;
}

/// Creates an internal user for a social identity nobody owns yet.
#[async_trait]
pub trait UserCreator<U>: Send + Sync {
    async fn create(&self, social: &SocialUser) -> Result<Option<U>>;
}

type UserIdFn<U> = dyn Fn(&U) -> String + Send + Sync;

/// Caller-supplied resolution strategies for one kind of internal user.
pub struct LoginStrategies<U> {
    user_id: Arc<UserIdFn<U>>,
    finder: Option<Arc<dyn UserFinder<U>>>,
    creator: Option<Arc<dyn UserCreator<U>>>,
}

impl<U> LoginStrategies<U> {
    /// Strategies with neither finder nor creator. `user_id` maps an
    /// internal user to the id stored in the link registry.
    pub fn new(user_id: impl Fn(&U) -> String + Send + Sync + 'static) -> Self {
        Self {
            user_id: Arc::new(user_id),
            finder: None,
            creator: None,
        }
    }

    pub fn with_finder(mut self, finder: impl UserFinder<U> + 'static) -> Self {
        self.finder = Some(Arc::new(finder));
        self
    }

    pub fn with_creator(mut self, creator: impl UserCreator<U> + 'static) -> Self {
        self.creator = Some(Arc::new(creator));
        self
    }

    pub fn has_finder(&self) -> bool {
        self.finder.is_some()
    }

    pub fn has_creator(&self) -> bool {
        self.creator.is_some()
    }
}

impl<U> Clone for LoginStrategies<U> {
    fn clone(&self) -> Self {
        Self {
            user_id: self.user_id.clone(),
            finder: self.finder.clone(),
            creator: self.creator.clone(),
        }
    }
}

impl<U> fmt::Debug for LoginStrategies<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginStrategies")
            .field("finder", &self.has_finder())
            .field("creator", &self.has_creator())
            .finish()
    }
}

/// How a login was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome<U> {
    /// The social identity was already linked to this user.
    Linked(U),
    /// An existing user matched the provider email and is now linked.
    MatchedByEmail(U),
    /// The creator made a new user, now linked.
    Created(U),
    /// No user could be resolved; the caller decides what happens next.
    Unresolved(SocialUser),
}

impl<U> LoginOutcome<U> {
    pub fn user(&self) -> Option<&U> {
        match self {
            Self::Linked(user) | Self::MatchedByEmail(user) | Self::Created(user) => Some(user),
            Self::Unresolved(_) => None,
        }
    }

    pub fn into_user(self) -> Option<U> {
        match self {
            Self::Linked(user) | Self::MatchedByEmail(user) | Self::Created(user) => Some(user),
            Self::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved(_))
    }
}

/// Drives social login against a `SocialManager`.
#[derive(Debug, Clone)]
pub struct SocialLogin {
    manager: Arc<SocialManager>,
}

impl SocialLogin {
    pub fn new(manager: Arc<SocialManager>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &Arc<SocialManager> {
        &self.manager
    }

    /// Resolve the callback `code` from `provider` to an internal user.
    ///
    /// Once a link exists for the identity, only the finder's answer for
    /// the linked id counts: without a finder the login is unresolved and
    /// neither the email step nor the creator runs. The email step is also
    /// skipped when the provider reported no email.
    pub async fn login<U: Send + 'static>(
        &self,
        provider: &str,
        code: &str,
        redirect_uri: &str,
        strategies: &LoginStrategies<U>,
    ) -> Result<LoginOutcome<U>> {
        let social = self
            .manager
            .handle_callback(provider, code, redirect_uri)
            .await?;

        let linked = self
            .manager
            .find_user_by_social_account(social.provider(), social.provider_id())
            .await?;

        if let Some(user_id) = linked {
            match &strategies.finder {
                Some(finder) => {
                    let outcome = match finder.find(UserLookup::Id(&user_id)).await? {
                        Some(user) => LoginOutcome::Linked(user),
                        None => {
                            tracing::warn!(
                                provider = social.provider(),
                                user_id = %user_id,
                                "linked user no longer resolves"
                            );
                            LoginOutcome::Unresolved(social)
                        }
                    };
                    return Ok(outcome);
                }
                None => {
                    tracing::warn!(
                        provider = social.provider(),
                        user_id = %user_id,
                        "social account is linked but no user finder was supplied"
                    );
                    return Ok(LoginOutcome::Unresolved(social));
                }
            }
        }

        if let Some(finder) = &strategies.finder {
            if social.has_email() {
                if let Some(user) = finder.find(UserLookup::Email(social.email())).await? {
                    self.link(&user, &social, strategies).await?;
                    tracing::info!(provider = social.provider(), "login matched by email");
                    return Ok(LoginOutcome::MatchedByEmail(user));
                }
            }
        }

        if let Some(creator) = &strategies.creator {
            if let Some(user) = creator.create(&social).await? {
                self.link(&user, &social, strategies).await?;
                tracing::info!(provider = social.provider(), "login created user");
                return Ok(LoginOutcome::Created(user));
            }
        }

        tracing::info!(provider = social.provider(), "login unresolved");
        Ok(LoginOutcome::Unresolved(social))
    }

    async fn link<U>(
        &self,
        user: &U,
        social: &SocialUser,
        strategies: &LoginStrategies<U>,
    ) -> Result<()> {
        let user_id = (strategies.user_id)(user);
        self.manager.link_account(&user_id, social).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use social_auth_core::{LinkStore, ProviderOptions, SocialAuthError};
    use social_auth_memory::MemoryLinkStore;
    use social_auth_oauth2::GenericOAuthProvider;
    use social_auth_test_utils::{profiles, StaticCodeExchange};

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: String,
    }

    #[derive(Default)]
    struct Recorder {
        lookups: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    struct Finder {
        by_id: Option<&'static str>,
        by_email: Option<(&'static str, &'static str)>,
        recorder: Arc<Recorder>,
    }

    #[async_trait]
    impl UserFinder<User> for Finder {
        async fn find(&self, lookup: UserLookup<'_>) -> Result<Option<User>> {
            let found = match lookup {
                UserLookup::Id(id) => {
                    self.recorder.lookups.lock().unwrap().push(format!("id:{id}"));
                    self.by_id.filter(|known| *known == id)
                }
                UserLookup::Email(email) => {
                    self.recorder.lookups.lock().unwrap().push(format!("email:{email}"));
                    self.by_email
                        .filter(|(known, _)| *known == email)
                        .map(|(_, id)| id)
                }
            };
            Ok(found.map(|id| User { id: id.to_string() }))
        }
    }

    struct FailingCreator;

    #[async_trait]
    impl UserCreator<User> for FailingCreator {
        async fn create(&self, _social: &SocialUser) -> Result<Option<User>> {
            Err(anyhow::anyhow!("users table unavailable").into())
        }
    }

    struct FixedCreator(&'static str);

    #[async_trait]
    impl UserCreator<User> for FixedCreator {
        async fn create(&self, _social: &SocialUser) -> Result<Option<User>> {
            Ok(Some(User {
                id: self.0.to_string(),
            }))
        }
    }

    fn setup(profile: serde_json::Value) -> (SocialLogin, MemoryLinkStore) {
        let exchange = StaticCodeExchange::new().with_profile("github", "code", profile);
        let store = MemoryLinkStore::new();
        let mut manager = SocialManager::new(Arc::new(store.clone()));
        manager.register_provider(Arc::new(GenericOAuthProvider::github(
            ProviderOptions::new("client", "secret", "https://app.test/cb"),
            Arc::new(exchange),
        )));
        (SocialLogin::new(Arc::new(manager)), store)
    }

    fn strategies() -> LoginStrategies<User> {
        LoginStrategies::new(|user: &User| user.id.clone())
    }

    #[derive(Default)]
    struct CountingCreator {
        calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl UserCreator<User> for CountingCreator {
        async fn create(&self, _social: &SocialUser) -> Result<Option<User>> {
            *self.calls.lock().unwrap() += 1;
            Ok(Some(User { id: "99".into() }))
        }
    }

    #[tokio::test]
    async fn test_link_without_finder_skips_creator() {
        let (login, store) = setup(profiles::github(5, "a@x.com"));
        store.link("42", "github", "5").await.unwrap();

        let creator = CountingCreator::default();
        let calls = creator.calls.clone();
        let strategies = strategies().with_creator(creator);
        let outcome = login.login("github", "code", "", &strategies).await.unwrap();

        assert!(matches!(outcome, LoginOutcome::Unresolved(ref social) if social.provider_id() == "5"));
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(store.find_user("github", "5").await.unwrap().as_deref(), Some("42"));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_link_without_any_strategy_is_unresolved() {
        let (login, store) = setup(profiles::github(5, "a@x.com"));
        store.link("42", "github", "5").await.unwrap();

        let outcome = login.login("github", "code", "", &strategies()).await.unwrap();
        assert!(matches!(outcome, LoginOutcome::Unresolved(ref social) if social.provider_id() == "5"));
    }

    #[tokio::test]
    async fn test_stale_link_is_final() {
        let (login, store) = setup(profiles::github(5, "a@x.com"));
        store.link("42", "github", "5").await.unwrap();

        let recorder = Arc::new(Recorder::default());
        let strategies = strategies().with_finder(Finder {
            by_id: None,
            by_email: Some(("a@x.com", "7")),
            recorder: recorder.clone(),
        });
        let outcome = login.login("github", "code", "", &strategies).await.unwrap();

        assert!(!outcome.is_resolved());
        assert_eq!(recorder.lookups(), vec!["id:42"]);
    }

    #[tokio::test]
    async fn test_email_step_skipped_without_email() {
        let (login, store) = setup(profiles::github(5, ""));

        let recorder = Arc::new(Recorder::default());
        let strategies = strategies()
            .with_finder(Finder {
                by_id: None,
                by_email: Some(("", "7")),
                recorder: recorder.clone(),
            })
            .with_creator(FixedCreator("99"));
        let outcome = login.login("github", "code", "", &strategies).await.unwrap();

        assert_eq!(outcome, LoginOutcome::Created(User { id: "99".into() }));
        assert!(recorder.lookups().is_empty());
        assert_eq!(store.find_user("github", "5").await.unwrap().as_deref(), Some("99"));
    }

    #[tokio::test]
    async fn test_creator_error_propagates_without_linking() {
        let (login, store) = setup(profiles::github(5, "a@x.com"));
        let strategies = strategies().with_creator(FailingCreator);

        let err = login.login("github", "code", "", &strategies).await.unwrap_err();
        assert!(matches!(err, SocialAuthError::Other(_)));
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_exchange_failure_propagates() {
        let (login, store) = setup(profiles::github(5, "a@x.com"));
        let strategies = strategies().with_creator(FixedCreator("99"));

        let err = login.login("github", "wrong", "", &strategies).await.unwrap_err();
        assert!(matches!(err, SocialAuthError::ExchangeFailed { .. }));
        assert!(store.is_empty().await.unwrap());
    }

    #[test]
    fn test_outcome_into_user() {
        let created: LoginOutcome<User> = LoginOutcome::Created(User { id: "1".into() });
        assert_eq!(created.user().map(|u| u.id.as_str()), Some("1"));
        assert_eq!(created.into_user(), Some(User { id: "1".into() }));

        let unresolved: LoginOutcome<User> =
            LoginOutcome::Unresolved(SocialUser::new("github", "5", ""));
        assert!(unresolved.into_user().is_none());
    }
}
