// Link store conformance suite.
//
// A `LinkStoreTestSuite` runs a fixed list of behavioral checks against
// fresh instances of any `LinkStore` and tracks statistics (test count,
// failures, duration). Each check gets its own store from the factory.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use social_auth_core::{LinkStore, SocialAuthError};

type TestResult = Result<(), String>;
type TestFuture = Pin<Box<dyn Future<Output = TestResult> + Send>>;
type TestFn = fn(Arc<dyn LinkStore>) -> TestFuture;

/// Statistics for a completed suite run.
#[derive(Debug, Clone)]
pub struct TestSuiteStats {
    pub suite_name: String,
    pub test_count: usize,
    pub passed: usize,
    pub failed: usize,
    /// (test name, failure message)
    pub failures: Vec<(String, String)>,
    pub suite_duration_ms: f64,
}

/// Conformance suite for `LinkStore` implementations.
pub struct LinkStoreTestSuite {
    name: String,
    tests: Vec<(&'static str, TestFn)>,
}

impl LinkStoreTestSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: vec![
                ("link then find", link_then_find as TestFn),
                ("relink overwrites provider id", relink_overwrites as TestFn),
                ("unlink removes link", unlink_removes as TestFn),
                ("unlink missing is a no-op", unlink_missing_is_noop as TestFn),
                ("unknown user has no links", unknown_user_has_no_links as TestFn),
                ("one user, several providers", several_providers as TestFn),
                ("identity owned by another user", identity_conflict as TestFn),
                ("relinking the same identity", relink_same_identity as TestFn),
                ("provider ids are namespaced", provider_ids_are_namespaced as TestFn),
            ],
        }
    }

    /// Run every check against a fresh store from `factory`.
    pub async fn run<F, Fut>(&self, factory: F) -> TestSuiteStats
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Arc<dyn LinkStore>>,
    {
        let start = Instant::now();
        let mut failures = Vec::new();

        for (test_name, test_fn) in &self.tests {
            let store = factory().await;
            match test_fn(store).await {
                Ok(()) => tracing::info!("[{}] ✓ {}", self.name, test_name),
                Err(message) => {
                    tracing::error!("[{}] ✗ {}: {}", self.name, test_name, message);
                    failures.push((test_name.to_string(), message));
                }
            }
        }

        let test_count = self.tests.len();
        TestSuiteStats {
            suite_name: self.name.clone(),
            test_count,
            passed: test_count - failures.len(),
            failed: failures.len(),
            failures,
            suite_duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

fn fail(err: SocialAuthError) -> String {
    err.to_string()
}

macro_rules! check {
    ($cond:expr, $($msg:tt)+) => {
        if !$cond {
            return Err(format!($($msg)+));
        }
    };
}

fn link_then_find(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("42", "google", "g-1").await.map_err(fail)?;
        let found = store.find_user("google", "g-1").await.map_err(fail)?;
        check!(found.as_deref() == Some("42"), "expected user 42, got {found:?}");
        check!(store.is_linked("42", "google").await.map_err(fail)?, "link not reported");
        Ok(())
    })
}

fn relink_overwrites(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "github", "first").await.map_err(fail)?;
        store.link("u1", "github", "second").await.map_err(fail)?;

        let accounts = store.linked_accounts("u1").await.map_err(fail)?;
        check!(
            accounts.get("github").map(String::as_str) == Some("second"),
            "expected latest id, got {accounts:?}"
        );
        check!(accounts.len() == 1, "expected one link, got {accounts:?}");
        let stale = store.find_user("github", "first").await.map_err(fail)?;
        check!(stale.is_none(), "stale identity still resolves to {stale:?}");
        Ok(())
    })
}

fn unlink_removes(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "facebook", "fb-1").await.map_err(fail)?;
        let removed = store.unlink("u1", "facebook").await.map_err(fail)?;
        check!(removed, "unlink reported nothing removed");
        check!(
            !store.is_linked("u1", "facebook").await.map_err(fail)?,
            "link survived unlink"
        );
        let found = store.find_user("facebook", "fb-1").await.map_err(fail)?;
        check!(found.is_none(), "identity still resolves to {found:?}");
        Ok(())
    })
}

fn unlink_missing_is_noop(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        let removed = store.unlink("nobody", "google").await.map_err(fail)?;
        check!(!removed, "unlink of a missing link reported a removal");

        store.link("u1", "google", "g-1").await.map_err(fail)?;
        let removed = store.unlink("u1", "github").await.map_err(fail)?;
        check!(!removed, "unlink of another provider reported a removal");
        check!(
            store.is_linked("u1", "google").await.map_err(fail)?,
            "unrelated link was removed"
        );
        Ok(())
    })
}

fn unknown_user_has_no_links(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        let accounts = store.linked_accounts("ghost").await.map_err(fail)?;
        check!(accounts.is_empty(), "expected no links, got {accounts:?}");
        check!(store.is_empty().await.map_err(fail)?, "fresh store is not empty");
        Ok(())
    })
}

fn several_providers(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "google", "g-1").await.map_err(fail)?;
        store.link("u1", "github", "gh-1").await.map_err(fail)?;

        let accounts = store.linked_accounts("u1").await.map_err(fail)?;
        check!(accounts.len() == 2, "expected two links, got {accounts:?}");
        check!(store.len().await.map_err(fail)? == 2, "len does not count both links");
        Ok(())
    })
}

fn identity_conflict(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "google", "g-1").await.map_err(fail)?;
        match store.link("u2", "google", "g-1").await {
            Err(SocialAuthError::AccountAlreadyLinked { user_id, .. }) => {
                check!(user_id == "u1", "conflict names the wrong owner: {user_id}");
            }
            other => return Err(format!("expected AccountAlreadyLinked, got {other:?}")),
        }

        let found = store.find_user("google", "g-1").await.map_err(fail)?;
        check!(found.as_deref() == Some("u1"), "owner changed to {found:?}");
        check!(
            !store.is_linked("u2", "google").await.map_err(fail)?,
            "rejected link was recorded"
        );
        Ok(())
    })
}

fn relink_same_identity(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "google", "g-1").await.map_err(fail)?;
        store.link("u1", "google", "g-1").await.map_err(fail)?;
        check!(store.len().await.map_err(fail)? == 1, "duplicate link recorded");
        Ok(())
    })
}

fn provider_ids_are_namespaced(store: Arc<dyn LinkStore>) -> TestFuture {
    Box::pin(async move {
        store.link("u1", "google", "1").await.map_err(fail)?;
        store.link("u2", "github", "1").await.map_err(fail)?;

        let google = store.find_user("google", "1").await.map_err(fail)?;
        let github = store.find_user("github", "1").await.map_err(fail)?;
        check!(google.as_deref() == Some("u1"), "google:1 resolved to {google:?}");
        check!(github.as_deref() == Some("u2"), "github:1 resolved to {github:?}");
        Ok(())
    })
}
