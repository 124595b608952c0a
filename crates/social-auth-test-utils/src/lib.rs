// social-auth-test-utils
//
// - `LinkStoreTestSuite`: behavioral checks any `LinkStore` must pass
// - `StaticCodeExchange`: a `CodeExchange` that answers from canned profiles
// - `profiles`: profile JSON in each provider's wire shape

pub mod link_store_suite;
pub mod profiles;
pub mod static_exchange;

pub use link_store_suite::{LinkStoreTestSuite, TestSuiteStats};
pub use static_exchange::StaticCodeExchange;
