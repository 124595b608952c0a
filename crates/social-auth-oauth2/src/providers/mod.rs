// Social providers.
//
// Each provider is a `ProviderConfig` constant (endpoints, scope, fixed
// authorization parameters, profile field mapping). `GenericOAuthProvider`
// implements `OAuthProvider` for any of them, so adding a provider means
// adding a config rather than a trait impl.

pub mod registry;
pub use registry::*;
