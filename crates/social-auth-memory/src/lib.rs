// social-auth-memory: in-memory link store.
//
// Keeps the account-linking registry in process memory. Links are lost when
// the store is dropped; use it for tests, prototypes and single-process
// deployments that rebuild links on startup.

pub mod store;

pub use store::MemoryLinkStore;
