// Storage contracts for the account-linking registry.

pub mod link_store;
