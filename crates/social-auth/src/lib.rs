#![doc = include_str!("../README.md")]

pub mod init;
pub mod login;
pub mod manager;

pub use login::{LoginOutcome, LoginStrategies, SocialLogin, UserCreator, UserFinder, UserLookup};
pub use manager::SocialManager;
