// Environment detection and logger configuration.

use std::sync::OnceLock;

/// Cached environment mode.
static ENV_MODE: OnceLock<EnvMode> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMode {
    Production,
    Development,
    Test,
}

impl EnvMode {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" | "testing" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Detect the current environment mode from environment variables.
/// Checks `SOCIAL_AUTH_ENV`, then `RUST_ENV`.
pub fn detect_env_mode() -> EnvMode {
    *ENV_MODE.get_or_init(|| {
        let env_val = std::env::var("SOCIAL_AUTH_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        EnvMode::parse(&env_val)
    })
}

/// Default `EnvFilter` directive for a given mode.
pub fn default_filter(mode: EnvMode) -> &'static str {
    match mode {
        EnvMode::Production => "social_auth=info",
        EnvMode::Development | EnvMode::Test => "social_auth=debug",
    }
}

/// Initialize the `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the filter follows the
/// environment mode. When a global subscriber is already installed the
/// call only logs that at `debug` and leaves it in place.
pub fn init_logger() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(detect_env_mode())));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .try_init();

    if let Err(err) = installed {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_mode() {
        assert_eq!(EnvMode::parse("production"), EnvMode::Production);
        assert_eq!(EnvMode::parse("PROD"), EnvMode::Production);
        assert_eq!(EnvMode::parse("testing"), EnvMode::Test);
        assert_eq!(EnvMode::parse(""), EnvMode::Development);
        assert_eq!(EnvMode::parse("staging"), EnvMode::Development);
    }

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(EnvMode::Production), "social_auth=info");
        assert_eq!(default_filter(EnvMode::Development), "social_auth=debug");
    }

    #[test]
    fn test_init_logger_twice() {
        init_logger();
        init_logger();
    }
}
