use std::fmt::Display;
use std::str::FromStr;

use quill_core::recently_viewed::DEFAULT_MAX_RECENT_ITEMS;

use crate::auth::jwt::JwtConfig;

/// Server configuration, read once at startup.
///
/// | Env Var                    | Default                 |
/// |----------------------------|-------------------------|
/// | `HOST`                     | `0.0.0.0`               |
/// | `PORT`                     | `3000`                  |
/// | `CORS_ORIGINS`             | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
/// | `RECENTLY_VIEWED_CAPACITY` | `10`                    |
///
/// JWT settings come from [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Entries kept per user by the recently-viewed tracker.
    pub recently_viewed_capacity: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// # Panics
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let cors_origins = env_or("CORS_ORIGINS", "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let recently_viewed_capacity: usize =
            env_or("RECENTLY_VIEWED_CAPACITY", DEFAULT_MAX_RECENT_ITEMS);
        assert!(
            recently_viewed_capacity >= 1,
            "RECENTLY_VIEWED_CAPACITY must be at least 1"
        );

        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            recently_viewed_capacity,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value {raw:?}: {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variable_uses_default() {
        let value: u16 = env_or("QUILL_TEST_SURELY_UNSET_VARIABLE", 4242);
        assert_eq!(value, 4242);
    }
}
