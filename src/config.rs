//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Database
//!
//! ```bash
//! export DATABASE_URL="sqlite://links.db"
//! # or, equivalently
//! export DB_PATH="./links.db"
//! ```
//!
//! If `DATABASE_URL` is not set, it is built from `DB_PATH` (default `./links.db`).
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Pool acquire timeout in seconds (default: 30)
//! - `DB_RUN_MIGRATIONS` - Create the schema on startup (default: true)
//! - `CACHE_ENABLED` - `false` disables the in-memory cache (default: true)
//! - `CACHE_DEFAULT_EXPIRATION_SECS` - Record lifetime, 0 = never expire (default: 300)
//! - `CACHE_PURGE_INTERVAL_SECS` - Sweep interval, 0 = no sweeper (default: 300)
//! - `CACHE_NEGATIVE_TTL_SECS` - Lifetime of cached fallbacks (default: cache default)
//! - `FALLBACK_DESTINATION` - Destination for unknown keys (default: `/`)
//! - `STORE_TIMEOUT_MS` - Bound on each store call (default: 5000)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::application::services::ResolverSettings;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// Apply embedded migrations on startup (`DB_RUN_MIGRATIONS`, default: true).
    pub db_run_migrations: bool,

    // ── Cache settings ──────────────────────────────────────────────────────
    /// When false, every resolve goes to the store.
    pub cache_enabled: bool,
    /// Lifetime of cached records in seconds; 0 means records never expire.
    pub cache_default_expiration_secs: u64,
    /// Seconds between background sweeps; 0 disables the sweeper.
    pub cache_purge_interval_secs: u64,
    /// Lifetime of cached fallback destinations, if different from the default.
    pub cache_negative_ttl_secs: Option<u64>,
    /// Destination returned for keys missing from the store.
    pub fallback_destination: String,
    /// Upper bound for each store call in milliseconds.
    pub store_timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable is set but not parseable.
    pub fn from_env() -> Result<Self> {
        let database_url = Self::load_database_url();

        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let db_max_connections = parse_var("DB_MAX_CONNECTIONS")?.unwrap_or(5);
        let db_connect_timeout = parse_var("DB_CONNECT_TIMEOUT")?.unwrap_or(30);
        let db_run_migrations = flag_var("DB_RUN_MIGRATIONS").unwrap_or(true);

        let cache_enabled = flag_var("CACHE_ENABLED").unwrap_or(true);
        let cache_default_expiration_secs =
            parse_var("CACHE_DEFAULT_EXPIRATION_SECS")?.unwrap_or(300);
        let cache_purge_interval_secs = parse_var("CACHE_PURGE_INTERVAL_SECS")?.unwrap_or(300);
        let cache_negative_ttl_secs = parse_var("CACHE_NEGATIVE_TTL_SECS")?;

        let fallback_destination =
            env::var("FALLBACK_DESTINATION").unwrap_or_else(|_| "/".to_string());
        let store_timeout_ms = parse_var("STORE_TIMEOUT_MS")?.unwrap_or(5000);

        Ok(Self {
            database_url,
            listen_addr,
            log_level,
            log_format,
            db_max_connections,
            db_connect_timeout,
            db_run_migrations,
            cache_enabled,
            cache_default_expiration_secs,
            cache_purge_interval_secs,
            cache_negative_ttl_secs,
            fallback_destination,
            store_timeout_ms,
        })
    }

    /// Loads database URL with fallback to a file path.
    ///
    /// Priority:
    /// 1. `DATABASE_URL` environment variable
    /// 2. `sqlite://` + `DB_PATH` (default `./links.db`)
    fn load_database_url() -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }

        let path = env::var("DB_PATH").unwrap_or_else(|_| "./links.db".to_string());
        format!("sqlite://{}", path)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `database_url` is not a SQLite URL
    /// - pool, timeout or fallback settings are empty or zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        if self.store_timeout_ms == 0 {
            anyhow::bail!("STORE_TIMEOUT_MS must be greater than 0");
        }

        if self.fallback_destination.is_empty() {
            anyhow::bail!("FALLBACK_DESTINATION must not be empty");
        }

        Ok(())
    }

    /// Record lifetime for the in-memory cache (zero = never expire).
    pub fn cache_default_expiration(&self) -> Duration {
        Duration::from_secs(self.cache_default_expiration_secs)
    }

    /// Interval of the background sweep, `None` when disabled.
    pub fn cache_purge_interval(&self) -> Option<Duration> {
        (self.cache_purge_interval_secs > 0)
            .then(|| Duration::from_secs(self.cache_purge_interval_secs))
    }

    /// Policy handed to [`crate::application::services::CacheAsideStore`].
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            fallback_destination: self.fallback_destination.clone(),
            negative_cache_ttl: self.cache_negative_ttl_secs.map(Duration::from_secs),
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Database: {}", self.database_url);

        if self.cache_enabled {
            tracing::info!(
                "  Cache: enabled (expiration: {}s, purge interval: {}s)",
                self.cache_default_expiration_secs,
                self.cache_purge_interval_secs
            );
        } else {
            tracing::info!("  Cache: disabled");
        }

        tracing::info!("  Fallback destination: {}", self.fallback_destination);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses an optional numeric variable; unset means `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number, got '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

fn flag_var(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables are malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            database_url: "sqlite://links.db".to_string(),
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            db_max_connections: 5,
            db_connect_timeout: 30,
            db_run_migrations: true,
            cache_enabled: true,
            cache_default_expiration_secs: 300,
            cache_purge_interval_secs: 300,
            cache_negative_ttl_secs: None,
            fallback_destination: "/".to_string(),
            store_timeout_ms: 5000,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());

        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "8080".to_string();
        assert!(config.validate().is_err());

        config.listen_addr = "0.0.0.0:8080".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());

        config.database_url = "sqlite::memory:".to_string();
        assert!(config.validate().is_ok());

        config.store_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.store_timeout_ms = 100;
        config.fallback_destination = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_purge_interval_disables_sweeper() {
        let mut config = test_config();
        assert_eq!(config.cache_purge_interval(), Some(Duration::from_secs(300)));

        config.cache_purge_interval_secs = 0;
        assert_eq!(config.cache_purge_interval(), None);
    }

    #[test]
    fn test_resolver_settings_from_config() {
        let mut config = test_config();
        config.cache_negative_ttl_secs = Some(30);
        config.fallback_destination = "https://home.example/".to_string();

        let settings = config.resolver_settings();

        assert_eq!(settings.fallback_destination, "https://home.example/");
        assert_eq!(settings.negative_cache_ttl, Some(Duration::from_secs(30)));
        assert_eq!(settings.store_timeout, Duration::from_millis(5000));
    }

    #[test]
    #[serial]
    fn test_database_url_from_path() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("DATABASE_URL");
            env::set_var("DB_PATH", "/var/lib/links/links.db");
        }

        assert_eq!(
            Config::load_database_url(),
            "sqlite:///var/lib/links/links.db"
        );

        unsafe {
            env::remove_var("DB_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_database_url_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("DATABASE_URL", "sqlite://from-url.db");
            env::set_var("DB_PATH", "from-path.db");
        }

        let url = Config::load_database_url();

        assert!(url.contains("from-url"));
        assert!(!url.contains("from-path"));

        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("DB_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_cache_variables() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CACHE_ENABLED", "false");
            env::set_var("CACHE_DEFAULT_EXPIRATION_SECS", "0");
            env::set_var("CACHE_NEGATIVE_TTL_SECS", "15");
        }

        let config = Config::from_env().unwrap();

        assert!(!config.cache_enabled);
        assert_eq!(config.cache_default_expiration(), Duration::ZERO);
        assert_eq!(config.cache_negative_ttl_secs, Some(15));

        unsafe {
            env::set_var("CACHE_DEFAULT_EXPIRATION_SECS", "soon");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("CACHE_ENABLED");
            env::remove_var("CACHE_DEFAULT_EXPIRATION_SECS");
            env::remove_var("CACHE_NEGATIVE_TTL_SECS");
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_rejects_invalid_settings() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("DATABASE_URL", "sqlite::memory:");
            env::set_var("STORE_TIMEOUT_MS", "0");
        }
        assert!(load_from_env().is_err());

        unsafe {
            env::set_var("STORE_TIMEOUT_MS", "250");
            env::set_var("DATABASE_URL", "postgres://localhost/links");
        }
        assert!(load_from_env().is_err());

        unsafe {
            env::set_var("DATABASE_URL", "sqlite::memory:");
        }
        assert!(load_from_env().is_ok());

        unsafe {
            env::remove_var("DATABASE_URL");
            env::remove_var("STORE_TIMEOUT_MS");
        }
    }
}
