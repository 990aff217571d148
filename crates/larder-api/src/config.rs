//! Configuration management for the larder service.
//!
//! Configuration is loaded in priority order: environment variables
//! (highest), an optional `config.toml`, then built-in defaults. Database
//! credentials are deliberately default-free: `DB_NAME`, `DB_USER`, and
//! `DB_PASSWORD` must be supplied explicitly or loading fails.

use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

const CONFIG_FILE: &str = "config.toml";

/// Minimum number of pooled connections. Fixed by design.
pub const POOL_MIN_CONNECTIONS: u32 = 1;

/// Maximum number of pooled connections. Fixed by design; this is the
/// binding concurrency limit for simultaneous in-flight database work.
pub const POOL_MAX_CONNECTIONS: u32 = 10;

/// Complete service configuration.
///
/// # Example
///
/// ```no_run
/// use larder_api::Config;
///
/// let config = Config::load().expect("DB_NAME, DB_USER and DB_PASSWORD must be set");
/// println!("listening on {}:{}", config.host, config.port);
/// ```
#[derive(Clone, Deserialize)]
pub struct Config {
    // Database
    /// Database name. Environment variable: `DB_NAME`. No default.
    #[serde(alias = "DB_NAME")]
    pub db_name: String,
    /// Database user. Environment variable: `DB_USER`. No default.
    #[serde(alias = "DB_USER")]
    pub db_user: String,
    /// Database password. Environment variable: `DB_PASSWORD`. No default,
    /// and never printed.
    #[serde(alias = "DB_PASSWORD")]
    pub db_password: String,
    /// Database host. Environment variable: `DB_HOST`. Default: `localhost`.
    #[serde(default = "default_db_host", alias = "DB_HOST")]
    pub db_host: String,
    /// Database port. Environment variable: `DB_PORT`. Default: `5432`.
    #[serde(default = "default_db_port", alias = "DB_PORT")]
    pub db_port: u16,
    /// TLS mode, one of the libpq-style values (`disable`, `allow`,
    /// `prefer`, `require`, `verify-ca`, `verify-full`). Environment
    /// variable: `SSL_MODE`. Default: `require`.
    #[serde(default = "default_ssl_mode", alias = "SSL_MODE")]
    pub ssl_mode: String,
    /// Seconds to wait for a pooled connection before giving up; a timed-out
    /// acquire surfaces as service-unavailable. Environment variable:
    /// `DATABASE_ACQUIRE_TIMEOUT`. Default: `10`.
    #[serde(default = "default_acquire_timeout", alias = "DATABASE_ACQUIRE_TIMEOUT")]
    pub database_acquire_timeout: u64,

    // Server
    /// Server bind address. Environment variable: `HOST`. Default: `127.0.0.1`.
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port. Environment variable: `PORT`. Default: `8080`.
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
}

impl Config {
    /// Loads configuration from environment variables, `config.toml`, and
    /// built-in defaults, in that priority order.
    ///
    /// # Errors
    ///
    /// Fails when a credential (`DB_NAME`, `DB_USER`, `DB_PASSWORD`) is
    /// missing from every source, or when a value fails validation.
    pub fn load() -> Result<Self> {
        let figment = Figment::new().merge(Toml::file(CONFIG_FILE)).merge(Env::prefixed(""));

        let config: Self = figment
            .extract()
            .context("failed to load configuration (DB_NAME, DB_USER and DB_PASSWORD are required)")?;
        config.validate()?;
        Ok(config)
    }

    /// Builds connection options for the configured database.
    ///
    /// # Errors
    ///
    /// Fails when `ssl_mode` is not one of the recognized values.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
            .with_context(|| format!("invalid SSL_MODE value: {}", self.ssl_mode))?;

        Ok(PgConnectOptions::new_without_pgpass()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name)
            .ssl_mode(ssl_mode))
    }

    /// Creates the bounded connection pool (min=1, max=10).
    ///
    /// The pool object is created eagerly; physical connections are opened
    /// on demand, so an unreachable database surfaces per-request rather
    /// than at startup.
    ///
    /// # Errors
    ///
    /// Fails when the connection options cannot be built.
    pub fn create_pool(&self) -> Result<PgPool> {
        let options = self.connect_options()?;

        Ok(PgPoolOptions::new()
            .min_connections(POOL_MIN_CONNECTIONS)
            .max_connections(POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(self.database_acquire_timeout))
            .connect_lazy_with(options))
    }

    /// Parses the server socket address from host and port.
    ///
    /// # Errors
    ///
    /// Fails when host/port do not form a valid socket address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("invalid server address")
    }

    /// Validates configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.db_port == 0 {
            anyhow::bail!("DB_PORT must be greater than 0");
        }

        if self.db_name.is_empty() {
            anyhow::bail!("DB_NAME must not be empty");
        }

        if self.db_user.is_empty() {
            anyhow::bail!("DB_USER must not be empty");
        }

        if self.database_acquire_timeout == 0 {
            anyhow::bail!("DATABASE_ACQUIRE_TIMEOUT must be greater than 0");
        }

        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("ssl_mode", &self.ssl_mode)
            .field("database_acquire_timeout", &self.database_acquire_timeout)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_ssl_mode() -> String {
    "require".to_string()
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, env, sync::Mutex};

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 9] = [
        "DB_NAME",
        "DB_USER",
        "DB_PASSWORD",
        "DB_HOST",
        "DB_PORT",
        "SSL_MODE",
        "DATABASE_ACQUIRE_TIMEOUT",
        "HOST",
        "PORT",
    ];

    struct TestEnvGuard {
        _lock: std::sync::MutexGuard<'static, ()>,
        originals: HashMap<String, Option<String>>,
    }

    impl TestEnvGuard {
        /// Locks the environment and clears every config variable so each
        /// test starts from a known-empty state.
        fn new() -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let mut originals = HashMap::new();
            for var in ALL_VARS {
                originals.insert(var.to_string(), env::var(var).ok());
                env::remove_var(var);
            }
            Self { _lock: lock, originals }
        }

        fn set_var(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
        }
    }

    impl Drop for TestEnvGuard {
        fn drop(&mut self) {
            for (var, original) in &self.originals {
                match original {
                    Some(value) => env::set_var(var, value),
                    None => env::remove_var(var),
                }
            }
        }
    }

    fn base_config() -> Config {
        Config {
            db_name: "larder".to_string(),
            db_user: "larder".to_string(),
            db_password: "secret123".to_string(),
            db_host: default_db_host(),
            db_port: default_db_port(),
            ssl_mode: default_ssl_mode(),
            database_acquire_timeout: default_acquire_timeout(),
            host: default_host(),
            port: default_port(),
        }
    }

    #[test]
    fn defaults_fill_in_around_required_credentials() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("DB_NAME", "larder");
        guard.set_var("DB_USER", "larder");
        guard.set_var("DB_PASSWORD", "secret123");

        let config = Config::load().expect("config should load with credentials set");

        assert_eq!(config.db_name, "larder");
        assert_eq!(config.db_user, "larder");
        assert_eq!(config.db_host, "localhost");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.ssl_mode, "require");
        assert_eq!(config.database_acquire_timeout, 10);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn load_fails_without_credentials() {
        let _guard = TestEnvGuard::new();

        assert!(Config::load().is_err(), "credentials have no defaults");
    }

    #[test]
    fn env_overrides_apply() {
        let mut guard = TestEnvGuard::new();
        guard.set_var("DB_NAME", "pantry");
        guard.set_var("DB_USER", "cook");
        guard.set_var("DB_PASSWORD", "hunter2");
        guard.set_var("DB_HOST", "db.internal");
        guard.set_var("DB_PORT", "6543");
        guard.set_var("SSL_MODE", "disable");
        guard.set_var("HOST", "0.0.0.0");
        guard.set_var("PORT", "9090");

        let config = Config::load().expect("config should load with env overrides");

        assert_eq!(config.db_name, "pantry");
        assert_eq!(config.db_host, "db.internal");
        assert_eq!(config.db_port, 6543);
        assert_eq!(config.ssl_mode, "disable");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn invalid_values_fail_validation() {
        let mut config = base_config();
        config.port = 0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.db_port = 0;
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.db_name = String::new();
        assert!(config.validate().is_err());

        let mut config = base_config();
        config.database_acquire_timeout = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = base_config();
        let printed = format!("{config:?}");

        assert!(!printed.contains("secret123"));
        assert!(printed.contains("***"));
        assert!(printed.contains("larder"));
    }

    #[test]
    fn invalid_ssl_mode_is_rejected() {
        let mut config = base_config();
        config.ssl_mode = "definitely-not-a-mode".to_string();

        assert!(config.connect_options().is_err());
    }

    #[test]
    fn recognized_ssl_modes_are_accepted() {
        for mode in ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"] {
            let mut config = base_config();
            config.ssl_mode = mode.to_string();
            assert!(config.connect_options().is_ok(), "mode {mode} should parse");
        }
    }

    #[test]
    fn socket_address_parsing() {
        let mut config = base_config();
        config.host = "127.0.0.1".to_string();
        config.port = 9000;

        let addr = config.parse_server_addr().expect("should parse socket address");

        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 9000);
    }
}
