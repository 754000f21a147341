//! Server configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `STORE_BACKEND` | `postgres` (`memory` for a throwaway process-local store) |
//! | `DATABASE_URL` | `postgres://localhost/journal` |
//! | `DB_MAX_CONNECTIONS` / `DB_MIN_CONNECTIONS` | 10 / 1 |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | 30 |
//! | `DB_IDLE_TIMEOUT_SECS` | 600 |
//! | `DB_POOL_STATS_SECS` | 60 (0 disables pool stats logging) |
//! | `RUN_MIGRATIONS` | `true` |
//! | `HOST` / `PORT` | `0.0.0.0` / `3000` |
//! | `ALLOWED_ORIGINS` | `http://localhost:3000` |
//! | `UPLOADTHING_SECRET` | unset (attachment cleanup disabled) |
//! | `UPLOADTHING_API_URL` | `https://api.uploadthing.com` |
//! | `ATTACHMENT_TIMEOUT_SECS` | 10 |

use std::str::FromStr;
use std::time::Duration;

use journal_core::defaults::{ATTACHMENT_TIMEOUT_SECS, UPLOADTHING_API_URL};
use journal_core::{Error, Result};
use journal_db::PoolConfig;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/journal";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_POOL_STATS_SECS: u64 = 60;

/// Which storage backend serves the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(Error::Config(format!(
                "Unknown STORE_BACKEND '{}'. Expected 'postgres' or 'memory'",
                other
            ))),
        }
    }
}

/// Upload service settings.
#[derive(Debug, Clone)]
pub struct AttachmentConfig {
    /// `None` disables attachment cleanup.
    pub secret: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub db_pool: PoolConfig,
    /// `None` disables periodic pool stats.
    pub pool_stats_interval: Option<Duration>,
    pub run_migrations: bool,
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub attachments: AttachmentConfig,
}

impl ApiConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store_backend = match get("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Postgres,
        };

        let port = match get("PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT '{}'", v)))?,
            None => 3000,
        };

        let defaults = PoolConfig::default();
        let db_pool = PoolConfig::new()
            .max_connections(parse_or(&get, "DB_MAX_CONNECTIONS", defaults.max_connections)?)
            .min_connections(parse_or(&get, "DB_MIN_CONNECTIONS", defaults.min_connections)?)
            .acquire_timeout(Duration::from_secs(parse_or(
                &get,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?))
            .idle_timeout(Duration::from_secs(parse_or(
                &get,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout.as_secs(),
            )?));
        db_pool.validate()?;

        let pool_stats_interval =
            match parse_or(&get, "DB_POOL_STATS_SECS", DEFAULT_POOL_STATS_SECS)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };

        let run_migrations = get("RUN_MIGRATIONS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(true);

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let timeout_secs = get("ATTACHMENT_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(ATTACHMENT_TIMEOUT_SECS);

        Ok(Self {
            store_backend,
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            db_pool,
            pool_stats_interval,
            run_migrations,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            allowed_origins,
            attachments: AttachmentConfig {
                secret: get("UPLOADTHING_SECRET"),
                api_url: get("UPLOADTHING_API_URL")
                    .unwrap_or_else(|| UPLOADTHING_API_URL.to_string()),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Parse a numeric variable, falling back to `default` when unset.
fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("Invalid {} '{}'", key, v))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Postgres);
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.db_pool, PoolConfig::default());
        assert_eq!(cfg.pool_stats_interval, Some(Duration::from_secs(60)));
        assert!(cfg.run_migrations);
        assert_eq!(cfg.allowed_origins, vec!["http://localhost:3000"]);
        assert!(cfg.attachments.secret.is_none());
        assert_eq!(cfg.attachments.api_url, "https://api.uploadthing.com");
        assert_eq!(cfg.attachments.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("STORE_BACKEND", "Memory"),
            ("PORT", "8088"),
            ("RUN_MIGRATIONS", "false"),
            ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("UPLOADTHING_SECRET", "sk_live_x"),
        ])
        .unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.port, 8088);
        assert!(!cfg.run_migrations);
        assert_eq!(
            cfg.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(cfg.attachments.secret.as_deref(), Some("sk_live_x"));
    }

    #[test]
    fn test_blank_secret_disables_cleanup() {
        let cfg = config(&[("UPLOADTHING_SECRET", "  ")]).unwrap();
        assert!(cfg.attachments.secret.is_none());
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        assert!(matches!(
            config(&[("STORE_BACKEND", "mongo")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(config(&[("PORT", "http")]), Err(Error::Config(_))));
    }

    #[test]
    fn test_pool_settings() {
        let cfg = config(&[
            ("DB_MAX_CONNECTIONS", "20"),
            ("DB_MIN_CONNECTIONS", "5"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "3"),
            ("DB_IDLE_TIMEOUT_SECS", "120"),
            ("DB_POOL_STATS_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.db_pool.max_connections, 20);
        assert_eq!(cfg.db_pool.min_connections, 5);
        assert_eq!(cfg.db_pool.acquire_timeout, Duration::from_secs(3));
        assert_eq!(cfg.db_pool.idle_timeout, Duration::from_secs(120));
        assert!(cfg.pool_stats_interval.is_none());
    }

    #[test]
    fn test_invalid_pool_settings_are_config_errors() {
        assert!(matches!(
            config(&[("DB_MAX_CONNECTIONS", "2"), ("DB_MIN_CONNECTIONS", "4")]),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            config(&[("DB_ACQUIRE_TIMEOUT_SECS", "soon")]),
            Err(Error::Config(_))
        ));
    }
}
