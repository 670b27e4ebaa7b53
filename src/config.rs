//! Server configuration from environment variables
//!
//! | Variable                   | Default              |
//! |----------------------------|----------------------|
//! | `CATALOG_PATH`             | `data/variants.csv`  |
//! | `PORT`                     | `3000`               |
//! | `FETCH_TIMEOUT_MS`         | `2000`               |
//! | `AVAILABLE_CACHE_TTL_SECS` | `60`                 |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CATALOG_PATH: &str = "data/variants.csv";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_AVAILABLE_CACHE_TTL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Variant catalog file (.parquet or .csv)
    pub catalog_path: PathBuf,
    pub port: u16,
    /// Caller-level bound on one comparison, fetch included
    pub fetch_timeout: Duration,
    /// How long `GET /compare/available` responses are cached
    pub available_cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            port: DEFAULT_PORT,
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            available_cache_ttl: Duration::from_secs(DEFAULT_AVAILABLE_CACHE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let catalog_path = lookup("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        Self {
            catalog_path,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            fetch_timeout: Duration::from_millis(parse_or(
                &lookup,
                "FETCH_TIMEOUT_MS",
                DEFAULT_FETCH_TIMEOUT_MS,
            )),
            available_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "AVAILABLE_CACHE_TTL_SECS",
                DEFAULT_AVAILABLE_CACHE_TTL_SECS,
            )),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {}={:?}, using default {}", key, raw, default);
            default
        }),
    }
}
