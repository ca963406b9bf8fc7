use anyhow::{Context, bail};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    MySql,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "mysql" => Ok(Self::MySql),
            other => bail!("unknown STORE_BACKEND `{other}` (expected `memory` or `mysql`)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub roster_path: Option<String>,

    /// Upper bound for any single backing-store or roster call.
    pub store_timeout: Duration,

    pub stats_cache_ttl: Duration,
    pub stats_cache_capacity: u64,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub log_dir: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a valid number"))
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let store_backend: StoreBackend = var_or("STORE_BACKEND", "memory").parse()?;
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store_backend == StoreBackend::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE_BACKEND=mysql");
        }

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            store_backend,
            database_url,
            roster_path: env::var("ROSTER_PATH").ok().filter(|p| !p.is_empty()),
            store_timeout: Duration::from_millis(parse_var("STORE_TIMEOUT_MS", "5000")?),
            stats_cache_ttl: Duration::from_secs(parse_var("STATS_CACHE_TTL_SECS", "300")?),
            stats_cache_capacity: parse_var("STATS_CACHE_CAPACITY", "10000")?,
            rate_protected_per_min: parse_var("RATE_PROTECTED_PER_MIN", "1000")?,
            api_prefix: var_or("API_PREFIX", "/api"),
            log_dir: var_or("LOG_DIR", "logs"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!("MySQL".parse::<StoreBackend>().unwrap(), StoreBackend::MySql);
        assert_eq!(" memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        let value: u64 = parse_var("HRM_ATTENDANCE_TEST_UNSET_VARIABLE", "42").unwrap();
        assert_eq!(value, 42);
    }
}
