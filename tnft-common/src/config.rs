//! Configuration loading and resolution
//!
//! Every field resolves with the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Resolution happens once at process start; the resulting [`ServiceConfig`]
//! is immutable and handed to the components that need it.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Canonical content-addressed gateway used when nothing overrides it
pub const DEFAULT_IPFS_GATEWAY: &str = "https://ipfs.ternoa.dev/ipfs";

/// Remote descriptor fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 8000;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_IPFS_GATEWAY: &str = "TNFT_IPFS_GATEWAY";
pub const ENV_FETCH_TIMEOUT_MS: &str = "TNFT_IPFS_FETCH_TIMEOUT_MS";
pub const ENV_BIND_ADDR: &str = "TNFT_BIND_ADDR";
pub const ENV_DATABASE: &str = "TNFT_DATABASE";
pub const ENV_LOG_LEVEL: &str = "TNFT_LOG_LEVEL";

/// Optional values read from a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub ipfs_gateway: Option<String>,
    pub fetch_timeout_ms: Option<u64>,
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub ipfs_gateway: Option<String>,
    pub fetch_timeout_ms: Option<u64>,
    pub bind_addr: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Settings consumed by the enrichment pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentConfig {
    /// Canonical gateway base, never ends with '/'
    pub ipfs_gateway: String,
    pub fetch_timeout: Duration,
}

impl EnrichmentConfig {
    pub fn new(ipfs_gateway: &str, fetch_timeout: Duration) -> Self {
        Self {
            ipfs_gateway: ipfs_gateway.trim_end_matches('/').to_string(),
            fetch_timeout,
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_IPFS_GATEWAY,
            Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
        )
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub log_level: String,
    pub enrichment: EnrichmentConfig,
}

impl ServiceConfig {
    /// Resolve every field from CLI, environment, TOML, then defaults
    pub fn resolve(cli: &CliOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let ipfs_gateway = pick(
            cli.ipfs_gateway.clone(),
            ENV_IPFS_GATEWAY,
            toml_config.ipfs_gateway.clone(),
        )?
        .unwrap_or_else(|| DEFAULT_IPFS_GATEWAY.to_string());

        if ipfs_gateway.trim_end_matches('/').is_empty() {
            return Err(Error::Config("IPFS gateway must not be empty".to_string()));
        }

        let fetch_timeout_ms = pick(
            cli.fetch_timeout_ms,
            ENV_FETCH_TIMEOUT_MS,
            toml_config.fetch_timeout_ms,
        )?
        .unwrap_or(DEFAULT_FETCH_TIMEOUT_MS);

        let bind_addr = pick(
            cli.bind_addr.clone(),
            ENV_BIND_ADDR,
            toml_config.bind_addr.clone(),
        )?
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let database_path = pick(
            cli.database_path.clone(),
            ENV_DATABASE,
            toml_config.database_path.clone(),
        )?
        .unwrap_or_else(default_database_path);

        let log_level = pick(
            cli.log_level.clone(),
            ENV_LOG_LEVEL,
            toml_config.log_level.clone(),
        )?
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            bind_addr,
            database_path,
            log_level,
            enrichment: EnrichmentConfig::new(
                &ipfs_gateway,
                Duration::from_millis(fetch_timeout_ms),
            ),
        })
    }
}

/// First value found among CLI, environment and TOML
///
/// An empty environment variable counts as unset.
fn pick<T>(cli: Option<T>, env_var_name: &str, toml_value: Option<T>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if cli.is_some() {
        debug!(setting = env_var_name, "Using command-line value");
        return Ok(cli);
    }

    if let Ok(raw) = std::env::var(env_var_name) {
        let raw = raw.trim();
        if !raw.is_empty() {
            debug!(setting = env_var_name, "Using environment value");
            return raw
                .parse::<T>()
                .map(Some)
                .map_err(|e| Error::Config(format!("{}={:?}: {}", env_var_name, raw, e)));
        }
    }

    Ok(toml_value)
}

/// OS-dependent default database location
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tnft").join("tnft.db"))
        .unwrap_or_else(|| PathBuf::from("./tnft_data/tnft.db"))
}
