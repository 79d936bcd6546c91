use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// Which persistence backend the store writes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => bail!("Unknown STORAGE_BACKEND '{other}' (expected memory, file, redis or postgres)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub storage_backend: StorageBackend,
    /// Root directory for the file backend; blobs live under `<data_dir>/<namespace>/`.
    pub data_dir: PathBuf,
    pub redis_url: Option<String>,
    pub database_url: Option<String>,
    /// Scopes persisted state to one user/session.
    pub storage_namespace: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            storage_backend: std::env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "file".to_string())
                .parse()?,
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            redis_url: optional_env("REDIS_URL"),
            database_url: optional_env("DATABASE_URL"),
            storage_namespace: parse_namespace(
                &std::env::var("STORAGE_NAMESPACE").unwrap_or_else(|_| "default".to_string()),
            )?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Namespaces become directory names and key prefixes, so keep them to a safe charset.
fn parse_namespace(raw: &str) -> Result<String> {
    let ns = raw.trim();
    if ns.is_empty()
        || !ns
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        bail!("STORAGE_NAMESPACE must be non-empty and contain only [A-Za-z0-9_-], got '{raw}'");
    }
    Ok(ns.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("file".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!(" Redis ".parse::<StorageBackend>().unwrap(), StorageBackend::Redis);
        assert_eq!(
            "postgresql".parse::<StorageBackend>().unwrap(),
            StorageBackend::Postgres
        );
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_namespace_validation() {
        assert_eq!(parse_namespace("alice-01").unwrap(), "alice-01");
        assert!(parse_namespace("").is_err());
        assert!(parse_namespace("../etc").is_err());
    }
}
