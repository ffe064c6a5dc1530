//! Configuration management
//!
//! Everything is sourced from environment variables (with `.env` support via
//! dotenvy) so that ingestion scripts run unchanged between a developer
//! laptop and a scheduled crawler container.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/sanctions";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 1;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default directory for CSV exports.
pub const DEFAULT_EXPORT_DIR: &str = "./data/exports";

/// Default S3 region when none is configured.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Ingestion run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

/// Object storage configuration.
///
/// `secret_key` is optional on purpose: without it the archive layer is
/// disabled with a warning rather than failing the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub path_style: bool,
}

/// CSV export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

impl Config {
    /// Load configuration from the environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            database: DatabaseConfig::from_env(),
            storage: StorageConfig::from_env(),
            export: ExportConfig::from_env(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the loaded configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }
        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }
        if self.storage.bucket.is_empty() {
            anyhow::bail!("AWS_BUCKET must not be empty");
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
            connect_timeout_secs: env::var("DATABASE_CONNECT_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            bucket: env::var("AWS_BUCKET").unwrap_or_else(|_| "sanctions-data".to_string()),
            access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl ExportConfig {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EXPORT_DIR)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Constructed directly rather than via from_env: tests run in
    // parallel and must not touch process-wide environment state.
    #[test]
    fn test_database_defaults_are_valid() {
        let config = Config {
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
            },
            storage: StorageConfig {
                endpoint: None,
                region: DEFAULT_S3_REGION.to_string(),
                bucket: "sanctions-data".to_string(),
                access_key: None,
                secret_key: None,
                path_style: false,
            },
            export: ExportConfig {
                dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            },
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(
            config.database.max_connections,
            DEFAULT_DATABASE_MAX_CONNECTIONS
        );
    }

    #[test]
    fn test_validate_rejects_bad_pool_bounds() {
        let mut config = Config {
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: 2,
                min_connections: 5,
                connect_timeout_secs: 10,
            },
            storage: StorageConfig {
                endpoint: None,
                region: DEFAULT_S3_REGION.to_string(),
                bucket: "bucket".to_string(),
                access_key: None,
                secret_key: None,
                path_style: false,
            },
            export: ExportConfig {
                dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            },
        };
        assert!(config.validate().is_err());

        config.database.min_connections = 1;
        assert!(config.validate().is_ok());
    }
}
