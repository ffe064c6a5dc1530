//! Object-storage archive for exported artifacts.
//!
//! CSV exports land under a versioned key per run, then get copied
//! server-side to a `latest` alias so consumers always have a stable URL.
//! Entity JSON documents are uploaded individually. All objects are
//! public-read; this is published data.
//!
//! The archive is optional by design: without a configured secret key the
//! whole layer is disabled with a warning and every caller skips uploads.

use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use std::path::Path;
use tracing::{info, warn};

use sanctions_common::{Result, SanctionsError};

use crate::config::StorageConfig;
use crate::model::Entity;

/// Run segment used for the stable alias key.
pub const LATEST: &str = "latest";

/// Key for a CSV export: `v1/sources/{source}/{run}/{filename}`.
pub fn csv_key(source: &str, run: &str, file_name: &str) -> String {
    format!("v1/sources/{}/{}/{}", source, run, file_name)
}

/// Key for an entity document: `v1/entities/{source}/{id}`.
pub fn entity_key(source: &str, entity_id: &str) -> String {
    format!("v1/entities/{}/{}", source, entity_id)
}

/// S3 client bound to the archive bucket.
#[derive(Clone)]
pub struct Archive {
    client: Client,
    bucket: String,
}

impl Archive {
    /// Build the archive from storage configuration.
    ///
    /// Returns `None` when no secret key is configured; uploads are then
    /// disabled for the run rather than failing it.
    pub fn from_config(config: &StorageConfig) -> Option<Self> {
        let Some(secret_key) = config.secret_key.as_deref() else {
            warn!("No $AWS_SECRET_ACCESS_KEY defined, skipping uploads");
            return None;
        };
        let access_key = config.access_key.as_deref().unwrap_or_default();

        let credentials =
            Credentials::new(access_key, secret_key, None, None, "sanctions-archive");

        let mut builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(builder.build());
        info!(bucket = %config.bucket, "Archive bucket configured");

        Some(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    /// Load storage configuration from the environment and build the archive.
    pub fn from_env() -> Option<Self> {
        Self::from_config(&StorageConfig::from_env())
    }

    /// Upload one exported CSV under its run key, then copy it to the
    /// `latest` alias for the same source and file.
    pub async fn upload_csv(&self, source: &str, run: &str, file_path: &Path) -> Result<()> {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SanctionsError::storage(format!("Invalid export path: {}", file_path.display()))
            })?;

        let key = csv_key(source, run, file_name);
        info!("Uploading [{}]: {}", self.bucket, key);

        let body = ByteStream::from_path(file_path)
            .await
            .map_err(|e| SanctionsError::storage(format!("Failed to read {}: {}", file_path.display(), e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body)
            .content_type("text/csv")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| SanctionsError::storage(format!("Failed to upload {}: {}", key, e)))?;

        let latest_key = csv_key(source, LATEST, file_name);
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, key))
            .key(&latest_key)
            .content_type("text/csv")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| SanctionsError::storage(format!("Failed to copy {} to {}: {}", key, latest_key, e)))?;

        Ok(())
    }

    /// Upload one entity's pruned JSON document.
    pub async fn upload_entity(&self, entity: &Entity) -> Result<()> {
        let Some(document) = entity.to_json() else {
            return Ok(());
        };
        let body = serde_json::to_vec(&document)?;

        let key = entity_key(&entity.source, &entity.id);
        info!("Uploading [{}]: {}", self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| SanctionsError::storage(format!("Failed to upload {}: {}", key, e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_schemes() {
        assert_eq!(
            csv_key("ofac", "2017-03-08", "entities.csv"),
            "v1/sources/ofac/2017-03-08/entities.csv"
        );
        assert_eq!(
            csv_key("ofac", LATEST, "entities.csv"),
            "v1/sources/ofac/latest/entities.csv"
        );
        assert_eq!(
            entity_key("ofac", "ofac-acme-corp"),
            "v1/entities/ofac/ofac-acme-corp"
        );
    }

    #[test]
    fn test_missing_secret_disables_archive() {
        let config = StorageConfig {
            endpoint: None,
            region: "us-east-1".to_string(),
            bucket: "sanctions-data".to_string(),
            access_key: Some("key".to_string()),
            secret_key: None,
            path_style: false,
        };
        assert!(Archive::from_config(&config).is_none());
    }

    #[test]
    fn test_secret_enables_archive() {
        let config = StorageConfig {
            endpoint: Some("http://localhost:9000".to_string()),
            region: "us-east-1".to_string(),
            bucket: "sanctions-data".to_string(),
            access_key: Some("key".to_string()),
            secret_key: Some("secret".to_string()),
            path_style: true,
        };
        let archive = Archive::from_config(&config);
        assert!(archive.is_some());
    }
}
