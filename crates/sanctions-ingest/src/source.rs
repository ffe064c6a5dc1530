//! Ingestion session for one watchlist source.
//!
//! A [`Source`] is the context object for a single run: it owns the store
//! handle, the optional archive bucket, and the run date stamp. Opening a
//! source resets the schema, so one run always rebuilds the source's data
//! from scratch.

use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

use sanctions_common::slugify;

use crate::archive::Archive;
use crate::config::Config;
use crate::db::Store;
use crate::export;
use crate::model::Entity;

/// Compose the deterministic entity id from the source name and slugified
/// key parts, skipping parts with nothing slug-worthy in them.
pub fn entity_id(source: &str, keys: &[&str]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(keys.len() + 1);
    parts.push(slugify(source).unwrap_or_else(|| source.to_string()));
    parts.extend(keys.iter().filter_map(|key| slugify(key)));
    parts.join("-")
}

/// One ingestion run of a watchlist source.
pub struct Source {
    name: String,
    run: String,
    store: Store,
    archive: Option<Archive>,
    export_dir: PathBuf,
    entity_count: u64,
}

impl Source {
    /// Open a session with configuration from the environment.
    pub async fn open(name: &str) -> Result<Self> {
        let config = Config::load()?;
        Self::open_with(name, &config).await
    }

    /// Open a session with explicit configuration: connect the pool, acquire
    /// the archive bucket (soft-fail), stamp the run date, and reset the
    /// schema.
    pub async fn open_with(name: &str, config: &Config) -> Result<Self> {
        let store = Store::connect(&config.database).await?;
        store.reset_schema().await?;
        let archive = Archive::from_config(&config.storage);
        let run = Utc::now().date_naive().to_string();

        info!(source = name, run = %run, "Ingestion run started");

        Ok(Self {
            name: name.to_string(),
            run,
            store,
            archive,
            export_dir: config.export.dir.clone(),
            entity_count: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run date stamp used in archive keys.
    pub fn run(&self) -> &str {
        &self.run
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn entity_count(&self) -> u64 {
        self.entity_count
    }

    /// Create a new entity with a deterministic id from the key parts.
    ///
    /// The entity is not persisted until `entity.save(source.store())` is
    /// called. Reusing the same key parts yields the same id; saving it
    /// again overwrites the earlier record.
    pub fn create_entity(&mut self, keys: &[&str]) -> Entity {
        let id = entity_id(&self.name, keys);
        self.entity_count += 1;
        Entity::new(&self.name, id)
    }

    /// Upload one entity's JSON document, if the archive is enabled.
    pub async fn archive_entity(&self, entity: &Entity) -> Result<()> {
        if let Some(archive) = &self.archive {
            archive.upload_entity(entity).await?;
        }
        Ok(())
    }

    /// Export all record kinds to CSV and upload each produced file.
    pub async fn generate_csv(&self) -> Result<Vec<PathBuf>> {
        let produced = export::export_all(
            &self.store,
            &self.export_dir,
            self.archive.as_ref(),
            &self.name,
            &self.run,
        )
        .await?;
        Ok(produced)
    }

    /// Log the run summary, generate exports, and close the store.
    ///
    /// The pool is closed even when the export step fails.
    pub async fn finish(self) -> Result<()> {
        info!(source = %self.name, "Parsed {} entities", self.entity_count);
        let result = self.generate_csv().await;
        self.store.close().await;
        result.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;

    #[test]
    fn test_entity_id_composition() {
        assert_eq!(entity_id("ofac", &["Acme", "Corp"]), "ofac-acme-corp");
        assert_eq!(entity_id("ofac", &["SDN-12345"]), "ofac-sdn-12345");
    }

    #[test]
    fn test_entity_id_skips_empty_keys() {
        assert_eq!(entity_id("ofac", &["Acme", "", "***"]), "ofac-acme");
        assert_eq!(entity_id("ofac", &[]), "ofac");
    }

    #[test]
    fn test_entity_id_is_deterministic() {
        let a = entity_id("eu", &["Jane", "DOE"]);
        let b = entity_id("eu", &["Jane", "DOE"]);
        assert_eq!(a, b);
        assert_eq!(a, "eu-jane-doe");
    }

    #[tokio::test]
    async fn test_finish_closes_store_when_export_fails() {
        // An export dir nested under a regular file cannot be created, so
        // the export step fails before any query is issued.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let export_dir = blocker.path().join("exports");

        let store = Store::connect_lazy(&DatabaseConfig {
            url: "postgresql://localhost/sanctions".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
        })
        .unwrap();
        let pool = store.pool().clone();

        let source = Source {
            name: "ofac".to_string(),
            run: "2026-08-29".to_string(),
            store,
            archive: None,
            export_dir,
            entity_count: 0,
        };

        assert!(source.finish().await.is_err());
        assert!(pool.is_closed());
    }
}
