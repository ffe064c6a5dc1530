//! Relational store for entity records.
//!
//! The schema is fully owned by this crate: every ingestion run starts with
//! [`Store::reset_schema`], which drops and recreates all tables. There is
//! no incremental migration on purpose; a run is a full rebuild of one
//! source's data.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::model::{Entity, TableRecord};

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Database configuration is invalid or missing
    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Tables dropped and recreated by [`Store::reset_schema`].
///
/// Children reference the entity table with ON DELETE CASCADE, so the
/// conceptual parent-owns-children rule is enforced by the schema itself.
const SCHEMA_RESET_SQL: &str = r#"
DROP TABLE IF EXISTS alias, address, identifier, nationality, birth, entity CASCADE;

CREATE TABLE entity (
    id          TEXT PRIMARY KEY,
    source      TEXT NOT NULL,
    "type"      TEXT,
    name        TEXT,
    first_name  TEXT,
    second_name TEXT,
    third_name  TEXT,
    last_name   TEXT,
    summary     TEXT,
    "function"  TEXT,
    program     TEXT,
    listed_at   TEXT,
    updated_at  TEXT,
    timestamp   TIMESTAMPTZ NOT NULL
);

CREATE TABLE alias (
    id          BIGSERIAL PRIMARY KEY,
    entity_id   TEXT NOT NULL REFERENCES entity (id) ON DELETE CASCADE,
    name        TEXT,
    first_name  TEXT,
    second_name TEXT,
    third_name  TEXT,
    last_name   TEXT,
    quality     TEXT,
    "type"      TEXT,
    description TEXT
);

CREATE TABLE address (
    id           BIGSERIAL PRIMARY KEY,
    entity_id    TEXT NOT NULL REFERENCES entity (id) ON DELETE CASCADE,
    text         TEXT,
    note         TEXT,
    street       TEXT,
    street_2     TEXT,
    postal_code  TEXT,
    city         TEXT,
    region       TEXT,
    country_name TEXT,
    country_code TEXT
);

CREATE TABLE identifier (
    id           BIGSERIAL PRIMARY KEY,
    entity_id    TEXT NOT NULL REFERENCES entity (id) ON DELETE CASCADE,
    "type"       TEXT,
    number       TEXT,
    issued_at    TEXT,
    description  TEXT,
    country_name TEXT,
    country_code TEXT
);

CREATE TABLE nationality (
    id           BIGSERIAL PRIMARY KEY,
    entity_id    TEXT NOT NULL REFERENCES entity (id) ON DELETE CASCADE,
    country_name TEXT,
    country_code TEXT
);

CREATE TABLE birth (
    id           BIGSERIAL PRIMARY KEY,
    entity_id    TEXT NOT NULL REFERENCES entity (id) ON DELETE CASCADE,
    date         TEXT,
    place        TEXT,
    "type"       TEXT,
    country_name TEXT,
    country_code TEXT
);
"#;

/// Explicit store handle passed to every database operation.
///
/// One `Store` (and the pool inside it) lives for the duration of a run and
/// is closed explicitly at the end; no process-global session.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Connect a pool using the run configuration.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        if config.url.is_empty() {
            return Err(DbError::Config("DATABASE_URL not set".to_string()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool created"
        );

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drop and recreate the whole schema. Call once at run start.
    pub async fn reset_schema(&self) -> DbResult<()> {
        sqlx::raw_sql(SCHEMA_RESET_SQL).execute(&self.pool).await?;
        info!("Schema dropped and recreated");
        Ok(())
    }

    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(DbError::from)
    }

    /// Upsert an entity row and replace its child rows in one transaction.
    pub async fn save_entity(&self, entity: &Entity) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO entity
                (id, source, "type", name, first_name, second_name, third_name,
                 last_name, summary, "function", program, listed_at, updated_at, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                source      = EXCLUDED.source,
                "type"      = EXCLUDED."type",
                name        = EXCLUDED.name,
                first_name  = EXCLUDED.first_name,
                second_name = EXCLUDED.second_name,
                third_name  = EXCLUDED.third_name,
                last_name   = EXCLUDED.last_name,
                summary     = EXCLUDED.summary,
                "function"  = EXCLUDED."function",
                program     = EXCLUDED.program,
                listed_at   = EXCLUDED.listed_at,
                updated_at  = EXCLUDED.updated_at,
                timestamp   = EXCLUDED.timestamp
            "#,
        )
        .bind(&entity.id)
        .bind(&entity.source)
        .bind(entity.entity_type)
        .bind(&entity.names.name)
        .bind(&entity.names.first_name)
        .bind(&entity.names.second_name)
        .bind(&entity.names.third_name)
        .bind(&entity.names.last_name)
        .bind(&entity.summary)
        .bind(&entity.function)
        .bind(&entity.program)
        .bind(&entity.listed_at)
        .bind(&entity.updated_at)
        .bind(entity.timestamp)
        .execute(&mut *tx)
        .await?;

        // Re-saving replaces the child rows wholesale.
        for table in ["alias", "address", "identifier", "nationality", "birth"] {
            sqlx::query(&format!("DELETE FROM {} WHERE entity_id = $1", table))
                .bind(&entity.id)
                .execute(&mut *tx)
                .await?;
        }

        for alias in &entity.aliases {
            sqlx::query(
                r#"
                INSERT INTO alias
                    (entity_id, name, first_name, second_name, third_name,
                     last_name, quality, "type", description)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(&alias.entity_id)
            .bind(&alias.names.name)
            .bind(&alias.names.first_name)
            .bind(&alias.names.second_name)
            .bind(&alias.names.third_name)
            .bind(&alias.names.last_name)
            .bind(alias.quality)
            .bind(&alias.alias_type)
            .bind(&alias.description)
            .execute(&mut *tx)
            .await?;
        }

        for address in &entity.addresses {
            sqlx::query(
                r#"
                INSERT INTO address
                    (entity_id, text, note, street, street_2, postal_code,
                     city, region, country_name, country_code)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(&address.entity_id)
            .bind(&address.text)
            .bind(&address.note)
            .bind(&address.street)
            .bind(&address.street_2)
            .bind(&address.postal_code)
            .bind(&address.city)
            .bind(&address.region)
            .bind(&address.country.country_name)
            .bind(&address.country.country_code)
            .execute(&mut *tx)
            .await?;
        }

        for identifier in &entity.identifiers {
            sqlx::query(
                r#"
                INSERT INTO identifier
                    (entity_id, "type", number, issued_at, description,
                     country_name, country_code)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&identifier.entity_id)
            .bind(&identifier.document_type)
            .bind(&identifier.number)
            .bind(&identifier.issued_at)
            .bind(&identifier.description)
            .bind(&identifier.country.country_name)
            .bind(&identifier.country.country_code)
            .execute(&mut *tx)
            .await?;
        }

        for nationality in &entity.nationalities {
            sqlx::query(
                "INSERT INTO nationality (entity_id, country_name, country_code) VALUES ($1, $2, $3)",
            )
            .bind(&nationality.entity_id)
            .bind(&nationality.country.country_name)
            .bind(&nationality.country.country_code)
            .execute(&mut *tx)
            .await?;
        }

        for birth in &entity.births {
            sqlx::query(
                r#"
                INSERT INTO birth
                    (entity_id, date, place, "type", country_name, country_code)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&birth.entity_id)
            .bind(&birth.date)
            .bind(&birth.place)
            .bind(birth.quality)
            .bind(&birth.country.country_name)
            .bind(&birth.country.country_code)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Load every record of one kind; export streams instead, this is for
    /// callers that want the whole table.
    pub async fn fetch_all<T: TableRecord>(&self) -> DbResult<Vec<T>> {
        let records = sqlx::query_as::<_, T>(&select_all_sql::<T>())
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Close the pool explicitly at the end of a run.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
impl Store {
    /// Pool handle that only connects on first use, for lifecycle tests
    /// that never reach a live server.
    pub(crate) fn connect_lazy(config: &DatabaseConfig) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url)?;
        Ok(Self { pool })
    }
}

/// SELECT statement covering all rows of a record kind.
pub fn select_all_sql<T: TableRecord>() -> String {
    format!("SELECT * FROM {}", T::TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alias, Birth};

    #[test]
    fn test_select_all_sql() {
        assert_eq!(select_all_sql::<Entity>(), "SELECT * FROM entity");
        assert_eq!(select_all_sql::<Alias>(), "SELECT * FROM alias");
        assert_eq!(select_all_sql::<Birth>(), "SELECT * FROM birth");
    }

    #[test]
    fn test_schema_covers_every_export_table() {
        for table in ["entity", "alias", "address", "identifier", "nationality", "birth"] {
            assert!(
                SCHEMA_RESET_SQL.contains(&format!("CREATE TABLE {}", table)),
                "missing table {}",
                table
            );
        }
    }

    #[test]
    fn test_connect_rejects_empty_url() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_secs: 1,
        };
        let result = futures::executor::block_on(Store::connect(&config));
        assert!(matches!(result, Err(DbError::Config(_))));
    }
}
