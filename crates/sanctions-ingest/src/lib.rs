//! Sanctions Ingest Library
//!
//! Models sanctioned entities scraped from government watchlists, persists
//! them to Postgres, and exports them as CSV and JSON to object storage.
//!
//! A source-specific scraper drives the library through a [`Source`]
//! session:
//!
//! ```no_run
//! use sanctions_ingest::Source;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut source = Source::open("ofac").await?;
//!
//!     let mut entity = source.create_entity(&["Acme", "Corp"]);
//!     entity.names.name = Some("Acme Corp".to_string());
//!     entity.set_listed_at("16 Jul 2014");
//!     entity.create_nationality().country.set_country("Germany");
//!     entity.save(source.store()).await?;
//!     source.archive_entity(&entity).await?;
//!
//!     source.finish().await?;
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod countries;
pub mod dates;
pub mod db;
pub mod export;
pub mod model;
pub mod source;

pub use archive::Archive;
pub use config::Config;
pub use db::Store;
pub use model::{Address, Alias, Birth, Entity, EntityType, Identifier, Nationality};
pub use source::Source;
