//! The sanctioned-entity data model.
//!
//! An [`Entity`] owns its child records ([`Alias`], [`Address`],
//! [`Identifier`], [`Nationality`], [`Birth`]) in memory; saving an entity
//! persists the whole family in one transaction. Derived values (display
//! name, resolved country) are computed from the raw columns at read time
//! and never stored.

pub mod entity;
pub mod parts;
pub mod records;

pub use entity::{Entity, EntityType};
pub use parts::{CountryFields, NameParts};
pub use records::{Address, Alias, AliasQuality, Birth, BirthQuality, Identifier, Nationality};

/// A record kind backed by one relational table and one CSV export.
///
/// `to_row` flattens the record into ordered key/value columns; the first
/// row's keys become the CSV header.
pub trait TableRecord:
    for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin
{
    /// Backing table name.
    const TABLE: &'static str;

    /// Export file stem, e.g. `"aliases"` for `aliases.csv`.
    const EXPORT_NAME: &'static str;

    /// Flatten into ordered CSV columns.
    fn to_row(&self) -> Vec<(&'static str, Option<String>)>;
}
