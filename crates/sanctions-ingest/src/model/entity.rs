//! The canonical sanctioned-entity record.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::parts::{opt_value, NameParts};
use super::records::{Address, Alias, Birth, Identifier, Nationality};
use super::TableRecord;
use crate::dates;
use crate::db::{DbResult, Store};
use sanctions_common::clean_value;

/// Whether a record describes an organization or a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum EntityType {
    Entity,
    Individual,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Entity => "entity",
            EntityType::Individual => "individual",
        }
    }
}

/// A company or person subject to a sanction.
///
/// The entity owns its child records in memory; [`Entity::save`] persists
/// the whole family in one transaction and refreshes `timestamp`. Listing
/// and update dates pass through [`dates::parse_date`] on assignment, so an
/// unreadable source date becomes `None` instead of failing the run.
#[derive(Debug, Clone, FromRow)]
pub struct Entity {
    pub id: String,
    pub source: String,
    #[sqlx(rename = "type")]
    pub entity_type: Option<EntityType>,
    #[sqlx(flatten)]
    pub names: NameParts,
    pub summary: Option<String>,
    pub function: Option<String>,
    pub program: Option<String>,
    pub listed_at: Option<String>,
    pub updated_at: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[sqlx(skip)]
    pub aliases: Vec<Alias>,
    #[sqlx(skip)]
    pub addresses: Vec<Address>,
    #[sqlx(skip)]
    pub identifiers: Vec<Identifier>,
    #[sqlx(skip)]
    pub nationalities: Vec<Nationality>,
    #[sqlx(skip)]
    pub births: Vec<Birth>,
}

impl Entity {
    pub fn new(source: &str, id: String) -> Self {
        Self {
            id,
            source: source.to_string(),
            entity_type: None,
            names: NameParts::default(),
            summary: None,
            function: None,
            program: None,
            listed_at: None,
            updated_at: None,
            timestamp: Utc::now(),
            aliases: Vec::new(),
            addresses: Vec::new(),
            identifiers: Vec::new(),
            nationalities: Vec::new(),
            births: Vec::new(),
        }
    }

    /// Resolved display name; see [`NameParts::full_name`].
    pub fn name(&self) -> Option<String> {
        self.names.full_name()
    }

    /// Normalize and store the listing date; bad input degrades to `None`.
    pub fn set_listed_at(&mut self, raw: &str) {
        self.listed_at = dates::parse_date(raw);
    }

    /// Normalize and store the source update date; bad input degrades to `None`.
    pub fn set_updated_at(&mut self, raw: &str) {
        self.updated_at = dates::parse_date(raw);
    }

    /// Attach a new alias bound to this entity's id.
    pub fn create_alias(&mut self) -> &mut Alias {
        self.aliases.push(Alias::new(&self.id));
        let last = self.aliases.len() - 1;
        &mut self.aliases[last]
    }

    /// Attach a new address bound to this entity's id.
    pub fn create_address(&mut self) -> &mut Address {
        self.addresses.push(Address::new(&self.id));
        let last = self.addresses.len() - 1;
        &mut self.addresses[last]
    }

    /// Attach a new identifier bound to this entity's id.
    pub fn create_identifier(&mut self) -> &mut Identifier {
        self.identifiers.push(Identifier::new(&self.id));
        let last = self.identifiers.len() - 1;
        &mut self.identifiers[last]
    }

    /// Attach a new nationality bound to this entity's id.
    pub fn create_nationality(&mut self) -> &mut Nationality {
        self.nationalities.push(Nationality::new(&self.id));
        let last = self.nationalities.len() - 1;
        &mut self.nationalities[last]
    }

    /// Attach a new birth record bound to this entity's id.
    pub fn create_birth(&mut self) -> &mut Birth {
        self.births.push(Birth::new(&self.id));
        let last = self.births.len() - 1;
        &mut self.births[last]
    }

    /// Persist this entity and its children, refreshing `timestamp`.
    ///
    /// Saving the same id again overwrites the previous row and replaces
    /// its children; within one run the last writer wins deterministically.
    pub async fn save(&mut self, store: &Store) -> DbResult<()> {
        self.timestamp = Utc::now();
        store.save_entity(self).await
    }

    /// Full nested document before pruning; children as ordered arrays.
    fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("id".to_string(), Value::String(self.id.clone()));
        doc.insert("source".to_string(), Value::String(self.source.clone()));
        doc.insert(
            "type".to_string(),
            opt_value(self.entity_type.map(|t| t.as_str().to_string())),
        );
        self.names.write_document(&mut doc);
        doc.insert("summary".to_string(), opt_value(self.summary.clone()));
        doc.insert("function".to_string(), opt_value(self.function.clone()));
        doc.insert("program".to_string(), opt_value(self.program.clone()));
        doc.insert("listed_at".to_string(), opt_value(self.listed_at.clone()));
        doc.insert("updated_at".to_string(), opt_value(self.updated_at.clone()));
        doc.insert(
            "timestamp".to_string(),
            Value::String(self.timestamp.to_rfc3339()),
        );
        doc.insert(
            "aliases".to_string(),
            Value::Array(self.aliases.iter().map(Alias::to_document).collect()),
        );
        doc.insert(
            "addresses".to_string(),
            Value::Array(self.addresses.iter().map(Address::to_document).collect()),
        );
        doc.insert(
            "identifiers".to_string(),
            Value::Array(self.identifiers.iter().map(Identifier::to_document).collect()),
        );
        doc.insert(
            "nationalities".to_string(),
            Value::Array(self.nationalities.iter().map(Nationality::to_document).collect()),
        );
        doc.insert(
            "births".to_string(),
            Value::Array(self.births.iter().map(Birth::to_document).collect()),
        );
        Value::Object(doc)
    }

    /// Nested JSON document with nulls and empty containers pruned.
    ///
    /// The id and source are always present, so a saved entity never
    /// reduces to `None`.
    pub fn to_json(&self) -> Option<Value> {
        clean_value(self.to_document())
    }
}

impl TableRecord for Entity {
    const TABLE: &'static str = "entity";
    const EXPORT_NAME: &'static str = "entities";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![
            ("id", Some(self.id.clone())),
            ("source", Some(self.source.clone())),
            ("type", self.entity_type.map(|t| t.as_str().to_string())),
        ];
        row.extend(self.names.row_columns());
        row.push(("summary", self.summary.clone()));
        row.push(("function", self.function.clone()));
        row.push(("program", self.program.clone()));
        row.push(("listed_at", self.listed_at.clone()));
        row.push(("updated_at", self.updated_at.clone()));
        row.push(("timestamp", Some(self.timestamp.to_rfc3339())));
        row
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqlx::TypeInfo;

    fn sample_entity() -> Entity {
        Entity::new("ofac", "ofac-jane-doe".to_string())
    }

    #[test]
    fn test_name_from_parts() {
        let mut entity = sample_entity();
        entity.names.first_name = Some("Jane".to_string());
        entity.names.last_name = Some("Doe".to_string());
        assert_eq!(entity.name().unwrap(), "Jane Doe");
    }

    #[test]
    fn test_dates_normalized_on_assignment() {
        let mut entity = sample_entity();
        entity.set_listed_at("2014-07-16");
        entity.set_updated_at("garbage");
        assert_eq!(entity.listed_at.as_deref(), Some("2014-07-16"));
        assert_eq!(entity.updated_at, None);
    }

    #[test]
    fn test_children_bound_to_entity_id() {
        let mut entity = sample_entity();
        let alias = entity.create_alias();
        assert_eq!(alias.entity_id, "ofac-jane-doe");

        entity.create_birth().set_date("1964");
        assert_eq!(entity.births.len(), 1);
        assert_eq!(entity.births[0].date.as_deref(), Some("1964"));
    }

    #[test]
    fn test_json_prunes_empty_fields_and_children() {
        let mut entity = sample_entity();
        entity.entity_type = Some(EntityType::Individual);
        entity.names.first_name = Some("Jane".to_string());
        entity.names.last_name = Some("Doe".to_string());

        let doc = entity.to_json().unwrap();
        assert_eq!(doc["id"], "ofac-jane-doe");
        assert_eq!(doc["type"], "individual");
        assert_eq!(doc["name"], "Jane Doe");
        // Unset fields and empty child arrays are gone entirely.
        assert!(doc.get("summary").is_none());
        assert!(doc.get("aliases").is_none());
    }

    #[test]
    fn test_json_keeps_nonempty_children() {
        let mut entity = sample_entity();
        let alias = entity.create_alias();
        alias.names.name = Some("J. Doe".to_string());
        alias.quality = Some(crate::model::AliasQuality::Strong);

        let doc = entity.to_json().unwrap();
        let aliases = doc["aliases"].as_array().unwrap();
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases[0]["name"], "J. Doe");
        assert_eq!(aliases[0]["quality"], "strong");
    }

    #[test]
    fn test_entity_type_binds_as_text() {
        // The schema stores the type column as plain TEXT; the enum must
        // declare that type or prepare-time resolution fails against a
        // real Postgres.
        use sqlx::{Postgres, Type};
        assert_eq!(<EntityType as Type<Postgres>>::type_info().name(), "text");
    }

    #[test]
    fn test_csv_row_header_order() {
        let entity = sample_entity();
        let keys: Vec<&str> = entity.to_row().iter().map(|(key, _)| *key).collect();
        assert_eq!(
            &keys[..4],
            ["id", "source", "type", "name"],
            "export header starts with the identity columns"
        );
        assert_eq!(*keys.last().unwrap(), "timestamp");
    }
}
