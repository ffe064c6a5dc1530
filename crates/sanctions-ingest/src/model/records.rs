//! Child records owned by an entity.
//!
//! Each kind lives in its own table, keyed back to the parent via
//! `entity_id`, and knows how to flatten itself for CSV export and how to
//! contribute a partial document to the parent's JSON.

use serde_json::{Map, Value};
use sqlx::FromRow;

use super::parts::{opt_value, CountryFields, NameParts};
use super::TableRecord;
use crate::dates;

/// Confidence tag on an alternate name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum AliasQuality {
    Weak,
    Strong,
}

impl AliasQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            AliasQuality::Weak => "weak",
            AliasQuality::Strong => "strong",
        }
    }
}

/// Precision tag on a recorded birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum BirthQuality {
    Exact,
    Approximate,
}

impl BirthQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            BirthQuality::Exact => "exact",
            BirthQuality::Approximate => "approximate",
        }
    }
}

/// An alternate name for an entity.
#[derive(Debug, Clone, FromRow)]
pub struct Alias {
    pub entity_id: String,
    #[sqlx(flatten)]
    pub names: NameParts,
    pub quality: Option<AliasQuality>,
    #[sqlx(rename = "type")]
    pub alias_type: Option<String>,
    pub description: Option<String>,
}

impl Alias {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            names: NameParts::default(),
            quality: None,
            alias_type: None,
            description: None,
        }
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        self.names.write_document(&mut doc);
        doc.insert(
            "quality".to_string(),
            opt_value(self.quality.map(|q| q.as_str().to_string())),
        );
        doc.insert("type".to_string(), opt_value(self.alias_type.clone()));
        doc.insert("description".to_string(), opt_value(self.description.clone()));
        Value::Object(doc)
    }
}

impl TableRecord for Alias {
    const TABLE: &'static str = "alias";
    const EXPORT_NAME: &'static str = "aliases";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![("entity_id", Some(self.entity_id.clone()))];
        row.extend(self.names.row_columns());
        row.push(("quality", self.quality.map(|q| q.as_str().to_string())));
        row.push(("type", self.alias_type.clone()));
        row.push(("description", self.description.clone()));
        row
    }
}

/// An address associated with an entity.
#[derive(Debug, Clone, FromRow)]
pub struct Address {
    pub entity_id: String,
    pub text: Option<String>,
    pub note: Option<String>,
    pub street: Option<String>,
    pub street_2: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    #[sqlx(flatten)]
    pub country: CountryFields,
}

impl Address {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            text: None,
            note: None,
            street: None,
            street_2: None,
            postal_code: None,
            city: None,
            region: None,
            country: CountryFields::default(),
        }
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("text".to_string(), opt_value(self.text.clone()));
        doc.insert("note".to_string(), opt_value(self.note.clone()));
        doc.insert("street".to_string(), opt_value(self.street.clone()));
        doc.insert("street_2".to_string(), opt_value(self.street_2.clone()));
        doc.insert("postal_code".to_string(), opt_value(self.postal_code.clone()));
        doc.insert("city".to_string(), opt_value(self.city.clone()));
        doc.insert("region".to_string(), opt_value(self.region.clone()));
        self.country.write_document(&mut doc);
        Value::Object(doc)
    }
}

impl TableRecord for Address {
    const TABLE: &'static str = "address";
    const EXPORT_NAME: &'static str = "addresses";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![
            ("entity_id", Some(self.entity_id.clone())),
            ("text", self.text.clone()),
            ("note", self.note.clone()),
            ("street", self.street.clone()),
            ("street_2", self.street_2.clone()),
            ("postal_code", self.postal_code.clone()),
            ("city", self.city.clone()),
            ("region", self.region.clone()),
        ];
        row.extend(self.country.row_columns());
        row
    }
}

/// An identity document held by an entity.
#[derive(Debug, Clone, FromRow)]
pub struct Identifier {
    pub entity_id: String,
    #[sqlx(rename = "type")]
    pub document_type: Option<String>,
    pub number: Option<String>,
    pub issued_at: Option<String>,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub country: CountryFields,
}

impl Identifier {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            document_type: None,
            number: None,
            issued_at: None,
            description: None,
            country: CountryFields::default(),
        }
    }

    /// Normalize and store the issue date; bad input degrades to `None`.
    pub fn set_issued_at(&mut self, raw: &str) {
        self.issued_at = dates::parse_date(raw);
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("type".to_string(), opt_value(self.document_type.clone()));
        doc.insert("number".to_string(), opt_value(self.number.clone()));
        doc.insert("issued_at".to_string(), opt_value(self.issued_at.clone()));
        doc.insert("description".to_string(), opt_value(self.description.clone()));
        self.country.write_document(&mut doc);
        Value::Object(doc)
    }
}

impl TableRecord for Identifier {
    const TABLE: &'static str = "identifier";
    const EXPORT_NAME: &'static str = "identifiers";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![
            ("entity_id", Some(self.entity_id.clone())),
            ("type", self.document_type.clone()),
            ("number", self.number.clone()),
            ("issued_at", self.issued_at.clone()),
            ("description", self.description.clone()),
        ];
        row.extend(self.country.row_columns());
        row
    }
}

/// A nationality held by an entity.
#[derive(Debug, Clone, FromRow)]
pub struct Nationality {
    pub entity_id: String,
    #[sqlx(flatten)]
    pub country: CountryFields,
}

impl Nationality {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            country: CountryFields::default(),
        }
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        self.country.write_document(&mut doc);
        Value::Object(doc)
    }
}

impl TableRecord for Nationality {
    const TABLE: &'static str = "nationality";
    const EXPORT_NAME: &'static str = "nationalities";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![("entity_id", Some(self.entity_id.clone()))];
        row.extend(self.country.row_columns());
        row
    }
}

/// A recorded birth date and place.
#[derive(Debug, Clone, FromRow)]
pub struct Birth {
    pub entity_id: String,
    pub date: Option<String>,
    pub place: Option<String>,
    #[sqlx(rename = "type")]
    pub quality: Option<BirthQuality>,
    #[sqlx(flatten)]
    pub country: CountryFields,
}

impl Birth {
    pub fn new(entity_id: &str) -> Self {
        Self {
            entity_id: entity_id.to_string(),
            date: None,
            place: None,
            quality: None,
            country: CountryFields::default(),
        }
    }

    /// Normalize and store the birth date; bad input degrades to `None`.
    pub fn set_date(&mut self, raw: &str) {
        self.date = dates::parse_date(raw);
    }

    pub fn to_document(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("date".to_string(), opt_value(self.date.clone()));
        doc.insert("place".to_string(), opt_value(self.place.clone()));
        doc.insert(
            "type".to_string(),
            opt_value(self.quality.map(|q| q.as_str().to_string())),
        );
        self.country.write_document(&mut doc);
        Value::Object(doc)
    }
}

impl TableRecord for Birth {
    const TABLE: &'static str = "birth";
    const EXPORT_NAME: &'static str = "births";

    fn to_row(&self) -> Vec<(&'static str, Option<String>)> {
        let mut row = vec![
            ("entity_id", Some(self.entity_id.clone())),
            ("date", self.date.clone()),
            ("place", self.place.clone()),
            ("type", self.quality.map(|q| q.as_str().to_string())),
        ];
        row.extend(self.country.row_columns());
        row
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sqlx::TypeInfo;

    #[test]
    fn test_birth_date_normalized_on_assignment() {
        let mut birth = Birth::new("ofac-jane-doe");
        birth.set_date("12 Mar 1964");
        assert_eq!(birth.date.as_deref(), Some("1964-03-12"));

        birth.set_date("not a date");
        assert_eq!(birth.date, None);
    }

    #[test]
    fn test_identifier_issue_date_normalized() {
        let mut identifier = Identifier::new("ofac-jane-doe");
        identifier.set_issued_at("03.05.1978");
        assert_eq!(identifier.issued_at.as_deref(), Some("1978-05-03"));
    }

    #[test]
    fn test_alias_row_flattens_identity_and_names() {
        let mut alias = Alias::new("ofac-jane-doe");
        alias.names.first_name = Some("Janie".to_string());
        alias.names.last_name = Some("Doe".to_string());
        alias.quality = Some(AliasQuality::Weak);

        let row = alias.to_row();
        let keys: Vec<&str> = row.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            [
                "entity_id",
                "name",
                "first_name",
                "second_name",
                "third_name",
                "last_name",
                "quality",
                "type",
                "description"
            ]
        );
        assert_eq!(row[1].1.as_deref(), Some("Janie Doe"));
        assert_eq!(row[6].1.as_deref(), Some("weak"));
    }

    #[test]
    fn test_quality_enums_bind_as_text() {
        // Quality columns are plain TEXT in the schema; the enums must
        // declare that type for prepare-time parameter resolution.
        use sqlx::{Postgres, Type};
        assert_eq!(<AliasQuality as Type<Postgres>>::type_info().name(), "text");
        assert_eq!(<BirthQuality as Type<Postgres>>::type_info().name(), "text");
    }

    #[test]
    fn test_nationality_document_prefers_code() {
        let mut nationality = Nationality::new("ofac-jane-doe");
        nationality.country.set_country("Germany");

        let doc = nationality.to_document();
        assert_eq!(doc["country"], "DE");
        assert_eq!(doc["country_name"], "Germany");
    }
}
