//! Composable field groups shared across record kinds.
//!
//! Several record kinds carry the same structured name columns, and every
//! child record carries a country pair. Rather than repeating the columns
//! (or reaching for inheritance, which the relational rows do not need),
//! each group is a small struct that the owning record embeds with
//! `#[sqlx(flatten)]` and composes into its CSV row and JSON document.

use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::countries;

/// Structured name columns with a derived display name.
///
/// The raw parts are the source of truth; the resolved name is computed at
/// read time and never persisted.
#[derive(Debug, Clone, Default, FromRow)]
pub struct NameParts {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub second_name: Option<String>,
    pub third_name: Option<String>,
    pub last_name: Option<String>,
}

impl NameParts {
    /// Resolve the display name.
    ///
    /// An explicit full name wins verbatim. Otherwise the parts are joined
    /// in (first, second, third, last) order with single spaces, skipping
    /// absent or blank parts. All parts absent resolves to `None`, never an
    /// empty string.
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        let joined = [
            &self.first_name,
            &self.second_name,
            &self.third_name,
            &self.last_name,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    /// Ordered CSV columns: resolved name first, then the raw parts.
    pub fn row_columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", self.full_name()),
            ("first_name", self.first_name.clone()),
            ("second_name", self.second_name.clone()),
            ("third_name", self.third_name.clone()),
            ("last_name", self.last_name.clone()),
        ]
    }

    /// Splice the name fields into a partial JSON document.
    pub fn write_document(&self, doc: &mut Map<String, Value>) {
        doc.insert("name".to_string(), opt_value(self.full_name()));
        doc.insert("first_name".to_string(), opt_value(self.first_name.clone()));
        doc.insert("second_name".to_string(), opt_value(self.second_name.clone()));
        doc.insert("third_name".to_string(), opt_value(self.third_name.clone()));
        doc.insert("last_name".to_string(), opt_value(self.last_name.clone()));
    }
}

/// Country columns resolved against the fixed name table at write time.
#[derive(Debug, Clone, Default, FromRow)]
pub struct CountryFields {
    pub country_name: Option<String>,
    pub country_code: Option<String>,
}

impl CountryFields {
    /// Store the raw name and look up its ISO code.
    ///
    /// Unrecognized names keep the raw text with no code; the lookup never
    /// fails the caller.
    pub fn set_country(&mut self, name: &str) {
        self.country_name = Some(name.to_string());
        self.country_code = countries::to_code(name).map(str::to_string);
    }

    /// Resolved country: ISO code when known, raw name otherwise.
    pub fn country(&self) -> Option<&str> {
        self.country_code.as_deref().or(self.country_name.as_deref())
    }

    /// Ordered CSV columns for the raw country pair.
    pub fn row_columns(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("country_name", self.country_name.clone()),
            ("country_code", self.country_code.clone()),
        ]
    }

    /// Splice the raw pair and the resolved country into a partial document.
    pub fn write_document(&self, doc: &mut Map<String, Value>) {
        doc.insert("country".to_string(), opt_value(self.country().map(str::to_string)));
        doc.insert("country_name".to_string(), opt_value(self.country_name.clone()));
        doc.insert("country_code".to_string(), opt_value(self.country_code.clone()));
    }
}

/// `Option<String>` to JSON, with `None` as an explicit null for the cleaner.
pub(crate) fn opt_value(value: Option<String>) -> Value {
    match value {
        Some(text) => Value::String(text),
        None => Value::Null,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_name_wins() {
        let parts = NameParts {
            name: Some("ACME Holdings Ltd.".to_string()),
            first_name: Some("ignored".to_string()),
            ..Default::default()
        };
        assert_eq!(parts.full_name().unwrap(), "ACME Holdings Ltd.");
    }

    #[test]
    fn test_name_synthesized_from_parts() {
        let parts = NameParts {
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(parts.full_name().unwrap(), "Jane Doe");
    }

    #[test]
    fn test_blank_parts_skipped() {
        let parts = NameParts {
            first_name: Some("Jane".to_string()),
            second_name: Some("  ".to_string()),
            third_name: Some("Q".to_string()),
            last_name: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(parts.full_name().unwrap(), "Jane Q Doe");
    }

    #[test]
    fn test_no_parts_is_none() {
        assert_eq!(NameParts::default().full_name(), None);
    }

    #[test]
    fn test_country_prefers_code() {
        let mut country = CountryFields::default();
        country.set_country("Russian Federation");
        assert_eq!(country.country_name.as_deref(), Some("Russian Federation"));
        assert_eq!(country.country_code.as_deref(), Some("RU"));
        assert_eq!(country.country(), Some("RU"));
    }

    #[test]
    fn test_unknown_country_keeps_raw_name() {
        let mut country = CountryFields::default();
        country.set_country("Atlantis");
        assert_eq!(country.country_code, None);
        assert_eq!(country.country(), Some("Atlantis"));
    }
}
