//! Identifier-safe slugs derived from free text.
//!
//! Entity ids are composed from scraped key parts (names, list references),
//! so the slug rules match what the store and object keys can carry:
//! lowercase ASCII alphanumerics separated by single hyphens.

/// Default separator used between slug words and joined key parts.
pub const SLUG_SEPARATOR: char = '-';

/// Convert free text into a lowercase, hyphen-separated slug.
///
/// Alphabetic and numeric characters are kept (lowercased); every other run
/// of characters collapses into a single separator. Leading and trailing
/// separators are trimmed. Returns `None` when nothing slug-worthy remains.
pub fn slugify(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(SLUG_SEPARATOR);
            }
            pending_sep = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_sep = true;
        }
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(slugify("Acme Corp").unwrap(), "acme-corp");
        assert_eq!(slugify("ACME").unwrap(), "acme");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(slugify("  Al-Qaida / Core  ").unwrap(), "al-qaida-core");
        assert_eq!(slugify("O'Brien, John").unwrap(), "o-brien-john");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(slugify("SDN 12345").unwrap(), "sdn-12345");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(slugify(""), None);
        assert_eq!(slugify("***"), None);
        assert_eq!(slugify("   "), None);
    }
}
