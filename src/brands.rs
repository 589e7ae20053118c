//! Brand list loading.
//!
//! The brand list is a JSON array of trusted domain strings, loaded once at
//! process start and shared read-only with every detector instance. A missing
//! or malformed file degrades to an empty list rather than failing startup:
//! brand matching simply never triggers in that case.

use std::path::Path;

use log::warn;

/// Immutable, ordered list of trusted brand domains.
///
/// Order matters: when multiple brands would independently trigger a
/// similarity rule, the first one in the list is reported.
#[derive(Debug, Clone, Default)]
pub struct BrandList {
    entries: Vec<String>,
}

impl BrandList {
    /// Loads the brand list from a JSON file, lowercasing every entry.
    ///
    /// Returns an empty list (with a warning) when the file is absent or
    /// cannot be parsed.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Brand list {} could not be read ({e}); brand matching disabled",
                    path.display()
                );
                return BrandList::default();
            }
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => BrandList::from_entries(entries),
            Err(e) => {
                warn!(
                    "Brand list {} is not a JSON array of strings ({e}); brand matching disabled",
                    path.display()
                );
                BrandList::default()
            }
        }
    }

    /// Builds a brand list from in-memory entries, lowercasing each one.
    pub fn from_entries(entries: Vec<String>) -> Self {
        BrandList {
            entries: entries.into_iter().map(|b| b.to_lowercase()).collect(),
        }
    }

    /// Iterates brands in list order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// True when `hostname` appears verbatim in the list.
    pub fn contains(&self, hostname: &str) -> bool {
        self.entries.iter().any(|b| b == hostname)
    }

    /// Number of brands loaded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no brands are loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_degrades_to_empty_list() {
        let list = BrandList::load(Path::new("/nonexistent/brands.json"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_entries_are_lowercased() {
        let list = BrandList::from_entries(vec!["PayPal.com".into(), "GOOGLE.com".into()]);
        assert!(list.contains("paypal.com"));
        assert!(list.contains("google.com"));
        assert!(!list.contains("PayPal.com"));
    }

    #[test]
    fn test_order_is_preserved() {
        let list = BrandList::from_entries(vec!["b.com".into(), "a.com".into()]);
        let collected: Vec<&str> = list.iter().collect();
        assert_eq!(collected, vec!["b.com", "a.com"]);
    }

    #[test]
    fn test_bundled_brand_file_parses() {
        let list = BrandList::load(Path::new(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/data/brands.json"
        )));
        assert!(!list.is_empty());
        assert!(list.contains("paypal.com"));
    }
}
