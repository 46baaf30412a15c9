//! Pattern and Catalog entities.
//!
//! A *pattern* is a lighting animation program stored on the Pixelblaze.  The
//! device addresses each program by an opaque string id; the name is only
//! used for display and for ordering the list shown to the user.
//!
//! A *catalog* is the complete, sorted set of patterns returned by one
//! `listPrograms` exchange.  Catalogs are only ever built from a finished
//! multi-frame response (see [`crate::protocol::catalog::CatalogAssembler`]),
//! so a partially received list can never be observed through this type.

use std::fmt;

/// A single lighting program known to the device.
///
/// Identity is the `id`; two patterns with the same name but different ids are
/// different programs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    /// Opaque program id as sent by the device (e.g. `"Yh8sBqzHgK5Gcc7oM"`).
    pub id: String,
    /// Human-readable program name.
    pub name: String,
}

impl Pattern {
    /// Creates a pattern from its id and display name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// The sorted list of patterns known to the client at a point in time.
///
/// Patterns are ordered by `name` using plain byte-wise string comparison
/// (case-sensitive, so `"Zebra"` sorts before `"apple"`).  Patterns with equal
/// names keep the order in which the device sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    patterns: Vec<Pattern>,
}

impl Catalog {
    /// Builds a catalog from patterns in arrival order, sorting them by name.
    ///
    /// The sort is stable: duplicate names stay in arrival order.
    pub fn from_arrival_order(mut patterns: Vec<Pattern>) -> Self {
        patterns.sort_by(|a, b| a.name.cmp(&b.name));
        Self { patterns }
    }

    /// Returns the number of patterns in the catalog.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` when the device reported no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterates over the patterns in name order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pattern> {
        self.patterns.iter()
    }

    /// Returns the pattern at `index` in name order.
    pub fn get(&self, index: usize) -> Option<&Pattern> {
        self.patterns.get(index)
    }

    /// Looks up a pattern by its device id.
    pub fn find_by_id(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == id)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Pattern;
    type IntoIter = std::slice::Iter<'a, Pattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sorts_by_name() {
        // Arrange
        let patterns = vec![
            Pattern::new("1", "Rainbow"),
            Pattern::new("2", "Fire"),
            Pattern::new("3", "Solid"),
        ];

        // Act
        let catalog = Catalog::from_arrival_order(patterns);

        // Assert
        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fire", "Rainbow", "Solid"]);
    }

    #[test]
    fn test_catalog_sort_is_case_sensitive() {
        let catalog = Catalog::from_arrival_order(vec![
            Pattern::new("a", "apple"),
            Pattern::new("z", "Zebra"),
        ]);

        // Uppercase ASCII sorts before lowercase.
        assert_eq!(catalog.get(0).map(|p| p.id.as_str()), Some("z"));
        assert_eq!(catalog.get(1).map(|p| p.id.as_str()), Some("a"));
    }

    #[test]
    fn test_catalog_keeps_arrival_order_for_equal_names() {
        let catalog = Catalog::from_arrival_order(vec![
            Pattern::new("9", "Twinkle"),
            Pattern::new("1", "Blink"),
            Pattern::new("4", "Twinkle"),
        ]);

        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "9", "4"]);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::from_arrival_order(vec![
            Pattern::new("abc", "Sparkle"),
            Pattern::new("def", "Fade"),
        ]);

        assert_eq!(catalog.find_by_id("abc").map(|p| p.name.as_str()), Some("Sparkle"));
        assert!(catalog.find_by_id("missing").is_none());
    }

    #[test]
    fn test_default_catalog_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
    }

    #[test]
    fn test_pattern_display_includes_name_and_id() {
        let p = Pattern::new("7", "Fire");
        assert_eq!(p.to_string(), "Fire (7)");
    }
}
