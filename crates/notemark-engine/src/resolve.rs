//! Title resolution for `\note{...}` cross-references.

use std::collections::HashMap;

/// Read-only lookup from a note's display title to its identifier.
///
/// Consulted synchronously while parsing `\note{...}`. The parser only ever
/// takes `&self`, so implementations shared across concurrent parses need
/// nothing beyond plain read access. A failed lookup is not an error: the
/// reference is emitted broken and parsing continues.
pub trait TitleResolver {
    fn resolve(&self, display_title: &str) -> Option<String>;
}

/// In-memory title → identifier table with no write path after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleIndex {
    entries: HashMap<String, String>,
}

impl TitleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub(crate) fn insert(&mut self, title: String, id: String) {
        self.entries.insert(title, id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TitleResolver for TitleIndex {
    fn resolve(&self, display_title: &str) -> Option<String> {
        self.entries.get(display_title).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_titles() {
        let index = TitleIndex::from_entries([("Linux Commands".to_string(), "linux".to_string())]);
        assert_eq!(index.resolve("Linux Commands"), Some("linux".to_string()));
    }

    #[test]
    fn unknown_titles_resolve_to_none() {
        let index = TitleIndex::new();
        assert_eq!(index.resolve("Nope"), None);
        assert!(index.is_empty());
    }
}
