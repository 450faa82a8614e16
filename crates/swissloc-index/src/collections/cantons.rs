use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};
use swissloc_core::Canton;

use super::EntityCollection;

#[derive(Debug, Default)]
struct CantonIndex {
    by_license_tag: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

/// Cantons, looked up by license tag or by any of their names.
pub struct Cantons {
    items: Vec<Arc<Canton>>,
    index: OnceLock<CantonIndex>,
}

impl Cantons {
    pub fn new(items: Vec<Arc<Canton>>) -> Self {
        Self {
            items,
            index: OnceLock::new(),
        }
    }

    /// The built-in table of 26 cantons and 3 cross-border entries.
    pub fn builtin() -> Self {
        Self::new(Canton::builtin().into_iter().map(Arc::new).collect())
    }

    fn index(&self) -> &CantonIndex {
        self.index.get_or_init(|| {
            let mut index = CantonIndex::default();
            for (i, canton) in self.items.iter().enumerate() {
                index.by_license_tag.entry(canton.license_tag().to_string()).or_insert(i);
                for name in canton.names() {
                    index.by_name.entry(name.to_string()).or_insert(i);
                }
            }
            index
        })
    }

    pub fn by_license_tag(&self, tag: &str) -> Option<&Arc<Canton>> {
        self.index().by_license_tag.get(tag).map(|&i| &self.items[i])
    }

    /// Lookup by native or localized name.
    pub fn by_name(&self, name: &str) -> Option<&Arc<Canton>> {
        self.index().by_name.get(name).map(|&i| &self.items[i])
    }

    /// Lookup by license tag, then by name.
    pub fn get(&self, tag_or_name: &str) -> Option<&Arc<Canton>> {
        self.by_license_tag(tag_or_name).or_else(|| self.by_name(tag_or_name))
    }

    /// Whether any lookup map has been built.
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }
}

impl EntityCollection for Cantons {
    type Item = Canton;

    fn as_slice(&self) -> &[Arc<Canton>] {
        &self.items
    }

    fn with_items(&self, items: Vec<Arc<Canton>>) -> Self {
        Self::new(items)
    }
}

impl Clone for Cantons {
    fn clone(&self) -> Self {
        self.with_items(self.items.clone())
    }
}

impl Default for Cantons {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Cantons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cantons")
            .field("len", &self.items.len())
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

impl Serialize for Cantons {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter().map(AsRef::<Canton>::as_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swissloc_core::{Language, CANTON_COUNT};

    #[test]
    fn builtin_has_every_entry() {
        assert_eq!(Cantons::builtin().len(), CANTON_COUNT);
    }

    #[test]
    fn lookup_by_tag_and_localized_name() {
        let cantons = Cantons::builtin();
        assert!(!cantons.is_indexed());
        let ge = cantons.by_license_tag("GE").unwrap();
        assert!(cantons.is_indexed());
        assert_eq!(cantons.by_name("Genf"), Some(ge));
        assert_eq!(cantons.by_name("Ginevra"), Some(ge));
        assert_eq!(cantons.get("Genève"), Some(ge));
        assert_eq!(ge.name_in(Language::De), "Genf");
        assert!(cantons.get("XX").is_none());
    }

    #[test]
    fn clone_is_unindexed() {
        let cantons = Cantons::builtin();
        let _ = cantons.get("ZH");
        assert!(!cantons.clone().is_indexed());
    }
}
