use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};

use super::EntityCollection;
use crate::model::District;

#[derive(Debug, Default)]
struct DistrictIndex {
    by_district_number: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

/// Districts, looked up by district number or name.
pub struct Districts {
    items: Vec<Arc<District>>,
    index: OnceLock<DistrictIndex>,
}

impl Districts {
    pub fn new(items: Vec<Arc<District>>) -> Self {
        Self {
            items,
            index: OnceLock::new(),
        }
    }

    fn index(&self) -> &DistrictIndex {
        self.index.get_or_init(|| {
            let mut index = DistrictIndex::default();
            for (i, d) in self.items.iter().enumerate() {
                index.by_district_number.entry(d.district_number()).or_insert(i);
                index.by_name.entry(d.name().to_string()).or_insert(i);
            }
            index
        })
    }

    pub fn by_district_number(&self, number: u32) -> Option<&Arc<District>> {
        self.index().by_district_number.get(&number).map(|&i| &self.items[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<District>> {
        self.index().by_name.get(name).map(|&i| &self.items[i])
    }

    /// Lookup by name, then by a numeric district number.
    pub fn get(&self, number_or_name: &str) -> Option<&Arc<District>> {
        self.by_name(number_or_name).or_else(|| {
            number_or_name
                .trim()
                .parse()
                .ok()
                .and_then(|n| self.by_district_number(n))
        })
    }

    /// Whether any lookup map has been built.
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }
}

impl EntityCollection for Districts {
    type Item = District;

    fn as_slice(&self) -> &[Arc<District>] {
        &self.items
    }

    fn with_items(&self, items: Vec<Arc<District>>) -> Self {
        Self::new(items)
    }
}

impl Clone for Districts {
    fn clone(&self) -> Self {
        self.with_items(self.items.clone())
    }
}

impl Default for Districts {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Districts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Districts")
            .field("len", &self.items.len())
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

impl Serialize for Districts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter().map(|d| d.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Communities;
    use crate::model::fixtures::canton;

    #[test]
    fn lookups() {
        let zh = canton("ZH");
        let districts = Districts::new(vec![
            Arc::new(District::new(
                101,
                "Bezirk Affoltern",
                Arc::clone(&zh),
                Communities::default(),
            )),
            Arc::new(District::new(112, "Bezirk Zürich", zh, Communities::default())),
        ]);
        assert_eq!(districts.by_district_number(112).unwrap().name(), "Bezirk Zürich");
        assert_eq!(districts.by_name("Bezirk Affoltern").unwrap().district_number(), 101);
        assert_eq!(districts.get("112").unwrap().name(), "Bezirk Zürich");
        assert!(districts.get("Bezirk Horgen").is_none());
        let reversed: Vec<u32> = districts.iter().rev().map(|d| d.district_number()).collect();
        assert_eq!(reversed, vec![112, 101]);
    }
}
