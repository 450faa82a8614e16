use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Serialize, Serializer};

use super::EntityCollection;
use crate::model::Community;

#[derive(Debug, Default)]
struct CommunityIndex {
    by_community_number: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

/// Communities, looked up by community number or name.
///
/// Both keys are unique in a loaded dataset; the graph builder rejects
/// snapshots that violate this. In a hand-built collection the first
/// occurrence of a key wins.
pub struct Communities {
    items: Vec<Arc<Community>>,
    index: OnceLock<CommunityIndex>,
}

impl Communities {
    pub fn new(items: Vec<Arc<Community>>) -> Self {
        Self {
            items,
            index: OnceLock::new(),
        }
    }

    fn index(&self) -> &CommunityIndex {
        self.index.get_or_init(|| {
            let mut index = CommunityIndex::default();
            for (i, c) in self.items.iter().enumerate() {
                index.by_community_number.entry(c.community_number()).or_insert(i);
                index.by_name.entry(c.name().to_string()).or_insert(i);
            }
            index
        })
    }

    pub fn by_community_number(&self, number: u32) -> Option<&Arc<Community>> {
        self.index().by_community_number.get(&number).map(|&i| &self.items[i])
    }

    /// The communities for `numbers` that exist, in argument order.
    pub fn by_community_numbers(&self, numbers: &[u32]) -> Vec<Arc<Community>> {
        numbers
            .iter()
            .filter_map(|&n| self.by_community_number(n).cloned())
            .collect()
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<Community>> {
        self.index().by_name.get(name).map(|&i| &self.items[i])
    }

    /// Lookup by name, then by a numeric community number.
    pub fn get(&self, name_or_number: &str) -> Option<&Arc<Community>> {
        self.by_name(name_or_number).or_else(|| {
            name_or_number
                .trim()
                .parse()
                .ok()
                .and_then(|n| self.by_community_number(n))
        })
    }

    /// Whether any lookup map has been built.
    pub fn is_indexed(&self) -> bool {
        self.index.get().is_some()
    }
}

impl EntityCollection for Communities {
    type Item = Community;

    fn as_slice(&self) -> &[Arc<Community>] {
        &self.items
    }

    fn with_items(&self, items: Vec<Arc<Community>>) -> Self {
        Self::new(items)
    }
}

impl Clone for Communities {
    fn clone(&self) -> Self {
        self.with_items(self.items.clone())
    }
}

impl Default for Communities {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for Communities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Communities")
            .field("len", &self.items.len())
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

impl Serialize for Communities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter().map(|c| c.as_ref()))
    }
}
