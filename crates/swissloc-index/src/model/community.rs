//! # Community
//!
//! A political community, identified by its federal statistical office
//! number. Every community belongs to an agglomeration whose root is a
//! community itself; roots reference themselves.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use swissloc_core::{Canton, Reference};

/// A political community.
#[derive(Debug, Clone)]
pub struct Community {
    community_number: u32,
    name: String,
    canton: Arc<Canton>,
    agglomeration: Reference<Arc<Community>>,
}

impl Community {
    pub(crate) fn new(
        community_number: u32,
        name: impl Into<String>,
        canton: Arc<Canton>,
        agglomeration: Reference<Arc<Community>>,
    ) -> Self {
        Self {
            community_number,
            name: name.into(),
            canton,
            agglomeration,
        }
    }

    /// Federal statistical office number (BFS number).
    pub fn community_number(&self) -> u32 {
        self.community_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canton(&self) -> &Arc<Canton> {
        &self.canton
    }

    /// The agglomeration root. A root community returns itself; `None`
    /// only when the snapshot was built with
    /// [`AgglomerationPolicy::UnspecifiedIsNone`](crate::AgglomerationPolicy::UnspecifiedIsNone).
    pub fn agglomeration(&self) -> Option<&Community> {
        self.agglomeration.resolve(self)
    }

    /// The reference as resolved by the graph builder.
    pub fn agglomeration_reference(&self) -> &Reference<Arc<Community>> {
        &self.agglomeration
    }

    /// Whether the community is its own agglomeration root.
    pub fn is_root(&self) -> bool {
        self.agglomeration.is_itself()
    }
}

impl PartialEq for Community {
    fn eq(&self, other: &Self) -> bool {
        self.community_number == other.community_number
    }
}

impl Eq for Community {}

impl Hash for Community {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.community_number.hash(state);
    }
}

impl PartialOrd for Community {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Community {
    fn cmp(&self, other: &Self) -> Ordering {
        self.community_number.cmp(&other.community_number)
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Flat record: the canton by tag, the agglomeration by number.
#[derive(Serialize)]
struct CommunityRecord<'a> {
    community_number: u32,
    name: &'a str,
    canton: &'a str,
    agglomeration: Option<u32>,
}

impl Serialize for Community {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CommunityRecord {
            community_number: self.community_number,
            name: &self.name,
            canton: self.canton.license_tag(),
            agglomeration: self.agglomeration().map(Community::community_number),
        }
        .serialize(serializer)
    }
}
