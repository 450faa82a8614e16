//! # District
//!
//! An administrative district inside a canton. Its community set is filled
//! by the graph builder after all communities exist.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Serialize, Serializer};
use swissloc_core::Canton;

use crate::collections::{Communities, EntityCollection};

/// An administrative district.
#[derive(Debug, Clone)]
pub struct District {
    number: u32,
    name: String,
    canton: Arc<Canton>,
    communities: Communities,
}

impl District {
    pub(crate) fn new(
        number: u32,
        name: impl Into<String>,
        canton: Arc<Canton>,
        communities: Communities,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            canton,
            communities,
        }
    }

    /// District number as published by the statistical office.
    pub fn district_number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn canton(&self) -> &Arc<Canton> {
        &self.canton
    }

    pub fn communities(&self) -> &Communities {
        &self.communities
    }
}

impl PartialEq for District {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for District {}

impl Hash for District {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}

impl PartialOrd for District {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for District {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.number.cmp(&other.number)
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Serialize)]
struct DistrictRecord<'a> {
    district_number: u32,
    name: &'a str,
    canton: &'a str,
    communities: Vec<u32>,
}

impl Serialize for District {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DistrictRecord {
            district_number: self.number,
            name: &self.name,
            canton: self.canton.license_tag(),
            communities: self.communities.iter().map(|c| c.community_number()).collect(),
        }
        .serialize(serializer)
    }
}
