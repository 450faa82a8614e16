use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use swissloc_core::{KeyError, Normalizer, Transliterator, ZipType};

use super::EntityCollection;
use crate::complete::CompletionIndex;
use crate::key::ZipKey;
use crate::model::ZipCode;

/// Result of [`ZipCodes::lookup`].
#[derive(Debug, Clone)]
pub enum ZipMatch {
    /// A unique key matched one zip code.
    One(Arc<ZipCode>),
    /// A one-to-many key; the collection may be empty.
    Many(ZipCodes),
    /// A unique key matched nothing.
    Missing,
}

impl ZipMatch {
    /// The single match of a unique key.
    pub fn one(&self) -> Option<&Arc<ZipCode>> {
        match self {
            Self::One(z) => Some(z),
            _ => None,
        }
    }

    /// Every matched zip code.
    pub fn to_vec(&self) -> Vec<Arc<ZipCode>> {
        match self {
            Self::One(z) => vec![Arc::clone(z)],
            Self::Many(zs) => zs.to_vec(),
            Self::Missing => Vec::new(),
        }
    }

    pub fn contains(&self, zip: &ZipCode) -> bool {
        match self {
            Self::One(z) => z.as_ref() == zip,
            Self::Many(zs) => zs.contains(zip),
            Self::Missing => false,
        }
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(zs) => zs.is_empty(),
            Self::Missing => true,
        }
    }
}

/// Zip codes with lookups by ordering number, code, full code, code and
/// name, and name, plus name autocompletion.
///
/// Name keys cover every long and short name in every language; region
/// names are not keys. Each map is built on its first use.
pub struct ZipCodes {
    items: Vec<Arc<ZipCode>>,
    normalizer: Arc<dyn Normalizer>,
    by_ordering_number: OnceLock<HashMap<u32, usize>>,
    by_code: OnceLock<HashMap<u16, Vec<usize>>>,
    by_full_code: OnceLock<HashMap<u32, usize>>,
    by_code_and_name: OnceLock<HashMap<(u16, String), usize>>,
    by_name: OnceLock<HashMap<String, Vec<usize>>>,
    completion: OnceLock<CompletionIndex<usize>>,
}

impl ZipCodes {
    /// A collection using the default [`Transliterator`] for
    /// autocompletion.
    pub fn new(items: Vec<Arc<ZipCode>>) -> Self {
        Self::with_normalizer(items, Arc::new(Transliterator))
    }

    /// A collection using `normalizer` for autocompletion.
    pub fn with_normalizer(items: Vec<Arc<ZipCode>>, normalizer: Arc<dyn Normalizer>) -> Self {
        Self {
            items,
            normalizer,
            by_ordering_number: OnceLock::new(),
            by_code: OnceLock::new(),
            by_full_code: OnceLock::new(),
            by_code_and_name: OnceLock::new(),
            by_name: OnceLock::new(),
            completion: OnceLock::new(),
        }
    }

    /// The same zip codes with another normalizer, unindexed.
    pub fn normalized_by(&self, normalizer: Arc<dyn Normalizer>) -> Self {
        Self::with_normalizer(self.items.clone(), normalizer)
    }

    fn subset(&self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.with_items(positions.into_iter().map(|i| Arc::clone(&self.items[i])).collect())
    }

    // ─── Point lookups ──────────────────────────────────────────────

    pub fn by_ordering_number(&self, onrp: u32) -> Option<&Arc<ZipCode>> {
        let map = self.by_ordering_number.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.items.len());
            for (i, z) in self.items.iter().enumerate() {
                map.entry(z.ordering_number()).or_insert(i);
            }
            map
        });
        map.get(&onrp).map(|&i| &self.items[i])
    }

    /// Every zip code with the four-digit `code`, whatever its add-on.
    pub fn by_code(&self, code: u16) -> ZipCodes {
        let map = self.by_code.get_or_init(|| {
            let mut map: HashMap<u16, Vec<usize>> = HashMap::new();
            for (i, z) in self.items.iter().enumerate() {
                map.entry(z.code()).or_default().push(i);
            }
            map
        });
        self.subset(map.get(&code).into_iter().flatten().copied())
    }

    pub fn by_code_and_add_on(&self, code: u16, add_on: u8) -> Option<&Arc<ZipCode>> {
        self.by_full_code(u32::from(code) * 100 + u32::from(add_on))
    }

    /// Lookup by six-digit full code.
    pub fn by_full_code(&self, full_code: u32) -> Option<&Arc<ZipCode>> {
        let map = self.by_full_code.get_or_init(|| {
            let mut map = HashMap::with_capacity(self.items.len());
            for (i, z) in self.items.iter().enumerate() {
                map.entry(z.full_code()).or_insert(i);
            }
            map
        });
        map.get(&full_code).map(|&i| &self.items[i])
    }

    /// Lookup by code and any long or short name. When two zip codes share
    /// a code and a name, the first one in the collection wins.
    pub fn by_code_and_name(&self, code: u16, name: &str) -> Option<&Arc<ZipCode>> {
        let map = self.by_code_and_name.get_or_init(|| {
            let mut map = HashMap::new();
            for (i, z) in self.items.iter().enumerate() {
                for n in z.all_names() {
                    map.entry((z.code(), n.as_str().to_string())).or_insert(i);
                }
            }
            map
        });
        map.get(&(code, name.to_string())).map(|&i| &self.items[i])
    }

    /// Every zip code with a long or short name equal to `name`.
    pub fn by_name(&self, name: &str) -> ZipCodes {
        let map = self.by_name.get_or_init(|| {
            let mut map: HashMap<String, Vec<usize>> = HashMap::new();
            for (i, z) in self.items.iter().enumerate() {
                for n in z.all_names() {
                    map.entry(n.as_str().to_string()).or_default().push(i);
                }
            }
            map
        });
        self.subset(map.get(name).into_iter().flatten().copied())
    }

    /// Dispatch a classified key.
    pub fn lookup(&self, key: &ZipKey) -> ZipMatch {
        let one = |found: Option<&Arc<ZipCode>>| {
            found.map_or(ZipMatch::Missing, |z| ZipMatch::One(Arc::clone(z)))
        };
        match key {
            ZipKey::OrderingNumber(onrp) => one(self.by_ordering_number(*onrp)),
            ZipKey::Code(code) => ZipMatch::Many(self.by_code(*code)),
            ZipKey::CodeAddOn(code, add_on) => one(self.by_code_and_add_on(*code, *add_on)),
            ZipKey::CodeName(code, name) => one(self.by_code_and_name(*code, name)),
            ZipKey::Name(name) => ZipMatch::Many(self.by_name(name)),
        }
    }

    /// Parse `key` and dispatch it.
    pub fn find(&self, key: &str) -> Result<ZipMatch, KeyError> {
        Ok(self.lookup(&ZipKey::parse(key)?))
    }

    // ─── Filters ────────────────────────────────────────────────────

    /// Zip codes in use on `at`.
    pub fn active(&self, at: NaiveDate) -> ZipCodes {
        self.select(|z| z.in_use(at))
    }

    /// Zip codes not in use on `at`.
    pub fn inactive(&self, at: NaiveDate) -> ZipCodes {
        self.reject(|z| z.in_use(at))
    }

    pub fn with_type(&self, types: &[ZipType]) -> ZipCodes {
        self.select(|z| types.contains(&z.zip_type()))
    }

    pub fn without_type(&self, types: &[ZipType]) -> ZipCodes {
        self.reject(|z| types.contains(&z.zip_type()))
    }

    /// Zip codes with domicile addresses.
    pub fn residential(&self) -> ZipCodes {
        self.with_type(&[ZipType::DomicileAndPoBox, ZipType::Domicile])
    }

    // ─── Autocompletion ─────────────────────────────────────────────

    /// Zip codes whose names complete `text`, in collection order.
    ///
    /// Every spelling variant of the query is completed separately and the
    /// results are united, so a zip code matching several variants is
    /// returned once.
    pub fn autocomplete(&self, text: &str) -> ZipCodes {
        let index = self.completion.get_or_init(|| {
            let normalizer = self.normalizer.as_ref();
            CompletionIndex::build((0..self.items.len()).collect(), |&i| {
                self.items[i].search_keys(normalizer)
            })
        });
        let mut positions = BTreeSet::new();
        for variant in self.normalizer.query_variants(text) {
            positions.extend(index.complete(variant.as_slice()).into_iter().copied());
        }
        self.subset(positions)
    }

    /// Whether any lookup map has been built.
    pub fn is_indexed(&self) -> bool {
        self.by_ordering_number.get().is_some()
            || self.by_code.get().is_some()
            || self.by_full_code.get().is_some()
            || self.by_code_and_name.get().is_some()
            || self.by_name.get().is_some()
            || self.completion.get().is_some()
    }
}

impl EntityCollection for ZipCodes {
    type Item = ZipCode;

    fn as_slice(&self) -> &[Arc<ZipCode>] {
        &self.items
    }

    fn with_items(&self, items: Vec<Arc<ZipCode>>) -> Self {
        Self::with_normalizer(items, Arc::clone(&self.normalizer))
    }
}

impl Clone for ZipCodes {
    fn clone(&self) -> Self {
        self.with_items(self.items.clone())
    }
}

impl Default for ZipCodes {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for ZipCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipCodes")
            .field("len", &self.items.len())
            .field("indexed", &self.is_indexed())
            .finish()
    }
}

impl Serialize for ZipCodes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter().map(|z| z.as_ref()))
    }
}
