//! # Indexed Collections
//!
//! [`Cantons`], [`Districts`], [`Communities`] and [`ZipCodes`] each wrap
//! an ordered sequence of shared entities plus lookup maps derived from it.
//!
//! ## Caching
//!
//! Lookup maps are built on first use under a [`std::sync::OnceLock`], so
//! concurrent first lookups build each map exactly once. A collection is
//! *unindexed* until any map is built, then *indexed*. There is no way
//! back: transforms (`select`, `reject`, `sort`, ...) and `Clone` produce a
//! fresh unindexed collection and never touch the receiver.
//!
//! Maps store positions into the sequence, not entity copies.

mod cantons;
mod communities;
mod districts;
mod zip_codes;

use std::cmp::Ordering;
use std::sync::Arc;

pub use cantons::Cantons;
pub use communities::Communities;
pub use districts::Districts;
pub use zip_codes::{ZipCodes, ZipMatch};

/// Operations shared by every collection.
pub trait EntityCollection: Sized {
    /// The entity type.
    type Item;

    /// The wrapped sequence.
    fn as_slice(&self) -> &[Arc<Self::Item>];

    /// A new, unindexed collection of the same kind and configuration over
    /// `items`.
    fn with_items(&self, items: Vec<Arc<Self::Item>>) -> Self;

    /// Entities in construction order. Use `.rev()` for reverse order.
    fn iter(&self) -> std::slice::Iter<'_, Arc<Self::Item>> {
        self.as_slice().iter()
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn first(&self) -> Option<&Arc<Self::Item>> {
        self.as_slice().first()
    }

    /// A copy of the sequence.
    fn to_vec(&self) -> Vec<Arc<Self::Item>> {
        self.as_slice().to_vec()
    }

    /// Entities for which `keep` returns true.
    fn select(&self, mut keep: impl FnMut(&Self::Item) -> bool) -> Self {
        self.with_items(self.iter().filter(|e| keep(e)).cloned().collect())
    }

    /// Entities for which `drop` returns false.
    fn reject(&self, mut drop: impl FnMut(&Self::Item) -> bool) -> Self {
        self.select(|e| !drop(e))
    }

    /// Sorted by identity.
    fn sort(&self) -> Self
    where
        Self::Item: Ord,
    {
        self.sort_by(|a, b| a.cmp(b))
    }

    fn sort_by(&self, mut compare: impl FnMut(&Self::Item, &Self::Item) -> Ordering) -> Self {
        let mut items = self.to_vec();
        items.sort_by(|a, b| compare(a, b));
        self.with_items(items)
    }

    fn sort_by_key<K: Ord>(&self, mut key: impl FnMut(&Self::Item) -> K) -> Self {
        let mut items = self.to_vec();
        items.sort_by_key(|e| key(e));
        self.with_items(items)
    }

    /// Whether an entity equal to `item` is contained.
    fn contains(&self, item: &Self::Item) -> bool
    where
        Self::Item: PartialEq,
    {
        self.iter().any(|e| e.as_ref() == item)
    }
}
