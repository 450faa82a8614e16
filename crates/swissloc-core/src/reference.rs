//! # References Between Records
//!
//! Two record kinds point at records of their own kind: a community names
//! its agglomeration, a zip code names the office that delivers its mail.
//! Both use sentinel numbers in the source data for "myself" and "nobody".
//!
//! [`RawReference`] is the decoded, unresolved form. It keeps the two
//! sentinels apart so the graph builder can apply an explicit policy.
//! [`Reference`] is the resolved form held by entities; it is interpreted
//! once, during graph building, and never re-read afterwards.

use serde::{Deserialize, Serialize};

/// An unresolved reference read from a numeric id column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawReference {
    /// The id column equals the record's own id.
    Itself,
    /// The id column holds the `0` sentinel.
    Unspecified,
    /// The id column names another record.
    To(u32),
}

impl RawReference {
    /// Classify the id column `target` of the record identified by `own_id`.
    pub fn classify(own_id: u32, target: u32) -> Self {
        if target == own_id {
            Self::Itself
        } else if target == 0 {
            Self::Unspecified
        } else {
            Self::To(target)
        }
    }

    /// The numeric form, as stored in the id column.
    pub fn to_id(self, own_id: u32) -> u32 {
        match self {
            Self::Itself => own_id,
            Self::Unspecified => 0,
            Self::To(id) => id,
        }
    }
}

/// A resolved reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference<T> {
    /// The record references itself.
    Itself,
    /// The record references nothing.
    None,
    /// The record references another record.
    To(T),
}

impl<T> Reference<T> {
    /// Resolve against the holder: `Itself` yields `this`.
    pub fn resolve<'a, U: ?Sized>(&'a self, this: &'a U) -> Option<&'a U>
    where
        T: AsRef<U>,
    {
        match self {
            Self::Itself => Some(this),
            Self::None => None,
            Self::To(target) => Some(target.as_ref()),
        }
    }

    /// Whether this is a self-reference.
    pub fn is_itself(&self) -> bool {
        matches!(self, Self::Itself)
    }

    /// Whether this references nothing.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
