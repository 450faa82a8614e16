//! # swissloc-core: Foundational Types for swissloc
//!
//! This crate is the leaf of the swissloc workspace. It defines the value
//! types shared by the codec, the entity graph and the query layer. It
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **One enum per coded field.** `Language`, `ZipType` and `Designation`
//!    each own the mapping between the agency's numeric codes and their
//!    meaning. Unknown codes are rejected at the boundary, never carried.
//!
//! 2. **Explicit references.** Self-referencing records (a community that is
//!    its own agglomeration, a zip code that delivers its own mail) use
//!    [`Reference::Itself`] instead of a sentinel number. The raw codec layer
//!    keeps the sentinels distinct in [`RawReference`] until the graph builder
//!    resolves them under an explicit policy.
//!
//! 3. **Julian day dates.** The binary snapshot stores dates as Julian day
//!    numbers; [`temporal`] is the only place that converts between them and
//!    calendar dates.
//!
//! 4. **Normalization is a capability.** Search keys come from a
//!    [`Normalizer`]; [`Transliterator`] is the default implementation.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `swissloc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canton;
pub mod domain;
pub mod error;
pub mod name;
pub mod reference;
pub mod temporal;
pub mod text;

// Re-export primary types for ergonomic imports.
pub use canton::{Canton, CANTON_COUNT};
pub use domain::{Designation, Language, ZipType};
pub use error::{
    DataIntegrityError, FormatError, KeyError, ReferenceError, SwissLocError, Violation,
};
pub use name::{lowest_sequence_number, Name, NamePolicy};
pub use reference::{RawReference, Reference};
pub use temporal::{
    date_from_julian_day, format_compact_date, julian_day, parse_compact_date, Validity,
};
pub use text::{Normalizer, Transliterator};
