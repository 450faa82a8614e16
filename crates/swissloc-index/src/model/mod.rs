//! # Entity Model
//!
//! Immutable records built once by the graph builder and shared through
//! `Arc` by every collection that contains them.
//!
//! | Entity | Identity |
//! |---|---|
//! | [`Canton`](swissloc_core::Canton) | license tag |
//! | [`District`] | district number |
//! | [`Community`] | community number |
//! | [`ZipCode`] | ordering number |
//!
//! Equality, hashing and ordering follow identity. Serialization produces
//! flat records in which references are replaced by identifiers.

mod community;
mod district;
mod zip_code;

pub use community::Community;
pub use district::District;
pub use zip_code::ZipCode;

#[cfg(test)]
pub(crate) use zip_code::fixtures;
