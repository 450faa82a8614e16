//! # swissloc-index: Entity Graph and Indexed Collections
//!
//! Builds the Swiss postal entity graph from decoded snapshot rows and
//! answers lookups over it.
//!
//! ## Layers
//!
//! - **Model** (`model/`): [`Community`], [`District`] and [`ZipCode`].
//!   Entities are shared through `Arc` and reference each other directly;
//!   equality, hashing and ordering follow each entity's identity key.
//!
//! - **Graph builder** (`builder.rs`): resolves the id columns of the raw
//!   rows into references, in two passes for each self-referencing kind,
//!   and validates uniqueness. Dangling delivery references are collected,
//!   not fatal.
//!
//! - **Collections** (`collections/`): [`Cantons`], [`Districts`],
//!   [`Communities`] and [`ZipCodes`] with lazily built lookup maps.
//!
//! - **Keys** (`key.rs`): [`ZipKey`], the closed set of zip code lookup
//!   shapes.
//!
//! - **Completion** (`complete.rs`): [`CompletionIndex`], an immutable
//!   prefix index used for name autocompletion.
//!
//! - **Dataset** (`dataset.rs`): [`Dataset`], the query facade over one
//!   loaded snapshot.
//!
//! ## Design
//!
//! Everything is read-only once built. The only interior state is the
//! per-collection lookup cache, guarded by `OnceLock`, so a [`Dataset`]
//! can be shared across threads as is.

pub mod builder;
pub mod collections;
pub mod complete;
pub mod dataset;
pub mod key;
pub mod model;

// ─── Graph re-exports ───────────────────────────────────────────────

pub use builder::{AgglomerationPolicy, GraphBuilder, GraphBuilderOptions};
pub use model::{Community, District, ZipCode};

// ─── Collection re-exports ──────────────────────────────────────────

pub use collections::{Cantons, Communities, Districts, EntityCollection, ZipCodes, ZipMatch};
pub use complete::CompletionIndex;
pub use key::ZipKey;

// ─── Facade re-exports ──────────────────────────────────────────────

pub use dataset::{
    latest_binary_file, snapshot_file_name, Dataset, SNAPSHOT_EXTENSION, SNAPSHOT_PREFIX,
};
