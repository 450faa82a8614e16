//! # swissloc-codec: Binary Snapshot Codec
//!
//! Converts the postal master extract and the statistical office's
//! community and district extracts into one compact binary snapshot, and
//! decodes that snapshot again.
//!
//! ## Layout
//!
//! All integers are big-endian.
//!
//! ```text
//! 0..4    master date (Julian day)
//! 4..8    random code
//! 8..18   row counts: zip1 zip2 com1 com2 district (u16 each)
//! 18..34  section sizes in bytes: int1 int2 int4 text (u32 each)
//! 34..    int1 ++ int2 ++ int4 ++ text
//! ```
//!
//! Columns are stored back to back inside their section in the order fixed
//! by [`manifest::COLUMNS`]. Strings share one pool joined with `0x1F`.
//!
//! ## Pipeline
//!
//! ```text
//! source text ──SourceTables::parse──▶ SourceTables ──coerce──▶ RowGroups ──pack──▶ bytes
//! bytes ──unpack──▶ RowGroups
//! ```
//!
//! `unpack(pack(rows)) == rows` for every row group set `pack` accepts.
//!
//! ## Crate Policy
//!
//! - Depends only on `swissloc-core` internally.
//! - Rows carry raw codes. Interpreting them is left to `swissloc-index`.

pub mod manifest;
pub mod pack;
pub mod rows;
pub mod source;
pub mod unpack;

pub use manifest::{Column, RowCounts, Section, Table, COLUMNS, HEADER_LEN, TEXT_SEPARATOR};
pub use pack::{coerce, pack, pack_source};
pub use rows::{CommunityRow, CommunityZipRow, DistrictRow, RowGroups, ZipDetailRow, ZipNameRow};
pub use source::{SourceEncoding, SourceTables, TableFormat, Terminator};
pub use unpack::unpack;
