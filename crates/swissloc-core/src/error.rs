//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout swissloc. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Format errors name the table, row and column that failed so a broken
//!   source extract can be located without a debugger.
//! - Reference errors carry both ends of the dangling reference. The graph
//!   builder decides per reference kind whether they are fatal or collected.
//! - Integrity errors list every violation found, not just the first.

use std::fmt;

use thiserror::Error;

/// Top-level error type for swissloc.
#[derive(Error, Debug)]
pub enum SwissLocError {
    /// Malformed binary buffer or source text.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// A record references another record that cannot be found.
    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// A uniqueness invariant is violated after a full load.
    #[error("data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    /// A lookup key could not be classified.
    #[error("invalid lookup key: {0}")]
    Key(#[from] KeyError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed binary buffer, source text, or coded field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The buffer is too short to contain the fixed header.
    #[error("buffer of {actual} bytes is shorter than the {expected}-byte header")]
    Truncated {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },

    /// The buffer length differs from the length declared by the header.
    #[error("header declares {declared} bytes but buffer holds {actual}")]
    LengthMismatch {
        /// Header size plus all declared section sizes.
        declared: usize,
        /// Actual buffer length.
        actual: usize,
    },

    /// A numeric section size disagrees with the row counts.
    #[error("{section} section declares {declared} bytes, row counts imply {expected}")]
    SectionSize {
        /// Section name (`int1`, `int2`, `int4`).
        section: &'static str,
        /// Size stored in the header.
        declared: usize,
        /// Size implied by the row counts and the column manifest.
        expected: usize,
    },

    /// A packed section is too large for its 32-bit header size field.
    #[error("{section} section holds {len} bytes, more than the header can record")]
    SectionTooLarge {
        /// Section name.
        section: &'static str,
        /// Section length in bytes.
        len: usize,
    },

    /// The text section does not split into the expected number of fields.
    #[error("text section holds {actual} fields, expected {expected}")]
    TextFieldCount {
        /// Field count implied by the row counts.
        expected: usize,
        /// Field count found.
        actual: usize,
    },

    /// The text section is not valid UTF-8.
    #[error("text section is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// A source line has the wrong number of fields.
    #[error("{table} line {line}: expected {expected} fields, found {actual}")]
    FieldCount {
        /// Source table name.
        table: &'static str,
        /// One-based line number.
        line: usize,
        /// Field count required by the table schema.
        expected: usize,
        /// Field count found.
        actual: usize,
    },

    /// A source line is not terminated the way its table requires.
    #[error("{table} line {line}: missing {terminator} terminator")]
    MissingTerminator {
        /// Source table name.
        table: &'static str,
        /// One-based line number.
        line: usize,
        /// Human-readable terminator (`CRLF` or `LF`).
        terminator: &'static str,
    },

    /// The post master file has no `00` header record.
    #[error("source master file has no header record")]
    MissingHeader,

    /// A declared-integer field does not parse as an integer.
    #[error("{table} row {row}: column {column} is not an integer: {value:?}")]
    InvalidInteger {
        /// Table name.
        table: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Column name from the manifest.
        column: &'static str,
        /// Offending text.
        value: String,
    },

    /// A date field does not parse as `YYYYMMDD`, or a Julian day is out of range.
    #[error("{table} row {row}: column {column} is not a valid date: {value:?}")]
    InvalidDate {
        /// Table name.
        table: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Column name from the manifest.
        column: &'static str,
        /// Offending text.
        value: String,
    },

    /// A value does not fit the width of its column.
    #[error("{table} row {row}: column {column} value {value} exceeds {max}")]
    OutOfRange {
        /// Table name.
        table: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Column name from the manifest.
        column: &'static str,
        /// Offending value.
        value: u64,
        /// Largest value the column can hold.
        max: u64,
    },

    /// A table has more rows than the header can count.
    #[error("{table} has {count} rows, at most {max} fit the header")]
    TooManyRows {
        /// Table name.
        table: &'static str,
        /// Row count.
        count: usize,
        /// Largest representable row count.
        max: usize,
    },

    /// A text value contains the string-pool separator byte.
    #[error("{table} row {row}: column {column} contains the 0x1F separator")]
    SeparatorInText {
        /// Table name.
        table: &'static str,
        /// Zero-based row index.
        row: usize,
        /// Column name from the manifest.
        column: &'static str,
    },

    /// A coded field holds a value outside its enumeration.
    #[error("unknown {what} code {value}")]
    UnknownCode {
        /// Name of the coded field.
        what: &'static str,
        /// Offending code.
        value: u32,
    },
}

/// A record references another record that cannot be found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// A community's agglomeration is not a materialized root community.
    #[error("community {community} references missing agglomeration {agglomeration}")]
    MissingAgglomeration {
        /// Community number of the referencing community.
        community: u32,
        /// Community number it references.
        agglomeration: u32,
    },

    /// A canton license tag is not part of the built-in canton table.
    #[error("{referenced_by} references unknown canton {tag:?}")]
    UnknownCanton {
        /// The unresolved license tag.
        tag: String,
        /// Description of the referencing record.
        referenced_by: String,
    },

    /// A zip code's delivery office is missing or not yet materialized.
    #[error("invalid reference: onrp {ordering_number} delivery by {delivery_by}")]
    UnresolvedDelivery {
        /// Ordering number of the referencing zip code.
        ordering_number: u32,
        /// Ordering number of the delivery office.
        delivery_by: u32,
    },

    /// A name-variant row references an ordering number with no zip code.
    #[error("name variant {name:?} references unknown onrp {ordering_number}")]
    UnknownOrderingNumber {
        /// The ordering number referenced.
        ordering_number: u32,
        /// The variant's name text.
        name: String,
    },
}

/// A uniqueness invariant violated after a full load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} uniqueness violation(s): {}", .violations.len(), ViolationList(.violations))]
pub struct DataIntegrityError {
    /// Every violation found, in detection order.
    pub violations: Vec<Violation>,
}

/// A single uniqueness violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two or more communities share a community number.
    DuplicateCommunityNumber(u32),
    /// Two or more communities share a name.
    DuplicateCommunityName {
        /// The shared name.
        name: String,
        /// Community numbers carrying it.
        community_numbers: Vec<u32>,
    },
    /// Two or more zip codes share an ordering number.
    DuplicateOrderingNumber(u32),
    /// Two or more zip codes share a `(code, add_on)` pair.
    DuplicateFullCode {
        /// The shared 6-digit full code.
        full_code: u32,
        /// Ordering numbers carrying it.
        ordering_numbers: Vec<u32>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCommunityNumber(n) => write!(f, "duplicate community number {n}"),
            Self::DuplicateCommunityName {
                name,
                community_numbers,
            } => write!(f, "duplicate community name {name:?} ({community_numbers:?})"),
            Self::DuplicateOrderingNumber(n) => write!(f, "duplicate onrp {n}"),
            Self::DuplicateFullCode {
                full_code,
                ordering_numbers,
            } => write!(f, "duplicate full code {full_code:06} (onrp {ordering_numbers:?})"),
        }
    }
}

struct ViolationList<'a>(&'a [Violation]);

impl fmt::Display for ViolationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A lookup key that cannot be classified into a supported shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key is empty.
    #[error("lookup key is empty")]
    Empty,

    /// The key matches none of the supported shapes.
    #[error("expected a 6-digit full code, a 4-digit code, or a name; got {0:?}")]
    Unclassifiable(String),

    /// A numeric key is outside every supported range.
    #[error("expected an integer between 1000 and 999999, got {0}")]
    OutOfRange(u32),

    /// The second component of a two-part key is neither an add-on nor a name.
    #[error("expected a 2-digit add-on or a name as second key component, got {0:?}")]
    InvalidSecondComponent(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrity_error_lists_every_violation() {
        let err = DataIntegrityError {
            violations: vec![
                Violation::DuplicateCommunityName {
                    name: "Aesch".into(),
                    community_numbers: vec![2761, 4021],
                },
                Violation::DuplicateOrderingNumber(1234),
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 uniqueness violation(s)"));
        assert!(msg.contains("\"Aesch\""));
        assert!(msg.contains("duplicate onrp 1234"));
    }

    #[test]
    fn format_error_converts_into_top_level() {
        let err: SwissLocError = FormatError::MissingHeader.into();
        assert!(matches!(err, SwissLocError::Format(FormatError::MissingHeader)));
        assert_eq!(err.to_string(), "format error: source master file has no header record");
    }

    #[test]
    fn full_code_is_zero_padded() {
        let v = Violation::DuplicateFullCode {
            full_code: 100_000,
            ordering_numbers: vec![1, 2],
        };
        assert_eq!(v.to_string(), "duplicate full code 100000 (onrp [1, 2])");
    }
}
