//! # Column Manifest
//!
//! The snapshot stores no column names. The order of columns inside each
//! section is a fixed contract between [`pack`](crate::pack) and
//! [`unpack`](crate::unpack), written down once here as [`COLUMNS`].
//!
//! ```text
//! int1 (u8)   zip1.type zip1.add_on zip1.language zip1.language_alternative
//!             zip2.sequence_number zip2.designation zip2.language com2.add_on
//! int2 (u16)  zip1.onrp zip1.code zip1.delivery_by zip1.largest_community
//!             zip2.onrp com1.community_number com1.agglomeration
//!             com2.community_number com2.code district.number
//! int4 (u32)  zip1.valid_from
//! text        zip1.name_short zip1.name zip1.canton zip2.name_short zip2.name
//!             com1.name com1.canton district.canton district.name
//! ```
//!
//! Every column of a table holds exactly one value per row, so the five row
//! counts in the header fully determine where each column starts.

use std::fmt;

/// The five row groups of a snapshot, in header order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Zip code detail rows (`zip1`).
    ZipDetail,
    /// Zip code name-variant rows (`zip2`).
    ZipName,
    /// Community master rows (`com1`).
    Community,
    /// Community to zip code link rows (`com2`).
    CommunityZip,
    /// District rows.
    District,
}

impl Table {
    /// All tables in header order.
    pub const ALL: [Self; 5] = [
        Self::ZipDetail,
        Self::ZipName,
        Self::Community,
        Self::CommunityZip,
        Self::District,
    ];

    /// Short table name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZipDetail => "zip1",
            Self::ZipName => "zip2",
            Self::Community => "com1",
            Self::CommunityZip => "com2",
            Self::District => "district",
        }
    }

    /// Position of this table's count in the header.
    pub fn index(self) -> usize {
        match self {
            Self::ZipDetail => 0,
            Self::ZipName => 1,
            Self::Community => 2,
            Self::CommunityZip => 3,
            Self::District => 4,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A payload section of the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Big-endian `u8` values.
    Int1,
    /// Big-endian `u16` values.
    Int2,
    /// Big-endian `u32` values.
    Int4,
    /// UTF-8 strings joined with [`TEXT_SEPARATOR`].
    Text,
}

impl Section {
    /// All sections in payload order.
    pub const ALL: [Self; 4] = [Self::Int1, Self::Int2, Self::Int4, Self::Text];

    /// Section name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int1 => "int1",
            Self::Int2 => "int2",
            Self::Int4 => "int4",
            Self::Text => "text",
        }
    }

    /// Bytes per value, `None` for the variable-width text section.
    pub fn width(self) -> Option<usize> {
        match self {
            Self::Int1 => Some(1),
            Self::Int2 => Some(2),
            Self::Int4 => Some(4),
            Self::Text => None,
        }
    }
}

/// Separator byte between strings in the text section.
pub const TEXT_SEPARATOR: u8 = 0x1f;

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 34;

/// One column of the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// The table the column belongs to.
    pub table: Table,
    /// Section the column is stored in.
    pub section: Section,
    /// Column name used in error messages.
    pub name: &'static str,
}

const fn col(table: Table, section: Section, name: &'static str) -> Column {
    Column {
        table,
        section,
        name,
    }
}

use Section::{Int1, Int2, Int4, Text};
use Table::{Community, CommunityZip, District, ZipDetail, ZipName};

pub const ZIP1_TYPE: Column = col(ZipDetail, Int1, "type");
pub const ZIP1_ADD_ON: Column = col(ZipDetail, Int1, "add_on");
pub const ZIP1_LANGUAGE: Column = col(ZipDetail, Int1, "language");
pub const ZIP1_LANGUAGE_ALTERNATIVE: Column = col(ZipDetail, Int1, "language_alternative");
pub const ZIP2_SEQUENCE_NUMBER: Column = col(ZipName, Int1, "sequence_number");
pub const ZIP2_DESIGNATION: Column = col(ZipName, Int1, "designation");
pub const ZIP2_LANGUAGE: Column = col(ZipName, Int1, "language");
pub const COM2_ADD_ON: Column = col(CommunityZip, Int1, "add_on");

pub const ZIP1_ONRP: Column = col(ZipDetail, Int2, "onrp");
pub const ZIP1_CODE: Column = col(ZipDetail, Int2, "code");
pub const ZIP1_DELIVERY_BY: Column = col(ZipDetail, Int2, "delivery_by");
pub const ZIP1_LARGEST_COMMUNITY: Column = col(ZipDetail, Int2, "largest_community");
pub const ZIP2_ONRP: Column = col(ZipName, Int2, "onrp");
pub const COM1_COMMUNITY_NUMBER: Column = col(Community, Int2, "community_number");
pub const COM1_AGGLOMERATION: Column = col(Community, Int2, "agglomeration");
pub const COM2_COMMUNITY_NUMBER: Column = col(CommunityZip, Int2, "community_number");
pub const COM2_CODE: Column = col(CommunityZip, Int2, "code");
pub const DISTRICT_NUMBER: Column = col(District, Int2, "number");

pub const ZIP1_VALID_FROM: Column = col(ZipDetail, Int4, "valid_from");

pub const ZIP1_NAME_SHORT: Column = col(ZipDetail, Text, "name_short");
pub const ZIP1_NAME: Column = col(ZipDetail, Text, "name");
pub const ZIP1_CANTON: Column = col(ZipDetail, Text, "canton");
pub const ZIP2_NAME_SHORT: Column = col(ZipName, Text, "name_short");
pub const ZIP2_NAME: Column = col(ZipName, Text, "name");
pub const COM1_NAME: Column = col(Community, Text, "name");
pub const COM1_CANTON: Column = col(Community, Text, "canton");
pub const DISTRICT_CANTON: Column = col(District, Text, "canton");
pub const DISTRICT_NAME: Column = col(District, Text, "name");

/// Every column, grouped by section, in storage order.
pub const COLUMNS: [Column; 28] = [
    ZIP1_TYPE,
    ZIP1_ADD_ON,
    ZIP1_LANGUAGE,
    ZIP1_LANGUAGE_ALTERNATIVE,
    ZIP2_SEQUENCE_NUMBER,
    ZIP2_DESIGNATION,
    ZIP2_LANGUAGE,
    COM2_ADD_ON,
    ZIP1_ONRP,
    ZIP1_CODE,
    ZIP1_DELIVERY_BY,
    ZIP1_LARGEST_COMMUNITY,
    ZIP2_ONRP,
    COM1_COMMUNITY_NUMBER,
    COM1_AGGLOMERATION,
    COM2_COMMUNITY_NUMBER,
    COM2_CODE,
    DISTRICT_NUMBER,
    ZIP1_VALID_FROM,
    ZIP1_NAME_SHORT,
    ZIP1_NAME,
    ZIP1_CANTON,
    ZIP2_NAME_SHORT,
    ZIP2_NAME,
    COM1_NAME,
    COM1_CANTON,
    DISTRICT_CANTON,
    DISTRICT_NAME,
];

/// Row counts of the five tables, as stored in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts(pub [u16; 5]);

impl RowCounts {
    /// Row count of `table`.
    pub fn get(&self, table: Table) -> usize {
        usize::from(self.0[table.index()])
    }

    /// Number of values stored in `section` for these counts.
    pub fn values_in(&self, section: Section) -> usize {
        COLUMNS
            .iter()
            .filter(|c| c.section == section)
            .map(|c| self.get(c.table))
            .sum()
    }

    /// Byte size of a fixed-width section for these counts.
    pub fn section_size(&self, section: Section) -> Option<usize> {
        section.width().map(|w| w * self.values_in(section))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_grouped_by_section() {
        let order: Vec<Section> = COLUMNS.iter().map(|c| c.section).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|s| Section::ALL.iter().position(|x| x == s));
        assert_eq!(order, sorted);
    }

    #[test]
    fn values_follow_row_counts() {
        // zip1=3, zip2=2, com1=4, com2=5, district=1
        let counts = RowCounts([3, 2, 4, 5, 1]);
        assert_eq!(counts.values_in(Section::Int1), 4 * 3 + 3 * 2 + 5);
        assert_eq!(counts.values_in(Section::Int2), 4 * 3 + 2 + 2 * 4 + 2 * 5 + 1);
        assert_eq!(counts.section_size(Section::Int4), Some(3 * 4));
        assert_eq!(counts.values_in(Section::Text), 3 * 3 + 2 * 2 + 2 * 4 + 2);
        assert_eq!(counts.section_size(Section::Text), None);
    }
}
