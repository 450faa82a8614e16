//! # Typed Row Groups
//!
//! The decoded content of a snapshot: five row groups with every integer
//! field already at its stored width. Rows carry raw codes and raw ids;
//! interpreting them (languages, references, cantons) is the graph
//! builder's job.

use serde::{Deserialize, Serialize};

use crate::manifest::{RowCounts, Table};

/// One zip code detail row (`zip1`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZipDetailRow {
    /// Postal ordering number (ONRP).
    pub ordering_number: u16,
    /// Zip type code (10, 20, 30, 40, 80).
    pub zip_type: u8,
    /// Canton license tag.
    pub canton: String,
    /// Four-digit code.
    pub code: u16,
    /// Two-digit add-on.
    pub add_on: u8,
    /// ONRP of the delivering office, `0` for none.
    pub delivery_by: u16,
    /// Language code.
    pub language: u8,
    /// Alternative language code, `0` for none.
    pub language_alternative: u8,
    /// Short name (at most 18 characters in the source).
    pub name_short: String,
    /// Official name (at most 27 characters in the source).
    pub name: String,
    /// Community number of the largest community served, `0` for none.
    pub largest_community: u16,
    /// First day of validity as a Julian day, `0` for none.
    pub valid_from: u32,
}

/// One zip code name-variant row (`zip2`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZipNameRow {
    /// ONRP of the zip code the name belongs to.
    pub ordering_number: u16,
    /// Sequence number, lower is preferred.
    pub sequence_number: u8,
    /// Designation code: 2 alternate name, 3 region name.
    pub designation: u8,
    /// Language code.
    pub language: u8,
    pub name_short: String,
    pub name: String,
}

/// One community row (`com1`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommunityRow {
    /// Federal statistical office number (BFSNR).
    pub community_number: u16,
    pub name: String,
    /// Canton license tag.
    pub canton: String,
    /// Community number of the agglomeration root.
    pub agglomeration: u16,
}

/// One community to zip code link row (`com2`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommunityZipRow {
    pub community_number: u16,
    pub code: u16,
    pub add_on: u8,
}

/// One district row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DistrictRow {
    /// Canton license tag.
    pub canton: String,
    /// District number (GDEBZNR).
    pub number: u16,
    pub name: String,
}

/// The complete content of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowGroups {
    /// Master date of the postal extract as a Julian day.
    pub master_date: u32,
    /// Random code from the postal extract header.
    pub random_code: u32,
    pub zip_details: Vec<ZipDetailRow>,
    pub zip_names: Vec<ZipNameRow>,
    pub communities: Vec<CommunityRow>,
    pub community_zips: Vec<CommunityZipRow>,
    pub districts: Vec<DistrictRow>,
}

impl RowGroups {
    /// Row count of `table`.
    pub fn len_of(&self, table: Table) -> usize {
        match table {
            Table::ZipDetail => self.zip_details.len(),
            Table::ZipName => self.zip_names.len(),
            Table::Community => self.communities.len(),
            Table::CommunityZip => self.community_zips.len(),
            Table::District => self.districts.len(),
        }
    }

    /// Header row counts, or the first table that has too many rows.
    pub(crate) fn counts(&self) -> Result<RowCounts, (Table, usize)> {
        let mut counts = [0u16; 5];
        for table in Table::ALL {
            let len = self.len_of(table);
            counts[table.index()] = u16::try_from(len).map_err(|_| (table, len))?;
        }
        Ok(RowCounts(counts))
    }

    /// Whether every row group is empty.
    pub fn is_empty(&self) -> bool {
        Table::ALL.iter().all(|t| self.len_of(*t) == 0)
    }
}
