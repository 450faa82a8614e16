//! # Packing
//!
//! [`coerce`] turns untyped source rows into [`RowGroups`], parsing every
//! declared-integer field and checking it against its column width.
//! [`pack`] serializes row groups into the snapshot layout described in
//! [`manifest`](crate::manifest).
//!
//! ## Coercion Rules
//!
//! - Integer fields are trimmed. An empty field reads as `0`, the format's
//!   "none" sentinel. Anything else that does not parse is a
//!   [`FormatError::InvalidInteger`].
//! - A value wider than its column is a [`FormatError::OutOfRange`].
//! - Dates are `YYYYMMDD` and are stored as Julian days. An empty date is
//!   stored as `0`.

use chrono::NaiveDate;
use swissloc_core::{julian_day, parse_compact_date, FormatError};

use crate::manifest::{
    self as m, Column, RowCounts, Section, Table, COLUMNS, HEADER_LEN, TEXT_SEPARATOR,
};
use crate::rows::{
    CommunityRow, CommunityZipRow, DistrictRow, RowGroups, ZipDetailRow, ZipNameRow,
};
use crate::source::{SourceRow, SourceTables};

/// Parse and serialize source extracts in one step.
pub fn pack_source(tables: &SourceTables) -> Result<Vec<u8>, FormatError> {
    pack(&coerce(tables)?)
}

/// Serialize row groups into a snapshot buffer.
pub fn pack(rows: &RowGroups) -> Result<Vec<u8>, FormatError> {
    let counts = rows.counts().map_err(|(table, count)| FormatError::TooManyRows {
        table: table.name(),
        count,
        max: usize::from(u16::MAX),
    })?;

    let mut w = SectionWriter::new(counts);
    let zip1 = &rows.zip_details;
    let zip2 = &rows.zip_names;
    let com1 = &rows.communities;
    let com2 = &rows.community_zips;
    let dist = &rows.districts;

    w.u8s(&m::ZIP1_TYPE, zip1.iter().map(|r| r.zip_type));
    w.u8s(&m::ZIP1_ADD_ON, zip1.iter().map(|r| r.add_on));
    w.u8s(&m::ZIP1_LANGUAGE, zip1.iter().map(|r| r.language));
    w.u8s(&m::ZIP1_LANGUAGE_ALTERNATIVE, zip1.iter().map(|r| r.language_alternative));
    w.u8s(&m::ZIP2_SEQUENCE_NUMBER, zip2.iter().map(|r| r.sequence_number));
    w.u8s(&m::ZIP2_DESIGNATION, zip2.iter().map(|r| r.designation));
    w.u8s(&m::ZIP2_LANGUAGE, zip2.iter().map(|r| r.language));
    w.u8s(&m::COM2_ADD_ON, com2.iter().map(|r| r.add_on));

    w.u16s(&m::ZIP1_ONRP, zip1.iter().map(|r| r.ordering_number));
    w.u16s(&m::ZIP1_CODE, zip1.iter().map(|r| r.code));
    w.u16s(&m::ZIP1_DELIVERY_BY, zip1.iter().map(|r| r.delivery_by));
    w.u16s(&m::ZIP1_LARGEST_COMMUNITY, zip1.iter().map(|r| r.largest_community));
    w.u16s(&m::ZIP2_ONRP, zip2.iter().map(|r| r.ordering_number));
    w.u16s(&m::COM1_COMMUNITY_NUMBER, com1.iter().map(|r| r.community_number));
    w.u16s(&m::COM1_AGGLOMERATION, com1.iter().map(|r| r.agglomeration));
    w.u16s(&m::COM2_COMMUNITY_NUMBER, com2.iter().map(|r| r.community_number));
    w.u16s(&m::COM2_CODE, com2.iter().map(|r| r.code));
    w.u16s(&m::DISTRICT_NUMBER, dist.iter().map(|r| r.number));

    w.u32s(&m::ZIP1_VALID_FROM, zip1.iter().map(|r| r.valid_from));

    w.texts(&m::ZIP1_NAME_SHORT, zip1.iter().map(|r| r.name_short.as_str()))?;
    w.texts(&m::ZIP1_NAME, zip1.iter().map(|r| r.name.as_str()))?;
    w.texts(&m::ZIP1_CANTON, zip1.iter().map(|r| r.canton.as_str()))?;
    w.texts(&m::ZIP2_NAME_SHORT, zip2.iter().map(|r| r.name_short.as_str()))?;
    w.texts(&m::ZIP2_NAME, zip2.iter().map(|r| r.name.as_str()))?;
    w.texts(&m::COM1_NAME, com1.iter().map(|r| r.name.as_str()))?;
    w.texts(&m::COM1_CANTON, com1.iter().map(|r| r.canton.as_str()))?;
    w.texts(&m::DISTRICT_CANTON, dist.iter().map(|r| r.canton.as_str()))?;
    w.texts(&m::DISTRICT_NAME, dist.iter().map(|r| r.name.as_str()))?;

    let buf = w.finish(rows.master_date, rows.random_code)?;
    tracing::debug!(bytes = buf.len(), ?counts, "packed snapshot");
    Ok(buf)
}

/// Accumulates the four sections. Columns must be written in manifest
/// order.
struct SectionWriter {
    counts: RowCounts,
    int1: Vec<u8>,
    int2: Vec<u8>,
    int4: Vec<u8>,
    text: Vec<u8>,
    text_fields: usize,
    next: usize,
}

impl SectionWriter {
    fn new(counts: RowCounts) -> Self {
        let cap = |s| counts.section_size(s).unwrap_or(0);
        Self {
            counts,
            int1: Vec::with_capacity(cap(Section::Int1)),
            int2: Vec::with_capacity(cap(Section::Int2)),
            int4: Vec::with_capacity(cap(Section::Int4)),
            text: Vec::new(),
            text_fields: 0,
            next: 0,
        }
    }

    fn advance(&mut self, column: &Column) {
        debug_assert_eq!(COLUMNS.get(self.next), Some(column), "column written out of order");
        self.next += 1;
    }

    fn u8s(&mut self, column: &Column, values: impl Iterator<Item = u8>) {
        self.advance(column);
        self.int1.extend(values);
    }

    fn u16s(&mut self, column: &Column, values: impl Iterator<Item = u16>) {
        self.advance(column);
        for v in values {
            self.int2.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn u32s(&mut self, column: &Column, values: impl Iterator<Item = u32>) {
        self.advance(column);
        for v in values {
            self.int4.extend_from_slice(&v.to_be_bytes());
        }
    }

    fn texts<'a>(
        &mut self,
        column: &Column,
        values: impl Iterator<Item = &'a str>,
    ) -> Result<(), FormatError> {
        self.advance(column);
        for (row, v) in values.enumerate() {
            if v.as_bytes().contains(&TEXT_SEPARATOR) {
                return Err(FormatError::SeparatorInText {
                    table: column.table.name(),
                    row,
                    column: column.name,
                });
            }
            if self.text_fields > 0 {
                self.text.push(TEXT_SEPARATOR);
            }
            self.text.extend_from_slice(v.as_bytes());
            self.text_fields += 1;
        }
        Ok(())
    }

    fn finish(self, master_date: u32, random_code: u32) -> Result<Vec<u8>, FormatError> {
        debug_assert_eq!(self.next, COLUMNS.len());
        let mut buf = Vec::with_capacity(
            HEADER_LEN + self.int1.len() + self.int2.len() + self.int4.len() + self.text.len(),
        );
        buf.extend_from_slice(&master_date.to_be_bytes());
        buf.extend_from_slice(&random_code.to_be_bytes());
        for count in self.counts.0 {
            buf.extend_from_slice(&count.to_be_bytes());
        }
        let sections = [&self.int1, &self.int2, &self.int4, &self.text];
        for (section, bytes) in Section::ALL.into_iter().zip(sections) {
            buf.extend_from_slice(&section_size(section, bytes.len())?.to_be_bytes());
        }
        buf.extend_from_slice(&self.int1);
        buf.extend_from_slice(&self.int2);
        buf.extend_from_slice(&self.int4);
        buf.extend_from_slice(&self.text);
        Ok(buf)
    }
}

fn section_size(section: Section, len: usize) -> Result<u32, FormatError> {
    u32::try_from(len).map_err(|_| FormatError::SectionTooLarge {
        section: section.name(),
        len,
    })
}

// ─── Coercion ───────────────────────────────────────────────────────

/// Parse untyped source rows into typed row groups.
pub fn coerce(tables: &SourceTables) -> Result<RowGroups, FormatError> {
    let header = Field::new(&tables.header, "header", 0);
    let master_date = header.date(1, "master_date")?;
    let random_code = header.int::<u32>(2, "random_code")?;

    let zip_details = rows(&tables.zip_details, Table::ZipDetail, |f| {
        Ok(ZipDetailRow {
            ordering_number: f.int(1, m::ZIP1_ONRP.name)?,
            largest_community: f.int(2, m::ZIP1_LARGEST_COMMUNITY.name)?,
            zip_type: f.int(3, m::ZIP1_TYPE.name)?,
            code: f.int(4, m::ZIP1_CODE.name)?,
            add_on: f.int(5, m::ZIP1_ADD_ON.name)?,
            name_short: f.text(7),
            name: f.text(8),
            canton: f.text(9),
            language: f.int(10, m::ZIP1_LANGUAGE.name)?,
            language_alternative: f.int(11, m::ZIP1_LANGUAGE_ALTERNATIVE.name)?,
            delivery_by: f.int(12, m::ZIP1_DELIVERY_BY.name)?,
            valid_from: f.date(13, m::ZIP1_VALID_FROM.name)?,
        })
    })?;

    let zip_names = rows(&tables.zip_names, Table::ZipName, |f| {
        Ok(ZipNameRow {
            ordering_number: f.int(1, m::ZIP2_ONRP.name)?,
            sequence_number: f.int(2, m::ZIP2_SEQUENCE_NUMBER.name)?,
            designation: f.int(3, m::ZIP2_DESIGNATION.name)?,
            language: f.int(4, m::ZIP2_LANGUAGE.name)?,
            name_short: f.text(5),
            name: f.text(6),
        })
    })?;

    let communities = rows(&tables.communities, Table::Community, |f| {
        Ok(CommunityRow {
            community_number: f.int(1, m::COM1_COMMUNITY_NUMBER.name)?,
            name: f.text(2),
            canton: f.text(3),
            agglomeration: f.int(4, m::COM1_AGGLOMERATION.name)?,
        })
    })?;

    let community_zips = rows(&tables.community_zips, Table::CommunityZip, |f| {
        Ok(CommunityZipRow {
            community_number: f.int(4, m::COM2_COMMUNITY_NUMBER.name)?,
            code: f.int(7, m::COM2_CODE.name)?,
            add_on: f.int(8, m::COM2_ADD_ON.name)?,
        })
    })?;

    let districts = rows(&tables.districts, Table::District, |f| {
        Ok(DistrictRow {
            canton: f.text(0),
            number: f.int(1, m::DISTRICT_NUMBER.name)?,
            name: f.text(2),
        })
    })?;

    Ok(RowGroups {
        master_date,
        random_code,
        zip_details,
        zip_names,
        communities,
        community_zips,
        districts,
    })
}

fn rows<T>(
    source: &[SourceRow],
    table: Table,
    mut parse: impl FnMut(&Field<'_>) -> Result<T, FormatError>,
) -> Result<Vec<T>, FormatError> {
    source
        .iter()
        .enumerate()
        .map(|(row, fields)| parse(&Field::new(fields, table.name(), row)))
        .collect()
}

/// Typed access to the fields of one source row.
struct Field<'a> {
    fields: &'a [String],
    table: &'static str,
    row: usize,
}

impl<'a> Field<'a> {
    fn new(fields: &'a [String], table: &'static str, row: usize) -> Self {
        Self { fields, table, row }
    }

    fn raw(&self, index: usize) -> &'a str {
        self.fields.get(index).map(|s| s.trim()).unwrap_or_default()
    }

    fn text(&self, index: usize) -> String {
        self.fields.get(index).cloned().unwrap_or_default()
    }

    fn int<T: TryFrom<u64> + Bounded>(
        &self,
        index: usize,
        column: &'static str,
    ) -> Result<T, FormatError> {
        let raw = self.raw(index);
        if raw.is_empty() {
            return T::try_from(0).map_err(|_| self.invalid(column, raw));
        }
        let value: u64 = raw.parse().map_err(|_| self.invalid(column, raw))?;
        T::try_from(value).map_err(|_| FormatError::OutOfRange {
            table: self.table,
            row: self.row,
            column,
            value,
            max: T::MAX,
        })
    }

    fn date(&self, index: usize, column: &'static str) -> Result<u32, FormatError> {
        let raw = self.raw(index);
        if raw.is_empty() {
            return Ok(0);
        }
        let date: NaiveDate = parse_compact_date(raw).map_err(|_| FormatError::InvalidDate {
            table: self.table,
            row: self.row,
            column,
            value: raw.to_string(),
        })?;
        Ok(julian_day(date))
    }

    fn invalid(&self, column: &'static str, raw: &str) -> FormatError {
        FormatError::InvalidInteger {
            table: self.table,
            row: self.row,
            column,
            value: raw.to_string(),
        }
    }
}

/// Largest value of a column width.
trait Bounded {
    const MAX: u64;
}

impl Bounded for u8 {
    const MAX: u64 = u8::MAX as u64;
}

impl Bounded for u16 {
    const MAX: u64 = u16::MAX as u64;
}

impl Bounded for u32 {
    const MAX: u64 = u32::MAX as u64;
}
