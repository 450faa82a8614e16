//! # Unpacking
//!
//! Decodes a snapshot buffer into [`RowGroups`]. Every size is checked
//! before any column is read:
//!
//! 1. the buffer holds the 34-byte header,
//! 2. header plus declared section sizes equals the buffer length,
//! 3. each fixed-width section size equals row counts times width,
//! 4. the text section is UTF-8 and splits into exactly the implied number
//!    of strings.
//!
//! After these checks column reads cannot run past their section.

use swissloc_core::FormatError;

use crate::manifest::{
    self as m, Column, RowCounts, Section, Table, COLUMNS, HEADER_LEN, TEXT_SEPARATOR,
};
use crate::rows::{
    CommunityRow, CommunityZipRow, DistrictRow, RowGroups, ZipDetailRow, ZipNameRow,
};

/// Decode a snapshot buffer.
pub fn unpack(data: &[u8]) -> Result<RowGroups, FormatError> {
    if data.len() < HEADER_LEN {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN,
            actual: data.len(),
        });
    }

    let master_date = be_u32(data, 0);
    let random_code = be_u32(data, 4);
    let mut counts = [0u16; 5];
    for (i, count) in counts.iter_mut().enumerate() {
        *count = be_u16(data, 8 + 2 * i);
    }
    let counts = RowCounts(counts);
    let sizes: Vec<usize> = (0..4).map(|i| be_u32(data, 18 + 4 * i) as usize).collect();

    let declared = sizes
        .iter()
        .try_fold(HEADER_LEN, |acc, s| acc.checked_add(*s))
        .unwrap_or(usize::MAX);
    if declared != data.len() {
        return Err(FormatError::LengthMismatch {
            declared,
            actual: data.len(),
        });
    }

    for (section, declared) in Section::ALL.iter().zip(&sizes) {
        if let Some(expected) = counts.section_size(*section) {
            if expected != *declared {
                return Err(FormatError::SectionSize {
                    section: section.name(),
                    declared: *declared,
                    expected,
                });
            }
        }
    }

    let mut offset = HEADER_LEN;
    let mut slices = Vec::with_capacity(4);
    for size in &sizes {
        slices.push(&data[offset..offset + size]);
        offset += size;
    }

    let text = std::str::from_utf8(slices[3]).map_err(|e| FormatError::InvalidUtf8(e.to_string()))?;
    let expected_texts = counts.values_in(Section::Text);
    let texts: Vec<&str> = if text.is_empty() && expected_texts == 0 {
        Vec::new()
    } else {
        text.split(char::from(TEXT_SEPARATOR)).collect()
    };
    if texts.len() != expected_texts {
        return Err(FormatError::TextFieldCount {
            expected: expected_texts,
            actual: texts.len(),
        });
    }

    let mut r = SectionReader {
        counts,
        int1: slices[0],
        int2: slices[1],
        int4: slices[2],
        texts: &texts,
        next: 0,
    };

    // Columns in manifest order.
    let zip1_type = r.u8s(&m::ZIP1_TYPE);
    let zip1_add_on = r.u8s(&m::ZIP1_ADD_ON);
    let zip1_language = r.u8s(&m::ZIP1_LANGUAGE);
    let zip1_language_alternative = r.u8s(&m::ZIP1_LANGUAGE_ALTERNATIVE);
    let zip2_sequence_number = r.u8s(&m::ZIP2_SEQUENCE_NUMBER);
    let zip2_designation = r.u8s(&m::ZIP2_DESIGNATION);
    let zip2_language = r.u8s(&m::ZIP2_LANGUAGE);
    let com2_add_on = r.u8s(&m::COM2_ADD_ON);

    let zip1_onrp = r.u16s(&m::ZIP1_ONRP);
    let zip1_code = r.u16s(&m::ZIP1_CODE);
    let zip1_delivery_by = r.u16s(&m::ZIP1_DELIVERY_BY);
    let zip1_largest_community = r.u16s(&m::ZIP1_LARGEST_COMMUNITY);
    let zip2_onrp = r.u16s(&m::ZIP2_ONRP);
    let com1_number = r.u16s(&m::COM1_COMMUNITY_NUMBER);
    let com1_agglomeration = r.u16s(&m::COM1_AGGLOMERATION);
    let com2_number = r.u16s(&m::COM2_COMMUNITY_NUMBER);
    let com2_code = r.u16s(&m::COM2_CODE);
    let district_number = r.u16s(&m::DISTRICT_NUMBER);

    let zip1_valid_from = r.u32s(&m::ZIP1_VALID_FROM);

    let zip1_name_short = r.texts(&m::ZIP1_NAME_SHORT);
    let zip1_name = r.texts(&m::ZIP1_NAME);
    let zip1_canton = r.texts(&m::ZIP1_CANTON);
    let zip2_name_short = r.texts(&m::ZIP2_NAME_SHORT);
    let zip2_name = r.texts(&m::ZIP2_NAME);
    let com1_name = r.texts(&m::COM1_NAME);
    let com1_canton = r.texts(&m::COM1_CANTON);
    let district_canton = r.texts(&m::DISTRICT_CANTON);
    let district_name = r.texts(&m::DISTRICT_NAME);

    let zip_details = (0..counts.get(Table::ZipDetail))
        .map(|i| ZipDetailRow {
            ordering_number: zip1_onrp[i],
            zip_type: zip1_type[i],
            canton: zip1_canton[i].to_string(),
            code: zip1_code[i],
            add_on: zip1_add_on[i],
            delivery_by: zip1_delivery_by[i],
            language: zip1_language[i],
            language_alternative: zip1_language_alternative[i],
            name_short: zip1_name_short[i].to_string(),
            name: zip1_name[i].to_string(),
            largest_community: zip1_largest_community[i],
            valid_from: zip1_valid_from[i],
        })
        .collect();

    let zip_names = (0..counts.get(Table::ZipName))
        .map(|i| ZipNameRow {
            ordering_number: zip2_onrp[i],
            sequence_number: zip2_sequence_number[i],
            designation: zip2_designation[i],
            language: zip2_language[i],
            name_short: zip2_name_short[i].to_string(),
            name: zip2_name[i].to_string(),
        })
        .collect();

    let communities = (0..counts.get(Table::Community))
        .map(|i| CommunityRow {
            community_number: com1_number[i],
            name: com1_name[i].to_string(),
            canton: com1_canton[i].to_string(),
            agglomeration: com1_agglomeration[i],
        })
        .collect();

    let community_zips = (0..counts.get(Table::CommunityZip))
        .map(|i| CommunityZipRow {
            community_number: com2_number[i],
            code: com2_code[i],
            add_on: com2_add_on[i],
        })
        .collect();

    let districts = (0..counts.get(Table::District))
        .map(|i| DistrictRow {
            canton: district_canton[i].to_string(),
            number: district_number[i],
            name: district_name[i].to_string(),
        })
        .collect();

    tracing::debug!(bytes = data.len(), ?counts, "unpacked snapshot");

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

fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

fn be_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Reads columns in manifest order from validated sections.
struct SectionReader<'a> {
    counts: RowCounts,
    int1: &'a [u8],
    int2: &'a [u8],
    int4: &'a [u8],
    texts: &'a [&'a str],
    next: usize,
}

impl<'a> SectionReader<'a> {
    fn advance(&mut self, column: &Column) -> usize {
        debug_assert_eq!(COLUMNS.get(self.next), Some(column), "column read out of order");
        self.next += 1;
        self.counts.get(column.table)
    }

    fn u8s(&mut self, column: &Column) -> &'a [u8] {
        let n = self.advance(column);
        let (head, tail) = self.int1.split_at(n);
        self.int1 = tail;
        head
    }

    fn u16s(&mut self, column: &Column) -> Vec<u16> {
        let n = self.advance(column);
        let (head, tail) = self.int2.split_at(2 * n);
        self.int2 = tail;
        head.chunks_exact(2).map(|c| u16::from_be_bytes([c[0], c[1]])).collect()
    }

    fn u32s(&mut self, column: &Column) -> Vec<u32> {
        let n = self.advance(column);
        let (head, tail) = self.int4.split_at(4 * n);
        self.int4 = tail;
        head.chunks_exact(4)
            .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    fn texts(&mut self, column: &Column) -> &'a [&'a str] {
        let n = self.advance(column);
        let (head, tail) = self.texts.split_at(n);
        self.texts = tail;
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::pack;

    fn sample() -> RowGroups {
        RowGroups {
            master_date: 2_460_325,
            random_code: 48213,
            zip_details: vec![ZipDetailRow {
                ordering_number: 1234,
                zip_type: 20,
                canton: "ZH".into(),
                code: 8001,
                add_on: 0,
                delivery_by: 1234,
                language: 1,
                language_alternative: 0,
                name_short: "Zürich".into(),
                name: "Zürich".into(),
                largest_community: 261,
                valid_from: 2_447_222,
            }],
            zip_names: vec![ZipNameRow {
                ordering_number: 1234,
                sequence_number: 1,
                designation: 2,
                language: 3,
                name_short: "Zurigo".into(),
                name: "Zurigo".into(),
            }],
            communities: vec![CommunityRow {
                community_number: 261,
                name: "Zürich".into(),
                canton: "ZH".into(),
                agglomeration: 261,
            }],
            community_zips: vec![CommunityZipRow {
                community_number: 261,
                code: 8001,
                add_on: 0,
            }],
            districts: vec![DistrictRow {
                canton: "ZH".into(),
                number: 112,
                name: "Bezirk Zürich".into(),
            }],
        }
    }

    #[test]
    fn round_trip() {
        let rows = sample();
        assert_eq!(unpack(&pack(&rows).unwrap()).unwrap(), rows);
    }

    #[test]
    fn empty_snapshot() {
        let buf = pack(&RowGroups::default()).unwrap();
        assert_eq!(buf.len(), HEADER_LEN);
        assert_eq!(unpack(&buf).unwrap(), RowGroups::default());
    }

    #[test]
    fn empty_strings_survive() {
        let mut rows = sample();
        rows.zip_details[0].name_short.clear();
        rows.districts[0].name.clear();
        assert_eq!(unpack(&pack(&rows).unwrap()).unwrap(), rows);
    }

    #[test]
    fn single_empty_string_is_one_field() {
        let rows = RowGroups {
            districts: vec![DistrictRow {
                canton: String::new(),
                number: 1,
                name: String::new(),
            }],
            ..RowGroups::default()
        };
        assert_eq!(unpack(&pack(&rows).unwrap()).unwrap(), rows);
    }

    #[test]
    fn short_buffer_is_truncated() {
        assert_eq!(
            unpack(&[0u8; 10]).unwrap_err(),
            FormatError::Truncated {
                expected: HEADER_LEN,
                actual: 10
            }
        );
    }

    #[test]
    fn trailing_byte_is_length_mismatch() {
        let mut buf = pack(&sample()).unwrap();
        buf.push(0);
        assert!(matches!(unpack(&buf).unwrap_err(), FormatError::LengthMismatch { .. }));
    }

    #[test]
    fn inconsistent_counts_are_section_size_error() {
        let mut buf = pack(&sample()).unwrap();
        // Claim two districts.
        buf[17] = 2;
        assert_eq!(
            unpack(&buf).unwrap_err(),
            FormatError::SectionSize {
                section: "int2",
                declared: 20,
                expected: 22
            }
        );
    }

    #[test]
    fn extra_text_field_is_rejected() {
        let mut buf = pack(&sample()).unwrap();
        let last = buf.len() - 1;
        buf[last] = TEXT_SEPARATOR;
        assert!(matches!(
            unpack(&buf).unwrap_err(),
            FormatError::TextFieldCount { actual, expected } if actual == expected + 1
        ));
    }

    #[test]
    fn invalid_utf8_text_is_rejected() {
        let mut buf = pack(&sample()).unwrap();
        let last = buf.len() - 1;
        buf[last] = 0xff;
        assert!(matches!(unpack(&buf).unwrap_err(), FormatError::InvalidUtf8(_)));
    }
}
