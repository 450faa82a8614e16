//! # Source Extract Reader
//!
//! Reads the three delimited text extracts the snapshot is built from:
//!
//! | Extract | Delimiter | Terminator | Records |
//! |---|---|---|---|
//! | Postal master file | `;` | CRLF | `00` header, `01` zip detail, `02` name variant, `03` community |
//! | Community to zip links | `,` | LF | one link per line |
//! | Districts | `,` | LF | one district per line |
//!
//! Master-file records are dispatched on their record-type field. Types
//! other than `00` through `03` are skipped. Every line of a known record
//! type must have exactly the field count of its [`TableFormat`]; a line
//! with a different count is a [`FormatError::FieldCount`], never silently
//! dropped. Blank lines are ignored.
//!
//! The agencies publish the extracts in Windows-1252. [`SourceEncoding`]
//! decodes them to UTF-8 before parsing.

use std::path::Path;

use swissloc_core::{FormatError, SwissLocError};

/// How lines of a table end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `\r\n`.
    CrLf,
    /// `\n`.
    Lf,
}

impl Terminator {
    fn label(self) -> &'static str {
        match self {
            Self::CrLf => "CRLF",
            Self::Lf => "LF",
        }
    }
}

/// Line layout of one source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    /// Table name used in error messages.
    pub name: &'static str,
    /// Exact number of fields per line.
    pub fields: usize,
    pub delimiter: char,
    pub terminator: Terminator,
}

/// Master-file header record (`00`).
pub const MASTER_HEADER: TableFormat = TableFormat {
    name: "header",
    fields: 3,
    delimiter: ';',
    terminator: Terminator::CrLf,
};

/// Master-file zip detail record (`01`).
pub const ZIP_DETAIL: TableFormat = TableFormat {
    name: "zip1",
    fields: 16,
    delimiter: ';',
    terminator: Terminator::CrLf,
};

/// Master-file name-variant record (`02`).
pub const ZIP_NAME: TableFormat = TableFormat {
    name: "zip2",
    fields: 7,
    delimiter: ';',
    terminator: Terminator::CrLf,
};

/// Master-file community record (`03`).
pub const COMMUNITY: TableFormat = TableFormat {
    name: "com1",
    fields: 5,
    delimiter: ';',
    terminator: Terminator::CrLf,
};

/// Community to zip code link file.
pub const COMMUNITY_ZIP: TableFormat = TableFormat {
    name: "com2",
    fields: 10,
    delimiter: ',',
    terminator: Terminator::Lf,
};

/// District file.
pub const DISTRICT: TableFormat = TableFormat {
    name: "district",
    fields: 3,
    delimiter: ',',
    terminator: Terminator::Lf,
};

/// A source row: the fields of one line, unparsed.
pub type SourceRow = Vec<String>;

/// The parsed but untyped source extracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTables {
    /// The `00` header record.
    pub header: SourceRow,
    pub zip_details: Vec<SourceRow>,
    pub zip_names: Vec<SourceRow>,
    pub communities: Vec<SourceRow>,
    pub community_zips: Vec<SourceRow>,
    pub districts: Vec<SourceRow>,
}

impl SourceTables {
    /// Parse already-decoded extract texts.
    pub fn parse(
        master: &str,
        community_zips: &str,
        districts: &str,
    ) -> Result<Self, FormatError> {
        let mut tables = Self::default();
        let mut header = None;

        for (line, content) in lines(master, Terminator::CrLf, "master") {
            let content = content?;
            let record_type = content.split(';').next().unwrap_or_default();
            let (format, target) = match record_type {
                "00" => (MASTER_HEADER, None),
                "01" => (ZIP_DETAIL, Some(&mut tables.zip_details)),
                "02" => (ZIP_NAME, Some(&mut tables.zip_names)),
                "03" => (COMMUNITY, Some(&mut tables.communities)),
                _ => continue,
            };
            let row = split_fields(content, &format, line)?;
            match target {
                Some(rows) => rows.push(row),
                None if header.is_none() => header = Some(row),
                None => {}
            }
        }
        tables.header = header.ok_or(FormatError::MissingHeader)?;
        tables.community_zips = parse_table(community_zips, &COMMUNITY_ZIP)?;
        tables.districts = parse_table(districts, &DISTRICT)?;

        tracing::debug!(
            zip_details = tables.zip_details.len(),
            zip_names = tables.zip_names.len(),
            communities = tables.communities.len(),
            community_zips = tables.community_zips.len(),
            districts = tables.districts.len(),
            "parsed source extracts"
        );
        Ok(tables)
    }

    /// Read and decode the three extract files.
    pub fn read(
        master: &Path,
        community_zips: &Path,
        districts: &Path,
        encoding: SourceEncoding,
    ) -> Result<Self, SwissLocError> {
        let master = encoding.decode(&std::fs::read(master)?)?;
        let community_zips = encoding.decode(&std::fs::read(community_zips)?)?;
        let districts = encoding.decode(&std::fs::read(districts)?)?;
        Ok(Self::parse(&master, &community_zips, &districts)?)
    }

    /// `(district number, community number)` pairs from the link file,
    /// each pair once, in first-seen order. The snapshot does not store
    /// them; the graph builder takes them separately.
    pub fn district_members(&self) -> Result<Vec<(u32, u32)>, FormatError> {
        let field = |row: usize, index: usize, column: &'static str| {
            let fields = &self.community_zips[row];
            let value = fields
                .get(index)
                .ok_or(FormatError::FieldCount {
                    table: COMMUNITY_ZIP.name,
                    line: row + 1,
                    expected: COMMUNITY_ZIP.fields,
                    actual: fields.len(),
                })?
                .trim();
            value.parse::<u32>().map_err(|_| FormatError::InvalidInteger {
                table: COMMUNITY_ZIP.name,
                row,
                column,
                value: value.to_string(),
            })
        };
        let mut links = Vec::new();
        for row in 0..self.community_zips.len() {
            let link = (field(row, 2, "district_number")?, field(row, 4, "community_number")?);
            if !links.contains(&link) {
                links.push(link);
            }
        }
        Ok(links)
    }
}

/// Parse every non-blank line of `text` as a row of `format`.
pub fn parse_table(text: &str, format: &TableFormat) -> Result<Vec<SourceRow>, FormatError> {
    lines(text, format.terminator, format.name)
        .map(|(line, content)| split_fields(content?, format, line))
        .collect()
}

fn split_fields(
    content: &str,
    format: &TableFormat,
    line: usize,
) -> Result<SourceRow, FormatError> {
    let row: SourceRow = content.split(format.delimiter).map(str::to_string).collect();
    if row.len() != format.fields {
        return Err(FormatError::FieldCount {
            table: format.name,
            line,
            expected: format.fields,
            actual: row.len(),
        });
    }
    Ok(row)
}

/// Non-blank lines with their one-based line numbers and terminators
/// removed. The last line may be unterminated.
fn lines<'a>(
    text: &'a str,
    terminator: Terminator,
    table: &'static str,
) -> impl Iterator<Item = (usize, Result<&'a str, FormatError>)> + 'a {
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(i, raw)| {
            let line = i + 1;
            let content = match raw.strip_suffix('\n') {
                Some(body) => match terminator {
                    Terminator::CrLf => {
                        body.strip_suffix('\r').ok_or(FormatError::MissingTerminator {
                            table,
                            line,
                            terminator: terminator.label(),
                        })
                    }
                    Terminator::Lf => Ok(body),
                },
                None => Ok(raw.strip_suffix('\r').unwrap_or(raw)),
            };
            (line, content)
        })
        .filter(|(_, content)| !matches!(content, Ok(c) if c.trim().is_empty()))
}

// ─── Encoding ───────────────────────────────────────────────────────

/// Character encoding of the source extracts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Already UTF-8.
    Utf8,
    /// Windows-1252, as published by the agencies.
    #[default]
    Windows1252,
}

impl SourceEncoding {
    /// Decode raw file bytes to UTF-8 text.
    pub fn decode(self, bytes: &[u8]) -> Result<String, FormatError> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| FormatError::InvalidUtf8(e.utf8_error().to_string())),
            Self::Windows1252 => Ok(bytes.iter().map(|&b| windows_1252(b)).collect()),
        }
    }
}

impl std::str::FromStr for SourceEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "windows-1252" | "windows1252" | "cp1252" => Ok(Self::Windows1252),
            other => Err(format!("unknown source encoding: {other}")),
        }
    }
}

/// Code points of 0x80..=0x9F. The five unassigned bytes map to the C1
/// control of the same value.
const WINDOWS_1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn windows_1252(byte: u8) -> char {
    match byte {
        0x80..=0x9f => WINDOWS_1252_HIGH[usize::from(byte - 0x80)],
        _ => char::from(byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER: &str = "00;20240115;48213\r\n\
        01;1234;261;20;8001;00;8001;Zürich;Zürich;ZH;1;0;1234;19880301;800100;Y\r\n\
        02;1234;1;2;3;Zurigo;Zurigo\r\n\
        03;261;Zürich;ZH;261\r\n\
        04;something;else\r\n";

    #[test]
    fn dispatches_master_records() {
        let t = SourceTables::parse(MASTER, "", "").unwrap();
        assert_eq!(t.header, vec!["00", "20240115", "48213"]);
        assert_eq!(t.zip_details.len(), 1);
        assert_eq!(t.zip_details[0][8], "Zürich");
        assert_eq!(t.zip_names[0][5], "Zurigo");
        assert_eq!(t.communities[0][2], "Zürich");
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = SourceTables::parse("03;261;Zürich;ZH;261\r\n", "", "").unwrap_err();
        assert_eq!(err, FormatError::MissingHeader);
    }

    #[test]
    fn wrong_field_count_is_reported_with_line() {
        let master = "00;20240115;1\r\n02;1234;1;2\r\n";
        let err = SourceTables::parse(master, "", "").unwrap_err();
        assert_eq!(
            err,
            FormatError::FieldCount {
                table: "zip2",
                line: 2,
                expected: 7,
                actual: 4
            }
        );
    }

    #[test]
    fn master_lines_require_crlf() {
        let err = SourceTables::parse("00;20240115;1\n", "", "").unwrap_err();
        assert!(matches!(err, FormatError::MissingTerminator { line: 1, .. }));
    }

    #[test]
    fn lf_tables_allow_unterminated_last_line() {
        let rows = parse_table("ZH,101,Bezirk Affoltern\nZH,112,Bezirk Zürich", &DISTRICT).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["ZH", "112", "Bezirk Zürich"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let rows = parse_table("\nZH,101,Bezirk Affoltern\n\n", &DISTRICT).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn district_members_from_links() {
        let links = "1,ZH,112,Bezirk Zürich,261,Zürich,Zürich,8001,0,x\n\
            1,ZH,112,Bezirk Zürich,261,Zürich,Zürich,8002,0,x\n\
            1,ZH,101,Bezirk Affoltern,2,Affoltern,Affoltern,8910,0,x\n";
        let t = SourceTables::parse("00;20240115;1\r\n", links, "").unwrap();
        assert_eq!(t.district_members().unwrap(), vec![(112, 261), (101, 2)]);

        let bad = SourceTables::parse("00;20240115;1\r\n", "1,ZH,?,x,261,x,x,8001,0,x\n", "")
            .unwrap()
            .district_members()
            .unwrap_err();
        assert!(matches!(bad, FormatError::InvalidInteger { column: "district_number", .. }));
    }

    #[test]
    fn short_link_row_is_a_field_count_error() {
        let mut t = SourceTables::parse("00;20240115;1\r\n", "", "").unwrap();
        t.community_zips.push(vec!["1".to_string(), "ZH".to_string(), "112".to_string()]);
        let err = t.district_members().unwrap_err();
        assert!(matches!(
            err,
            FormatError::FieldCount { line: 1, expected: 10, actual: 3, .. }
        ));
    }

    #[test]
    fn decodes_windows_1252() {
        let bytes = b"Z\xfcrich \x80 Gen\xe8ve \x9c";
        let text = SourceEncoding::Windows1252.decode(bytes).unwrap();
        assert_eq!(text, "Zürich € Genève œ");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = SourceEncoding::Utf8.decode(b"Z\xfcrich").unwrap_err();
        assert!(matches!(err, FormatError::InvalidUtf8(_)));
    }

    #[test]
    fn encoding_from_str() {
        assert_eq!("UTF-8".parse::<SourceEncoding>().unwrap(), SourceEncoding::Utf8);
        assert_eq!("cp1252".parse::<SourceEncoding>().unwrap(), SourceEncoding::Windows1252);
        assert!("latin9".parse::<SourceEncoding>().is_err());
    }
}
