//! # Coded Fields: Languages, Zip Code Types, Name Designations
//!
//! The agency's extracts encode languages, zip code types and name-variant
//! designations as small integers. Each enum here is the single place where
//! those integers gain meaning; every `match` over them is exhaustive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Language of a name or the main language spoken in a zip code area.
///
/// | Code | Language |
/// |------|----------|
/// | 0 | native / unspecified |
/// | 1 | German |
/// | 2 | French |
/// | 3 | Italian |
/// | 4 | Romansh |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// The name in the area's own language, without a specific tag.
    Native,
    /// German.
    De,
    /// French.
    Fr,
    /// Italian.
    It,
    /// Romansh.
    Rt,
}

impl Language {
    /// The four tagged languages, in code order.
    pub const TAGGED: [Self; 4] = [Self::De, Self::Fr, Self::It, Self::Rt];

    /// Decode a numeric language code.
    pub fn from_code(code: u8) -> Result<Self, FormatError> {
        match code {
            0 => Ok(Self::Native),
            1 => Ok(Self::De),
            2 => Ok(Self::Fr),
            3 => Ok(Self::It),
            4 => Ok(Self::Rt),
            other => Err(FormatError::UnknownCode {
                what: "language",
                value: u32::from(other),
            }),
        }
    }

    /// Decode an optional language code, where `0` means "none".
    pub fn from_optional_code(code: u8) -> Result<Option<Self>, FormatError> {
        match Self::from_code(code)? {
            Self::Native => Ok(None),
            lang => Ok(Some(lang)),
        }
    }

    /// The numeric code of this language.
    pub fn code(self) -> u8 {
        match self {
            Self::Native => 0,
            Self::De => 1,
            Self::Fr => 2,
            Self::It => 3,
            Self::Rt => 4,
        }
    }

    /// Short tag (`native`, `de`, `fr`, `it`, `rt`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::De => "de",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Rt => "rt",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Self::Native),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "it" => Ok(Self::It),
            "rt" | "rm" => Ok(Self::Rt),
            other => Err(format!("unknown language: {other:?}")),
        }
    }
}

/// The type of a zip code ("PLZ-Typ").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZipType {
    /// `10`: domicile and PO-box addresses.
    DomicileAndPoBox,
    /// `20`: domicile addresses only.
    Domicile,
    /// `30`: PO-box addresses only.
    PoBox,
    /// `40`: company zip code.
    Company,
    /// `80`: post-internal zip code.
    Internal,
}

impl ZipType {
    /// Decode a numeric zip code type.
    pub fn from_code(code: u8) -> Result<Self, FormatError> {
        match code {
            10 => Ok(Self::DomicileAndPoBox),
            20 => Ok(Self::Domicile),
            30 => Ok(Self::PoBox),
            40 => Ok(Self::Company),
            80 => Ok(Self::Internal),
            other => Err(FormatError::UnknownCode {
                what: "zip code type",
                value: u32::from(other),
            }),
        }
    }

    /// The numeric code of this type.
    pub fn code(self) -> u8 {
        match self {
            Self::DomicileAndPoBox => 10,
            Self::Domicile => 20,
            Self::PoBox => 30,
            Self::Company => 40,
            Self::Internal => 80,
        }
    }

    /// Whether people live at addresses of this type.
    pub fn is_residential(self) -> bool {
        matches!(self, Self::DomicileAndPoBox | Self::Domicile)
    }
}

impl fmt::Display for ZipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Classification of a name-variant row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    /// Code 2: usable in place of the primary name.
    Alternate,
    /// Code 3: usable alongside, never replacing, the primary name.
    Region,
}

impl Designation {
    /// Decode a designation code. Codes other than 2 and 3 carry no
    /// designation the index uses and yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Alternate),
            3 => Some(Self::Region),
            _ => None,
        }
    }

    /// The numeric code of this designation.
    pub fn code(self) -> u8 {
        match self {
            Self::Alternate => 2,
            Self::Region => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_codes_roundtrip() {
        for code in 0..=4u8 {
            assert_eq!(Language::from_code(code).unwrap().code(), code);
        }
        assert!(Language::from_code(5).is_err());
    }

    #[test]
    fn optional_language_zero_is_none() {
        assert_eq!(Language::from_optional_code(0).unwrap(), None);
        assert_eq!(Language::from_optional_code(2).unwrap(), Some(Language::Fr));
    }

    #[test]
    fn language_from_str() {
        assert_eq!("it".parse::<Language>().unwrap(), Language::It);
        assert_eq!("rm".parse::<Language>().unwrap(), Language::Rt);
        assert!("en".parse::<Language>().is_err());
    }

    #[test]
    fn zip_type_codes() {
        for code in [10u8, 20, 30, 40, 80] {
            assert_eq!(ZipType::from_code(code).unwrap().code(), code);
        }
        let err = ZipType::from_code(50).unwrap_err();
        assert_eq!(err.to_string(), "unknown zip code type code 50");
    }

    #[test]
    fn residential_types() {
        assert!(ZipType::Domicile.is_residential());
        assert!(ZipType::DomicileAndPoBox.is_residential());
        assert!(!ZipType::PoBox.is_residential());
    }

    #[test]
    fn designation_codes() {
        assert_eq!(Designation::from_code(2), Some(Designation::Alternate));
        assert_eq!(Designation::from_code(3), Some(Designation::Region));
        assert_eq!(Designation::from_code(1), None);
    }

    #[test]
    fn language_serde_tag() {
        assert_eq!(serde_json::to_string(&Language::De).unwrap(), "\"de\"");
    }
}
