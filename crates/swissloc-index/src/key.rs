//! # Zip Code Lookup Keys
//!
//! A lookup can be phrased several ways: `805200`, `"8052"`, `(8052, 0)`,
//! `(8052, "Zürich")`, `"Zürich"`. [`ZipKey`] is the closed set of those
//! shapes. Parsing happens once at the boundary; [`ZipCodes::lookup`]
//! dispatches on the variant.
//!
//! [`ZipCodes::lookup`]: crate::ZipCodes::lookup

use std::str::FromStr;

use swissloc_core::KeyError;

/// A classified zip code lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZipKey {
    /// Postal ordering number. Never produced by [`ZipKey::parse`] or
    /// [`ZipKey::from_number`], since an ordering number and a code can
    /// share digits; callers build it explicitly.
    OrderingNumber(u32),
    /// Four-digit code; matches every add-on.
    Code(u16),
    /// Four-digit code and two-digit add-on.
    CodeAddOn(u16, u8),
    /// Four-digit code and one of the zip code's names.
    CodeName(u16, String),
    /// One of the zip code's names.
    Name(String),
}

impl ZipKey {
    /// Classify a single textual key: six digits are a full code, four
    /// digits a code, anything else that is not purely numeric a name.
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(KeyError::Empty);
        }
        if !is_digits(key) {
            return Ok(Self::Name(key.to_string()));
        }
        match key.len() {
            6 => Ok(Self::CodeAddOn(digits(&key[..4]), digits(&key[4..]) as u8)),
            4 => Ok(Self::Code(digits(key))),
            _ => Err(KeyError::Unclassifiable(key.to_string())),
        }
    }

    /// Classify a two-part key: a four-digit code plus either a two-digit
    /// add-on or a name.
    pub fn parse_pair(code: &str, second: &str) -> Result<Self, KeyError> {
        let code = code.trim();
        if !(code.len() == 4 && is_digits(code)) {
            return Err(KeyError::Unclassifiable(code.to_string()));
        }
        let code = digits(code);
        let second = second.trim();
        if second.len() == 2 && is_digits(second) {
            Ok(Self::CodeAddOn(code, digits(second) as u8))
        } else if !second.is_empty() && !is_digits(second) {
            Ok(Self::CodeName(code, second.to_string()))
        } else {
            Err(KeyError::InvalidSecondComponent(second.to_string()))
        }
    }

    /// Classify a numeric key: `100000..=999999` is a full code,
    /// `1000..=9999` a code.
    pub fn from_number(n: u32) -> Result<Self, KeyError> {
        match n {
            100_000..=999_999 => Ok(Self::CodeAddOn((n / 100) as u16, (n % 100) as u8)),
            1_000..=9_999 => Ok(Self::Code(n as u16)),
            _ => Err(KeyError::OutOfRange(n)),
        }
    }
}

impl FromStr for ZipKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<(u16, u8)> for ZipKey {
    fn from((code, add_on): (u16, u8)) -> Self {
        Self::CodeAddOn(code, add_on)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Value of an ASCII digit string of at most four digits.
fn digits(s: &str) -> u16 {
    s.bytes().fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_shapes() {
        assert_eq!(ZipKey::parse("805200").unwrap(), ZipKey::CodeAddOn(8052, 0));
        assert_eq!(ZipKey::parse("8052").unwrap(), ZipKey::Code(8052));
        assert_eq!(ZipKey::parse(" Zürich ").unwrap(), ZipKey::Name("Zürich".into()));
        assert_eq!(ZipKey::parse("8052 Zürich").unwrap(), ZipKey::Name("8052 Zürich".into()));
        assert_eq!(ZipKey::parse("80520").unwrap_err(), KeyError::Unclassifiable("80520".into()));
        assert_eq!(ZipKey::parse("  ").unwrap_err(), KeyError::Empty);
    }

    #[test]
    fn parse_pairs() {
        assert_eq!(ZipKey::parse_pair("8052", "00").unwrap(), ZipKey::CodeAddOn(8052, 0));
        assert_eq!(
            ZipKey::parse_pair("8052", "Zürich").unwrap(),
            ZipKey::CodeName(8052, "Zürich".into())
        );
        assert!(matches!(
            ZipKey::parse_pair("8052", "123"),
            Err(KeyError::InvalidSecondComponent(_))
        ));
        assert!(matches!(ZipKey::parse_pair("805", "00"), Err(KeyError::Unclassifiable(_))));
    }

    #[test]
    fn numbers() {
        assert_eq!(ZipKey::from_number(805_200).unwrap(), ZipKey::CodeAddOn(8052, 0));
        assert_eq!(ZipKey::from_number(100_025).unwrap(), ZipKey::CodeAddOn(1000, 25));
        assert_eq!(ZipKey::from_number(8052).unwrap(), ZipKey::Code(8052));
        assert_eq!(ZipKey::from_number(42).unwrap_err(), KeyError::OutOfRange(42));
        assert_eq!(ZipKey::from_number(1_000_000).unwrap_err(), KeyError::OutOfRange(1_000_000));
    }

    #[test]
    fn ordering_number_is_never_inferred() {
        assert_eq!(ZipKey::parse("1234").unwrap(), ZipKey::Code(1234));
        assert!(ZipKey::parse("123").is_err());
        assert_eq!(ZipKey::from_number(1234).unwrap(), ZipKey::Code(1234));
        assert!(ZipKey::from_number(123).is_err());
    }

    #[test]
    fn conversions() {
        assert_eq!("8052".parse::<ZipKey>().unwrap(), ZipKey::Code(8052));
        assert_eq!(ZipKey::from((8052, 0)), ZipKey::CodeAddOn(8052, 0));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Textual and numeric classification agree on every code shape.
        #[test]
        fn text_and_number_agree(n in prop_oneof![1_000u32..=9_999, 100_000u32..=999_999]) {
            prop_assert_eq!(
                ZipKey::parse(&n.to_string()).unwrap(),
                ZipKey::from_number(n).unwrap()
            );
        }

        #[test]
        fn numeric_keys_never_become_ordering_numbers(n in any::<u32>()) {
            let by_number = ZipKey::from_number(n);
            let by_text = ZipKey::parse(&n.to_string());
            prop_assert!(!matches!(by_number, Ok(ZipKey::OrderingNumber(_))));
            prop_assert!(!matches!(by_text, Ok(ZipKey::OrderingNumber(_))));
        }

        #[test]
        fn non_numeric_keys_are_names(name in "[A-Za-zäöü][A-Za-zäöü -]{0,20}") {
            prop_assert_eq!(ZipKey::parse(&name).unwrap(), ZipKey::Name(name.trim().to_string()));
        }
    }
}
