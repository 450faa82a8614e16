//! # Search-Key Normalization
//!
//! Autocompletion matches ASCII, lowercase tokens. A [`Normalizer`] turns a
//! display name such as `"Zürich"` into those tokens. The index only relies
//! on the trait contract: the same input always produces the same tokens.
//!
//! [`Transliterator`] is the default implementation. German umlauts have two
//! accepted ASCII spellings (`ü` as `u` or as `ue`), so it produces two
//! spelling variants of every name and indexes both.

use std::collections::BTreeSet;

/// Turns display text into ASCII search tokens.
pub trait Normalizer: Send + Sync {
    /// Every search key derived from `text`. Deterministic.
    fn normalize(&self, text: &str) -> BTreeSet<String>;

    /// Token lists a query is completed with. Each inner list is one
    /// spelling of the query; results of all spellings are united.
    fn query_variants(&self, text: &str) -> Vec<Vec<String>> {
        vec![self.normalize(text).into_iter().collect()]
    }
}

/// Default [`Normalizer`]: strips diacritics and indexes both umlaut
/// spellings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transliterator;

impl Transliterator {
    /// Spelling with diacritics stripped (`ü` → `u`).
    pub fn strip(text: &str) -> String {
        fold(text, false)
    }

    /// Spelling with umlauts expanded (`ü` → `ue`).
    pub fn expand(text: &str) -> String {
        fold(text, true)
    }

    fn tokens(folded: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for token in folded.split_whitespace() {
            if !out.iter().any(|t| t == token) {
                out.push(token.to_string());
            }
        }
        out
    }
}

impl Normalizer for Transliterator {
    fn normalize(&self, text: &str) -> BTreeSet<String> {
        Self::tokens(&Self::strip(text))
            .into_iter()
            .chain(Self::tokens(&Self::expand(text)))
            .collect()
    }

    fn query_variants(&self, text: &str) -> Vec<Vec<String>> {
        let stripped = Self::tokens(&Self::strip(text));
        let expanded = Self::tokens(&Self::expand(text));
        if stripped == expanded {
            vec![stripped]
        } else {
            vec![stripped, expanded]
        }
    }
}

/// Lowercase, transliterate, and reduce to `[a-z0-9 ]`. Punctuation such as
/// `-`, `/`, `.` and `'` separates tokens.
fn fold(text: &str, expand_umlauts: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' if expand_umlauts => out.push_str("ae"),
            'ö' if expand_umlauts => out.push_str("oe"),
            'ü' if expand_umlauts => out.push_str("ue"),
            'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => out.push('a'),
            'æ' => out.push_str("ae"),
            'ç' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' => out.push('i'),
            'ñ' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'ö' | 'õ' | 'ø' => out.push('o'),
            'œ' => out.push_str("oe"),
            'ù' | 'ú' | 'û' | 'ü' => out.push('u'),
            'ÿ' => out.push('y'),
            c if c.is_ascii_alphanumeric() => out.push(c),
            _ => out.push(' '),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_umlaut_spellings() {
        let keys = Transliterator.normalize("Zürich");
        assert_eq!(
            keys.into_iter().collect::<Vec<_>>(),
            vec!["zuerich".to_string(), "zurich".to_string()]
        );
    }

    #[test]
    fn accents_and_punctuation() {
        assert_eq!(Transliterator::strip("La Chaux-de-Fonds"), "la chaux de fonds");
        assert_eq!(Transliterator::strip("Genève"), "geneve");
        assert_eq!(Transliterator::expand("Ägerital"), "aegerital");
        assert_eq!(Transliterator::strip("St. Gallen"), "st  gallen");
    }

    #[test]
    fn deterministic() {
        let a = Transliterator.normalize("Biel/Bienne");
        let b = Transliterator.normalize("Biel/Bienne");
        assert_eq!(a, b);
        assert!(a.contains("biel") && a.contains("bienne"));
    }

    #[test]
    fn query_variants_collapse_when_equal() {
        assert_eq!(Transliterator.query_variants("Bern"), vec![vec!["bern".to_string()]]);
        assert_eq!(Transliterator.query_variants("zür").len(), 2);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Keys only hold the folded alphabet.
        #[test]
        fn keys_are_folded_ascii(text in "[a-zA-ZäöüÄÖÜéèàç' .-]{0,40}") {
            for key in Transliterator.normalize(&text) {
                prop_assert!(!key.is_empty());
                prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
            }
        }

        /// A query for a whole name always completes to that name.
        #[test]
        fn every_query_variant_is_indexed(text in "[a-zA-ZäöüÄÖÜ ]{1,30}") {
            let keys = Transliterator.normalize(&text);
            for variant in Transliterator.query_variants(&text) {
                for token in variant {
                    prop_assert!(keys.contains(&token));
                }
            }
        }
    }
}
