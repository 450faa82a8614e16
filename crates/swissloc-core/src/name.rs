//! # Localized Names
//!
//! A [`Name`] is a piece of text decorated with the language it is written
//! in and a sequence number. Zip codes carry several names (the official
//! name plus alternates, each in long and short form). Sequence numbers
//! are assigned by the agency and never reused, even after a name is
//! retired; the official name always has sequence number `0`.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Language;

/// A name with its language and sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    text: String,
    language: Language,
    sequence_number: u32,
}

impl Name {
    /// Create a name.
    pub fn new(text: impl Into<String>, language: Language, sequence_number: u32) -> Self {
        Self {
            text: text.into(),
            language,
            sequence_number,
        }
    }

    /// Create an official name (sequence number `0`).
    pub fn official(text: impl Into<String>, language: Language) -> Self {
        Self::new(text, language, 0)
    }

    /// The text of the name.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The language the name is written in.
    pub fn language(&self) -> Language {
        self.language
    }

    /// The agency-assigned sequence number.
    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }
}

impl Ord for Name {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence_number
            .cmp(&other.sequence_number)
            .then_with(|| self.language.cmp(&other.language))
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for Name {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

/// Picks the suggested name for a language out of a name set.
///
/// The business rule behind "suggested" is a heuristic; keeping it behind a
/// function pointer lets callers swap it without touching the entities.
pub type NamePolicy = for<'a> fn(&'a [Name], Language) -> Option<&'a Name>;

/// Default [`NamePolicy`]: the name with the lowest sequence number in the
/// requested language.
pub fn lowest_sequence_number(names: &[Name], language: Language) -> Option<&Name> {
    names
        .iter()
        .filter(|n| n.language == language)
        .min_by_key(|n| n.sequence_number)
}
