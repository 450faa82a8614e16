//! # Zip Code
//!
//! One postal code record, identified by its ordering number (ONRP).
//!
//! ## Names
//!
//! A zip code has an official name and an official short name (sequence
//! number 0, in the area's own language), plus alternate names in other
//! languages and region names. Alternates join [`ZipCode::names`] and can
//! replace the official name; region names are kept apart in
//! [`ZipCode::region_names`] and are never used as lookup keys.
//!
//! Which alternate is "the" name for a language is a heuristic. It is a
//! [`NamePolicy`] argument to [`ZipCode::name_with`];
//! [`ZipCode::name_in`] uses [`lowest_sequence_number`].

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use swissloc_core::{
    lowest_sequence_number, Canton, Language, Name, NamePolicy, Normalizer, Reference, Validity,
    ZipType,
};

use crate::collections::{Communities, EntityCollection};
use crate::model::Community;

/// A postal code record.
#[derive(Debug, Clone)]
pub struct ZipCode {
    pub(crate) ordering_number: u32,
    pub(crate) zip_type: ZipType,
    pub(crate) code: u16,
    pub(crate) add_on: u8,
    pub(crate) names: Vec<Name>,
    pub(crate) names_short: Vec<Name>,
    pub(crate) region_names: Vec<Name>,
    pub(crate) region_names_short: Vec<Name>,
    pub(crate) canton: Arc<Canton>,
    pub(crate) language: Language,
    pub(crate) language_alternative: Option<Language>,
    pub(crate) delivery_by: Reference<Arc<ZipCode>>,
    pub(crate) largest_community: Option<Arc<Community>>,
    pub(crate) communities: Communities,
    pub(crate) validity: Validity,
}

impl ZipCode {
    /// Postal ordering number (ONRP).
    pub fn ordering_number(&self) -> u32 {
        self.ordering_number
    }

    pub fn zip_type(&self) -> ZipType {
        self.zip_type
    }

    /// The four-digit code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The two-digit add-on.
    pub fn add_on(&self) -> u8 {
        self.add_on
    }

    /// `code * 100 + add_on`.
    pub fn full_code(&self) -> u32 {
        u32::from(self.code) * 100 + u32::from(self.add_on)
    }

    /// The official name.
    pub fn name(&self) -> &Name {
        &self.names[0]
    }

    /// The official short name.
    pub fn name_short(&self) -> &Name {
        &self.names_short[0]
    }

    /// Official name followed by alternates, by sequence number.
    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn names_short(&self) -> &[Name] {
        &self.names_short
    }

    /// Region names, by sequence number.
    pub fn region_names(&self) -> &[Name] {
        &self.region_names
    }

    pub fn region_names_short(&self) -> &[Name] {
        &self.region_names_short
    }

    /// Every name in `language`, official name first.
    pub fn names_in(&self, language: Language) -> impl Iterator<Item = &Name> + '_ {
        in_language(&self.names, language)
    }

    pub fn names_short_in(&self, language: Language) -> impl Iterator<Item = &Name> + '_ {
        in_language(&self.names_short, language)
    }

    /// Region names in `language`.
    pub fn region_names_in(&self, language: Language) -> impl Iterator<Item = &Name> + '_ {
        in_language(&self.region_names, language)
    }

    /// Every long and short name, each distinct text once.
    pub fn all_names(&self) -> impl Iterator<Item = &Name> + '_ {
        let mut seen = BTreeSet::new();
        self.names
            .iter()
            .chain(&self.names_short)
            .filter(move |n| seen.insert(n.as_str()))
    }

    /// The suggested name for `language`, falling back to the official
    /// name.
    pub fn name_in(&self, language: Language) -> &Name {
        self.name_with(language, lowest_sequence_number)
    }

    /// Like [`name_in`](Self::name_in) with an explicit policy.
    pub fn name_with(&self, language: Language, policy: NamePolicy) -> &Name {
        if language == self.language {
            return self.name();
        }
        policy(&self.names, language).unwrap_or_else(|| self.name())
    }

    /// The suggested short name for `language`.
    pub fn name_short_in(&self, language: Language) -> &Name {
        if language == self.language {
            return self.name_short();
        }
        lowest_sequence_number(&self.names_short, language).unwrap_or_else(|| self.name_short())
    }

    pub fn canton(&self) -> &Arc<Canton> {
        &self.canton
    }

    /// Main language of the area.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Second language of the area, if any.
    pub fn language_alternative(&self) -> Option<Language> {
        self.language_alternative
    }

    /// The zip code whose office delivers mail here. A self-delivering zip
    /// code returns itself.
    pub fn delivery_by(&self) -> Option<&ZipCode> {
        self.delivery_by.resolve(self)
    }

    pub fn delivery_reference(&self) -> &Reference<Arc<ZipCode>> {
        &self.delivery_by
    }

    /// The largest community in the area.
    pub fn community(&self) -> Option<&Arc<Community>> {
        self.largest_community.as_ref()
    }

    /// Every community the area spans, by community number.
    pub fn communities(&self) -> &Communities {
        &self.communities
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn valid_from(&self) -> Option<NaiveDate> {
        self.validity.from
    }

    pub fn valid_until(&self) -> Option<NaiveDate> {
        self.validity.until
    }

    /// Whether the zip code is in use on `at`.
    pub fn in_use(&self, at: NaiveDate) -> bool {
        self.validity.contains(at)
    }

    /// Search keys for every long and short name.
    pub fn search_keys(&self, normalizer: &dyn Normalizer) -> BTreeSet<String> {
        self.all_names()
            .flat_map(|n| normalizer.normalize(n.as_str()))
            .collect()
    }
}

fn in_language(names: &[Name], language: Language) -> impl Iterator<Item = &Name> + '_ {
    names.iter().filter(move |n| n.language() == language)
}

impl PartialEq for ZipCode {
    fn eq(&self, other: &Self) -> bool {
        self.ordering_number == other.ordering_number
    }
}

impl Eq for ZipCode {}

impl Hash for ZipCode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordering_number.hash(state);
    }
}

impl PartialOrd for ZipCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZipCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordering_number.cmp(&other.ordering_number)
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.name())
    }
}

#[derive(Serialize)]
struct ZipCodeRecord<'a> {
    ordering_number: u32,
    #[serde(rename = "type")]
    zip_type: u8,
    code: u16,
    add_on: u8,
    full_code: u32,
    name: &'a str,
    name_short: &'a str,
    names: &'a [Name],
    names_short: &'a [Name],
    region_names: &'a [Name],
    region_names_short: &'a [Name],
    canton: &'a str,
    language: Language,
    language_alternative: Option<Language>,
    delivery_by: Option<u32>,
    community: Option<u32>,
    communities: Vec<u32>,
    valid_from: Option<NaiveDate>,
    valid_until: Option<NaiveDate>,
}

impl Serialize for ZipCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ZipCodeRecord {
            ordering_number: self.ordering_number,
            zip_type: self.zip_type.code(),
            code: self.code,
            add_on: self.add_on,
            full_code: self.full_code(),
            name: self.name().as_str(),
            name_short: self.name_short().as_str(),
            names: &self.names,
            names_short: &self.names_short,
            region_names: &self.region_names,
            region_names_short: &self.region_names_short,
            canton: self.canton.license_tag(),
            language: self.language,
            language_alternative: self.language_alternative,
            delivery_by: self.delivery_by().map(ZipCode::ordering_number),
            community: self.largest_community.as_ref().map(|c| c.community_number()),
            communities: self.communities.iter().map(|c| c.community_number()).collect(),
            valid_from: self.validity.from,
            valid_until: self.validity.until,
        }
        .serialize(serializer)
    }
}
