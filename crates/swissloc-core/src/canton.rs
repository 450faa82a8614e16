//! # Cantons: Built-in Table
//!
//! The 26 Swiss cantons plus the three pseudo-cantons the postal service
//! uses for cross-border addressing (Liechtenstein, and the German and
//! Italian enclaves served by Swiss post offices). The table is fixed: the
//! source extracts reference cantons only by license tag.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::Language;

/// Number of entries in the built-in canton table.
pub const CANTON_COUNT: usize = 29;

/// (license tag, native name, de, fr, it, rt)
const CANTON_TABLE: [(&str, &str, &str, &str, &str, &str); CANTON_COUNT] = [
    ("AG", "Aargau", "Aargau", "Argovie", "Argovia", "Argovia"),
    (
        "AI",
        "Appenzell Innerrhoden",
        "Appenzell Innerrhoden",
        "Appenzell Rhodes-Intérieures",
        "Appenzello Interno",
        "Appenzell Dadens",
    ),
    (
        "AR",
        "Appenzell Ausserrhoden",
        "Appenzell Ausserrhoden",
        "Appenzell Rhodes-Extérieures",
        "Appenzello Esterno",
        "Appenzell Dadora",
    ),
    ("BE", "Bern", "Bern", "Berne", "Berna", "Berna"),
    (
        "BL",
        "Basel-Landschaft",
        "Basel-Landschaft",
        "Bâle-Campagne",
        "Basilea Campagna",
        "Basilea-Champagna",
    ),
    ("BS", "Basel-Stadt", "Basel-Stadt", "Bâle-Ville", "Basilea Città", "Basilea-Citad"),
    ("FR", "Freiburg", "Fribourg", "Fribourg", "Friburgo", "Friburg"),
    ("GE", "Genève", "Genf", "Genève", "Ginevra", "Genevra"),
    ("GL", "Glarus", "Glarus", "Glaris", "Glarona", "Glaruna"),
    ("GR", "Graubünden", "Graubünden", "Grisons", "Grigioni", "Grischun"),
    ("JU", "Jura", "Jura", "Jura", "Giura", "Giura"),
    ("LU", "Luzern", "Luzern", "Lucerne", "Lucerna", "Lucerna"),
    ("NE", "Neuchâtel", "Neuenburg", "Neuchâtel", "Neuchâtel", "Neuchâtel"),
    ("NW", "Nidwalden", "Nidwalden", "Nidwald", "Nidvaldo", "Sutsilvania"),
    ("OW", "Obwalden", "Obwalden", "Obwald", "Obvaldo", "Sursilvania"),
    ("SG", "St. Gallen", "St. Gallen", "Saint-Gall", "San Gallo", "Son Gagl"),
    ("SH", "Schaffhausen", "Schaffhausen", "Schaffhouse", "Sciaffusa", "Schaffusa"),
    ("SO", "Solothurn", "Solothurn", "Soleure", "Soletta", "Soloturn"),
    ("SZ", "Schwyz", "Schwyz", "Schwytz", "Svitto", "Sviz"),
    ("TG", "Thurgau", "Thurgau", "Thurgovie", "Turgovia", "Turgovia"),
    ("TI", "Ticino", "Tessin", "Tessin", "Ticino", "Tessin"),
    ("UR", "Uri", "Uri", "Uri", "Uri", "Uri"),
    ("VD", "Vaud", "Waadt", "Vaud", "Vaud", "Vad"),
    ("VS", "Valais", "Wallis", "Valais", "Vallese", "Vallais"),
    ("ZG", "Zug", "Zug", "Zoug", "Zugo", "Zug"),
    ("ZH", "Zürich", "Zürich", "Zurich", "Zurigo", "Turitg"),
    (
        "FL",
        "Fürstentum Liechtenstein",
        "Fürstentum Liechtenstein",
        "Liechtenstein",
        "Liechtenstein",
        "Liechtenstein",
    ),
    ("DE", "Deutschland", "Deutschland", "Allemagne", "Germania", "Germania"),
    ("IT", "Italien", "Italien", "Italie", "Italia", "Italia"),
];

/// A Swiss canton (or cross-border pseudo-canton).
///
/// Identity is the license tag: two cantons are equal when their tags are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canton {
    license_tag: String,
    name: String,
    names: BTreeMap<Language, String>,
}

impl Canton {
    /// Create a canton from its tag, native name and tagged-language names.
    pub fn new(
        license_tag: impl Into<String>,
        name: impl Into<String>,
        names: BTreeMap<Language, String>,
    ) -> Self {
        Self {
            license_tag: license_tag.into(),
            name: name.into(),
            names,
        }
    }

    /// The 29 entries of the built-in table, in table order.
    pub fn builtin() -> Vec<Canton> {
        CANTON_TABLE
            .iter()
            .map(|&(tag, name, de, fr, it, rt)| {
                let names = Language::TAGGED
                    .into_iter()
                    .zip([de, fr, it, rt])
                    .map(|(lang, n)| (lang, n.to_string()))
                    .collect();
                Canton::new(tag, name, names)
            })
            .collect()
    }

    /// The two-letter license-plate abbreviation.
    pub fn license_tag(&self) -> &str {
        &self.license_tag
    }

    /// The name in the canton's own language.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name in `language`, falling back to the native name.
    pub fn name_in(&self, language: Language) -> &str {
        self.names
            .get(&language)
            .map_or(self.name.as_str(), String::as_str)
    }

    /// Every distinct name of the canton: native first, then tagged names.
    pub fn names(&self) -> Vec<&str> {
        let mut out = vec![self.name.as_str()];
        for n in self.names.values() {
            if !out.contains(&n.as_str()) {
                out.push(n);
            }
        }
        out
    }
}

impl PartialEq for Canton {
    fn eq(&self, other: &Self) -> bool {
        self.license_tag == other.license_tag
    }
}

impl Eq for Canton {}

impl Hash for Canton {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.license_tag.hash(state);
    }
}

impl fmt::Display for Canton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_unique_tags() {
        let cantons = Canton::builtin();
        assert_eq!(cantons.len(), CANTON_COUNT);
        let mut tags: Vec<&str> = cantons.iter().map(Canton::license_tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), CANTON_COUNT);
    }

    #[test]
    fn localized_names() {
        let zh = Canton::builtin()
            .into_iter()
            .find(|c| c.license_tag() == "ZH")
            .unwrap();
        assert_eq!(zh.name(), "Zürich");
        assert_eq!(zh.name_in(Language::It), "Zurigo");
        assert_eq!(zh.name_in(Language::Native), "Zürich");
        assert_eq!(zh.names(), vec!["Zürich", "Zurich", "Zurigo", "Turitg"]);
    }

    #[test]
    fn identity_is_license_tag() {
        let a = Canton::new("BE", "Bern", BTreeMap::new());
        let b = Canton::new("BE", "Berne", BTreeMap::new());
        assert_eq!(a, b);
    }
}
