//! # Dataset: Query Facade
//!
//! A loaded snapshot: the entity collections plus the snapshot header and
//! the recoverable reference errors collected while building it.
//!
//! ## Snapshot Files
//!
//! Snapshots are stored as `locations_<YYYYMMDD>.binary`. In a data
//! directory the lexicographically last such file is the newest one; see
//! [`latest_binary_file`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use swissloc_codec::unpack;
use swissloc_core::{
    format_compact_date, Canton, KeyError, Language, ReferenceError, SwissLocError, ZipType,
};

use crate::builder::{GraphBuilder, GraphBuilderOptions};
use crate::collections::{Cantons, Communities, Districts, EntityCollection, ZipCodes, ZipMatch};
use crate::key::ZipKey;
use crate::model::{Community, ZipCode};

/// File name prefix of binary snapshots.
pub const SNAPSHOT_PREFIX: &str = "locations_";
/// File name extension of binary snapshots.
pub const SNAPSHOT_EXTENSION: &str = "binary";

/// A fully built, read-only snapshot.
#[derive(Debug, Clone)]
pub struct Dataset {
    date: Option<NaiveDate>,
    random_code: u32,
    cantons: Cantons,
    districts: Districts,
    communities: Communities,
    zip_codes: ZipCodes,
    errors: Vec<ReferenceError>,
}

impl Dataset {
    pub(crate) fn new(
        date: Option<NaiveDate>,
        random_code: u32,
        cantons: Cantons,
        districts: Districts,
        communities: Communities,
        zip_codes: ZipCodes,
        errors: Vec<ReferenceError>,
    ) -> Self {
        Self {
            date,
            random_code,
            cantons,
            districts,
            communities,
            zip_codes,
            errors,
        }
    }

    /// A dataset with the built-in cantons and nothing else.
    pub fn empty() -> Self {
        Self::new(
            None,
            0,
            Cantons::builtin(),
            Districts::default(),
            Communities::default(),
            ZipCodes::default(),
            Vec::new(),
        )
    }

    // ─── Loading ────────────────────────────────────────────────────

    /// Decode and build a snapshot with default options.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SwissLocError> {
        Self::from_bytes_with(data, &GraphBuilderOptions::default())
    }

    pub fn from_bytes_with(
        data: &[u8],
        options: &GraphBuilderOptions,
    ) -> Result<Self, SwissLocError> {
        let rows = unpack(data)?;
        GraphBuilder::with_options(rows, options.clone()).build()
    }

    /// Read, decode and build the snapshot at `path`.
    pub fn load(path: &Path) -> Result<Self, SwissLocError> {
        Self::load_with(path, &GraphBuilderOptions::default())
    }

    pub fn load_with(path: &Path, options: &GraphBuilderOptions) -> Result<Self, SwissLocError> {
        let data = fs::read(path)?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read snapshot");
        Self::from_bytes_with(&data, options)
    }

    // ─── Accessors ──────────────────────────────────────────────────

    /// Date of the master extract the snapshot was built from.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Random code of the master extract.
    pub fn random_code(&self) -> u32 {
        self.random_code
    }

    pub fn cantons(&self) -> &Cantons {
        &self.cantons
    }

    pub fn districts(&self) -> &Districts {
        &self.districts
    }

    pub fn communities(&self) -> &Communities {
        &self.communities
    }

    pub fn zip_codes(&self) -> &ZipCodes {
        &self.zip_codes
    }

    /// Recoverable reference errors collected during the build.
    pub fn errors(&self) -> &[ReferenceError] {
        &self.errors
    }

    // ─── Queries ────────────────────────────────────────────────────

    /// Canton by license tag or by any of its names.
    pub fn canton(&self, tag_or_name: &str) -> Option<&Arc<Canton>> {
        self.cantons.get(tag_or_name)
    }

    pub fn community(&self, community_number: u32) -> Option<&Arc<Community>> {
        self.communities.by_community_number(community_number)
    }

    pub fn community_named(&self, name: &str) -> Option<&Arc<Community>> {
        self.communities.by_name(name)
    }

    /// Zip codes for a four-digit code, a full code or a name.
    pub fn zip_codes_for(&self, code_or_name: &str) -> Result<ZipCodes, KeyError> {
        Ok(match self.zip_codes.find(code_or_name)? {
            ZipMatch::One(z) => self.zip_codes.with_items(vec![z]),
            ZipMatch::Many(zs) => zs,
            ZipMatch::Missing => self.zip_codes.with_items(Vec::new()),
        })
    }

    /// A single zip code.
    ///
    /// Without a second component, `code` is a six-digit full code if it
    /// has six digits and an ordering number otherwise. With one, `code`
    /// is a four-digit code and the second component is a two-digit
    /// add-on or a name.
    pub fn zip_code(
        &self,
        code: u32,
        city_or_add_on: Option<&str>,
    ) -> Result<Option<Arc<ZipCode>>, KeyError> {
        let key = match city_or_add_on {
            None if (100_000..=999_999).contains(&code) => ZipKey::from_number(code)?,
            None => ZipKey::OrderingNumber(code),
            Some(second) => {
                if !(1_000..=9_999).contains(&code) {
                    return Err(KeyError::OutOfRange(code));
                }
                ZipKey::parse_pair(&code.to_string(), second)?
            }
        };
        Ok(self.zip_codes.lookup(&key).one().cloned())
    }

    /// Zip codes with a long or short name equal to `name`.
    pub fn city(&self, name: &str) -> ZipCodes {
        self.zip_codes.by_name(name)
    }

    /// The distinct names of the zip codes with `code`, optionally
    /// restricted to some types. `None` and [`Language::Native`] yield the
    /// official names.
    pub fn cities_for_zip_code(
        &self,
        code: u16,
        only_types: Option<&[ZipType]>,
        language: Option<Language>,
    ) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for z in self.zip_codes.by_code(code).iter() {
            if only_types.is_some_and(|types| !types.contains(&z.zip_type())) {
                continue;
            }
            let name = match language {
                None | Some(Language::Native) => z.name(),
                Some(lang) => z.name_in(lang),
            };
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
        names
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

/// The newest `locations_*.binary` file in `dir`, if any.
pub fn latest_binary_file(dir: &Path) -> io::Result<Option<PathBuf>> {
    let mut latest: Option<(String, PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_snapshot = name.starts_with(SNAPSHOT_PREFIX)
            && Path::new(&name).extension().is_some_and(|e| e == SNAPSHOT_EXTENSION);
        if !is_snapshot || !entry.file_type()?.is_file() {
            continue;
        }
        if latest.as_ref().map_or(true, |(best, _)| name > *best) {
            latest = Some((name, entry.path()));
        }
    }
    Ok(latest.map(|(_, path)| path))
}

/// The snapshot file name for `date`.
pub fn snapshot_file_name(date: NaiveDate) -> String {
    format!("{SNAPSHOT_PREFIX}{}.{SNAPSHOT_EXTENSION}", format_compact_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::zip;
    use swissloc_core::Name;

    fn dataset() -> Dataset {
        let mut zuerich = zip(1, 8001, 0, "Zürich");
        zuerich.names.push(Name::new("Zurich", Language::Fr, 2));
        zuerich.names.push(Name::new("Zurigo", Language::It, 3));
        let mut post = zip(2, 8001, 10, "Zürich");
        post.zip_type = ZipType::PoBox;
        let altstadt = zip(3, 8001, 20, "Zürich Altstadt");
        let mut ds = Dataset::empty();
        ds.zip_codes = ZipCodes::new(vec![Arc::new(zuerich), Arc::new(post), Arc::new(altstadt)]);
        ds
    }

    fn onrps(zs: &ZipCodes) -> Vec<u32> {
        zs.iter().map(|z| z.ordering_number()).collect()
    }

    #[test]
    fn empty_dataset_has_cantons_only() {
        let ds = Dataset::empty();
        assert_eq!(ds.canton("ZH").unwrap().name(), "Zürich");
        assert_eq!(ds.canton("Genf").unwrap().license_tag(), "GE");
        assert!(ds.zip_codes().is_empty());
        assert!(ds.community(261).is_none());
        assert!(ds.date().is_none());
    }

    #[test]
    fn zip_codes_for_dispatches_on_shape() {
        let ds = dataset();
        assert_eq!(onrps(&ds.zip_codes_for("8001").unwrap()), vec![1, 2, 3]);
        assert_eq!(onrps(&ds.zip_codes_for("Zürich").unwrap()), vec![1, 2]);
        assert_eq!(onrps(&ds.zip_codes_for("800110").unwrap()), vec![2]);
        assert!(ds.zip_codes_for("999999").unwrap().is_empty());
        assert_eq!(ds.zip_codes_for("").unwrap_err(), KeyError::Empty);
    }

    #[test]
    fn single_zip_code_shapes() {
        let ds = dataset();
        let onrp = |z: Option<Arc<ZipCode>>| z.map(|z| z.ordering_number());
        assert_eq!(onrp(ds.zip_code(3, None).unwrap()), Some(3));
        assert_eq!(onrp(ds.zip_code(800_110, None).unwrap()), Some(2));
        assert_eq!(onrp(ds.zip_code(8001, Some("20")).unwrap()), Some(3));
        assert_eq!(onrp(ds.zip_code(8001, Some("Zurigo")).unwrap()), Some(1));
        assert_eq!(onrp(ds.zip_code(8001, Some("Bern")).unwrap()), None);
        assert_eq!(ds.zip_code(80, Some("00")).unwrap_err(), KeyError::OutOfRange(80));
        assert!(ds.zip_code(8001, Some("123")).is_err());
    }

    #[test]
    fn cities_are_unique_and_localized() {
        let ds = dataset();
        assert_eq!(ds.cities_for_zip_code(8001, None, None), vec!["Zürich", "Zürich Altstadt"]);
        assert_eq!(
            ds.cities_for_zip_code(8001, Some(&[ZipType::PoBox]), None),
            vec!["Zürich"]
        );
        assert_eq!(
            ds.cities_for_zip_code(8001, None, Some(Language::It)),
            vec!["Zurigo", "Zürich", "Zürich Altstadt"]
        );
        assert!(ds.cities_for_zip_code(9999, None, None).is_empty());
        assert_eq!(onrps(&ds.city("Zürich Altstadt")), vec![3]);
    }

    #[test]
    fn latest_snapshot_is_lexicographically_last() {
        let dir = tempfile::tempdir().unwrap();
        assert!(latest_binary_file(dir.path()).unwrap().is_none());
        for name in [
            "locations_20230101.binary",
            "locations_20240115.binary",
            "locations_20991231.txt",
            "other_20991231.binary",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("locations_20990101.binary")).unwrap();
        let latest = latest_binary_file(dir.path()).unwrap().unwrap();
        assert_eq!(latest.file_name().unwrap(), "locations_20240115.binary");
    }

    #[test]
    fn snapshot_names() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(snapshot_file_name(date), "locations_20240115.binary");
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(&dir.path().join("missing.binary")).unwrap_err();
        assert!(matches!(err, SwissLocError::Io(_)));
    }
}
