//! # Graph Builder
//!
//! Turns decoded [`RowGroups`] into the entity graph held by a [`Dataset`].
//!
//! ## Passes
//!
//! ```text
//! cantons       built-in table, looked up by license tag
//! communities   pass 1: roots and unspecified agglomerations
//!               pass 2: children, resolved against pass 1
//! districts     communities from the membership link list
//! zip codes     names aggregated per ordering number
//!               pass 1: self-delivered and undelivered
//!               pass 2: delivered by another zip code
//! integrity     uniqueness of every identity key
//! ```
//!
//! ## Failure Modes
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Unknown canton tag | fatal [`ReferenceError::UnknownCanton`] |
//! | Agglomeration is not a pass-1 community | fatal [`ReferenceError::MissingAgglomeration`] |
//! | Unknown zip code type or language code | fatal [`FormatError::UnknownCode`] |
//! | Delivery office missing or not self-delivered | collected [`ReferenceError::UnresolvedDelivery`], reference set to none |
//! | Name variant for an unknown ordering number | collected [`ReferenceError::UnknownOrderingNumber`], row skipped |
//! | Duplicate identity keys | fatal [`DataIntegrityError`] listing all of them |
//!
//! A fatal error aborts the build; no partial dataset is returned.
//!
//! [`FormatError::UnknownCode`]: swissloc_core::FormatError::UnknownCode

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swissloc_codec::{CommunityRow, DistrictRow, RowGroups, ZipDetailRow, ZipNameRow};
use swissloc_core::{
    date_from_julian_day, Canton, DataIntegrityError, Designation, Language, Name,
    RawReference, Reference, ReferenceError, SwissLocError, Validity, Violation, ZipType,
};

use crate::collections::{Cantons, Communities, Districts, ZipCodes};
use crate::dataset::Dataset;
use crate::model::{Community, District, ZipCode};

// ─── Options ────────────────────────────────────────────────────────

/// How a community whose agglomeration column holds the `0` sentinel is
/// resolved.
///
/// The snapshot keeps the "self" and "unspecified" sentinels apart; the
/// reader has to pick one interpretation for the latter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgglomerationPolicy {
    /// The community is its own agglomeration root.
    #[default]
    UnspecifiedIsRoot,
    /// The community has no agglomeration. Other communities may still
    /// name it as their agglomeration; they link to it even though it is
    /// not a root.
    UnspecifiedIsNone,
}

impl AgglomerationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnspecifiedIsRoot => "unspecified_is_root",
            Self::UnspecifiedIsNone => "unspecified_is_none",
        }
    }

    fn resolve_unspecified(self) -> Reference<Arc<Community>> {
        match self {
            Self::UnspecifiedIsRoot => Reference::Itself,
            Self::UnspecifiedIsNone => Reference::None,
        }
    }
}

impl fmt::Display for AgglomerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgglomerationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "unspecified_is_root" | "root" => Ok(Self::UnspecifiedIsRoot),
            "unspecified_is_none" | "none" => Ok(Self::UnspecifiedIsNone),
            other => Err(format!("unknown agglomeration policy: {other:?}")),
        }
    }
}

/// Everything the graph builder needs besides the rows themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphBuilderOptions {
    /// Interpretation of the unspecified agglomeration sentinel.
    pub agglomeration_policy: AgglomerationPolicy,
    /// `(district number, community number)` membership links. The
    /// snapshot carries no such column, so without links every district
    /// has an empty community set.
    pub district_members: Vec<(u32, u32)>,
}

// ─── Builder ────────────────────────────────────────────────────────

/// Builds a [`Dataset`] from decoded rows.
///
/// ```ignore
/// let dataset = GraphBuilder::new(rows)
///     .agglomeration_policy(AgglomerationPolicy::UnspecifiedIsNone)
///     .district_members([(112, 261)])
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    rows: RowGroups,
    options: GraphBuilderOptions,
}

impl GraphBuilder {
    /// A builder with default options.
    pub fn new(rows: RowGroups) -> Self {
        Self::with_options(rows, GraphBuilderOptions::default())
    }

    pub fn with_options(rows: RowGroups, options: GraphBuilderOptions) -> Self {
        Self { rows, options }
    }

    pub fn agglomeration_policy(mut self, policy: AgglomerationPolicy) -> Self {
        self.options.agglomeration_policy = policy;
        self
    }

    /// Add `(district number, community number)` membership links.
    pub fn district_members(mut self, links: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.options.district_members.extend(links);
        self
    }

    /// Build and validate the entity graph.
    ///
    /// # Errors
    ///
    /// Any fatal condition listed in the module documentation.
    /// Recoverable reference errors are returned in
    /// [`Dataset::errors`] instead.
    pub fn build(self) -> Result<Dataset, SwissLocError> {
        let Self { rows, options } = self;
        let cantons = Cantons::builtin();
        let mut errors = Vec::new();

        let communities =
            build_communities(&rows.communities, &cantons, options.agglomeration_policy)?;
        let community_map = first_by_key(&communities, |c| c.community_number());

        let districts = build_districts(
            &rows.districts,
            &cantons,
            &community_map,
            &options.district_members,
        )?;

        let zip_codes = ZipGraph {
            cantons: &cantons,
            communities: &community_map,
            community_zips: community_zip_map(&rows),
        }
        .build(&rows.zip_details, &rows.zip_names, &mut errors)?;

        validate(&communities, &zip_codes)?;

        tracing::info!(
            communities = communities.len(),
            districts = districts.len(),
            zip_codes = zip_codes.len(),
            errors = errors.len(),
            "built dataset"
        );

        Ok(Dataset::new(
            date_from_julian_day(rows.master_date),
            rows.random_code,
            cantons,
            Districts::new(districts),
            Communities::new(communities),
            ZipCodes::new(zip_codes),
            errors,
        ))
    }
}

// ─── Cantons ────────────────────────────────────────────────────────

fn canton_for(
    cantons: &Cantons,
    tag: &str,
    referenced_by: impl FnOnce() -> String,
) -> Result<Arc<Canton>, ReferenceError> {
    cantons
        .by_license_tag(tag)
        .cloned()
        .ok_or_else(|| ReferenceError::UnknownCanton {
            tag: tag.to_string(),
            referenced_by: referenced_by(),
        })
}

// ─── Communities ────────────────────────────────────────────────────

fn build_communities(
    rows: &[CommunityRow],
    cantons: &Cantons,
    policy: AgglomerationPolicy,
) -> Result<Vec<Arc<Community>>, SwissLocError> {
    let mut slots: Vec<Option<Arc<Community>>> = Vec::with_capacity(rows.len());
    let mut materialized: HashMap<u32, Arc<Community>> = HashMap::with_capacity(rows.len());
    let mut deferred = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let number = u32::from(row.community_number);
        let agglomeration = match RawReference::classify(number, u32::from(row.agglomeration)) {
            RawReference::Itself => Reference::Itself,
            RawReference::Unspecified => policy.resolve_unspecified(),
            RawReference::To(_) => {
                deferred.push(i);
                slots.push(None);
                continue;
            }
        };
        let community = Arc::new(community_from(row, cantons, agglomeration)?);
        materialized
            .entry(number)
            .or_insert_with(|| Arc::clone(&community));
        slots.push(Some(community));
    }
    tracing::debug!(
        materialized = materialized.len(),
        deferred = deferred.len(),
        "communities pass 1"
    );

    for &i in &deferred {
        let row = &rows[i];
        let target = u32::from(row.agglomeration);
        let root = materialized.get(&target).cloned().ok_or_else(|| {
            ReferenceError::MissingAgglomeration {
                community: u32::from(row.community_number),
                agglomeration: target,
            }
        })?;
        slots[i] = Some(Arc::new(community_from(row, cantons, Reference::To(root))?));
    }
    tracing::debug!(resolved = deferred.len(), "communities pass 2");

    Ok(slots.into_iter().flatten().collect())
}

fn community_from(
    row: &CommunityRow,
    cantons: &Cantons,
    agglomeration: Reference<Arc<Community>>,
) -> Result<Community, ReferenceError> {
    let canton = canton_for(cantons, &row.canton, || {
        format!("community {}", row.community_number)
    })?;
    Ok(Community::new(
        u32::from(row.community_number),
        row.name.as_str(),
        canton,
        agglomeration,
    ))
}

// ─── Districts ──────────────────────────────────────────────────────

fn build_districts(
    rows: &[DistrictRow],
    cantons: &Cantons,
    communities: &HashMap<u32, Arc<Community>>,
    links: &[(u32, u32)],
) -> Result<Vec<Arc<District>>, SwissLocError> {
    let mut members: HashMap<u32, Vec<Arc<Community>>> = HashMap::new();
    for &(district, community) in links {
        match communities.get(&community) {
            Some(c) => members.entry(district).or_default().push(Arc::clone(c)),
            None => tracing::debug!(district, community, "skipping link to unknown community"),
        }
    }

    let mut districts = Vec::with_capacity(rows.len());
    for row in rows {
        let number = u32::from(row.number);
        let canton = canton_for(cantons, &row.canton, || format!("district {number}"))?;
        let communities = Communities::new(members.get(&number).cloned().unwrap_or_default());
        districts.push(Arc::new(District::new(
            number,
            row.name.as_str(),
            canton,
            communities,
        )));
    }
    tracing::debug!(districts = districts.len(), links = links.len(), "districts");
    Ok(districts)
}

// ─── Zip codes ──────────────────────────────────────────────────────

fn community_zip_map(rows: &RowGroups) -> HashMap<(u16, u8), Vec<u32>> {
    let mut map: HashMap<(u16, u8), Vec<u32>> = HashMap::new();
    for row in &rows.community_zips {
        map.entry((row.code, row.add_on))
            .or_default()
            .push(u32::from(row.community_number));
    }
    map
}

/// Name variants of one zip code, as aggregated from the name rows.
#[derive(Debug, Default)]
struct NameVariants {
    names: Vec<Name>,
    names_short: Vec<Name>,
    region_names: Vec<Name>,
    region_names_short: Vec<Name>,
}

impl NameVariants {
    fn sort(&mut self) {
        for list in [
            &mut self.names,
            &mut self.names_short,
            &mut self.region_names,
            &mut self.region_names_short,
        ] {
            list.sort_by_key(Name::sequence_number);
        }
    }
}

struct ZipGraph<'a> {
    cantons: &'a Cantons,
    communities: &'a HashMap<u32, Arc<Community>>,
    community_zips: HashMap<(u16, u8), Vec<u32>>,
}

impl ZipGraph<'_> {
    fn build(
        &self,
        details: &[ZipDetailRow],
        names: &[ZipNameRow],
        errors: &mut Vec<ReferenceError>,
    ) -> Result<Vec<Arc<ZipCode>>, SwissLocError> {
        let mut variants = aggregate_names(details, names, errors)?;

        let mut slots: Vec<Option<Arc<ZipCode>>> = Vec::with_capacity(details.len());
        let mut materialized: HashMap<u32, Arc<ZipCode>> = HashMap::with_capacity(details.len());
        let mut deferred = Vec::new();

        for (i, row) in details.iter().enumerate() {
            let onrp = u32::from(row.ordering_number);
            let delivery_by = match RawReference::classify(onrp, u32::from(row.delivery_by)) {
                RawReference::Itself => Reference::Itself,
                RawReference::Unspecified => Reference::None,
                RawReference::To(_) => {
                    deferred.push(i);
                    slots.push(None);
                    continue;
                }
            };
            let names = variants.remove(&onrp).unwrap_or_default();
            let zip = Arc::new(self.zip_code(row, names, delivery_by)?);
            materialized.entry(onrp).or_insert_with(|| Arc::clone(&zip));
            slots.push(Some(zip));
        }
        tracing::debug!(
            materialized = materialized.len(),
            deferred = deferred.len(),
            "zip codes pass 1"
        );

        for &i in &deferred {
            let row = &details[i];
            let onrp = u32::from(row.ordering_number);
            let target = u32::from(row.delivery_by);
            let delivery_by = match materialized.get(&target) {
                Some(office) => Reference::To(Arc::clone(office)),
                None => {
                    let err = ReferenceError::UnresolvedDelivery {
                        ordering_number: onrp,
                        delivery_by: target,
                    };
                    tracing::warn!(%err, "recoverable reference error");
                    errors.push(err);
                    Reference::None
                }
            };
            let names = variants.remove(&onrp).unwrap_or_default();
            slots[i] = Some(Arc::new(self.zip_code(row, names, delivery_by)?));
        }
        tracing::debug!(resolved = deferred.len(), "zip codes pass 2");

        Ok(slots.into_iter().flatten().collect())
    }

    fn zip_code(
        &self,
        row: &ZipDetailRow,
        mut variants: NameVariants,
        delivery_by: Reference<Arc<ZipCode>>,
    ) -> Result<ZipCode, SwissLocError> {
        let onrp = u32::from(row.ordering_number);
        let language = Language::from_code(row.language)?;
        let canton = canton_for(self.cantons, &row.canton, || format!("zip code onrp {onrp}"))?;

        variants.sort();
        let mut names = vec![Name::official(row.name.as_str(), language)];
        names.append(&mut variants.names);
        let mut names_short = vec![Name::official(row.name_short.as_str(), language)];
        names_short.append(&mut variants.names_short);

        let largest = u32::from(row.largest_community);
        let mut numbers = self
            .community_zips
            .get(&(row.code, row.add_on))
            .cloned()
            .unwrap_or_default();
        if largest != 0 {
            numbers.push(largest);
        }
        numbers.sort_unstable();
        numbers.dedup();
        let communities = numbers
            .iter()
            .filter_map(|n| self.communities.get(n).cloned())
            .collect();

        Ok(ZipCode {
            ordering_number: onrp,
            zip_type: ZipType::from_code(row.zip_type)?,
            code: row.code,
            add_on: row.add_on,
            names,
            names_short,
            region_names: variants.region_names,
            region_names_short: variants.region_names_short,
            canton,
            language,
            language_alternative: Language::from_optional_code(row.language_alternative)?,
            delivery_by,
            largest_community: self.communities.get(&largest).cloned(),
            communities: Communities::new(communities),
            validity: Validity::new(date_from_julian_day(row.valid_from), None),
        })
    }
}

fn aggregate_names(
    details: &[ZipDetailRow],
    rows: &[ZipNameRow],
    errors: &mut Vec<ReferenceError>,
) -> Result<HashMap<u32, NameVariants>, SwissLocError> {
    let known: HashSet<u32> = details
        .iter()
        .map(|d| u32::from(d.ordering_number))
        .collect();
    let mut variants: HashMap<u32, NameVariants> = HashMap::new();

    for row in rows {
        let onrp = u32::from(row.ordering_number);
        if !known.contains(&onrp) {
            let err = ReferenceError::UnknownOrderingNumber {
                ordering_number: onrp,
                name: row.name.clone(),
            };
            tracing::warn!(%err, "recoverable reference error");
            errors.push(err);
            continue;
        }
        let Some(designation) = Designation::from_code(row.designation) else {
            tracing::debug!(
                onrp,
                designation = row.designation,
                "skipping name variant with unused designation"
            );
            continue;
        };
        let language = Language::from_code(row.language)?;
        let seq = u32::from(row.sequence_number);
        let name = Name::new(row.name.as_str(), language, seq);
        let name_short = Name::new(row.name_short.as_str(), language, seq);
        let entry = variants.entry(onrp).or_default();
        match designation {
            Designation::Alternate => {
                entry.names.push(name);
                entry.names_short.push(name_short);
            }
            Designation::Region => {
                entry.region_names.push(name);
                entry.region_names_short.push(name_short);
            }
        }
    }
    Ok(variants)
}

// ─── Integrity ──────────────────────────────────────────────────────

fn first_by_key<T>(items: &[Arc<T>], key: impl Fn(&T) -> u32) -> HashMap<u32, Arc<T>> {
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(key(item)).or_insert_with(|| Arc::clone(item));
    }
    map
}

/// Collect every uniqueness violation, ordered by kind and then by key.
fn validate(
    communities: &[Arc<Community>],
    zip_codes: &[Arc<ZipCode>],
) -> Result<(), DataIntegrityError> {
    let mut violations = Vec::new();

    let mut by_number: BTreeMap<u32, usize> = BTreeMap::new();
    let mut by_name: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for c in communities {
        *by_number.entry(c.community_number()).or_default() += 1;
        by_name.entry(c.name()).or_default().push(c.community_number());
    }
    violations.extend(
        by_number
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(number, _)| Violation::DuplicateCommunityNumber(number)),
    );
    violations.extend(
        by_name
            .into_iter()
            .filter(|(_, numbers)| numbers.len() > 1)
            .map(|(name, community_numbers)| Violation::DuplicateCommunityName {
                name: name.to_string(),
                community_numbers,
            }),
    );

    let mut by_onrp: BTreeMap<u32, usize> = BTreeMap::new();
    let mut by_full_code: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for z in zip_codes {
        *by_onrp.entry(z.ordering_number()).or_default() += 1;
        by_full_code
            .entry(z.full_code())
            .or_default()
            .push(z.ordering_number());
    }
    violations.extend(
        by_onrp
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(onrp, _)| Violation::DuplicateOrderingNumber(onrp)),
    );
    violations.extend(
        by_full_code
            .into_iter()
            .filter(|(_, onrps)| onrps.len() > 1)
            .map(|(full_code, ordering_numbers)| Violation::DuplicateFullCode {
                full_code,
                ordering_numbers,
            }),
    );

    if violations.is_empty() {
        Ok(())
    } else {
        Err(DataIntegrityError { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::EntityCollection;
    use swissloc_codec::CommunityZipRow;
    use swissloc_core::FormatError;

    fn community(number: u16, name: &str, agglomeration: u16) -> CommunityRow {
        CommunityRow {
            community_number: number,
            name: name.into(),
            canton: "ZH".into(),
            agglomeration,
        }
    }

    fn detail(onrp: u16, code: u16, add_on: u8, name: &str, delivery_by: u16) -> ZipDetailRow {
        ZipDetailRow {
            ordering_number: onrp,
            zip_type: 20,
            canton: "ZH".into(),
            code,
            add_on,
            delivery_by,
            language: 1,
            language_alternative: 0,
            name_short: name.into(),
            name: name.into(),
            largest_community: 261,
            valid_from: 0,
        }
    }

    fn variant(onrp: u16, seq: u8, designation: u8, language: u8, name: &str) -> ZipNameRow {
        ZipNameRow {
            ordering_number: onrp,
            sequence_number: seq,
            designation,
            language,
            name_short: name.into(),
            name: name.into(),
        }
    }

    fn rows() -> RowGroups {
        RowGroups {
            master_date: 2_460_325,
            random_code: 48213,
            communities: vec![
                community(247, "Schlieren", 261),
                community(261, "Zürich", 261),
                community(230, "Winterthur", 0),
            ],
            zip_details: vec![
                detail(1, 8001, 0, "Zürich", 1),
                detail(2, 8052, 0, "Zürich", 1),
                detail(3, 8952, 0, "Schlieren", 0),
            ],
            ..RowGroups::default()
        }
    }

    #[test]
    fn community_passes_resolve_forward_references() {
        let ds = GraphBuilder::new(rows()).build().unwrap();
        let numbers: Vec<u32> = ds.communities().iter().map(|c| c.community_number()).collect();
        assert_eq!(numbers, vec![247, 261, 230]);

        let schlieren = ds.community(247).unwrap();
        assert_eq!(schlieren.agglomeration().unwrap().community_number(), 261);
        let zuerich = ds.community(261).unwrap();
        assert!(zuerich.is_root());
        assert_eq!(zuerich.agglomeration(), Some(zuerich.as_ref()));
    }

    #[test]
    fn unspecified_agglomeration_follows_policy() {
        let root = GraphBuilder::new(rows()).build().unwrap();
        assert!(root.community(230).unwrap().is_root());

        let none = GraphBuilder::new(rows())
            .agglomeration_policy(AgglomerationPolicy::UnspecifiedIsNone)
            .build()
            .unwrap();
        let winterthur = none.community(230).unwrap();
        assert!(winterthur.agglomeration().is_none());
        assert!(!winterthur.is_root());
    }

    #[test]
    fn member_of_unspecified_community_links_under_none_policy() {
        let mut rows = rows();
        rows.communities.push(community(231, "Seuzach", 230));
        let ds = GraphBuilder::new(rows)
            .agglomeration_policy(AgglomerationPolicy::UnspecifiedIsNone)
            .build()
            .unwrap();
        let winterthur = ds.community(230).unwrap();
        assert!(winterthur.agglomeration().is_none());
        let seuzach = ds.community(231).unwrap();
        assert_eq!(seuzach.agglomeration(), Some(winterthur.as_ref()));
    }

    #[test]
    fn missing_agglomeration_is_fatal() {
        let mut rows = rows();
        rows.communities.push(community(242, "Urdorf", 999));
        let err = GraphBuilder::new(rows).build().unwrap_err();
        assert!(matches!(
            err,
            SwissLocError::Reference(ReferenceError::MissingAgglomeration {
                community: 242,
                agglomeration: 999
            })
        ));
    }

    #[test]
    fn chained_agglomeration_is_fatal() {
        let mut rows = rows();
        rows.communities.push(community(242, "Urdorf", 247));
        assert!(GraphBuilder::new(rows).build().is_err());
    }

    #[test]
    fn unknown_canton_is_fatal() {
        let mut rows = rows();
        rows.zip_details[0].canton = "XX".into();
        let err = GraphBuilder::new(rows).build().unwrap_err();
        assert!(matches!(
            err,
            SwissLocError::Reference(ReferenceError::UnknownCanton { ref tag, .. }) if tag == "XX"
        ));
    }

    #[test]
    fn unknown_zip_type_is_fatal() {
        let mut rows = rows();
        rows.zip_details[1].zip_type = 50;
        let err = GraphBuilder::new(rows).build().unwrap_err();
        assert!(matches!(
            err,
            SwissLocError::Format(FormatError::UnknownCode { value: 50, .. })
        ));
    }

    #[test]
    fn delivery_passes() {
        let ds = GraphBuilder::new(rows()).build().unwrap();
        let office = ds.zip_codes().by_ordering_number(1).unwrap();
        assert!(office.delivery_reference().is_itself());
        assert_eq!(office.delivery_by(), Some(office.as_ref()));

        let delivered = ds.zip_codes().by_ordering_number(2).unwrap();
        assert_eq!(delivered.delivery_by().unwrap().ordering_number(), 1);

        let undelivered = ds.zip_codes().by_ordering_number(3).unwrap();
        assert!(undelivered.delivery_by().is_none());
        assert!(ds.errors().is_empty());
    }

    #[test]
    fn delivery_by_a_delegating_zip_code_is_recoverable() {
        let mut rows = rows();
        rows.zip_details.push(detail(4, 8053, 0, "Zürich", 2));
        rows.zip_details.push(detail(5, 8054, 0, "Zürich", 77));
        let ds = GraphBuilder::new(rows).build().unwrap();
        assert_eq!(ds.zip_codes().len(), 5);
        assert!(ds.zip_codes().by_ordering_number(4).unwrap().delivery_by().is_none());
        assert!(ds.zip_codes().by_ordering_number(5).unwrap().delivery_by().is_none());
        assert_eq!(
            ds.errors(),
            &[
                ReferenceError::UnresolvedDelivery { ordering_number: 4, delivery_by: 2 },
                ReferenceError::UnresolvedDelivery { ordering_number: 5, delivery_by: 77 },
            ]
        );
    }

    #[test]
    fn names_are_aggregated_by_designation() {
        let mut rows = rows();
        rows.zip_names = vec![
            variant(1, 5, 2, 3, "Zurigo"),
            variant(1, 2, 2, 2, "Zurich"),
            variant(1, 4, 3, 1, "Zürich Altstadt"),
            variant(1, 1, 1, 1, "Ignored"),
            variant(99, 1, 2, 1, "Orphan"),
        ];
        let ds = GraphBuilder::new(rows).build().unwrap();
        let z = ds.zip_codes().by_ordering_number(1).unwrap();

        let names: Vec<&str> = z.names().iter().map(Name::as_str).collect();
        assert_eq!(names, vec!["Zürich", "Zurich", "Zurigo"]);
        assert_eq!(z.name().sequence_number(), 0);
        assert_eq!(z.names_short().len(), 3);
        assert_eq!(z.region_names()[0].as_str(), "Zürich Altstadt");
        assert_eq!(z.name_in(Language::It).as_str(), "Zurigo");
        assert_eq!(
            ds.errors(),
            &[ReferenceError::UnknownOrderingNumber {
                ordering_number: 99,
                name: "Orphan".into()
            }]
        );
    }

    #[test]
    fn zip_communities_unite_links_and_largest() {
        let mut rows = rows();
        rows.community_zips = vec![
            CommunityZipRow { community_number: 247, code: 8001, add_on: 0 },
            CommunityZipRow { community_number: 261, code: 8001, add_on: 0 },
            CommunityZipRow { community_number: 5555, code: 8001, add_on: 0 },
        ];
        let ds = GraphBuilder::new(rows).build().unwrap();
        let z = ds.zip_codes().by_ordering_number(1).unwrap();
        let numbers: Vec<u32> = z.communities().iter().map(|c| c.community_number()).collect();
        assert_eq!(numbers, vec![247, 261]);
        assert_eq!(z.community().unwrap().community_number(), 261);

        let other = ds.zip_codes().by_ordering_number(2).unwrap();
        assert_eq!(other.communities().len(), 1);
    }

    #[test]
    fn districts_take_members_from_links() {
        let mut rows = rows();
        rows.districts = vec![DistrictRow {
            canton: "ZH".into(),
            number: 112,
            name: "Bezirk Zürich".into(),
        }];
        let ds = GraphBuilder::new(rows.clone())
            .district_members([(112, 261), (112, 4242), (113, 247)])
            .build()
            .unwrap();
        let d = ds.districts().by_district_number(112).unwrap();
        let members: Vec<u32> = d.communities().iter().map(|c| c.community_number()).collect();
        assert_eq!(members, vec![261]);

        let bare = GraphBuilder::new(rows).build().unwrap();
        assert!(bare.districts().by_district_number(112).unwrap().communities().is_empty());
    }

    #[test]
    fn integrity_violations_are_all_reported() {
        let mut rows = rows();
        rows.communities.push(community(4021, "Zürich", 4021));
        rows.zip_details.push(detail(3, 8001, 0, "Zürich", 3));
        let err = match GraphBuilder::new(rows).build() {
            Err(SwissLocError::DataIntegrity(err)) => err,
            other => panic!("expected integrity error, got {other:?}"),
        };
        assert_eq!(
            err.violations,
            vec![
                Violation::DuplicateCommunityName {
                    name: "Zürich".into(),
                    community_numbers: vec![261, 4021]
                },
                Violation::DuplicateOrderingNumber(3),
                Violation::DuplicateFullCode {
                    full_code: 800_100,
                    ordering_numbers: vec![1, 3]
                },
            ]
        );
    }

    #[test]
    fn dataset_header_fields() {
        let ds = GraphBuilder::new(rows()).build().unwrap();
        assert_eq!(ds.random_code(), 48213);
        assert_eq!(ds.date(), chrono::NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(ds.cantons().len(), swissloc_core::CANTON_COUNT);
    }

    #[test]
    fn policy_parses() {
        assert_eq!(
            "unspecified-is-none".parse::<AgglomerationPolicy>().unwrap(),
            AgglomerationPolicy::UnspecifiedIsNone
        );
        assert_eq!("root".parse::<AgglomerationPolicy>().unwrap(), AgglomerationPolicy::default());
        assert!("sometimes".parse::<AgglomerationPolicy>().is_err());
        assert_eq!(AgglomerationPolicy::UnspecifiedIsNone.to_string(), "unspecified_is_none");
    }
}
