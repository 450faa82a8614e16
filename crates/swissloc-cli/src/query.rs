//! # Query Subcommands
//!
//! Read-only subcommands over a loaded snapshot. Each handler splits into
//! a pure query over a [`Dataset`] and the printing around it.
//!
//! ```bash
//! swissloc info
//! swissloc lookup 8001                      # every zip code with code 8001
//! swissloc lookup 800100                    # full code
//! swissloc lookup 8001 Zürich               # code and name
//! swissloc lookup 1234 --onrp               # postal ordering number
//! swissloc lookup Zürich --type 20 --active-on 2024-01-15
//! swissloc cities 8001 --language fr
//! swissloc complete zuer --limit 5
//! swissloc community 261
//! swissloc canton Tessin
//! ```

use std::fmt::Write as _;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;

use swissloc_core::{Canton, Language, ZipType};
use swissloc_index::{Community, Dataset, EntityCollection, ZipCodes};

use crate::{Session, EXIT_NOT_FOUND};

/// Parse a numeric zip code type (`10`, `20`, `30`, `40`, `80`).
pub fn parse_zip_type(s: &str) -> Result<ZipType, String> {
    let code: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("zip code type must be numeric, got {s:?}"))?;
    ZipType::from_code(code).map_err(|e| e.to_string())
}

fn exit_code(found: bool) -> u8 {
    if found {
        0
    } else {
        EXIT_NOT_FOUND
    }
}

// ─── info ───────────────────────────────────────────────────────────

/// Arguments for the info subcommand.
#[derive(Args, Debug)]
pub struct InfoArgs {}

#[derive(Debug, Serialize)]
struct Summary {
    date: Option<NaiveDate>,
    random_code: u32,
    cantons: usize,
    districts: usize,
    communities: usize,
    zip_codes: usize,
    errors: Vec<String>,
}

fn summarize(ds: &Dataset) -> Summary {
    Summary {
        date: ds.date(),
        random_code: ds.random_code(),
        cantons: ds.cantons().len(),
        districts: ds.districts().len(),
        communities: ds.communities().len(),
        zip_codes: ds.zip_codes().len(),
        errors: ds.errors().iter().map(ToString::to_string).collect(),
    }
}

/// Execute the info subcommand.
pub fn run_info(_args: &InfoArgs, session: &Session) -> Result<u8> {
    let summary = summarize(&session.load_dataset()?);
    session.format.emit(&summary, || {
        let mut out = String::new();
        let date = summary.date.map_or_else(|| "-".to_string(), |d| d.to_string());
        let _ = writeln!(out, "date:         {date}");
        let _ = writeln!(out, "random code:  {}", summary.random_code);
        let _ = writeln!(out, "cantons:      {}", summary.cantons);
        let _ = writeln!(out, "districts:    {}", summary.districts);
        let _ = writeln!(out, "communities:  {}", summary.communities);
        let _ = writeln!(out, "zip codes:    {}", summary.zip_codes);
        let _ = writeln!(out, "errors:       {}", summary.errors.len());
        for e in &summary.errors {
            let _ = writeln!(out, "  {e}");
        }
        out
    })?;
    Ok(0)
}

// ─── lookup ─────────────────────────────────────────────────────────

/// Arguments for the lookup subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Four-digit code, six-digit full code, ordering number or name.
    pub key: String,

    /// Two-digit add-on or name, when `key` is a four-digit code.
    pub second: Option<String>,

    /// Treat `key` as a postal ordering number.
    #[arg(long, conflicts_with = "second")]
    pub onrp: bool,

    /// Only zip codes of these types. Repeatable.
    #[arg(long = "type", value_parser = parse_zip_type)]
    pub types: Vec<ZipType>,

    /// Only zip codes in use on this date (YYYY-MM-DD).
    #[arg(long)]
    pub active_on: Option<NaiveDate>,
}

/// The zip codes matching `args`.
pub fn lookup(ds: &Dataset, args: &LookupArgs) -> Result<ZipCodes> {
    let zip_codes = ds.zip_codes();
    let mut found = if args.onrp {
        let onrp: u32 = args
            .key
            .trim()
            .parse()
            .with_context(|| format!("ordering number must be numeric, got {:?}", args.key))?;
        zip_codes.with_items(zip_codes.by_ordering_number(onrp).cloned().into_iter().collect())
    } else if let Some(second) = &args.second {
        let code: u32 = args.key.trim().parse().with_context(|| {
            format!("code must be numeric with a second component, got {:?}", args.key)
        })?;
        let one = ds.zip_code(code, Some(second.as_str()))?;
        zip_codes.with_items(one.into_iter().collect())
    } else {
        ds.zip_codes_for(&args.key)?
    };

    if !args.types.is_empty() {
        found = found.with_type(&args.types);
    }
    if let Some(date) = args.active_on {
        found = found.active(date);
    }
    Ok(found)
}

fn zip_code_lines(zip_codes: &ZipCodes) -> String {
    let mut out = String::new();
    for z in zip_codes.iter() {
        let _ = writeln!(
            out,
            "{:06}  {:<28} {:<2}  type {}  onrp {}",
            z.full_code(),
            z.name().as_str(),
            z.canton().license_tag(),
            z.zip_type(),
            z.ordering_number(),
        );
    }
    out
}

/// Execute the lookup subcommand.
pub fn run_lookup(args: &LookupArgs, session: &Session) -> Result<u8> {
    let ds = session.load_dataset()?;
    let found = lookup(&ds, args)?;
    tracing::debug!(key = %args.key, matches = found.len(), "lookup");
    session.format.emit(&found, || zip_code_lines(&found))?;
    Ok(exit_code(!found.is_empty()))
}

// ─── cities ─────────────────────────────────────────────────────────

/// Arguments for the cities subcommand.
#[derive(Args, Debug)]
pub struct CitiesArgs {
    /// Four-digit zip code.
    pub code: u16,

    /// Only zip codes of these types. Repeatable.
    #[arg(long = "type", value_parser = parse_zip_type)]
    pub types: Vec<ZipType>,

    /// Name language (`native`, `de`, `fr`, `it`, `rt`).
    #[arg(long)]
    pub language: Option<Language>,
}

/// The distinct names behind `args.code`.
pub fn cities(ds: &Dataset, args: &CitiesArgs) -> Vec<String> {
    let types = (!args.types.is_empty()).then_some(args.types.as_slice());
    ds.cities_for_zip_code(args.code, types, args.language)
}

/// Execute the cities subcommand.
pub fn run_cities(args: &CitiesArgs, session: &Session) -> Result<u8> {
    let names = cities(&session.load_dataset()?, args);
    session.format.emit(&names, || {
        names.iter().map(|n| format!("{n}\n")).collect()
    })?;
    Ok(exit_code(!names.is_empty()))
}

// ─── complete ───────────────────────────────────────────────────────

/// Arguments for the complete subcommand.
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// Name prefix. Several words narrow the result.
    pub text: String,

    /// Print at most this many zip codes.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Zip codes whose names complete `args.text`.
pub fn complete(ds: &Dataset, args: &CompleteArgs) -> ZipCodes {
    let found = ds.zip_codes().autocomplete(&args.text);
    match args.limit {
        Some(limit) if limit < found.len() => {
            found.with_items(found.iter().take(limit).cloned().collect())
        }
        _ => found,
    }
}

/// Execute the complete subcommand.
pub fn run_complete(args: &CompleteArgs, session: &Session) -> Result<u8> {
    let found = complete(&session.load_dataset()?, args);
    session.format.emit(&found, || zip_code_lines(&found))?;
    Ok(exit_code(!found.is_empty()))
}

// ─── community ──────────────────────────────────────────────────────

/// Arguments for the community subcommand.
#[derive(Args, Debug)]
pub struct CommunityArgs {
    /// Community number or exact name.
    pub name_or_number: String,
}

#[derive(Debug, Serialize)]
struct CommunityReport<'a> {
    community: &'a Community,
    zip_codes: ZipCodes,
}

fn community_report<'a>(ds: &'a Dataset, name_or_number: &str) -> Option<CommunityReport<'a>> {
    let community = ds.communities().get(name_or_number)?.as_ref();
    let zip_codes = ds
        .zip_codes()
        .select(|z| z.communities().contains(community));
    Some(CommunityReport {
        community,
        zip_codes,
    })
}

/// Execute the community subcommand.
pub fn run_community(args: &CommunityArgs, session: &Session) -> Result<u8> {
    let ds = session.load_dataset()?;
    let Some(report) = community_report(&ds, &args.name_or_number) else {
        tracing::warn!(key = %args.name_or_number, "no such community");
        return Ok(EXIT_NOT_FOUND);
    };
    session.format.emit(&report, || {
        let c = report.community;
        let agglomeration = match c.agglomeration() {
            Some(a) if c.is_root() => format!("{} (itself)", a.name()),
            Some(a) => format!("{} ({})", a.name(), a.community_number()),
            None => "-".to_string(),
        };
        let mut out = format!(
            "{} {} ({})\nagglomeration: {agglomeration}\n",
            c.community_number(),
            c.name(),
            c.canton().license_tag(),
        );
        out.push_str(&zip_code_lines(&report.zip_codes));
        out
    })?;
    Ok(0)
}

// ─── canton ─────────────────────────────────────────────────────────

/// Arguments for the canton subcommand.
#[derive(Args, Debug)]
pub struct CantonArgs {
    /// License tag (`ZH`) or any name (`Zurigo`).
    pub tag_or_name: String,
}

#[derive(Debug, Serialize)]
struct CantonReport<'a> {
    canton: &'a Canton,
    communities: usize,
    zip_codes: usize,
}

/// Execute the canton subcommand.
pub fn run_canton(args: &CantonArgs, session: &Session) -> Result<u8> {
    let ds = session.load_dataset()?;
    let Some(canton) = ds.canton(&args.tag_or_name) else {
        tracing::warn!(key = %args.tag_or_name, "no such canton");
        return Ok(EXIT_NOT_FOUND);
    };
    let report = CantonReport {
        canton,
        communities: ds.communities().select(|c| c.canton() == canton).len(),
        zip_codes: ds.zip_codes().select(|z| z.canton() == canton).len(),
    };
    session.format.emit(&report, || {
        format!(
            "{} {}\nnames: {}\ncommunities: {}\nzip codes: {}\n",
            canton.license_tag(),
            canton.name(),
            canton.names().join(", "),
            report.communities,
            report.zip_codes,
        )
    })?;
    Ok(0)
}
