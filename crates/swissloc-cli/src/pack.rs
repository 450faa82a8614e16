//! # Pack Subcommand
//!
//! Reads the three source extracts, packs them into a binary snapshot and
//! writes it to the data directory as `locations_<YYYYMMDD>.binary`.
//!
//! ```bash
//! swissloc pack post.txt communities.csv districts.csv
//! swissloc pack post.txt communities.csv districts.csv --encoding utf-8 --out snapshot.binary
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use swissloc_codec::{coerce, pack, SourceEncoding, SourceTables};
use swissloc_core::date_from_julian_day;
use swissloc_index::snapshot_file_name;

use crate::config::Settings;
use crate::output::OutputFormat;

/// Arguments for the pack subcommand.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Postal master file (`;`-separated, CRLF).
    pub master: PathBuf,

    /// Community to zip code link file (`,`-separated, LF).
    pub community_zips: PathBuf,

    /// District file (`,`-separated, LF).
    pub districts: PathBuf,

    /// Encoding of the extracts. Defaults to the configured encoding.
    #[arg(long)]
    pub encoding: Option<SourceEncoding>,

    /// Output file. Defaults to the snapshot name in the data directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PackReport {
    path: PathBuf,
    bytes: usize,
    zip_codes: usize,
    zip_names: usize,
    communities: usize,
    community_zips: usize,
    districts: usize,
}

/// Execute the pack subcommand.
pub fn run_pack(args: &PackArgs, settings: &Settings, format: OutputFormat) -> Result<u8> {
    let encoding = args.encoding.unwrap_or(settings.encoding);
    let tables = SourceTables::read(&args.master, &args.community_zips, &args.districts, encoding)
        .with_context(|| format!("reading source extracts ({})", args.master.display()))?;
    let rows = coerce(&tables).context("coercing source fields")?;
    let data = pack(&rows).context("packing snapshot")?;

    let path = match &args.out {
        Some(out) => out.clone(),
        None => {
            let date = date_from_julian_day(rows.master_date)
                .context("master file header has no date; pass --out")?;
            settings.data_dir.join(snapshot_file_name(date))
        }
    };
    write_snapshot(&path, &data)?;
    tracing::info!(path = %path.display(), bytes = data.len(), "wrote snapshot");

    let report = PackReport {
        path,
        bytes: data.len(),
        zip_codes: rows.zip_details.len(),
        zip_names: rows.zip_names.len(),
        communities: rows.communities.len(),
        community_zips: rows.community_zips.len(),
        districts: rows.districts.len(),
    };
    format.emit(&report, || {
        format!(
            "wrote {} ({} bytes)\n  zip codes:      {}\n  name variants:  {}\n  communities:    {}\n  links:          {}\n  districts:      {}\n",
            report.path.display(),
            report.bytes,
            report.zip_codes,
            report.zip_names,
            report.communities,
            report.community_zips,
            report.districts,
        )
    })?;
    Ok(0)
}

fn write_snapshot(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, data)
        .with_context(|| format!("failed to write snapshot: {}", path.display()))
}
