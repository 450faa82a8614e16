//! # swissloc-cli: CLI Tool for swissloc
//!
//! Provides the `swissloc` command-line interface.
//!
//! ## Subcommands
//!
//! - `swissloc pack`: Build a binary snapshot from the source extracts.
//! - `swissloc info`: Header, counts and recovered reference errors.
//! - `swissloc lookup`: Zip codes by code, full code, ordering number or name.
//! - `swissloc cities`: The distinct names behind a four-digit code.
//! - `swissloc complete`: Prefix completion over zip code names.
//! - `swissloc community` / `swissloc canton`: Single-entity lookups.
//!
//! Query subcommands load the newest `locations_*.binary` in the data
//! directory unless `--snapshot` names a file:
//!
//! ```bash
//! swissloc pack post.txt communities.csv districts.csv
//! swissloc lookup 8001
//! swissloc lookup 8001 Zürich --format json
//! swissloc complete "zuer" --limit 5
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on any error, `2` when a query finds nothing.

pub mod config;
pub mod output;
pub mod pack;
pub mod query;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use swissloc_index::{latest_binary_file, Dataset};

use crate::config::Settings;
use crate::output::OutputFormat;

/// Exit code for a query that found nothing.
pub const EXIT_NOT_FOUND: u8 = 2;

/// State shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Session {
    pub settings: Settings,
    pub format: OutputFormat,
    /// Explicit snapshot file; overrides the data directory lookup.
    pub snapshot: Option<PathBuf>,
}

impl Session {
    /// The snapshot file query subcommands read.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.snapshot {
            return Ok(path.clone());
        }
        let dir = &self.settings.data_dir;
        latest_binary_file(dir)
            .with_context(|| format!("listing data directory: {}", dir.display()))?
            .with_context(|| {
                format!(
                    "no locations_*.binary snapshot in {}; run `swissloc pack` first",
                    dir.display()
                )
            })
    }

    /// Load and build the dataset.
    pub fn load_dataset(&self) -> Result<Dataset> {
        let path = self.snapshot_path()?;
        load_snapshot(&path, &self.settings)
    }
}

fn load_snapshot(path: &Path, settings: &Settings) -> Result<Dataset> {
    tracing::debug!(
        path = %path.display(),
        policy = %settings.agglomeration_policy,
        "loading snapshot"
    );
    let dataset = Dataset::load_with(path, &settings.builder_options())
        .with_context(|| format!("loading snapshot: {}", path.display()))?;
    for err in dataset.errors() {
        tracing::info!(%err, "recovered reference error");
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swissloc_codec::SourceEncoding;
    use swissloc_index::AgglomerationPolicy;

    fn session(data_dir: &Path) -> Session {
        Session {
            settings: Settings {
                data_dir: data_dir.to_path_buf(),
                encoding: SourceEncoding::Utf8,
                agglomeration_policy: AgglomerationPolicy::default(),
            },
            format: OutputFormat::Text,
            snapshot: None,
        }
    }

    #[test]
    fn explicit_snapshot_wins() {
        let mut s = session(Path::new("/nonexistent"));
        s.snapshot = Some(PathBuf::from("/tmp/x.binary"));
        assert_eq!(s.snapshot_path().unwrap(), PathBuf::from("/tmp/x.binary"));
    }

    #[test]
    fn newest_snapshot_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("locations_20230101.binary"), b"").unwrap();
        std::fs::write(dir.path().join("locations_20240115.binary"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        let path = session(dir.path()).snapshot_path().unwrap();
        assert!(path.ends_with("locations_20240115.binary"));
    }

    #[test]
    fn empty_data_dir_suggests_pack() {
        let dir = tempfile::tempdir().unwrap();
        let err = session(dir.path()).snapshot_path().unwrap_err();
        assert!(err.to_string().contains("swissloc pack"));
    }

    #[test]
    fn corrupt_snapshot_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("locations_20240115.binary");
        std::fs::write(&path, b"short").unwrap();
        let err = session(dir.path()).load_dataset().unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("locations_20240115.binary"));
        assert!(msg.contains("header"));
    }
}
