//! # Configuration
//!
//! Settings come from four places, highest precedence first:
//!
//! 1. command-line flags,
//! 2. the `SWISSLOC_DATA` environment variable (through the `--data-dir` flag),
//! 3. a YAML file given with `--config`,
//! 4. built-in defaults (`~/.swissloc`, Windows-1252 sources, unspecified
//!    agglomerations are roots).
//!
//! ```yaml
//! data_dir: /var/lib/swissloc
//! encoding: windows-1252
//! agglomeration_policy: unspecified_is_none
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use swissloc_codec::SourceEncoding;
use swissloc_index::{AgglomerationPolicy, GraphBuilderOptions};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "SWISSLOC_DATA";

/// Data directory name under the home directory.
pub const DEFAULT_DATA_DIR: &str = ".swissloc";

/// The YAML configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub data_dir: Option<PathBuf>,
    pub encoding: Option<String>,
    pub agglomeration_policy: Option<AgglomerationPolicy>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file: {}", path.display()))
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub encoding: Option<SourceEncoding>,
    pub agglomeration_policy: Option<AgglomerationPolicy>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub encoding: SourceEncoding,
    pub agglomeration_policy: AgglomerationPolicy,
}

impl Settings {
    /// Merge overrides, the config file and the defaults.
    pub fn resolve(overrides: Overrides, file: ConfigFile, home: Option<&Path>) -> Result<Self> {
        let data_dir = match overrides.data_dir.or(file.data_dir) {
            Some(dir) => dir,
            None => home
                .map(|h| h.join(DEFAULT_DATA_DIR))
                .context("no data directory configured and no home directory found")?,
        };
        let encoding = match (overrides.encoding, file.encoding) {
            (Some(e), _) => e,
            (None, Some(name)) => name
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid encoding in config file")?,
            (None, None) => SourceEncoding::default(),
        };
        Ok(Self {
            data_dir,
            encoding,
            agglomeration_policy: overrides
                .agglomeration_policy
                .or(file.agglomeration_policy)
                .unwrap_or_default(),
        })
    }

    /// Graph builder options for loading snapshots.
    pub fn builder_options(&self) -> GraphBuilderOptions {
        GraphBuilderOptions {
            agglomeration_policy: self.agglomeration_policy,
            ..GraphBuilderOptions::default()
        }
    }
}

/// The current user's home directory, from `HOME` or `USERPROFILE`.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_home_directory() {
        let home = Path::new("/home/u");
        let s = Settings::resolve(Overrides::default(), ConfigFile::default(), Some(home)).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/home/u/.swissloc"));
        assert_eq!(s.encoding, SourceEncoding::Windows1252);
        assert_eq!(s.agglomeration_policy, AgglomerationPolicy::UnspecifiedIsRoot);
    }

    #[test]
    fn no_home_and_no_data_dir_is_an_error() {
        assert!(Settings::resolve(Overrides::default(), ConfigFile::default(), None).is_err());
    }

    #[test]
    fn flags_beat_the_config_file() {
        let file = ConfigFile {
            data_dir: Some(PathBuf::from("/from/file")),
            encoding: Some("utf-8".into()),
            agglomeration_policy: Some(AgglomerationPolicy::UnspecifiedIsNone),
        };
        let from_file = Settings::resolve(Overrides::default(), file.clone(), None).unwrap();
        assert_eq!(from_file.data_dir, PathBuf::from("/from/file"));
        assert_eq!(from_file.encoding, SourceEncoding::Utf8);
        assert_eq!(from_file.agglomeration_policy, AgglomerationPolicy::UnspecifiedIsNone);

        let overrides = Overrides {
            data_dir: Some(PathBuf::from("/from/flag")),
            encoding: Some(SourceEncoding::Windows1252),
            agglomeration_policy: Some(AgglomerationPolicy::UnspecifiedIsRoot),
        };
        let s = Settings::resolve(overrides, file, None).unwrap();
        assert_eq!(s.data_dir, PathBuf::from("/from/flag"));
        assert_eq!(s.encoding, SourceEncoding::Windows1252);
        assert_eq!(
            s.builder_options().agglomeration_policy,
            AgglomerationPolicy::UnspecifiedIsRoot
        );
    }

    #[test]
    fn load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swissloc.yaml");
        std::fs::write(
            &path,
            "data_dir: /srv/swissloc\nagglomeration_policy: unspecified_is_none\n",
        )
        .unwrap();
        let file = ConfigFile::load(&path).unwrap();
        assert_eq!(file.data_dir, Some(PathBuf::from("/srv/swissloc")));
        assert_eq!(file.agglomeration_policy, Some(AgglomerationPolicy::UnspecifiedIsNone));
        assert!(file.encoding.is_none());
    }

    #[test]
    fn unknown_keys_and_bad_encodings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swissloc.yaml");
        std::fs::write(&path, "data_directory: /srv\n").unwrap();
        assert!(ConfigFile::load(&path).is_err());

        let file = ConfigFile {
            encoding: Some("latin9".into()),
            ..ConfigFile::default()
        };
        assert!(Settings::resolve(Overrides::default(), file, Some(Path::new("/h"))).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ConfigFile::load(Path::new("/nonexistent/swissloc.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/swissloc.yaml"));
    }
}
