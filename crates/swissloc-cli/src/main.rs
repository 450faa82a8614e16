//! # swissloc CLI entry point
//!
//! Parses command-line arguments, resolves settings and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use swissloc_cli::config::{self, ConfigFile, Overrides, Settings, DATA_DIR_ENV};
use swissloc_cli::output::OutputFormat;
use swissloc_cli::pack::{run_pack, PackArgs};
use swissloc_cli::query::{
    run_canton, run_cities, run_community, run_complete, run_info, run_lookup, CantonArgs,
    CitiesArgs, CommunityArgs, CompleteArgs, InfoArgs, LookupArgs,
};
use swissloc_cli::Session;
use swissloc_index::AgglomerationPolicy;

/// Swiss postal reference data
///
/// Packs the postal master extract and the community and district extracts
/// into a binary snapshot, and answers lookups over cantons, communities
/// and zip codes.
#[derive(Parser, Debug)]
#[command(name = "swissloc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the `locations_*.binary` snapshots.
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Snapshot file to query instead of the newest in the data directory.
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// How a community with agglomeration 0 is linked.
    #[arg(long, global = true)]
    agglomeration_policy: Option<AgglomerationPolicy>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a binary snapshot from the source extracts.
    Pack(PackArgs),

    /// Show the snapshot header, entity counts and recovered errors.
    Info(InfoArgs),

    /// Find zip codes by code, full code, ordering number or name.
    Lookup(LookupArgs),

    /// List the distinct names behind a four-digit zip code.
    Cities(CitiesArgs),

    /// Complete a name prefix to zip codes.
    Complete(CompleteArgs),

    /// Show one community and its zip codes.
    Community(CommunityArgs),

    /// Show one canton.
    Canton(CantonArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = session(&cli).and_then(|session| {
        tracing::debug!(data_dir = %session.settings.data_dir.display(), "resolved settings");
        match &cli.command {
            Commands::Pack(args) => run_pack(args, &session.settings, session.format),
            Commands::Info(args) => run_info(args, &session),
            Commands::Lookup(args) => run_lookup(args, &session),
            Commands::Cities(args) => run_cities(args, &session),
            Commands::Complete(args) => run_complete(args, &session),
            Commands::Community(args) => run_community(args, &session),
            Commands::Canton(args) => run_canton(args, &session),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Merge flags, the config file and the defaults.
fn session(cli: &Cli) -> Result<Session> {
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let overrides = Overrides {
        data_dir: cli.data_dir.clone(),
        encoding: None,
        agglomeration_policy: cli.agglomeration_policy,
    };
    let home = config::home_dir();
    Ok(Session {
        settings: Settings::resolve(overrides, file, home.as_deref())?,
        format: cli.format,
        snapshot: cli.snapshot.clone(),
    })
}
