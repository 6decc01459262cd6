// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `saga-bridge`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "saga-bridge",
    version,
    about = "Export layers to shapefile/dBase and run SAGA command batches.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the settings file (TOML).
    ///
    /// Default: `Processing.toml` in the user folder, when it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SAGA_BRIDGE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Override one setting, e.g. `--set SAGA_FOLDER=/opt/saga`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Export a layer and print the path the external tool should read.
    Export {
        #[arg(value_enum)]
        kind: LayerKind,

        /// Layer source (.shp, .dbf, .csv, .geojson or a raster file).
        path: PathBuf,

        /// Feature ids to treat as the selection.
        #[arg(long, value_name = "ID", value_delimiter = ',')]
        select: Vec<u64>,
    },

    /// Write the batch script for the given commands and run it.
    Run {
        /// File with one command per line; blank lines and `#` comments
        /// are skipped. Its commands run before any given inline.
        #[arg(long, value_name = "FILE")]
        commands_file: Option<PathBuf>,

        /// Commands, without the leading `saga_cmd`.
        #[arg(value_name = "COMMAND")]
        commands: Vec<String>,

        /// Print the script instead of running it.
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LayerKind {
    Vector,
    Table,
    Raster,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
