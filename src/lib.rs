// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod export;
pub mod formats;
pub mod layer;
pub mod log;
pub mod logging;
pub mod paths;
pub mod saga;
pub mod sources;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::cli::{CliArgs, Command, LayerKind};
use crate::config::{load_or_default, Settings};
use crate::console::ConsoleProgress;
use crate::export::LayerExporter;
use crate::formats::FileWriterFactory;
use crate::log::ProcessingLog;
use crate::paths::TempFolder;
use crate::saga::{compose_script, SagaRunner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading and `--set` overrides
/// - layer export through the file sources
/// - batch composition and execution
pub async fn run(args: CliArgs) -> Result<()> {
    let mut settings = load_or_default(args.config.as_deref())?;
    for assignment in &args.overrides {
        settings.apply_override(assignment)?;
    }

    match args.command {
        Command::Export { kind, path, select } => {
            let output = export_layer(&settings, kind, &path, &select)?;
            println!("{}", output.display());
        }
        Command::Run {
            commands_file,
            commands,
            dry_run,
        } => {
            let mut batch = match commands_file {
                Some(file) => read_commands(&file)?,
                None => Vec::new(),
            };
            batch.extend(commands);
            run_batch(&settings, &batch, dry_run).await?;
        }
    }
    Ok(())
}

/// Open `path` as the requested kind of layer and export it.
pub fn export_layer(
    settings: &Settings,
    kind: LayerKind,
    path: &Path,
    select: &[u64],
) -> Result<PathBuf> {
    let temp = TempFolder::new(settings.temp_folder());
    let writers = FileWriterFactory;
    let exporter = LayerExporter::new(settings, &temp, &writers);

    let output = match kind {
        LayerKind::Raster => exporter.export_raster_layer(&sources::open_raster(path)),
        LayerKind::Vector | LayerKind::Table => {
            let mut layer = sources::open_vector(path, settings.encoding())?;
            if !select.is_empty() {
                layer.select(select.iter().copied());
            }
            if kind == LayerKind::Vector {
                exporter.export_vector_layer(&layer)?
            } else {
                exporter.export_table(&layer)?
            }
        }
    };
    Ok(output)
}

/// One command per line; blank lines and `#` comments are skipped.
pub fn read_commands(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading commands from {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn run_batch(settings: &Settings, batch: &[String], dry_run: bool) -> Result<()> {
    if batch.is_empty() {
        bail!("no commands given");
    }

    let log = ProcessingLog::in_folder(&settings.user_folder());
    let runner = SagaRunner::new(settings, &log);

    if dry_run {
        println!(
            "{}",
            compose_script(batch, runner.shell(), settings.saga_folder())
        );
        debug!("dry-run complete (no execution)");
        return Ok(());
    }

    let mut progress = ConsoleProgress::new();
    let report = runner.run(batch, &mut progress).await;
    progress.finish();
    let report = report?;

    info!(log = ?log.path(), "console output recorded");
    match report.exit_code {
        Some(0) => Ok(()),
        Some(code) => bail!("batch job exited with status {code}"),
        None => bail!("batch job was terminated by a signal"),
    }
}
