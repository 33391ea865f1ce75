//! Application entry point for the headless tree skeleton grower.
//!
//! This binary loads a run configuration, delegates the growth run to
//! [`Runner`] from the `runner` module and writes the resulting skeleton as
//! an OBJ polyline file.

mod export;
mod run_config;
mod runner;

use run_config::{LoadConfigError, RunConfig};
use runner::{RunError, Runner};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] LoadConfigError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error("cannot write {path}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Grows one skeleton.
///
/// Usage: `grow-skeleton [config.json]`. Without an argument the built-in
/// defaults are used. Log verbosity follows `RUST_LOG` (default `info`).
///
/// ### Returns
/// - `Ok(())` if the skeleton was grown and written.
/// - `Err` on a configuration, growth or output error.
fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match std::env::args_os().nth(1) {
        Some(path) => RunConfig::load(path.as_ref())?,
        None => RunConfig::default(),
    };

    let mut runner = Runner::new(&cfg)?;
    let skeleton = runner.run()?;

    let export_err = |source| CliError::Export {
        path: cfg.output.clone(),
        source,
    };
    let mut writer = BufWriter::new(File::create(&cfg.output).map_err(export_err)?);
    export::write_obj(&skeleton, &mut writer).map_err(export_err)?;
    writer.flush().map_err(export_err)?;

    let claimed: usize = runner.reports().iter().map(|r| r.claimed).sum();

    tracing::info!(
        nodes = skeleton.nodes.len(),
        segments = skeleton.segments.len(),
        generations = skeleton.generations(),
        claimed,
        output = %cfg.output.display(),
        "skeleton written"
    );
    Ok(())
}
