//! Build command - generates the static site

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use inkpress_core::RunMode;
use inkpress_generator::{BuildReport, Builder};

use super::{load_config, print_report};

/// Run the build command.
///
/// Builds the site once. Drafts are left out unless `run_mode` says otherwise.
pub fn run(config_path: &Path, run_mode: RunMode) -> Result<BuildReport> {
    tracing::info!(?config_path, %run_mode, "Starting build");

    let config = load_config(config_path)?;
    let output = config.output_dir();

    let report = Builder::new(config, run_mode)
        .build()
        .wrap_err("Build failed")?;

    print_report(&report);
    println!("  Output:       {}", output.display());
    println!();

    Ok(report)
}
