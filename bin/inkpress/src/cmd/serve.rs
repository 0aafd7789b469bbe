//! Serve command - watch mode plus a local preview server

use std::{path::Path, sync::Arc};

use color_eyre::eyre::Result;
use inkpress_core::RunMode;
use inkpress_generator::Builder;

use super::{load_config, watch};
use crate::server;

/// Run the serve command.
///
/// Builds, rebuilds on change and serves the output directory on
/// `127.0.0.1:<port>` until Ctrl+C.
pub async fn run(config_path: &Path, run_mode: RunMode, port: u16, open_browser: bool) -> Result<()> {
    tracing::info!(?config_path, %run_mode, port, "Starting dev server");

    let config = load_config(config_path)?;
    let output_dir = config.output_dir();

    let builder = Arc::new(Builder::new(config, run_mode));
    // Keep watcher alive while serving
    let _watcher = watch::start(builder).await?;

    server::serve(&output_dir, port, open_browser).await
}
