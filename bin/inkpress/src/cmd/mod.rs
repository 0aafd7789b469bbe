//! CLI command implementations.

pub mod build;
pub mod new;
pub mod serve;
pub mod watch;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use inkpress_core::Config;
use inkpress_generator::{BuildReport, HookOutcome};

/// Load the site configuration, applying `INKPRESS__*` overrides.
pub(crate) fn load_config(config_path: &Path) -> Result<Config> {
    let config = Config::load_with_env(config_path).wrap_err("Failed to load configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Print build statistics in a user-friendly format.
pub(crate) fn print_report(report: &BuildReport) {
    let stats = &report.stats;

    println!();
    println!("  Build Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Pages:        {:>6}", stats.pages);
    println!("  Excluded:     {:>6}", stats.excluded);
    if stats.skipped > 0 {
        println!("  Skipped:      {:>6}", stats.skipped);
    }
    println!("  Passthrough:  {:>6}", stats.passthrough);
    println!("  Feed entries: {:>6}", stats.feed_entries);
    println!("  ─────────────────────────────────");
    for (name, outcome) in &report.hooks {
        match outcome {
            HookOutcome::Completed { detail } => println!("  ✓ {name}: {detail}"),
            HookOutcome::Skipped { reason } => println!("  - {name}: {reason}"),
            HookOutcome::Failed { error } => println!("  ✗ {name}: {error}"),
        }
    }
    println!("  Duration:     {:>6}ms", stats.duration_ms);
    println!();
}
