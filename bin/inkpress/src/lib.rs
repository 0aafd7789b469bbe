//! inkpress CLI Library
//!
//! Command implementations and the development server behind the `inkpress`
//! binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, watch, serve, new)
//! - [`server`] - Static file server for previews
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use inkpress::{RunMode, cmd};
//!
//! // Build a site, leaving drafts out
//! cmd::build::run(Path::new("inkpress.toml"), RunMode::Build).unwrap();
//! ```

pub mod cmd;
pub mod server;

// Re-export core types for convenience
pub use inkpress_core::{Config, RunMode};
pub use inkpress_generator::{BuildReport, BuildStats, Builder, HookOutcome};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// `RUST_LOG` directives are applied on top of the level.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
