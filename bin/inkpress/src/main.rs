//! inkpress CLI
//!
//! Static site generator for blogs: drafts, SCSS and Atom feeds.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use inkpress::RunMode;
use inkpress_core::RUN_MODE_ENV;

/// Command-line interface for inkpress.
#[derive(Parser)]
#[command(name = "inkpress", version, about = "A small static site generator for blogs")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "inkpress.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Override the command's run mode (build, serve, watch)
    #[arg(long, global = true, env = RUN_MODE_ENV)]
    run_mode: Option<RunMode>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Build the site for publishing, leaving drafts out
    Build,
    /// Build, then rebuild whenever sources change
    Watch,
    /// Watch and serve the site locally, drafts included
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
        /// Open browser automatically
        #[arg(long)]
        open: bool,
    },
    /// Create a new draft post
    New {
        /// Path for the new post, relative to the input directory (e.g. posts/my-article)
        path: PathBuf,
    },
}

impl Commands {
    /// Run mode the command uses unless overridden.
    fn default_run_mode(&self) -> RunMode {
        match self {
            Self::Build | Self::New { .. } => RunMode::Build,
            Self::Watch => RunMode::Watch,
            Self::Serve { .. } => RunMode::Serve,
        }
    }
}

impl Cli {
    fn run_mode(&self) -> RunMode {
        self.run_mode
            .unwrap_or_else(|| self.command.default_run_mode())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    inkpress::init_tracing(cli.verbose);

    let run_mode = cli.run_mode();
    tracing::debug!(%run_mode, "Resolved run mode");

    match cli.command {
        Commands::Build => {
            inkpress::cmd::build::run(&cli.config, run_mode)?;
        }
        Commands::Watch => {
            inkpress::cmd::watch::run(&cli.config, run_mode).await?;
        }
        Commands::Serve { port, open } => {
            inkpress::cmd::serve::run(&cli.config, run_mode, port, open).await?;
        }
        Commands::New { path } => {
            inkpress::cmd::new::run(&cli.config, &path)?;
        }
    }

    Ok(())
}
