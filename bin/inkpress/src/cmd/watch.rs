//! Watch command - rebuild the site whenever its sources change

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use color_eyre::eyre::{Result, WrapErr};
use inkpress_core::{Config, RunMode};
use inkpress_generator::{Builder, PassthroughCopy};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::sync::mpsc;

use super::{load_config, print_report};

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Run the watch command.
///
/// Builds once, then rebuilds on every change until Ctrl+C.
pub async fn run(config_path: &Path, run_mode: RunMode) -> Result<()> {
    tracing::info!(?config_path, %run_mode, "Starting watch mode");

    let config = load_config(config_path)?;
    let builder = Arc::new(Builder::new(config, run_mode));
    let _watcher = start(builder).await?;

    println!("  Watching for changes. Press Ctrl+C to stop");
    println!();

    tokio::signal::ctrl_c()
        .await
        .wrap_err("Failed to listen for Ctrl+C")?;
    println!();
    println!("  Stopped watching");

    Ok(())
}

/// Run the initial build, then watch the site's sources and rebuild on change.
///
/// The returned watcher must be kept alive for as long as rebuilds should
/// happen.
pub async fn start(builder: Arc<Builder>) -> Result<RecommendedWatcher> {
    tracing::info!("Running initial build...");
    rebuild(Arc::clone(&builder)).await?;

    let config = builder.context().config();
    // notify reports absolute paths, so compare against an absolute output dir
    let output_dir = absolute(&config.output_dir());
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            let Ok(event) = res else {
                return;
            };
            let relevant = matches!(
                event.kind,
                EventKind::Modify(ModifyKind::Data(_) | ModifyKind::Name(_))
                    | EventKind::Create(_)
                    | EventKind::Remove(_)
            );
            if relevant && is_source_change(&event.paths, &output_dir) {
                let _ = tx.try_send(());
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for target in watch_targets(config) {
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(&target, mode)
            .wrap_err_with(|| format!("Failed to watch {}", target.display()))?;
        tracing::debug!(path = %target.display(), "Watching");
    }

    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: let the burst settle, then drop queued events
            tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS)).await;
            while rx.try_recv().is_ok() {}

            println!();
            println!("  File change detected, rebuilding...");
            if let Err(e) = rebuild(Arc::clone(&builder)).await {
                tracing::error!("Rebuild failed: {e:#}");
                eprintln!("  ✗ Rebuild failed: {e}");
            }
        }
    });

    Ok(watcher)
}

/// Run one build on a blocking thread.
async fn rebuild(builder: Arc<Builder>) -> Result<()> {
    let report = tokio::task::spawn_blocking(move || builder.build())
        .await
        .wrap_err("Build task panicked")?
        .wrap_err("Build failed")?;

    print_report(&report);
    Ok(())
}

/// Existing paths whose changes trigger a rebuild.
///
/// The input directory, the stylesheet's directory and every passthrough
/// source. Paths already covered by an earlier target are dropped.
pub fn watch_targets(config: &Config) -> Vec<PathBuf> {
    let mut candidates = vec![config.input_dir()];
    if config.style.enabled
        && let Some(dir) = config.style_source().parent()
    {
        candidates.push(dir.to_path_buf());
    }
    candidates.extend(
        PassthroughCopy::from_config(config)
            .sources()
            .map(Path::to_path_buf),
    );

    let mut targets: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        let candidate = absolute(&candidate);
        if targets.iter().any(|t| candidate.starts_with(t)) {
            continue;
        }
        targets.push(candidate);
    }
    targets
}

/// Whether an event touches anything outside the output directory.
///
/// Writes into the output directory come from our own builds and must not
/// trigger another one.
fn is_source_change(paths: &[PathBuf], output_dir: &Path) -> bool {
    paths.iter().any(|p| !p.starts_with(output_dir))
}

/// Canonical form of `path`, or its absolute form when it does not exist yet.
fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_watch_targets() {
        let dir = TempDir::new().unwrap();
        let root = &fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("content/feed")).unwrap();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::create_dir_all(root.join("public")).unwrap();
        fs::write(root.join("content/feed/pretty-atom-feed.xsl"), "<xsl/>").unwrap();

        let mut config = Config::new("Test", "https://example.com").with_root(root);
        config.passthrough.push(inkpress_core::config::PassthroughEntry {
            from: "content/feed/pretty-atom-feed.xsl".to_string(),
            to: "feed/pretty-atom-feed.xsl".to_string(),
        });

        assert_eq!(
            watch_targets(&config),
            vec![root.join("content"), root.join("css"), root.join("public")]
        );
    }

    #[test]
    fn test_watch_targets_skip_missing() {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("content")).unwrap();

        let mut config = Config::new("Test", "https://example.com").with_root(&root);
        config.style.enabled = false;

        assert_eq!(watch_targets(&config), vec![root.join("content")]);
    }

    #[test]
    fn test_own_writes_ignored_with_relative_output_dir() {
        // A config loaded from `inkpress.toml` has an empty root.
        let config = Config::new("Test", "https://example.com");
        assert!(config.output_dir().is_relative());

        let output_dir = absolute(&config.output_dir());
        let cwd = std::env::current_dir().unwrap();

        assert!(output_dir.is_absolute());
        assert!(!is_source_change(&[output_dir.join("posts/a/index.html")], &output_dir));
        assert!(!is_source_change(&[output_dir.join("css/bootstrap.css")], &output_dir));
        assert!(is_source_change(&[cwd.join("content/posts/a.md")], &output_dir));
        assert!(is_source_change(
            &[output_dir.join("index.html"), cwd.join("css/_custom.scss")],
            &output_dir
        ));
    }
}
