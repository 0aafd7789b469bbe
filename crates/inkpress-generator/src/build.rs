//! Build orchestration.
//!
//! Runs the build phases in order: before-build hooks, passthrough copy,
//! content collection, page rendering, feed.

use std::{fs, path::Path, time::Instant};

use chrono::Utc;
use inkpress_core::{Config, RunMode};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    collector::{CollectorError, ContentCollector},
    context::BuildContext,
    feed::{FeedError, FeedGenerator},
    hook::{BuildHook, HookOutcome},
    passthrough::{PassthroughCopy, PassthroughError},
    preprocess::{Preprocessor, PreprocessorChain},
    render::{Page, Renderer},
    style::StyleHook,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collector error.
    #[error("collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Passthrough copy error.
    #[error("passthrough error: {0}")]
    Passthrough(#[from] PassthroughError),

    /// Feed generation error.
    #[error("feed error: {0}")]
    Feed(#[from] FeedError),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages written.
    pub pages: usize,

    /// Number of items a preprocessor excluded.
    pub excluded: usize,

    /// Number of content files skipped because they did not parse.
    pub skipped: usize,

    /// Number of passthrough files copied.
    pub passthrough: usize,

    /// Number of feed entries written.
    pub feed_entries: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Everything one build produced.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Counters.
    pub stats: BuildStats,

    /// Outcome of each before-build hook, in run order.
    pub hooks: Vec<(String, HookOutcome)>,
}

impl BuildReport {
    /// Outcome of the named hook.
    pub fn hook(&self, name: &str) -> Option<&HookOutcome> {
        self.hooks
            .iter()
            .find(|(hook, _)| hook == name)
            .map(|(_, outcome)| outcome)
    }
}

/// Site builder that orchestrates the build process.
pub struct Builder {
    ctx: BuildContext,
    hooks: Vec<Box<dyn BuildHook>>,
    chain: PreprocessorChain,
}

impl Builder {
    /// Create a builder with the default hooks and preprocessors.
    ///
    /// The stylesheet hook is registered when `style.enabled` is set; the
    /// drafts preprocessor is always registered.
    #[must_use]
    pub fn new(config: Config, run_mode: RunMode) -> Self {
        let mut hooks: Vec<Box<dyn BuildHook>> = Vec::new();
        if config.style.enabled {
            hooks.push(Box::new(StyleHook::from_config(&config)));
        }

        Self {
            ctx: BuildContext::new(config, run_mode),
            hooks,
            chain: PreprocessorChain::with_defaults(),
        }
    }

    /// Register an additional before-build hook.
    #[must_use]
    pub fn with_hook(mut self, hook: impl BuildHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Register an additional preprocessor after the existing ones.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl Preprocessor + 'static) -> Self {
        self.chain.register(preprocessor);
        self
    }

    /// Build context.
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let config = self.ctx.config();
        let output_dir = config.output_dir();
        let mut report = BuildReport::default();

        info!(
            input = %config.input_dir().display(),
            output = %output_dir.display(),
            run_mode = %self.ctx.run_mode(),
            "starting build"
        );

        // 1. Before-build hooks
        report.hooks = self.run_hooks();

        // 2. Passthrough copy
        fs::create_dir_all(&output_dir)?;
        report.stats.passthrough = PassthroughCopy::from_config(config).copy()?;

        // 3. Collect and preprocess content
        let collection = ContentCollector::new(&self.ctx, &self.chain).collect()?;
        report.stats.excluded = collection.excluded;
        report.stats.skipped = collection.skipped;

        // 4. Render pages
        let renderer = Renderer::new(config);
        let pages: Vec<Page> = collection
            .items
            .iter()
            .map(|item| renderer.render(item))
            .collect();
        report.stats.pages = self.write_pages(&renderer, &pages, &output_dir);

        // 5. Feed
        if config.feed.enabled {
            report.stats.feed_entries = self.generate_feed(&pages, &output_dir)?;
        }

        report.stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = report.stats.pages,
            excluded = report.stats.excluded,
            passthrough = report.stats.passthrough,
            feed_entries = report.stats.feed_entries,
            duration_ms = report.stats.duration_ms,
            "build complete"
        );

        Ok(report)
    }

    /// Run every hook once, logging its outcome.
    fn run_hooks(&self) -> Vec<(String, HookOutcome)> {
        self.hooks
            .iter()
            .map(|hook| {
                let outcome = hook.before_build(&self.ctx);
                log_outcome(hook.name(), &outcome);
                (hook.name().to_string(), outcome)
            })
            .collect()
    }

    /// Write pages in parallel. Returns the number written.
    fn write_pages(&self, renderer: &Renderer, pages: &[Page], output_dir: &Path) -> usize {
        info!(count = pages.len(), "writing HTML pages");

        let results: Vec<_> = pages
            .par_iter()
            .map(|page| {
                let output_path = Renderer::output_path(page, output_dir);
                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, renderer.document(page))?;

                debug!(path = %output_path.display(), "wrote page");
                Ok::<_, std::io::Error>(())
            })
            .collect();

        let mut count = 0;
        for (result, page) in results.into_iter().zip(pages) {
            match result {
                Ok(()) => count += 1,
                Err(e) => warn!(url = %page.url, error = %e, "failed to write page"),
            }
        }
        count
    }

    /// Generate the Atom feed. Returns the number of entries.
    fn generate_feed(&self, pages: &[Page], output_dir: &Path) -> Result<usize> {
        let config = self.ctx.config();
        let generator = FeedGenerator::new(config.clone());
        let selected = generator.select(pages);

        let xml = generator.generate(&selected, Utc::now())?;
        let output_path = output_dir.join(config.feed.path.trim_start_matches('/'));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, xml)?;

        info!(path = %output_path.display(), entries = selected.len(), "generated Atom feed");
        Ok(selected.len())
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("ctx", &self.ctx)
            .field(
                "hooks",
                &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field("chain", &self.chain)
            .finish()
    }
}

fn log_outcome(hook: &str, outcome: &HookOutcome) {
    match outcome {
        HookOutcome::Completed { detail } => info!(hook, "{detail}"),
        HookOutcome::Skipped { reason } => warn!(hook, "{reason}"),
        HookOutcome::Failed { error } => {
            error!(hook, error = %error, "before-build hook failed, continuing build");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::preprocess::{FnPreprocessor, Preprocess};

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn test_config(root: &Path) -> Config {
        Config::new("Test Site", "https://example.com").with_root(root)
    }

    struct StaticHook(HookOutcome);

    impl BuildHook for StaticHook {
        fn name(&self) -> &str {
            "static"
        }

        fn before_build(&self, _ctx: &BuildContext) -> HookOutcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_build_empty_site() {
        let dir = TempDir::new().unwrap();
        let builder = Builder::new(test_config(dir.path()), RunMode::Build);

        let report = builder.build().unwrap();

        assert_eq!(report.stats.pages, 0);
        assert!(report.hook("scss").is_some_and(HookOutcome::is_skipped));
        assert!(dir.path().join("_site/feed/feed.xml").exists());
        assert!(!dir.path().join("_site/css/bootstrap.css").exists());
    }

    #[test]
    fn test_build_excludes_drafts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/posts/live.md", "---\ntitle: Live\ndate: 2024-01-02\n---\nHi");
        write(dir.path(), "content/posts/wip.md", "---\ntitle: WIP\ndraft: true\n---\nSoon");

        let report = Builder::new(test_config(dir.path()), RunMode::Build)
            .build()
            .unwrap();

        assert_eq!(report.stats.pages, 1);
        assert_eq!(report.stats.excluded, 1);
        assert_eq!(report.stats.feed_entries, 1);
        assert!(dir.path().join("_site/posts/live/index.html").exists());
        assert!(!dir.path().join("_site/posts/wip/index.html").exists());
    }

    #[test]
    fn test_serve_includes_drafts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/posts/wip.md", "---\ntitle: WIP\ndraft: true\n---\nSoon");

        let report = Builder::new(test_config(dir.path()), RunMode::Serve)
            .build()
            .unwrap();

        assert_eq!(report.stats.pages, 1);
        assert_eq!(report.stats.excluded, 0);
        assert!(dir.path().join("_site/posts/wip/index.html").exists());
    }

    #[test]
    fn test_failed_hook_does_not_abort_build() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/index.md", "# Home");

        let builder = Builder::new(test_config(dir.path()), RunMode::Build).with_hook(StaticHook(
            HookOutcome::Failed {
                error: "boom".to_string(),
            },
        ));
        let report = builder.build().unwrap();

        assert_eq!(report.stats.pages, 1);
        assert!(report.hook("static").is_some_and(HookOutcome::is_failed));
        assert_eq!(report.hooks.len(), 2);
    }

    #[test]
    fn test_style_compiled_before_pages() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "css/_custom.scss", ".card { .title { font-weight: bold; } }");
        write(dir.path(), "content/index.md", "# Home");

        let report = Builder::new(test_config(dir.path()), RunMode::Build)
            .build()
            .unwrap();

        assert!(report.hook("scss").is_some_and(HookOutcome::is_completed));
        let css = fs::read_to_string(dir.path().join("_site/css/bootstrap.css")).unwrap();
        assert!(css.contains(".card .title{font-weight:bold}"), "{css}");
    }

    #[test]
    fn test_style_disabled_registers_no_hook() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.style.enabled = false;

        let report = Builder::new(config, RunMode::Build).build().unwrap();
        assert!(report.hooks.is_empty());
    }

    #[test]
    fn test_custom_preprocessor_runs_after_drafts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/a.md", "---\ntitle: A\n---\nhello");
        write(dir.path(), "content/b.md", "---\ntitle: B\nprivate: true\n---\nsecret");

        let builder = Builder::new(test_config(dir.path()), RunMode::Serve).with_preprocessor(
            FnPreprocessor::new("private", "md", |item, _| {
                if item.is_truthy("private") {
                    Preprocess::Exclude
                } else {
                    Preprocess::Replace(item.body.replace("hello", "hi"))
                }
            }),
        );
        let report = builder.build().unwrap();

        assert_eq!(report.stats.pages, 1);
        assert_eq!(report.stats.excluded, 1);
        let html = fs::read_to_string(dir.path().join("_site/a/index.html")).unwrap();
        assert!(html.contains("<p>hi</p>"));
    }

    #[test]
    fn test_single_file_passthrough_without_target() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "content/index.md", "# Home");
        write(dir.path(), "content/feed/pretty-atom-feed.xsl", "<xsl/>");

        let mut config = test_config(dir.path());
        config.passthrough = vec![inkpress_core::config::PassthroughEntry {
            from: "content/feed/pretty-atom-feed.xsl".to_string(),
            to: String::new(),
        }];

        let report = Builder::new(config, RunMode::Build).build().unwrap();

        assert_eq!(report.stats.passthrough, 1);
        assert_eq!(report.stats.pages, 1);
        assert!(
            dir.path()
                .join("_site/content/feed/pretty-atom-feed.xsl")
                .exists()
        );
    }

    #[test]
    fn test_feed_disabled() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.feed.enabled = false;

        let report = Builder::new(config, RunMode::Build).build().unwrap();

        assert_eq!(report.stats.feed_entries, 0);
        assert!(!dir.path().join("_site/feed/feed.xml").exists());
    }

    #[test]
    fn test_build_stats_default() {
        let stats = BuildStats::default();
        assert_eq!(stats.pages, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
