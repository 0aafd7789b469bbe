//! End-to-end tests for inkpress.
//!
//! These tests build a copy of the demo blog and check the generated site.

use std::{fs, path::Path};

use inkpress_core::{Config, RunMode};
use inkpress_generator::{Builder, HookOutcome, PassthroughCopy};
use tempfile::TempDir;

const DEMO: &str = "../../demos/blog";

/// Copy the demo site into a scratch directory and load its configuration.
fn demo_site() -> Option<(TempDir, Config)> {
    let demo = Path::new(DEMO);
    if !demo.join("inkpress.toml").exists() {
        // Skip if running from different working directory
        return None;
    }

    let dir = TempDir::new().expect("create temp dir");
    PassthroughCopy::new()
        .with_rule(demo, dir.path())
        .copy()
        .expect("copy demo site");
    let _ = fs::remove_dir_all(dir.path().join("_site"));

    let config = Config::load(&dir.path().join("inkpress.toml")).expect("Config should load");
    Some((dir, config))
}

#[test]
fn test_demo_config_loads() {
    let Some((dir, config)) = demo_site() else {
        return;
    };

    assert_eq!(config.site.title, "Eleventy-style Blog");
    assert_eq!(config.feed.collection, "posts");
    assert_eq!(config.passthrough.len(), 2);
    assert_eq!(config.output_dir(), dir.path().join("_site"));
}

#[test]
fn test_demo_build_excludes_drafts() {
    let Some((dir, config)) = demo_site() else {
        return;
    };
    let out = dir.path().join("_site");

    let report = Builder::new(config, RunMode::Build)
        .build()
        .expect("Build should succeed");

    assert_eq!(report.stats.excluded, 1);
    assert_eq!(report.stats.feed_entries, 2);
    assert!(out.join("index.html").exists());
    assert!(out.join("about/index.html").exists());
    assert!(out.join("404.html").exists());
    assert!(out.join("posts/firstpost/index.html").exists());
    assert!(!out.join("posts/fourthpost/index.html").exists());
    assert!(!out.join("_includes").exists());

    let feed = fs::read_to_string(out.join("feed/feed.xml")).expect("feed written");
    assert!(feed.contains("This is my first post."));
    assert!(!feed.contains("This is a draft post"));
    assert!(
        feed.find("This is my second post.").expect("second post")
            < feed.find("This is my first post.").expect("first post")
    );
}

#[test]
fn test_demo_serve_includes_drafts() {
    let Some((dir, config)) = demo_site() else {
        return;
    };

    let report = Builder::new(config, RunMode::Serve)
        .build()
        .expect("Build should succeed");

    assert_eq!(report.stats.excluded, 0);
    assert_eq!(report.stats.feed_entries, 3);
    assert!(dir.path().join("_site/posts/fourthpost/index.html").exists());
}

#[test]
fn test_demo_stylesheet_and_assets() {
    let Some((dir, config)) = demo_site() else {
        return;
    };
    let out = dir.path().join("_site");

    let report = Builder::new(config, RunMode::Build)
        .build()
        .expect("Build should succeed");

    assert!(matches!(
        report.hook("scss"),
        Some(HookOutcome::Completed { .. })
    ));
    let css = fs::read_to_string(out.join("css/bootstrap.css")).expect("css written");
    assert!(css.contains("#0d6efd"));
    assert!(!css.contains('$'));
    assert!(!css.contains("\n  "));

    assert!(out.join("robots.txt").exists());
    assert!(out.join("feed/pretty-atom-feed.xsl").exists());

    let index = fs::read_to_string(out.join("index.html")).expect("index written");
    assert!(index.contains("href=\"/css/bootstrap.css\""));
}

#[test]
fn test_demo_missing_stylesheet_still_builds() {
    let Some((dir, config)) = demo_site() else {
        return;
    };
    fs::remove_file(dir.path().join("css/_custom.scss")).expect("remove scss");

    let report = Builder::new(config, RunMode::Build)
        .build()
        .expect("Build should succeed");

    assert!(matches!(
        report.hook("scss"),
        Some(HookOutcome::Skipped { .. })
    ));
    assert!(!dir.path().join("_site/css/bootstrap.css").exists());
    assert!(dir.path().join("_site/index.html").exists());
}
