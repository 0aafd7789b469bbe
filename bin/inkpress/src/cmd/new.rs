//! New command - create a draft post

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail};
use inkpress_core::Config;

/// Run the new command.
///
/// Creates `<input dir>/<path>.md` with draft front matter. The input
/// directory comes from the configuration when it exists, `content`
/// otherwise.
pub fn run(config_path: &Path, path: &Path) -> Result<PathBuf> {
    tracing::info!(?path, "Creating new content");

    let input_dir = if config_path.exists() {
        super::load_config(config_path)?.input_dir()
    } else {
        PathBuf::from("content")
    };

    let file_path = scaffold(&input_dir, path)?;
    println!("Created: {}", file_path.display());
    Ok(file_path)
}

/// Write a new draft post under `input_dir`. Existing files are never
/// overwritten.
pub fn scaffold(input_dir: &Path, path: &Path) -> Result<PathBuf> {
    let full_path = input_dir.join(path);
    let file_path = if full_path.extension().is_some() {
        full_path
    } else {
        full_path.with_extension("md")
    };

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }
    fs::write(&file_path, generate_markdown_frontmatter(path)).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new content file");
    Ok(file_path)
}

fn generate_markdown_frontmatter(path: &Path) -> String {
    let title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .replace('-', " ");

    let date = Utc::now().format("%Y-%m-%d");

    format!(
        r#"---
title: "{title}"
date: {date}
draft: true
tags:
  - posts
---

Write your content here.
"#
    )
}

#[cfg(test)]
mod tests {
    use inkpress_core::ContentItem;

    use super::*;

    #[test]
    fn test_scaffold_creates_draft_post() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("content");

        let file = scaffold(&input, Path::new("posts/my-article")).unwrap();
        assert_eq!(file, input.join("posts/my-article.md"));

        let raw = fs::read_to_string(&file).unwrap();
        let item = ContentItem::parse(&file, &input, &raw).unwrap().unwrap();
        assert_eq!(item.title(), Some("my article"));
        assert!(item.is_draft());
        assert!(item.date().is_some());
        assert_eq!(item.tags(), vec!["posts".to_string()]);
    }

    #[test]
    fn test_scaffold_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file = scaffold(dir.path(), Path::new("notes.markdown")).unwrap();
        assert_eq!(file, dir.path().join("notes.markdown"));
    }

    #[test]
    fn test_scaffold_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path(), Path::new("a")).unwrap();
        let err = scaffold(dir.path(), Path::new("a")).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_run_uses_configured_input_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("inkpress.toml");
        fs::write(
            &config_path,
            "[site]\ntitle = \"T\"\nbase_url = \"https://example.com\"\n\n[dirs]\ninput = \"src\"\n",
        )
        .unwrap();

        let file = run(&config_path, Path::new("posts/hello")).unwrap();
        assert_eq!(file, dir.path().join("src/posts/hello.md"));
    }
}
