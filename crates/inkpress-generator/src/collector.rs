//! Content collection.
//!
//! Walks the input directory, parses every content file and runs the
//! preprocessor chain on it.

use std::{fs, path::Path};

use inkpress_core::{ContentFormat, ContentItem, CoreError};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{context::BuildContext, preprocess::PreprocessorChain};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Items that survived preprocessing.
#[derive(Debug, Default)]
pub struct Collection {
    /// Included items, ordered by path.
    pub items: Vec<ContentItem>,

    /// Number of items a preprocessor excluded.
    pub excluded: usize,

    /// Number of files skipped because their front matter did not parse.
    pub skipped: usize,
}

/// Content collector that walks the input directory.
#[derive(Debug)]
pub struct ContentCollector<'a> {
    ctx: &'a BuildContext,
    chain: &'a PreprocessorChain,
}

impl<'a> ContentCollector<'a> {
    /// Create a new content collector.
    #[must_use]
    pub fn new(ctx: &'a BuildContext, chain: &'a PreprocessorChain) -> Self {
        Self { ctx, chain }
    }

    /// Collect all content from the input directory.
    pub fn collect(&self) -> Result<Collection> {
        let input_dir = self.ctx.config().input_dir();
        let includes_dir = self.ctx.config().includes_dir();
        info!(dir = %input_dir.display(), "collecting content");

        let mut collection = Collection::default();

        if !input_dir.exists() {
            debug!("input directory does not exist, nothing to collect");
            return Ok(collection);
        }

        let walker = WalkDir::new(&input_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !(is_hidden(e) || e.path() == includes_dir));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let item = match self.parse_file(entry.path(), &input_dir) {
                Ok(Some(item)) => item,
                Ok(None) => continue,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "failed to parse file");
                    collection.skipped += 1;
                    continue;
                }
            };

            match self.chain.run(item, self.ctx) {
                Some(item) => collection.items.push(item),
                None => collection.excluded += 1,
            }
        }

        info!(
            items = collection.items.len(),
            excluded = collection.excluded,
            skipped = collection.skipped,
            run_mode = %self.ctx.run_mode(),
            "content collection complete"
        );

        Ok(collection)
    }

    /// Parse a single file. `Ok(None)` for non-content files.
    fn parse_file(
        &self,
        path: &Path,
        input_dir: &Path,
    ) -> std::result::Result<Option<ContentItem>, CoreError> {
        debug!(path = %path.display(), "parsing file");
        if path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ContentFormat::from_extension)
            .is_none()
        {
            return Ok(None);
        }

        let raw = fs::read_to_string(path)?;
        ContentItem::parse(path, input_dir, &raw)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
