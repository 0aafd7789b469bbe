//! Content items and their loose metadata.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{error::Result, frontmatter::parse_frontmatter};

/// Arbitrary key/value attributes from a content file's front matter.
pub type Metadata = BTreeMap<String, Value>;

/// Format of a content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    /// Markdown content (.md files).
    Markdown,
    /// Plain HTML content (.html files).
    Html,
}

impl ContentFormat {
    /// Determine content format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

/// One discovered input file flowing through the build.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    /// Path on disk.
    pub source: PathBuf,

    /// Path relative to the input directory.
    pub relative: PathBuf,

    /// Source format.
    pub format: ContentFormat,

    /// Front matter attributes.
    pub data: Metadata,

    /// Body without front matter.
    pub body: String,
}

impl ContentItem {
    /// Create an item from already parsed parts.
    pub fn new(
        relative: impl Into<PathBuf>,
        format: ContentFormat,
        data: Metadata,
        body: impl Into<String>,
    ) -> Self {
        let relative = relative.into();
        Self {
            source: relative.clone(),
            relative,
            format,
            data,
            body: body.into(),
        }
    }

    /// Parse raw file content read from `source`.
    ///
    /// Returns `Ok(None)` when the extension is not a content format.
    pub fn parse(source: &Path, input_dir: &Path, raw: &str) -> Result<Option<Self>> {
        let Some(format) = source
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ContentFormat::from_extension)
        else {
            return Ok(None);
        };

        let (data, body) = parse_frontmatter(raw, source)?;
        let relative = source.strip_prefix(input_dir).unwrap_or(source);

        Ok(Some(Self {
            source: source.to_path_buf(),
            relative: relative.to_path_buf(),
            format,
            data,
            body,
        }))
    }

    /// Look up a metadata attribute.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Whether an attribute is present and truthy. Absent keys are falsy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.data.get(key).is_some_and(is_truthy)
    }

    /// Whether the author marked this item as a draft.
    pub fn is_draft(&self) -> bool {
        self.is_truthy("draft")
    }

    /// File extension of the source, lowercased.
    pub fn extension(&self) -> Option<String> {
        self.relative
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }

    /// Title attribute, if it is a string.
    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(Value::as_str)
    }

    /// Description attribute, if it is a string.
    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(Value::as_str)
    }

    /// Permalink override, if set.
    pub fn permalink(&self) -> Option<&str> {
        self.get("permalink").and_then(Value::as_str)
    }

    /// Publication date parsed from the `date` attribute.
    ///
    /// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` and bare dates.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.get("date").and_then(Value::as_str).and_then(parse_date)
    }

    /// Tags from the `tags` attribute, which may be a single string or a list.
    pub fn tags(&self) -> Vec<String> {
        match self.get("tags") {
            Some(Value::String(tag)) => vec![tag.clone()],
            Some(Value::Sequence(tags)) => tags
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// First path component relative to the input directory.
    pub fn section(&self) -> Option<&str> {
        let mut components = self.relative.components();
        let first = components.next()?;
        // A file at the top level has no section.
        components.next()?;
        first.as_os_str().to_str()
    }
}

/// Loose truthiness of a metadata value.
///
/// `null`, `false`, zero, NaN and the empty string are falsy. Everything else,
/// including empty lists and mappings, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
