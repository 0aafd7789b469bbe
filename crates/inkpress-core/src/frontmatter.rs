//! Front matter parsing for content files.

use std::path::Path;

use crate::{
    content::Metadata,
    error::{CoreError, Result},
};

/// Delimiter types for front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front matter delimited by `---`.
    Yaml,
    /// TOML front matter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into front matter and body.
///
/// The closing delimiter must start a line, so `---` inside a value does not
/// end the block.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };

    let delimiter = format.delimiter();
    let after_first = &content[delimiter.len()..];

    let closing_pos = after_first.find(&format!("\n{delimiter}"))? + 1;

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + delimiter.len()..].trim_start();

    Some((format, frontmatter, body))
}

/// Parse front matter from a string into loose metadata and the body.
///
/// Content without front matter yields empty metadata and the full content.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Metadata, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Metadata::new(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Metadata::new(), body.to_string()));
    }

    let metadata: Metadata = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::yaml_frontmatter(path, e))?
        }
        FrontmatterFormat::Toml => {
            toml::from_str(fm_str).map_err(|e| CoreError::toml_frontmatter(path, e))?
        }
    };

    Ok((metadata, body.to_string()))
}
