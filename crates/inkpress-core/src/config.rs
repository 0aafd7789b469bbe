//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for inkpress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Input and output directories.
    #[serde(default)]
    pub dirs: DirsConfig,

    /// Stylesheet compilation settings.
    #[serde(default)]
    pub style: StyleConfig,

    /// Atom feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Files and directories copied verbatim into the output.
    #[serde(default = "default_passthrough")]
    pub passthrough: Vec<PassthroughEntry>,

    /// Project root all relative paths resolve against.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Language code used in page markup and the feed.
    #[serde(default = "default_language")]
    pub language: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,
}

/// Directory layout, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirsConfig {
    /// Content input directory.
    #[serde(default = "default_input_dir")]
    pub input: String,

    /// Directory under `input` that holds layout partials, never rendered.
    #[serde(default = "default_includes_dir")]
    pub includes: String,

    /// Output directory for the generated site.
    #[serde(default = "default_output_dir")]
    pub output: String,
}

/// Stylesheet source and output pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Whether the stylesheet hook runs before each build.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SCSS source, relative to the project root.
    #[serde(default = "default_style_source")]
    pub source: String,

    /// Compiled CSS path, relative to the output directory.
    #[serde(default = "default_style_output")]
    pub output: String,

    /// Extra directories searched by `@use` and `@import`.
    #[serde(default)]
    pub load_paths: Vec<String>,
}

/// Atom feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Whether the feed is generated.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Feed path, relative to the output directory.
    #[serde(default = "default_feed_path")]
    pub path: String,

    /// Collection whose items appear in the feed.
    #[serde(default = "default_feed_collection")]
    pub collection: String,

    /// Maximum number of entries.
    #[serde(default = "default_feed_limit")]
    pub limit: usize,

    /// Feed subtitle.
    #[serde(default)]
    pub subtitle: Option<String>,

    /// XSL stylesheet referenced from the feed, relative to the feed.
    #[serde(default = "default_feed_stylesheet")]
    pub stylesheet: Option<String>,
}

/// A single passthrough copy rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassthroughEntry {
    /// Source file or directory, relative to the project root.
    pub from: String,

    /// Destination, relative to the output directory. Empty means the root.
    #[serde(default)]
    pub to: String,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_input_dir() -> String {
    "content".to_string()
}

fn default_includes_dir() -> String {
    "_includes".to_string()
}

fn default_output_dir() -> String {
    "_site".to_string()
}

fn default_true() -> bool {
    true
}

fn default_style_source() -> String {
    "css/_custom.scss".to_string()
}

fn default_style_output() -> String {
    "css/bootstrap.css".to_string()
}

fn default_feed_path() -> String {
    "feed/feed.xml".to_string()
}

fn default_feed_collection() -> String {
    "posts".to_string()
}

fn default_feed_limit() -> usize {
    10
}

fn default_feed_stylesheet() -> Option<String> {
    Some("pretty-atom-feed.xsl".to_string())
}

fn default_passthrough() -> Vec<PassthroughEntry> {
    vec![PassthroughEntry {
        from: "public".to_string(),
        to: String::new(),
    }]
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            input: default_input_dir(),
            includes: default_includes_dir(),
            output: default_output_dir(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: default_style_source(),
            output: default_style_output(),
            load_paths: Vec::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_feed_path(),
            collection: default_feed_collection(),
            limit: default_feed_limit(),
            subtitle: None,
            stylesheet: default_feed_stylesheet(),
        }
    }
}

impl Config {
    /// Create a configuration with defaults for everything but the site identity.
    pub fn new(title: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                title: title.into(),
                base_url: base_url.into(),
                language: default_language(),
                description: None,
                author: None,
            },
            dirs: DirsConfig::default(),
            style: StyleConfig::default(),
            feed: FeedConfig::default(),
            passthrough: default_passthrough(),
            root: PathBuf::new(),
        }
    }

    /// Set the project root.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Load configuration from a TOML file.
    ///
    /// Relative paths in the file resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;
        config.root = root_of(path);

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `INKPRESS__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("INKPRESS").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.root = root_of(path);

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if self.dirs.output.trim().is_empty() {
            return Err(CoreError::config("dirs.output cannot be empty"));
        }

        if self.feed.enabled && self.feed.limit == 0 {
            return Err(CoreError::config("feed.limit must be at least 1"));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Resolve a path relative to the project root.
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Content input directory.
    pub fn input_dir(&self) -> PathBuf {
        self.resolve(&self.dirs.input)
    }

    /// Layout partials directory inside the input directory.
    pub fn includes_dir(&self) -> PathBuf {
        self.input_dir().join(&self.dirs.includes)
    }

    /// Output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.dirs.output)
    }

    /// SCSS source file.
    pub fn style_source(&self) -> PathBuf {
        self.resolve(&self.style.source)
    }

    /// Compiled CSS file.
    pub fn style_output(&self) -> PathBuf {
        self.output_dir().join(&self.style.output)
    }

    /// Site-relative URL of the compiled stylesheet.
    pub fn stylesheet_url(&self) -> String {
        format!("/{}", self.style.output.trim_start_matches('/'))
    }

    /// Site-relative URL of the feed.
    pub fn feed_url(&self) -> String {
        format!("/{}", self.feed.path.trim_start_matches('/'))
    }
}

fn root_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[site]
title = "Test Blog"
base_url = "https://example.com"
language = "de"
author = "Jane Doe"

[dirs]
input = "src"
output = "dist"

[style]
source = "styles/main.scss"
output = "assets/site.css"
load_paths = ["node_modules"]

[feed]
collection = "articles"
limit = 5
subtitle = "Notes and essays"

[[passthrough]]
from = "static"

[[passthrough]]
from = "src/feed/pretty-atom-feed.xsl"
to = "feed/pretty-atom-feed.xsl"
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.title, "Test Blog");
        assert_eq!(config.site.language, "de");
        assert_eq!(config.site.author.as_deref(), Some("Jane Doe"));
        assert_eq!(config.dirs.input, "src");
        assert_eq!(config.dirs.includes, "_includes");
        assert_eq!(config.style.source, "styles/main.scss");
        assert_eq!(config.style.load_paths, vec!["node_modules"]);
        assert_eq!(config.feed.collection, "articles");
        assert_eq!(config.feed.limit, 5);
        assert_eq!(config.passthrough.len(), 2);
        assert_eq!(config.passthrough[0].to, "");
        assert_eq!(config.root, dir.path());
        assert_eq!(config.output_dir(), dir.path().join("dist"));
        assert_eq!(
            config.style_output(),
            dir.path().join("dist").join("assets/site.css")
        );
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        let minimal_config = r#"
[site]
title = "Minimal Site"
base_url = "https://example.com"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.language, "en");
        assert_eq!(config.dirs.input, "content");
        assert_eq!(config.dirs.output, "_site");
        assert!(config.style.enabled);
        assert_eq!(config.style.source, "css/_custom.scss");
        assert_eq!(config.style.output, "css/bootstrap.css");
        assert!(config.feed.enabled);
        assert_eq!(config.feed.path, "feed/feed.xml");
        assert_eq!(config.feed.collection, "posts");
        assert_eq!(config.feed.limit, 10);
        assert_eq!(
            config.feed.stylesheet.as_deref(),
            Some("pretty-atom-feed.xsl")
        );
        assert_eq!(
            config.passthrough,
            vec![PassthroughEntry {
                from: "public".to_string(),
                to: String::new(),
            }]
        );
    }

    #[test]
    fn test_url_helpers() {
        let config = Config::new("Test", "https://example.com");

        assert_eq!(
            config.url_for("/posts/hello/"),
            "https://example.com/posts/hello/"
        );
        assert_eq!(
            config.url_for("posts/hello/"),
            "https://example.com/posts/hello/"
        );
        assert_eq!(config.stylesheet_url(), "/css/bootstrap.css");
        assert_eq!(config.feed_url(), "/feed/feed.xml");
    }

    #[test]
    fn test_config_validation_empty_title() {
        let config = Config::new("", "https://example.com");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("title cannot be empty"));
    }

    #[test]
    fn test_config_validation_zero_feed_limit() {
        let mut config = Config::new("Test", "https://example.com");
        config.feed.limit = 0;
        assert!(config.validate().is_err());

        config.feed.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/inkpress.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_with_env_reads_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("inkpress.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.site.title, "Test Blog");
        assert_eq!(config.feed.limit, 5);
        assert_eq!(config.root, dir.path());
    }
}
