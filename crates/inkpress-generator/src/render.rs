//! Page rendering.
//!
//! Markdown goes through `pulldown-cmark`; HTML bodies pass through as is.
//! Every page is wrapped in a minimal document that links the compiled
//! stylesheet and the feed.

use std::{
    collections::HashMap,
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, Utc};
use inkpress_core::{Config, ContentFormat, ContentItem};
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

/// A rendered page ready to be written.
#[derive(Debug, Clone)]
pub struct Page {
    /// Site-relative URL, e.g. `/posts/hello/`.
    pub url: String,

    /// Page title.
    pub title: String,

    /// Publication date.
    pub date: Option<DateTime<Utc>>,

    /// Tags for this page.
    pub tags: Vec<String>,

    /// First path component of the source.
    pub section: Option<String>,

    /// Description/summary for listings and feeds.
    pub summary: Option<String>,

    /// Rendered body HTML.
    pub content: String,

    /// Source path relative to the input directory.
    pub source: PathBuf,
}

/// Renders content items into pages and full HTML documents.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: Options,
    site_title: String,
    language: String,
    stylesheet_url: Option<String>,
    feed_url: Option<String>,
}

impl Renderer {
    /// Create a renderer for a site.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            site_title: config.site.title.clone(),
            language: config.site.language.clone(),
            stylesheet_url: config.style.enabled.then(|| config.stylesheet_url()),
            feed_url: config.feed.enabled.then(|| config.feed_url()),
        }
    }

    /// Render one content item.
    pub fn render(&self, item: &ContentItem) -> Page {
        let content = match item.format {
            ContentFormat::Markdown => self.markdown_to_html(&item.body),
            ContentFormat::Html => item.body.clone(),
        };

        let url = item
            .permalink()
            .map(normalize_permalink)
            .unwrap_or_else(|| permalink(&item.relative));

        let title = item.title().map(str::to_string).unwrap_or_else(|| {
            item.relative
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .replace('-', " ")
        });

        Page {
            url,
            title,
            date: item.date(),
            tags: item.tags(),
            section: item.section().map(str::to_string),
            summary: item.description().map(str::to_string),
            content,
            source: item.relative.clone(),
        }
    }

    /// Wrap a page in a full HTML document.
    pub fn document(&self, page: &Page) -> String {
        let title = if page.title == self.site_title {
            escape_html(&page.title)
        } else {
            format!(
                "{} | {}",
                escape_html(&page.title),
                escape_html(&self.site_title)
            )
        };

        let mut head = String::new();
        if let Some(summary) = &page.summary {
            head.push_str(&format!(
                "  <meta name=\"description\" content=\"{}\">\n",
                escape_html(summary)
            ));
        }
        if let Some(css) = &self.stylesheet_url {
            head.push_str(&format!("  <link rel=\"stylesheet\" href=\"{css}\">\n"));
        }
        if let Some(feed) = &self.feed_url {
            head.push_str(&format!(
                "  <link rel=\"alternate\" href=\"{feed}\" type=\"application/atom+xml\" title=\"{}\">\n",
                escape_html(&self.site_title)
            ));
        }

        format!(
            "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n  <meta charset=\"utf-8\">\n  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n  <title>{title}</title>\n{head}</head>\n<body>\n<main>\n{content}\n</main>\n</body>\n</html>\n",
            lang = escape_html(&self.language),
            content = page.content.trim_end(),
        )
    }

    /// Output file for a page under `output_dir`.
    ///
    /// `.` and `..` segments are dropped, so the result never leaves
    /// `output_dir`.
    pub fn output_path(page: &Page, output_dir: &Path) -> PathBuf {
        let url = page.url.trim_start_matches('/');
        let segments: Vec<&str> = url
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();
        let path: PathBuf = std::iter::once(output_dir)
            .chain(segments.iter().map(Path::new))
            .collect();

        let has_extension = segments.last().is_some_and(|last| last.contains('.'));

        if has_extension && !url.ends_with('/') {
            path
        } else {
            path.join("index.html")
        }
    }

    fn markdown_to_html(&self, body: &str) -> String {
        let mut events: Vec<Event<'_>> = Parser::new_ext(body, self.options).collect();
        assign_heading_ids(&mut events);

        let mut out = String::with_capacity(body.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

/// Give every heading without an explicit `{#id}` a unique slug of its text.
fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for event in events.iter() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            seen.insert(id.to_string(), 1);
        }
    }

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }

        let mut text = String::new();
        for event in &events[i + 1..] {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
        }

        let slug = slugify(&text);
        if slug.is_empty() {
            continue;
        }
        let slug = unique_slug(slug, &mut seen);
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Suffix repeated slugs with `-1`, `-2`, ...
fn unique_slug(slug: String, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(slug.clone()).or_insert(0);
    *count += 1;
    if *count == 1 {
        slug
    } else {
        format!("{slug}-{}", *count - 1)
    }
}

/// Convert text to a URL-safe slug.
fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Permalink for a path relative to the input directory.
///
/// `index.md` maps to `/`, `posts/index.md` to `/posts/` and
/// `posts/hello.md` to `/posts/hello/`.
pub fn permalink(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect();

    if let Some(last) = segments.pop() {
        let stem = Path::new(&last)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&last)
            .to_string();
        if stem != "index" {
            segments.push(stem);
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

fn normalize_permalink(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Escape special HTML characters.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
