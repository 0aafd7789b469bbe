//! Atom feed generation.

use atom_syndication::{Category, Content, Entry, Feed, Link, Person, Text};
use chrono::{DateTime, Utc};
use inkpress_core::Config;
use thiserror::Error;
use tracing::debug;

use crate::render::Page;

/// Feed generation errors.
#[derive(Debug, Error)]
pub enum FeedError {
    /// XML serialization error.
    #[error("feed write error: {0}")]
    Write(#[from] atom_syndication::Error),

    /// The serialized feed was not valid UTF-8.
    #[error("feed encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Atom feed generator.
#[derive(Debug)]
pub struct FeedGenerator {
    config: Config,
}

impl FeedGenerator {
    /// Create a new feed generator.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Pick the feed's pages: collection members, newest first, limited.
    ///
    /// A page belongs to the collection when one of its tags or its section
    /// equals the collection name.
    pub fn select<'a>(&self, pages: &'a [Page]) -> Vec<&'a Page> {
        let collection = &self.config.feed.collection;
        let mut selected: Vec<_> = pages
            .iter()
            .filter(|p| {
                p.tags.iter().any(|t| t == collection) || p.section.as_deref() == Some(collection.as_str())
            })
            .collect();

        selected.sort_by(|a, b| match (&b.date, &a.date) {
            (Some(b_date), Some(a_date)) => b_date.cmp(a_date),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.url.cmp(&b.url),
        });
        selected.truncate(self.config.feed.limit);
        selected
    }

    /// Generate the feed XML for already selected pages.
    pub fn generate(&self, pages: &[&Page], now: DateTime<Utc>) -> Result<String> {
        let site = &self.config.site;
        let feed_url = self.config.url_for(&self.config.feed.path);

        debug!(count = pages.len(), "generating Atom feed");

        let updated = pages.iter().filter_map(|p| p.date).max().unwrap_or(now);

        let mut feed = Feed::default();
        feed.set_title(site.title.clone());
        feed.set_id(self.config.url_for("/"));
        feed.set_updated(updated.fixed_offset());
        feed.set_lang(Some(site.language.clone()));
        if let Some(subtitle) = self.config.feed.subtitle.as_ref().or(site.description.as_ref()) {
            feed.set_subtitle(Some(Text::plain(subtitle.clone())));
        }
        feed.set_links(vec![
            link(&feed_url, "self", "application/atom+xml"),
            link(&self.config.url_for("/"), "alternate", "text/html"),
        ]);
        if let Some(author) = &site.author {
            feed.set_authors(vec![person(author)]);
        }
        feed.set_entries(
            pages
                .iter()
                .map(|page| self.entry(page, now))
                .collect::<Vec<_>>(),
        );

        let xml = String::from_utf8(feed.write_to(Vec::new())?)?;
        Ok(self.with_stylesheet(xml))
    }

    fn entry(&self, page: &Page, now: DateTime<Utc>) -> Entry {
        let url = self.config.url_for(&page.url);
        let date = page.date.unwrap_or(now).fixed_offset();

        let mut content = Content::default();
        content.set_content_type(Some("html".to_string()));
        content.set_value(Some(page.content.clone()));

        let mut entry = Entry::default();
        entry.set_title(page.title.clone());
        entry.set_id(url.clone());
        entry.set_links(vec![link(&url, "alternate", "text/html")]);
        entry.set_updated(date);
        entry.set_published(page.date.map(|d| d.fixed_offset()));
        entry.set_content(Some(content));
        if let Some(summary) = &page.summary {
            entry.set_summary(Some(Text::plain(summary.clone())));
        }
        entry.set_categories(
            page.tags
                .iter()
                .filter(|t| **t != self.config.feed.collection)
                .map(|tag| {
                    let mut category = Category::default();
                    category.set_term(tag.clone());
                    category.set_label(Some(tag.clone()));
                    category
                })
                .collect::<Vec<_>>(),
        );
        entry
    }

    /// Insert the `xml-stylesheet` processing instruction after the XML
    /// declaration.
    fn with_stylesheet(&self, xml: String) -> String {
        let Some(stylesheet) = &self.config.feed.stylesheet else {
            return xml;
        };
        let pi = format!("<?xml-stylesheet href=\"{stylesheet}\" type=\"text/xsl\"?>");

        match xml.strip_prefix("<?xml").and_then(|rest| rest.find("?>")) {
            Some(end) => {
                let split = "<?xml".len() + end + "?>".len();
                format!("{}\n{pi}{}", &xml[..split], &xml[split..])
            }
            None => format!("{pi}\n{xml}"),
        }
    }
}

fn link(href: &str, rel: &str, mime_type: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href.to_string());
    link.set_rel(rel.to_string());
    link.set_mime_type(Some(mime_type.to_string()));
    link
}

fn person(name: &str) -> Person {
    let mut person = Person::default();
    person.set_name(name.to_string());
    person
}
