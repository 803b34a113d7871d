//! Page-level loading for the personal site.
//!
//! A [`Site`] wires a [`ContentSource`] to the renderer and answers the
//! site's page requests: the writing index, individual posts, book notes
//! and the static experience and publications pages. Any missing piece of
//! a post (unknown id, absent page, invalid properties) short-circuits to
//! [`PageOutcome::NotFound`].

use chrono::NaiveDate;
use html_escape::encode_text;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::fetch::{fetch_all_blocks, fetch_page_id_by_field, fetch_page_properties, ContentSource, FetchOptions};
use crate::model::{PageProperties, PostInfo, PropertySchema};
use crate::render::{to_html, to_text, BlockRenderer, RenderOptions, RenderStats, RenderedDocument};

/// Site configuration: where content lives and how to render it.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Page id of the experience page
    pub experience_page_id: Option<String>,

    /// Page id of the publications page
    pub publications_page_id: Option<String>,

    /// Database id holding posts
    pub writing_database_id: Option<String>,

    /// Database id holding book notes
    pub bookshelf_database_id: Option<String>,

    /// Property names of page records
    pub schema: PropertySchema,

    /// Rendering options
    pub render: RenderOptions,

    /// Fetch options
    pub fetch: FetchOptions,
}

impl SiteConfig {
    /// Create a configuration with no content ids.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the experience page id.
    pub fn with_experience_page(mut self, id: impl Into<String>) -> Self {
        self.experience_page_id = Some(id.into());
        self
    }

    /// Set the publications page id.
    pub fn with_publications_page(mut self, id: impl Into<String>) -> Self {
        self.publications_page_id = Some(id.into());
        self
    }

    /// Set the writing database id.
    pub fn with_writing_database(mut self, id: impl Into<String>) -> Self {
        self.writing_database_id = Some(id.into());
        self
    }

    /// Set the bookshelf database id.
    pub fn with_bookshelf_database(mut self, id: impl Into<String>) -> Self {
        self.bookshelf_database_id = Some(id.into());
        self
    }

    /// Set the property schema.
    pub fn with_schema(mut self, schema: PropertySchema) -> Self {
        self.schema = schema;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set fetch options.
    pub fn with_fetch_options(mut self, options: FetchOptions) -> Self {
        self.fetch = options;
        self
    }
}

/// Result of a page request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page exists and was rendered
    Found(RenderedPage),
    /// The page does not exist or its record is invalid
    NotFound,
}

impl PageOutcome {
    /// Check if the page was found.
    pub fn is_found(&self) -> bool {
        matches!(self, PageOutcome::Found(_))
    }

    /// Get the rendered page, if found.
    pub fn page(&self) -> Option<&RenderedPage> {
        match self {
            PageOutcome::Found(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }

    /// Convert into the rendered page, if found.
    pub fn into_page(self) -> Option<RenderedPage> {
        match self {
            PageOutcome::Found(page) => Some(page),
            PageOutcome::NotFound => None,
        }
    }
}

/// Title block shown above posts and book notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostHeader {
    /// Page title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Subtitle, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl PostHeader {
    /// Build a header from validated page properties.
    pub fn from_properties(properties: &PageProperties) -> Self {
        Self {
            title: properties.title.clone(),
            date: properties.published_date,
            subtitle: properties.subtitle.clone(),
        }
    }

    /// Date in long form, e.g. `March 9, 2024`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }

    /// Header as an HTML fragment.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"text-center mb-4\"><div class=\"text-2xl text-darkGray dark:text-darkText\">{}</div><div class=\"pt-2 text-sm text-gray-700 dark:text-gray-300\">{}</div></div>\n",
            encode_text(&self.title),
            self.formatted_date()
        )
    }
}

/// A rendered page with its optional header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    /// Header for posts and book notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<PostHeader>,

    /// Rendered body
    pub document: RenderedDocument,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderedPage {
    /// Page as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut output = self.header.as_ref().map(PostHeader::to_html).unwrap_or_default();
        output.push_str(&to_html(&self.document));
        output
    }

    /// Page as plain text.
    pub fn to_text(&self) -> String {
        let body = to_text(&self.document);
        match &self.header {
            Some(header) => format!("{}\n{}\n\n{}", header.title, header.formatted_date(), body)
                .trim_end()
                .to_string(),
            None => body,
        }
    }
}

/// Page loader over a content source.
pub struct Site<S> {
    source: S,
    config: SiteConfig,
}

impl<S: ContentSource> Site<S> {
    /// Create a site over `source`.
    pub fn new(source: S, config: SiteConfig) -> Self {
        Self { source, config }
    }

    /// Get the content source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the configuration.
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Render the experience page.
    pub fn experience(&self) -> Result<RenderedPage> {
        let page_id = required(&self.config.experience_page_id, "experience page id")?;
        self.page(page_id)
    }

    /// Render the publications page.
    pub fn publications(&self) -> Result<RenderedPage> {
        let page_id = required(&self.config.publications_page_id, "publications page id")?;
        self.page(page_id)
    }

    /// Render any page by id without a header or property validation.
    pub fn page(&self, page_id: &str) -> Result<RenderedPage> {
        self.render_page(page_id, None)
    }

    /// Render the post with a numeric id.
    pub fn post(&self, post_id: i64) -> Result<PageOutcome> {
        let database_id = required(&self.config.writing_database_id, "writing database id")?;
        let page_id = match fetch_page_id_by_field(
            &self.source,
            database_id,
            &self.config.schema.numeric_id,
            post_id,
        )? {
            Some(id) => id,
            None => {
                log::debug!("No post with id {}", post_id);
                return Ok(PageOutcome::NotFound);
            }
        };

        match fetch_page_properties(&self.source, &page_id, &self.config.schema)? {
            Some(properties) if properties.is_valid_post() => {
                let header = PostHeader::from_properties(&properties);
                Ok(PageOutcome::Found(self.render_page(&page_id, Some(header))?))
            }
            _ => Ok(PageOutcome::NotFound),
        }
    }

    /// Render the book notes with a slug.
    pub fn book_notes(&self, slug: &str) -> Result<PageOutcome> {
        let database_id = required(&self.config.bookshelf_database_id, "bookshelf database id")?;
        let page_id =
            match fetch_page_id_by_field(&self.source, database_id, &self.config.schema.slug, slug)? {
                Some(id) => id,
                None => {
                    log::debug!("No book notes with slug {}", slug);
                    return Ok(PageOutcome::NotFound);
                }
            };

        match fetch_page_properties(&self.source, &page_id, &self.config.schema)? {
            Some(properties) => {
                let header = PostHeader::from_properties(&properties);
                Ok(PageOutcome::Found(self.render_page(&page_id, Some(header))?))
            }
            None => Ok(PageOutcome::NotFound),
        }
    }

    /// List every valid post of the writing database in query order.
    pub fn posts(&self) -> Result<Vec<PostInfo>> {
        let database_id = required(&self.config.writing_database_id, "writing database id")?;
        let page_ids = self.source.query_database(database_id, None)?;

        let load = |page_id: &String| -> Result<Option<PostInfo>> {
            let properties = fetch_page_properties(&self.source, page_id, &self.config.schema)?;
            Ok(properties.and_then(|p| p.to_post_info()))
        };

        let posts: Vec<Option<PostInfo>> = if self.config.fetch.parallel {
            page_ids.par_iter().map(load).collect::<Result<_>>()?
        } else {
            page_ids.iter().map(load).collect::<Result<_>>()?
        };

        let posts: Vec<PostInfo> = posts.into_iter().flatten().collect();
        log::debug!("Listed {} of {} posts", posts.len(), page_ids.len());
        Ok(posts)
    }

    fn render_page(&self, page_id: &str, header: Option<PostHeader>) -> Result<RenderedPage> {
        let blocks = fetch_all_blocks(&self.source, page_id, &self.config.fetch)?;
        let (document, stats) = BlockRenderer::new(self.config.render.clone()).render_with_stats(&blocks);
        Ok(RenderedPage {
            header,
            document,
            stats,
        })
    }
}

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| Error::Config(format!("{} is not configured", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::SnapshotSource;
    use serde_json::{json, Value};

    fn post_record(title: &str, date: &str, post_id: Option<i64>) -> Value {
        let mut properties = json!({
            "Name": { "title": [{ "plain_text": title }] },
            "datePublished": { "date": { "start": date } }
        });
        if let Some(id) = post_id {
            properties["postId"] = json!({ "number": id });
        }
        json!({ "properties": properties })
    }

    fn site() -> Site<SnapshotSource> {
        let source = SnapshotSource::new()
            .with_page("p1", post_record("First", "2024-03-09", Some(1)))
            .with_page("p2", post_record("Draft", "2024-04-01", None))
            .with_page("p3", json!({ "properties": {} }))
            .with_children(
                "p1",
                vec![json!({
                    "id": "b1",
                    "type": "paragraph",
                    "paragraph": { "rich_text": [{ "plain_text": "Hello" }] }
                })],
            )
            .with_database("writing", vec!["p1".into(), "p2".into(), "p3".into()]);
        let config = SiteConfig::new()
            .with_writing_database("writing")
            .with_experience_page("p1");
        Site::new(source, config)
    }

    #[test]
    fn test_post_found() {
        let outcome = site().post(1).unwrap();
        let page = outcome.page().unwrap();
        let header = page.header.as_ref().unwrap();
        assert_eq!(header.title, "First");
        assert_eq!(header.formatted_date(), "March 9, 2024");
        assert_eq!(page.document.len(), 1);
    }

    #[test]
    fn test_post_not_found() {
        assert_eq!(site().post(42).unwrap(), PageOutcome::NotFound);
    }

    #[test]
    fn test_posts_skip_invalid() {
        let posts = site().posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post_id, 1);
    }

    #[test]
    fn test_unconfigured_database() {
        let err = site().book_notes("dune").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(site().publications().is_err());
    }

    #[test]
    fn test_static_page_has_no_header() {
        let page = site().experience().unwrap();
        assert!(page.header.is_none());
        assert_eq!(page.to_text(), "Hello");
    }
}
