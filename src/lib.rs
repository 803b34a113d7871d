//! # textblob
//!
//! Content-block renderer for a personal website backed by a Notion-style
//! content database.
//!
//! Pages arrive as flat sequences of typed blocks (paragraphs, headings,
//! list items, dividers, tables and their rows). This library decodes
//! them, interprets the sequence with its context-dependent rules and
//! writes the result as HTML, plain text or JSON.
//!
//! ## Quick Start
//!
//! ```no_run
//! use textblob::{parse_blocks_json, render};
//!
//! fn main() -> textblob::Result<()> {
//!     let json = std::fs::read_to_string("blocks.json")?;
//!     let blocks = parse_blocks_json(&json)?;
//!
//!     let doc = render::render_blocks(&blocks);
//!     println!("{}", render::to_html(&doc));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Sequence-aware rendering**: list numbering, margins that look ahead,
//!   divider spacing by enclosing section, tables that absorb their rows
//! - **Multiple output formats**: HTML, plain text, JSON
//! - **Content sources**: a [`fetch::ContentSource`] trait with pagination
//!   and depth-first child splicing, plus an offline JSON snapshot source
//! - **Parallel fetching**: uses Rayon to resolve sibling children
//! - **Site pages**: posts, book notes and static pages with not-found
//!   handling

pub mod error;
pub mod fetch;
pub mod model;
pub mod parser;
pub mod render;
pub mod site;

// Re-export commonly used types
pub use error::{Error, Result};
pub use fetch::{ContentSource, ErrorMode, FetchOptions, SnapshotSource};
pub use model::{
    Block, BlockContent, BlockKind, HeadingLevel, PageProperties, PostInfo, PropertySchema,
    TableInfo, TextRun, TextStyle,
};
pub use parser::{parse_block, parse_blocks, parse_blocks_json};
pub use render::{
    JsonFormat, RenderOptions, RenderResult, RenderStats, RenderedBlock, RenderedDocument,
    RowMetrics,
};
pub use site::{PageOutcome, RenderedPage, Site, SiteConfig};

use std::path::Path;

/// Render a block sequence to an HTML fragment.
///
/// # Example
///
/// ```
/// use textblob::{render_html, Block, TextRun};
///
/// let html = render_html(&[Block::paragraph("p", vec![TextRun::new("Hi")])]);
/// assert_eq!(html, "<div class=\"mb-3\"><span>Hi</span></div>\n");
/// ```
pub fn render_html(blocks: &[Block]) -> String {
    render::to_html(&render::render_blocks(blocks))
}

/// Render a block sequence to plain text.
pub fn render_text(blocks: &[Block]) -> String {
    render::to_text(&render::render_blocks(blocks))
}

/// Render a block sequence to JSON.
pub fn render_json(blocks: &[Block], format: JsonFormat) -> Result<String> {
    render::to_json(&render::render_blocks(blocks), format)
}

/// Load a JSON file of raw block records and render it to HTML.
///
/// # Example
///
/// ```no_run
/// use textblob::to_html;
///
/// let html = to_html("blocks.json").unwrap();
/// std::fs::write("page.html", html).unwrap();
/// ```
pub fn to_html<P: AsRef<Path>>(path: P) -> Result<String> {
    let json = std::fs::read_to_string(path)?;
    Ok(render_html(&parse_blocks_json(&json)?))
}

/// Builder for fetching and rendering block sequences.
///
/// # Example
///
/// ```no_run
/// use textblob::{SnapshotSource, TextBlob};
///
/// let source = SnapshotSource::from_path("content.json")?;
/// let html = TextBlob::new()
///     .with_visible_rows(5)
///     .sequential()
///     .fetch(&source, "experience")?
///     .to_html();
/// # Ok::<(), textblob::Error>(())
/// ```
pub struct TextBlob {
    fetch_options: FetchOptions,
    render_options: RenderOptions,
}

impl TextBlob {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            fetch_options: FetchOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Fail on the first source error instead of truncating.
    pub fn strict(mut self) -> Self {
        self.fetch_options = self.fetch_options.strict();
        self
    }

    /// Disable parallel child resolution.
    pub fn sequential(mut self) -> Self {
        self.fetch_options = self.fetch_options.sequential();
        self
    }

    /// Set maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.fetch_options = self.fetch_options.with_max_depth(depth);
        self
    }

    /// Set the news section label.
    pub fn with_news_label(mut self, label: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_news_label(label);
        self
    }

    /// Set the number of visible table rows.
    pub fn with_visible_rows(mut self, rows: usize) -> Self {
        self.render_options = self.render_options.with_visible_rows(rows);
        self
    }

    /// Set the row geometry used for table height caps.
    pub fn with_row_metrics(mut self, metrics: RowMetrics) -> Self {
        self.render_options = self.render_options.with_row_metrics(metrics);
        self
    }

    /// Render tables without a height cap.
    pub fn unmeasured(mut self) -> Self {
        self.render_options = self.render_options.unmeasured();
        self
    }

    /// Render an already fetched block sequence.
    pub fn render(&self, blocks: &[Block]) -> TextBlobResult {
        let (document, stats) =
            render::BlockRenderer::new(self.render_options.clone()).render_with_stats(blocks);
        TextBlobResult { document, stats }
    }

    /// Decode raw block records from JSON and render them.
    pub fn render_json_str(&self, json: &str) -> Result<TextBlobResult> {
        let blocks = parse_blocks_json(json)?;
        Ok(self.render(&blocks))
    }

    /// Fetch the block sequence of a page and render it.
    pub fn fetch<S: ContentSource + ?Sized>(&self, source: &S, page_id: &str) -> Result<TextBlobResult> {
        let blocks = fetch::fetch_all_blocks(source, page_id, &self.fetch_options)?;
        Ok(self.render(&blocks))
    }
}

impl Default for TextBlob {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of rendering a block sequence.
pub struct TextBlobResult {
    /// The rendered document
    pub document: RenderedDocument,
    /// Statistics collected while rendering
    stats: RenderStats,
}

impl TextBlobResult {
    /// Convert to HTML.
    pub fn to_html(&self) -> String {
        render::to_html(&self.document)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Convert to HTML with statistics.
    pub fn to_html_with_stats(&self) -> RenderResult {
        RenderResult::new(self.to_html(), self.stats.clone())
    }

    /// Get rendering statistics.
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Get the document.
    pub fn document(&self) -> &RenderedDocument {
        &self.document
    }
}
