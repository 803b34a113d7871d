//! Rendered document types.
//!
//! A [`RenderedDocument`] is the output of the block renderer: one unit
//! per visible block, with every contextual decision (margins, numbering,
//! divider spacing, table height cap) already made. Writers in this module
//! tree only serialize it.

use serde::Serialize;

use crate::model::{HeadingLevel, TextStyle};

/// The rendered form of a block sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedDocument {
    /// Rendered units in document order
    pub blocks: Vec<RenderedBlock>,
}

impl RenderedDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rendered units.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if nothing was rendered.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over rendered units.
    pub fn iter(&self) -> std::slice::Iter<'_, RenderedBlock> {
        self.blocks.iter()
    }

    /// All rendered tables.
    pub fn tables(&self) -> impl Iterator<Item = &RenderedBlock> {
        self.blocks.iter().filter(|b| b.is_table())
    }
}

impl<'a> IntoIterator for &'a RenderedDocument {
    type Item = &'a RenderedBlock;
    type IntoIter = std::slice::Iter<'a, RenderedBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// One rendered unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedBlock {
    /// An empty paragraph
    LineBreak {
        /// Source block id
        block_id: String,
    },

    /// A paragraph of runs
    Paragraph {
        /// Source block id
        block_id: String,
        /// Trailing margin
        margin: ParagraphMargin,
        /// Rendered runs
        runs: Vec<RenderedRun>,
    },

    /// A heading
    Heading {
        /// Source block id
        block_id: String,
        /// Heading level
        level: HeadingLevel,
        /// Top margin in spacing units, 0 for the first block
        top_margin: u8,
        /// Rendered runs
        runs: Vec<RenderedRun>,
    },

    /// An item of a numbered list
    NumberedItem {
        /// Source block id
        block_id: String,
        /// 1-based position within the current run of items
        number: u32,
        /// Rendered runs
        runs: Vec<RenderedRun>,
    },

    /// An item of a bulleted list
    BulletedItem {
        /// Source block id
        block_id: String,
        /// Bullet glyph
        bullet: char,
        /// Rendered runs
        runs: Vec<RenderedRun>,
    },

    /// A horizontal rule
    Divider {
        /// Source block id
        block_id: String,
        /// Vertical spacing around the rule
        spacing: DividerSpacing,
    },

    /// A table with its collected rows
    Table {
        /// Source block id of the table marker
        block_id: String,
        /// Rows in order
        rows: Vec<RenderedRow>,
        /// Rows shown before scrolling
        visible_rows: usize,
        /// Whether the grid scrolls vertically
        scrollable: bool,
        /// Height cap in pixels; `None` means natural height
        max_height: Option<f32>,
    },
}

impl RenderedBlock {
    /// Id of the source block.
    pub fn block_id(&self) -> &str {
        match self {
            RenderedBlock::LineBreak { block_id }
            | RenderedBlock::Paragraph { block_id, .. }
            | RenderedBlock::Heading { block_id, .. }
            | RenderedBlock::NumberedItem { block_id, .. }
            | RenderedBlock::BulletedItem { block_id, .. }
            | RenderedBlock::Divider { block_id, .. }
            | RenderedBlock::Table { block_id, .. } => block_id,
        }
    }

    /// Runs of a text-bearing unit.
    pub fn runs(&self) -> &[RenderedRun] {
        match self {
            RenderedBlock::Paragraph { runs, .. }
            | RenderedBlock::Heading { runs, .. }
            | RenderedBlock::NumberedItem { runs, .. }
            | RenderedBlock::BulletedItem { runs, .. } => runs,
            _ => &[],
        }
    }

    /// Concatenated text of a text-bearing unit.
    pub fn plain_text(&self) -> String {
        self.runs().iter().map(|r| r.text.as_str()).collect()
    }

    /// List marker text (`"3. "` or `"• "`), if this is a list item.
    pub fn marker(&self) -> Option<String> {
        match self {
            RenderedBlock::NumberedItem { number, .. } => Some(format!("{}. ", number)),
            RenderedBlock::BulletedItem { bullet, .. } => Some(format!("{} ", bullet)),
            _ => None,
        }
    }

    /// Check if this is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, RenderedBlock::Table { .. })
    }
}

/// A rendered text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRun {
    /// Identity key, unique enough to diff run lists
    pub key: String,

    /// Text, possibly empty
    pub text: String,

    /// Combined style flags
    pub style: TextStyle,

    /// Activation target when the run is a link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
}

impl RenderedRun {
    /// Check if the run renders nothing visible.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A link that opens in a new browsing context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkTarget {
    /// Target URL
    pub href: String,

    /// Accessible label derived from the target
    pub aria_label: String,
}

impl LinkTarget {
    /// Create a link target for `href`.
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        Self {
            aria_label: format!("{} link", href),
            href,
        }
    }
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedRow {
    /// Source block id of the row
    pub block_id: String,

    /// Cells in order
    pub cells: Vec<RenderedCell>,
}

impl RenderedRow {
    /// Plain text of every cell.
    pub fn cell_texts(&self) -> Vec<String> {
        self.cells.iter().map(RenderedCell::plain_text).collect()
    }
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCell {
    /// Rendered runs
    pub runs: Vec<RenderedRun>,

    /// Whether the cell is in the row label column
    pub is_label: bool,
}

impl RenderedCell {
    /// Concatenated text of the cell.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Trailing margin of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphMargin {
    /// Paragraph introduces a numbered list
    Tight,
    /// Any other paragraph
    Standard,
}

impl ParagraphMargin {
    /// Margin in spacing units.
    pub fn units(self) -> u8 {
        match self {
            ParagraphMargin::Tight => 2,
            ParagraphMargin::Standard => 3,
        }
    }
}

/// Vertical spacing around a divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerSpacing {
    /// Inside the news section (largest)
    News,
    /// After some heading (smallest)
    Section,
    /// No heading precedes the divider
    Default,
}

impl DividerSpacing {
    /// Spacing in units.
    pub fn units(self) -> u8 {
        match self {
            DividerSpacing::News => 48,
            DividerSpacing::Section => 6,
            DividerSpacing::Default => 8,
        }
    }
}

/// Top margin of a heading that is not the first block.
pub fn heading_top_margin(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 12,
        HeadingLevel::H2 => 10,
        HeadingLevel::H3 => 8,
        HeadingLevel::H4 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_order() {
        assert!(DividerSpacing::News.units() > DividerSpacing::Default.units());
        assert!(DividerSpacing::Default.units() > DividerSpacing::Section.units());
        assert!(ParagraphMargin::Tight.units() < ParagraphMargin::Standard.units());
    }

    #[test]
    fn test_heading_margins_decrease() {
        let margins: Vec<u8> = HeadingLevel::ALL.iter().map(|l| heading_top_margin(*l)).collect();
        assert!(margins.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_link_target_label() {
        let link = LinkTarget::new("https://example.com");
        assert_eq!(link.aria_label, "https://example.com link");
    }

    #[test]
    fn test_markers() {
        let numbered = RenderedBlock::NumberedItem {
            block_id: "n".into(),
            number: 3,
            runs: vec![],
        };
        assert_eq!(numbered.marker().as_deref(), Some("3. "));

        let divider = RenderedBlock::Divider {
            block_id: "d".into(),
            spacing: DividerSpacing::Default,
        };
        assert_eq!(divider.marker(), None);
        assert_eq!(divider.block_id(), "d");
    }
}
