//! Content block types.

use super::TextRun;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single content block as delivered by the content source.
///
/// Blocks form a flat, ordered sequence. Nested children are spliced in
/// directly after their parent, and table rows follow their table as
/// siblings rather than living inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Stable identity string
    pub id: String,

    /// Whether the raw record had descendants when it was fetched
    #[serde(default)]
    pub has_children: bool,

    /// Variant payload
    #[serde(flatten)]
    pub content: BlockContent,
}

impl Block {
    /// Create a block with the given id and content.
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            content,
        }
    }

    /// Create a paragraph block.
    pub fn paragraph(id: impl Into<String>, text: Vec<TextRun>) -> Self {
        Self::new(id, BlockContent::Paragraph { text })
    }

    /// Create a heading block.
    pub fn heading(id: impl Into<String>, level: HeadingLevel, text: Vec<TextRun>) -> Self {
        Self::new(id, BlockContent::Heading { level, text })
    }

    /// Create a numbered list item block.
    pub fn numbered(id: impl Into<String>, text: Vec<TextRun>) -> Self {
        Self::new(id, BlockContent::NumberedListItem { text })
    }

    /// Create a bulleted list item block.
    pub fn bulleted(id: impl Into<String>, text: Vec<TextRun>) -> Self {
        Self::new(id, BlockContent::BulletedListItem { text })
    }

    /// Create a divider block.
    pub fn divider(id: impl Into<String>) -> Self {
        Self::new(id, BlockContent::Divider)
    }

    /// Create a table marker block.
    pub fn table(id: impl Into<String>, info: TableInfo) -> Self {
        let mut block = Self::new(id, BlockContent::Table(info));
        block.has_children = true;
        block
    }

    /// Create a table row block.
    pub fn table_row(id: impl Into<String>, cells: Vec<Vec<TextRun>>) -> Self {
        Self::new(id, BlockContent::TableRow { cells })
    }

    /// Create a placeholder for a block kind the renderer does not know.
    pub fn unsupported(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::new(id, BlockContent::Unsupported { kind: kind.into() })
    }

    /// Set the `has_children` flag and return self.
    pub fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    /// Get the discriminant of this block.
    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Get the text runs of a text-bearing block.
    pub fn text(&self) -> Option<&[TextRun]> {
        match &self.content {
            BlockContent::Paragraph { text }
            | BlockContent::Heading { text, .. }
            | BlockContent::NumberedListItem { text }
            | BlockContent::BulletedListItem { text } => Some(text),
            _ => None,
        }
    }

    /// Get the plain text of a text-bearing block.
    pub fn plain_text(&self) -> String {
        self.text().map(super::plain_text).unwrap_or_default()
    }

    /// Get the heading level, if this block is a heading.
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        match &self.content {
            BlockContent::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self.content, BlockContent::Paragraph { .. })
    }

    /// Check if this block is a heading of the given level.
    pub fn is_heading(&self, level: HeadingLevel) -> bool {
        self.heading_level() == Some(level)
    }

    /// Check if this block is a heading of any level.
    pub fn is_heading_any(&self) -> bool {
        self.heading_level().is_some()
    }

    /// Check if this block is a numbered list item.
    pub fn is_numbered_list_item(&self) -> bool {
        matches!(self.content, BlockContent::NumberedListItem { .. })
    }

    /// Check if this block is a bulleted list item.
    pub fn is_bulleted_list_item(&self) -> bool {
        matches!(self.content, BlockContent::BulletedListItem { .. })
    }

    /// Check if this block is a divider.
    pub fn is_divider(&self) -> bool {
        matches!(self.content, BlockContent::Divider)
    }

    /// Check if this block is a table marker.
    pub fn is_table(&self) -> bool {
        matches!(self.content, BlockContent::Table(_))
    }

    /// Check if this block is a table row.
    pub fn is_table_row(&self) -> bool {
        matches!(self.content, BlockContent::TableRow { .. })
    }

    /// Check if this block is any kind the renderer understands.
    pub fn is_text_block(&self) -> bool {
        !matches!(self.content, BlockContent::Unsupported { .. })
    }
}

/// Variant payload of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    /// A paragraph; zero runs means an intentionally blank line
    Paragraph {
        /// Text runs
        text: Vec<TextRun>,
    },

    /// A heading of level 1 to 4
    Heading {
        /// Heading level
        level: HeadingLevel,
        /// Text runs
        text: Vec<TextRun>,
    },

    /// An item of a numbered list
    NumberedListItem {
        /// Text runs
        text: Vec<TextRun>,
    },

    /// An item of a bulleted list
    BulletedListItem {
        /// Text runs
        text: Vec<TextRun>,
    },

    /// A horizontal rule
    Divider,

    /// A table marker; its rows follow as sibling blocks
    Table(TableInfo),

    /// One row of the preceding table
    TableRow {
        /// Cells, each an ordered sequence of runs
        cells: Vec<Vec<TextRun>>,
    },

    /// Any other or malformed record
    Unsupported {
        /// The raw kind string, empty when the record had none
        kind: String,
    },
}

impl BlockContent {
    /// Get the discriminant of this content.
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Paragraph { .. } => BlockKind::Paragraph,
            BlockContent::Heading { level, .. } => BlockKind::Heading(*level),
            BlockContent::NumberedListItem { .. } => BlockKind::NumberedListItem,
            BlockContent::BulletedListItem { .. } => BlockKind::BulletedListItem,
            BlockContent::Divider => BlockKind::Divider,
            BlockContent::Table(_) => BlockKind::Table,
            BlockContent::TableRow { .. } => BlockKind::TableRow,
            BlockContent::Unsupported { .. } => BlockKind::Unsupported,
        }
    }
}

/// Table marker payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Declared number of columns
    pub column_count: u32,

    /// Whether the first row is a column header
    #[serde(default)]
    pub has_column_header: bool,

    /// Whether the first column is a row header
    #[serde(default)]
    pub has_row_header: bool,
}

impl TableInfo {
    /// Create table info with the given column count.
    pub fn new(column_count: u32) -> Self {
        Self {
            column_count,
            ..Default::default()
        }
    }
}

/// Block discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading(HeadingLevel),
    NumberedListItem,
    BulletedListItem,
    Divider,
    Table,
    TableRow,
    Unsupported,
}

impl BlockKind {
    /// Map a backend type string to a kind.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "paragraph" => BlockKind::Paragraph,
            "heading_1" => BlockKind::Heading(HeadingLevel::H1),
            "heading_2" => BlockKind::Heading(HeadingLevel::H2),
            "heading_3" => BlockKind::Heading(HeadingLevel::H3),
            "heading_4" => BlockKind::Heading(HeadingLevel::H4),
            "numbered_list_item" => BlockKind::NumberedListItem,
            "bulleted_list_item" => BlockKind::BulletedListItem,
            "divider" => BlockKind::Divider,
            "table" => BlockKind::Table,
            "table_row" => BlockKind::TableRow,
            _ => BlockKind::Unsupported,
        }
    }

    /// Get the backend type string, `None` for unsupported kinds.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            BlockKind::Paragraph => Some("paragraph"),
            BlockKind::Heading(HeadingLevel::H1) => Some("heading_1"),
            BlockKind::Heading(HeadingLevel::H2) => Some("heading_2"),
            BlockKind::Heading(HeadingLevel::H3) => Some("heading_3"),
            BlockKind::Heading(HeadingLevel::H4) => Some("heading_4"),
            BlockKind::NumberedListItem => Some("numbered_list_item"),
            BlockKind::BulletedListItem => Some("bulleted_list_item"),
            BlockKind::Divider => Some("divider"),
            BlockKind::Table => Some("table"),
            BlockKind::TableRow => Some("table_row"),
            BlockKind::Unsupported => None,
        }
    }
}

/// Heading level. Level 1 is the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// All levels, largest first.
    pub const ALL: [HeadingLevel; 4] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
    ];

    /// Numeric level (1-4).
    pub fn number(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
        }
    }

    /// Get the level for a number, `None` outside 1-4.
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            _ => None,
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.number()
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        HeadingLevel::from_number(level).ok_or_else(|| format!("invalid heading level {}", level))
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.number())
    }
}
