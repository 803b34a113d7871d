//! Rendering result with statistics.

use serde::{Deserialize, Serialize};

/// Result of rendering a block sequence, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (HTML, text or JSON)
    pub content: String,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: RenderStats) -> Self {
        Self { content, stats }
    }

    /// Create a simple result with just content.
    pub fn content_only(content: String) -> Self {
        Self {
            content,
            stats: RenderStats::default(),
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Blocks in the input sequence
    pub block_count: u32,

    /// Paragraphs rendered, line breaks included
    pub paragraph_count: u32,

    /// Headings rendered
    pub heading_count: u32,

    /// Numbered and bulleted items rendered
    pub list_item_count: u32,

    /// Dividers rendered
    pub divider_count: u32,

    /// Tables rendered
    pub table_count: u32,

    /// Rows absorbed into tables
    pub table_row_count: u32,

    /// Tables taller than the visible rows
    pub scrollable_table_count: u32,

    /// Blocks that rendered nothing (unknown kinds, stray rows)
    pub skipped_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Number of blocks that produced output.
    pub fn rendered_count(&self) -> u32 {
        self.paragraph_count
            + self.heading_count
            + self.list_item_count
            + self.divider_count
            + self.table_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.block_count += other.block_count;
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.list_item_count += other.list_item_count;
        self.divider_count += other.divider_count;
        self.table_count += other.table_count;
        self.table_row_count += other.table_row_count;
        self.scrollable_table_count += other.scrollable_table_count;
        self.skipped_count += other.skipped_count;
        self.word_count += other.word_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("Joined the lab as a  research engineer.");
        assert_eq!(stats.word_count, 7);
    }

    #[test]
    fn test_render_stats_merge() {
        let mut stats1 = RenderStats::new();
        stats1.paragraph_count = 5;
        stats1.table_count = 2;

        let stats2 = RenderStats {
            paragraph_count: 3,
            table_count: 1,
            divider_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.table_count, 3);
        assert_eq!(stats1.divider_count, 4);
        assert_eq!(stats1.rendered_count(), 15);
    }

    #[test]
    fn test_render_result_content_only() {
        let result = RenderResult::content_only("<br />".to_string());
        assert_eq!(result.content_len(), 6);
        assert_eq!(result.stats.paragraph_count, 0);
    }
}
