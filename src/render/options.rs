//! Rendering options and configuration.

use crate::model::NEWS_SECTION_LABEL;

use super::RowMetrics;

/// Rows a table shows before it starts scrolling.
pub const DEFAULT_VISIBLE_ROWS: usize = 3;

/// Options for rendering block sequences.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text of the level-3 heading that opens the news section
    pub news_label: String,

    /// Rows shown before a table scrolls (at least 1)
    pub visible_table_rows: usize,

    /// Glyph for bulleted list items
    pub bullet: char,

    /// Row geometry for the height cap; `None` renders tables uncapped
    pub row_metrics: Option<RowMetrics>,

    /// Collect rendering statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the news section label.
    pub fn with_news_label(mut self, label: impl Into<String>) -> Self {
        self.news_label = label.into();
        self
    }

    /// Set the number of visible table rows.
    pub fn with_visible_rows(mut self, rows: usize) -> Self {
        self.visible_table_rows = rows.max(1);
        self
    }

    /// Set the bullet glyph.
    pub fn with_bullet(mut self, bullet: char) -> Self {
        self.bullet = bullet;
        self
    }

    /// Set the row geometry used for the height cap.
    pub fn with_row_metrics(mut self, metrics: RowMetrics) -> Self {
        self.row_metrics = Some(metrics);
        self
    }

    /// Render tables without measuring rows.
    pub fn unmeasured(mut self) -> Self {
        self.row_metrics = None;
        self
    }

    /// Enable statistics collection during rendering.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            news_label: NEWS_SECTION_LABEL.to_string(),
            visible_table_rows: DEFAULT_VISIBLE_ROWS,
            bullet: '•',
            row_metrics: Some(RowMetrics::default()),
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_news_label("Updates")
            .with_visible_rows(0)
            .with_bullet('-')
            .unmeasured();

        assert_eq!(options.news_label, "Updates");
        assert_eq!(options.visible_table_rows, 1);
        assert_eq!(options.bullet, '-');
        assert!(options.row_metrics.is_none());
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.news_label, "Recent News");
        assert_eq!(options.visible_table_rows, 3);
        assert!(options.row_metrics.is_some());
        assert!(!options.collect_stats);
    }
}
