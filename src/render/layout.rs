//! Block sequence interpretation.
//!
//! [`BlockRenderer`] walks the flat block sequence once and makes every
//! context-dependent decision: paragraph margins look one block ahead,
//! list numbers and divider spacing look back, and tables absorb the rows
//! that follow them.

use crate::model::{Block, BlockContent, HeadingLevel, SectionIndex, TextRun};

use super::measure::{height_cap, RowMeasure, Unmeasured};
use super::{
    heading_top_margin, DividerSpacing, LinkTarget, ParagraphMargin, RenderOptions,
    RenderedBlock, RenderedCell, RenderedDocument, RenderedRow, RenderedRun, RenderStats,
};

/// Render a block sequence with default options.
pub fn render_blocks(blocks: &[Block]) -> RenderedDocument {
    BlockRenderer::new(RenderOptions::default()).render(blocks)
}

/// Render a block sequence with custom options.
pub fn render_blocks_with_options(blocks: &[Block], options: &RenderOptions) -> RenderedDocument {
    BlockRenderer::new(options.clone()).render(blocks)
}

/// Divider spacing for the block at `idx`.
///
/// News spacing wins over section spacing, which wins over the default.
pub fn divider_spacing(sections: &SectionIndex, idx: usize) -> DividerSpacing {
    if sections.is_in_news_section(idx) {
        DividerSpacing::News
    } else if sections.is_section_divider(idx) {
        DividerSpacing::Section
    } else {
        DividerSpacing::Default
    }
}

/// Identity key of a run within its block.
pub fn run_key(block_id: &str, run: &TextRun) -> String {
    match &run.link {
        Some(href) => format!("{}-{}-{}", block_id, href, run.text),
        None => format!("{}-{}", block_id, run.text),
    }
}

/// Block sequence renderer.
pub struct BlockRenderer {
    options: RenderOptions,
    measure: Option<Box<dyn RowMeasure>>,
    stats: RenderStats,
}

impl BlockRenderer {
    /// Create a new renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            measure: None,
            stats: RenderStats::new(),
        }
    }

    /// Use a custom row measurer instead of the configured row metrics.
    pub fn with_measure(mut self, measure: impl RowMeasure + 'static) -> Self {
        self.measure = Some(Box::new(measure));
        self
    }

    /// Render a block sequence.
    pub fn render(mut self, blocks: &[Block]) -> RenderedDocument {
        self.render_internal(blocks)
    }

    /// Render a block sequence and collect statistics.
    pub fn render_with_stats(mut self, blocks: &[Block]) -> (RenderedDocument, RenderStats) {
        self.options.collect_stats = true;
        let document = self.render_internal(blocks);
        (document, self.stats)
    }

    fn render_internal(&mut self, blocks: &[Block]) -> RenderedDocument {
        let sections = SectionIndex::build(blocks, &self.options.news_label);
        let mut output = Vec::with_capacity(blocks.len());

        let mut list_number = 0u32;
        // Rows before this index were absorbed by a table
        let mut consumed_until = 0usize;

        if self.options.collect_stats {
            self.stats.block_count += blocks.len() as u32;
        }

        for (idx, block) in blocks.iter().enumerate() {
            if block.is_numbered_list_item() {
                list_number += 1;
            } else {
                list_number = 0;
            }

            if idx < consumed_until {
                continue;
            }

            let rendered = match &block.content {
                BlockContent::Paragraph { text } => {
                    Some(self.render_paragraph(block, text, blocks.get(idx + 1)))
                }
                BlockContent::Heading { level, text } => {
                    Some(self.render_heading(block, *level, text, idx == 0))
                }
                BlockContent::NumberedListItem { text } => {
                    self.count_list_item(text);
                    Some(RenderedBlock::NumberedItem {
                        block_id: block.id.clone(),
                        number: list_number,
                        runs: render_runs(&block.id, text),
                    })
                }
                BlockContent::BulletedListItem { text } => {
                    self.count_list_item(text);
                    Some(RenderedBlock::BulletedItem {
                        block_id: block.id.clone(),
                        bullet: self.options.bullet,
                        runs: render_runs(&block.id, text),
                    })
                }
                BlockContent::Divider => {
                    if self.options.collect_stats {
                        self.stats.divider_count += 1;
                    }
                    Some(RenderedBlock::Divider {
                        block_id: block.id.clone(),
                        spacing: divider_spacing(&sections, idx),
                    })
                }
                BlockContent::Table(_) => {
                    let rows: Vec<&Block> = blocks[idx + 1..]
                        .iter()
                        .take_while(|b| b.is_table_row())
                        .collect();
                    consumed_until = idx + 1 + rows.len();
                    Some(self.render_table(block, &rows))
                }
                BlockContent::TableRow { .. } => {
                    log::debug!("Skipping table row {} outside a table", block.id);
                    self.count_skipped();
                    None
                }
                BlockContent::Unsupported { kind } => {
                    log::debug!("Skipping unsupported block {} ({})", block.id, kind);
                    self.count_skipped();
                    None
                }
            };

            output.extend(rendered);
        }

        RenderedDocument { blocks: output }
    }

    fn render_paragraph(
        &mut self,
        block: &Block,
        text: &[TextRun],
        next: Option<&Block>,
    ) -> RenderedBlock {
        if self.options.collect_stats {
            self.stats.paragraph_count += 1;
        }

        if text.is_empty() {
            return RenderedBlock::LineBreak {
                block_id: block.id.clone(),
            };
        }

        self.count_runs(text);
        let margin = if next.is_some_and(Block::is_numbered_list_item) {
            ParagraphMargin::Tight
        } else {
            ParagraphMargin::Standard
        };

        RenderedBlock::Paragraph {
            block_id: block.id.clone(),
            margin,
            runs: render_runs(&block.id, text),
        }
    }

    fn render_heading(
        &mut self,
        block: &Block,
        level: HeadingLevel,
        text: &[TextRun],
        is_first: bool,
    ) -> RenderedBlock {
        if self.options.collect_stats {
            self.stats.heading_count += 1;
        }
        self.count_runs(text);

        RenderedBlock::Heading {
            block_id: block.id.clone(),
            level,
            top_margin: if is_first { 0 } else { heading_top_margin(level) },
            runs: render_runs(&block.id, text),
        }
    }

    fn render_table(&mut self, block: &Block, rows: &[&Block]) -> RenderedBlock {
        let rows: Vec<RenderedRow> = rows.iter().map(|row| render_row(row)).collect();
        let visible = self.options.visible_table_rows.max(1);
        let scrollable = rows.len() > visible;

        let max_height = match (&self.measure, &self.options.row_metrics) {
            (Some(measure), _) => height_cap(&rows, visible, &**measure),
            (None, Some(metrics)) => height_cap(&rows, visible, metrics),
            (None, None) => height_cap(&rows, visible, &Unmeasured),
        };

        if self.options.collect_stats {
            self.stats.table_count += 1;
            self.stats.table_row_count += rows.len() as u32;
            if scrollable {
                self.stats.scrollable_table_count += 1;
            }
            for row in &rows {
                for text in row.cell_texts() {
                    self.stats.count_text(&text);
                }
            }
        }

        RenderedBlock::Table {
            block_id: block.id.clone(),
            rows,
            visible_rows: visible,
            scrollable,
            max_height,
        }
    }

    fn count_list_item(&mut self, text: &[TextRun]) {
        if self.options.collect_stats {
            self.stats.list_item_count += 1;
        }
        self.count_runs(text);
    }

    fn count_runs(&mut self, text: &[TextRun]) {
        if self.options.collect_stats {
            for run in text {
                self.stats.count_text(&run.text);
            }
        }
    }

    fn count_skipped(&mut self) {
        if self.options.collect_stats {
            self.stats.skipped_count += 1;
        }
    }
}

fn render_runs(block_id: &str, runs: &[TextRun]) -> Vec<RenderedRun> {
    runs.iter()
        .map(|run| RenderedRun {
            key: run_key(block_id, run),
            text: run.text.clone(),
            style: run.style,
            link: run.link.as_deref().map(LinkTarget::new),
        })
        .collect()
}

fn render_row(row: &Block) -> RenderedRow {
    let cells = match &row.content {
        BlockContent::TableRow { cells } => cells
            .iter()
            .enumerate()
            .map(|(i, runs)| RenderedCell {
                runs: render_runs(&row.id, runs),
                is_label: i == 0,
            })
            .collect(),
        _ => Vec::new(),
    };
    RenderedRow {
        block_id: row.id.clone(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableInfo, TextStyle};

    fn para(id: &str, text: &str) -> Block {
        Block::paragraph(id, vec![TextRun::new(text)])
    }

    fn row(id: &str) -> Block {
        Block::table_row(id, vec![vec![TextRun::new("2023")], vec![TextRun::new(id)]])
    }

    fn table_with_rows(n: usize) -> Vec<Block> {
        let mut blocks = vec![Block::table("t", TableInfo::new(2))];
        blocks.extend((0..n).map(|i| row(&format!("r{}", i))));
        blocks
    }

    #[test]
    fn test_numbered_counter_resets() {
        let blocks = vec![
            Block::numbered("a", vec![TextRun::new("A")]),
            Block::numbered("b", vec![TextRun::new("B")]),
            para("p", "between"),
            Block::numbered("c", vec![TextRun::new("C")]),
        ];
        let doc = render_blocks(&blocks);
        let numbers: Vec<u32> = doc
            .iter()
            .filter_map(|b| match b {
                RenderedBlock::NumberedItem { number, .. } => Some(*number),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec![1, 2, 1]);
    }

    #[test]
    fn test_counter_resets_on_unsupported_block() {
        let blocks = vec![
            Block::numbered("a", vec![TextRun::new("A")]),
            Block::unsupported("x", "image"),
            Block::numbered("b", vec![TextRun::new("B")]),
        ];
        let doc = render_blocks(&blocks);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.blocks[1].marker().as_deref(), Some("1. "));
    }

    #[test]
    fn test_paragraph_margin_before_numbered_list() {
        let blocks = vec![
            para("p1", "intro"),
            Block::numbered("n", vec![TextRun::new("A")]),
            para("p2", "outro"),
        ];
        let doc = render_blocks(&blocks);
        assert!(matches!(
            doc.blocks[0],
            RenderedBlock::Paragraph { margin: ParagraphMargin::Tight, .. }
        ));
        assert!(matches!(
            doc.blocks[2],
            RenderedBlock::Paragraph { margin: ParagraphMargin::Standard, .. }
        ));
    }

    #[test]
    fn test_empty_paragraph_is_line_break() {
        let doc = render_blocks(&[Block::paragraph("p", vec![])]);
        assert_eq!(
            doc.blocks,
            vec![RenderedBlock::LineBreak { block_id: "p".to_string() }]
        );
    }

    #[test]
    fn test_first_heading_has_no_top_margin() {
        let blocks = vec![
            Block::heading("h1", HeadingLevel::H2, vec![TextRun::new("Top")]),
            Block::heading("h2", HeadingLevel::H2, vec![TextRun::new("Next")]),
        ];
        let doc = render_blocks(&blocks);
        let margins: Vec<u8> = doc
            .iter()
            .filter_map(|b| match b {
                RenderedBlock::Heading { top_margin, .. } => Some(*top_margin),
                _ => None,
            })
            .collect();
        assert_eq!(margins, vec![0, 10]);
    }

    #[test]
    fn test_table_row_counts() {
        for n in [0, 1, 3, 4, 6] {
            let doc = render_blocks(&table_with_rows(n));
            assert_eq!(doc.len(), 1, "{} rows", n);
            match &doc.blocks[0] {
                RenderedBlock::Table {
                    rows,
                    scrollable,
                    max_height,
                    ..
                } => {
                    assert_eq!(rows.len(), n);
                    assert_eq!(*scrollable, n > 3);
                    assert_eq!(max_height.is_some(), n > 3);
                }
                other => panic!("expected table, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_table_height_cap_is_first_three_rows() {
        let doc = render_blocks(&table_with_rows(5));
        match &doc.blocks[0] {
            RenderedBlock::Table { max_height, .. } => {
                assert_eq!(*max_height, Some(3.0 * 56.0));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_unmeasured_table_scrolls_without_cap() {
        let options = RenderOptions::new().unmeasured();
        let doc = render_blocks_with_options(&table_with_rows(4), &options);
        match &doc.blocks[0] {
            RenderedBlock::Table {
                scrollable,
                max_height,
                ..
            } => {
                assert!(*scrollable);
                assert_eq!(*max_height, None);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_stops_at_first_non_row() {
        let mut blocks = table_with_rows(2);
        blocks.push(para("p", "after"));
        blocks.push(row("stray"));

        let doc = render_blocks(&blocks);
        assert_eq!(doc.len(), 2);
        match &doc.blocks[0] {
            RenderedBlock::Table { rows, .. } => {
                let ids: Vec<&str> = rows.iter().map(|r| r.block_id.as_str()).collect();
                assert_eq!(ids, vec!["r0", "r1"]);
            }
            other => panic!("expected table, got {:?}", other),
        }
        assert_eq!(doc.blocks[1].block_id(), "p");
    }

    #[test]
    fn test_label_column() {
        let doc = render_blocks(&table_with_rows(1));
        match &doc.blocks[0] {
            RenderedBlock::Table { rows, .. } => {
                let labels: Vec<bool> = rows[0].cells.iter().map(|c| c.is_label).collect();
                assert_eq!(labels, vec![true, false]);
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_divider_spacing_priority() {
        let blocks = vec![
            Block::divider("d0"),
            Block::heading("h", HeadingLevel::H2, vec![TextRun::new("About")]),
            Block::divider("d1"),
            Block::heading("n", HeadingLevel::H3, vec![TextRun::new("Recent News")]),
            Block::divider("d2"),
        ];
        let doc = render_blocks(&blocks);
        let spacings: Vec<DividerSpacing> = doc
            .iter()
            .filter_map(|b| match b {
                RenderedBlock::Divider { spacing, .. } => Some(*spacing),
                _ => None,
            })
            .collect();
        assert_eq!(
            spacings,
            vec![
                DividerSpacing::Default,
                DividerSpacing::Section,
                DividerSpacing::News
            ]
        );
    }

    #[test]
    fn test_custom_news_label() {
        let blocks = vec![
            Block::heading("n", HeadingLevel::H3, vec![TextRun::new("Updates")]),
            Block::divider("d"),
        ];
        let options = RenderOptions::new().with_news_label("Updates");
        let doc = render_blocks_with_options(&blocks, &options);
        assert!(matches!(
            doc.blocks[1],
            RenderedBlock::Divider { spacing: DividerSpacing::News, .. }
        ));
    }

    #[test]
    fn test_run_keys_and_links() {
        let runs = vec![
            TextRun::link("site", "https://example.com").with_style(TextStyle {
                bold: true,
                underline: true,
                ..Default::default()
            }),
            TextRun::new(""),
        ];
        let doc = render_blocks(&[Block::paragraph("p", runs)]);
        let rendered = doc.blocks[0].runs();

        assert_eq!(rendered[0].key, "p-https://example.com-site");
        assert!(rendered[0].style.bold && rendered[0].style.underline);
        assert_eq!(
            rendered[0].link.as_ref().map(|l| l.aria_label.as_str()),
            Some("https://example.com link")
        );
        assert_eq!(rendered[1].key, "p-");
        assert!(rendered[1].is_empty());
    }

    #[test]
    fn test_render_with_stats() {
        let mut blocks = vec![
            Block::heading("h", HeadingLevel::H1, vec![TextRun::new("Hello world")]),
            Block::unsupported("x", "image"),
            row("stray"),
        ];
        blocks.extend(table_with_rows(4));

        let (_, stats) = BlockRenderer::new(RenderOptions::default()).render_with_stats(&blocks);
        assert_eq!(stats.block_count, 8);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.skipped_count, 2);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.table_row_count, 4);
        assert_eq!(stats.scrollable_table_count, 1);
    }

    struct FixedHeight(f32);

    impl RowMeasure for FixedHeight {
        fn row_height(&self, _row: &RenderedRow) -> Option<f32> {
            Some(self.0)
        }
    }

    #[test]
    fn test_custom_measure() {
        let doc = BlockRenderer::new(RenderOptions::default())
            .with_measure(FixedHeight(40.0))
            .render(&table_with_rows(4));
        match &doc.blocks[0] {
            RenderedBlock::Table { max_height, .. } => assert_eq!(*max_height, Some(120.0)),
            other => panic!("expected table, got {:?}", other),
        }
    }
}
