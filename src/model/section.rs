//! Positional classification of blocks by their enclosing section.
//!
//! Both classifiers look strictly backward from a target index. The
//! scanning functions are the reference definition; [`SectionIndex`]
//! computes the same answers for every index in one forward pass.

use super::{Block, HeadingLevel};

/// Label of the level-3 heading that opens the news section.
pub const NEWS_SECTION_LABEL: &str = "Recent News";

/// Check whether the block at `idx` sits inside the news section.
///
/// Scans backward from `idx - 1`. The nearest level-3 heading decides:
/// true iff its text equals [`NEWS_SECTION_LABEL`].
pub fn is_in_news_section(blocks: &[Block], idx: usize) -> bool {
    is_in_labelled_section(blocks, idx, NEWS_SECTION_LABEL)
}

/// Like [`is_in_news_section`] with a custom section label.
pub fn is_in_labelled_section(blocks: &[Block], idx: usize, label: &str) -> bool {
    let end = idx.min(blocks.len());
    blocks[..end]
        .iter()
        .rev()
        .find(|block| block.is_heading(HeadingLevel::H3))
        .map(|heading| heading.plain_text() == label)
        .unwrap_or(false)
}

/// Check whether any heading of any level precedes `idx`.
pub fn is_section_divider(blocks: &[Block], idx: usize) -> bool {
    let end = idx.min(blocks.len());
    blocks[..end].iter().any(Block::is_heading_any)
}

/// Precomputed section classification for every index of a sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionIndex {
    after_heading: Vec<bool>,
    in_labelled_section: Vec<bool>,
}

impl SectionIndex {
    /// Build the index for `blocks` using the default news label.
    pub fn new(blocks: &[Block]) -> Self {
        Self::build(blocks, NEWS_SECTION_LABEL)
    }

    /// Build the index for `blocks` with a custom section label.
    pub fn build(blocks: &[Block], label: &str) -> Self {
        let mut after_heading = Vec::with_capacity(blocks.len());
        let mut in_labelled_section = Vec::with_capacity(blocks.len());

        // State describes blocks[..i], i.e. strictly before the current index.
        let mut seen_heading = false;
        let mut nearest_h3_matches = false;

        for block in blocks {
            after_heading.push(seen_heading);
            in_labelled_section.push(nearest_h3_matches);

            if block.is_heading_any() {
                seen_heading = true;
            }
            if block.is_heading(HeadingLevel::H3) {
                nearest_h3_matches = block.plain_text() == label;
            }
        }

        Self {
            after_heading,
            in_labelled_section,
        }
    }

    /// Equivalent of [`is_in_labelled_section`] for the indexed sequence.
    pub fn is_in_news_section(&self, idx: usize) -> bool {
        self.in_labelled_section.get(idx).copied().unwrap_or(false)
    }

    /// Equivalent of [`is_section_divider`] for the indexed sequence.
    pub fn is_section_divider(&self, idx: usize) -> bool {
        self.after_heading.get(idx).copied().unwrap_or(false)
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.after_heading.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.after_heading.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    fn h(level: HeadingLevel, text: &str) -> Block {
        Block::heading(format!("h-{}", text), level, vec![TextRun::new(text)])
    }

    fn sample() -> Vec<Block> {
        vec![
            Block::divider("d0"),
            h(HeadingLevel::H1, "About"),
            Block::divider("d1"),
            h(HeadingLevel::H3, NEWS_SECTION_LABEL),
            Block::paragraph("p", vec![TextRun::new("Launched")]),
            Block::divider("d2"),
            h(HeadingLevel::H2, "Still news"),
            Block::divider("d3"),
            h(HeadingLevel::H3, "Projects"),
            Block::divider("d4"),
            h(HeadingLevel::H3, NEWS_SECTION_LABEL),
            Block::divider("d5"),
        ]
    }

    #[test]
    fn test_news_section_nearest_h3_wins() {
        let blocks = sample();
        assert!(!is_in_news_section(&blocks, 0));
        assert!(!is_in_news_section(&blocks, 2));
        assert!(is_in_news_section(&blocks, 5));
        // An h2 in between does not close the news section.
        assert!(is_in_news_section(&blocks, 7));
        // A later h3 with another label does.
        assert!(!is_in_news_section(&blocks, 9));
        assert!(is_in_news_section(&blocks, 11));
    }

    #[test]
    fn test_heading_itself_is_excluded() {
        let blocks = sample();
        assert!(!is_in_news_section(&blocks, 3));
        assert!(!is_section_divider(&blocks, 1));
        assert!(is_section_divider(&blocks, 2));
    }

    #[test]
    fn test_label_must_match_exactly() {
        let blocks = vec![h(HeadingLevel::H3, "Recent news"), Block::divider("d")];
        assert!(!is_in_news_section(&blocks, 1));
        assert!(is_section_divider(&blocks, 1));
    }

    #[test]
    fn test_out_of_range_index() {
        let blocks = sample();
        assert!(is_section_divider(&blocks, 100));
        assert!(!is_section_divider(&[], 0));
        assert!(!is_in_news_section(&[], 3));
    }

    #[test]
    fn test_index_matches_scans() {
        let blocks = sample();
        let index = SectionIndex::new(&blocks);
        assert_eq!(index.len(), blocks.len());
        for idx in 0..blocks.len() {
            assert_eq!(
                index.is_in_news_section(idx),
                is_in_news_section(&blocks, idx),
                "news mismatch at {}",
                idx
            );
            assert_eq!(
                index.is_section_divider(idx),
                is_section_divider(&blocks, idx),
                "section mismatch at {}",
                idx
            );
        }
    }

    #[test]
    fn test_custom_label() {
        let blocks = vec![h(HeadingLevel::H3, "Updates"), Block::divider("d")];
        assert!(is_in_labelled_section(&blocks, 1, "Updates"));
        assert!(SectionIndex::build(&blocks, "Updates").is_in_news_section(1));
        assert!(!SectionIndex::new(&blocks).is_in_news_section(1));
    }
}
