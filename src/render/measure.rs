//! Table row measurement for the scroll height cap.
//!
//! A live layout measures rendered row heights after the first paint.
//! Outside a browser the heights come from [`RowMetrics`], a nominal
//! model of padding plus wrapped lines. A measurer that cannot answer
//! yet returns `None`, which leaves the table at its natural height.

use serde::{Deserialize, Serialize};

use super::RenderedRow;

/// Source of row heights in pixels.
pub trait RowMeasure {
    /// Height of a rendered row, `None` if it has not been measured.
    fn row_height(&self, row: &RenderedRow) -> Option<f32>;
}

/// Nominal row geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowMetrics {
    /// Top plus bottom cell padding
    pub vertical_padding: f32,

    /// Height of one line of text
    pub line_height: f32,

    /// Characters per line before wrapping; `None` disables wrapping
    pub chars_per_line: Option<usize>,
}

impl RowMetrics {
    /// Set the wrap width and return self.
    pub fn with_wrap(mut self, chars_per_line: usize) -> Self {
        self.chars_per_line = Some(chars_per_line.max(1));
        self
    }

    fn line_count(&self, text: &str) -> usize {
        text.split('\n')
            .map(|line| match self.chars_per_line {
                Some(width) => line.chars().count().div_ceil(width).max(1),
                None => 1,
            })
            .sum()
    }
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            vertical_padding: 32.0,
            line_height: 24.0,
            chars_per_line: None,
        }
    }
}

impl RowMeasure for RowMetrics {
    fn row_height(&self, row: &RenderedRow) -> Option<f32> {
        let lines = row
            .cells
            .iter()
            .map(|cell| self.line_count(&cell.plain_text()))
            .max()
            .unwrap_or(1);
        Some(self.vertical_padding + self.line_height * lines as f32)
    }
}

/// Measurer for a layout that has not been measured yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unmeasured;

impl RowMeasure for Unmeasured {
    fn row_height(&self, _row: &RenderedRow) -> Option<f32> {
        None
    }
}

/// Height cap for a table: the combined height of its first `visible`
/// rows, or `None` when the table fits or a row is unmeasured.
pub fn height_cap(rows: &[RenderedRow], visible: usize, measure: &dyn RowMeasure) -> Option<f32> {
    if rows.len() <= visible {
        return None;
    }
    rows[..visible]
        .iter()
        .map(|row| measure.row_height(row))
        .sum::<Option<f32>>()
}
