//! Rendering module for turning block sequences into output formats.
//!
//! [`render_blocks`] interprets a block sequence into a
//! [`RenderedDocument`]; [`to_html`], [`to_text`] and [`to_json`] write
//! that document out.

mod document;
mod html;
mod json;
mod layout;
mod measure;
mod options;
mod result;
mod text;

pub use document::{
    heading_top_margin, DividerSpacing, LinkTarget, ParagraphMargin, RenderedBlock, RenderedCell,
    RenderedDocument, RenderedRow, RenderedRun,
};
pub use html::{to_html, write_block, write_run};
pub use json::{to_json, JsonFormat};
pub use layout::{divider_spacing, render_blocks, render_blocks_with_options, run_key, BlockRenderer};
pub use measure::{height_cap, RowMeasure, RowMetrics, Unmeasured};
pub use options::{RenderOptions, DEFAULT_VISIBLE_ROWS};
pub use result::{RenderResult, RenderStats};
pub use text::to_text;
