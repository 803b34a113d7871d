//! Content model types.
//!
//! This module defines the block vocabulary delivered by the content
//! source and the positional classifiers the renderer relies on. The
//! model is independent of the backend's JSON shape; see [`crate::parser`]
//! for the decoding side.

mod block;
mod properties;
mod section;
mod text;

pub use block::{Block, BlockContent, BlockKind, HeadingLevel, TableInfo};
pub use properties::{PageProperties, PostInfo, PropertySchema};
pub use section::{
    is_in_labelled_section, is_in_news_section, is_section_divider, SectionIndex,
    NEWS_SECTION_LABEL,
};
pub use text::{plain_text, TextRun, TextStyle};
