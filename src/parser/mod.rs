//! Decoding of raw content-source records into the content model.

mod block;
mod properties;

pub use block::{parse_block, parse_blocks, parse_blocks_json, parse_runs};
pub use properties::{
    number_property, page_properties_or_none, parse_date, parse_page_properties, text_property,
};
