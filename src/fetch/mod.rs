//! Content-source seam and block sequence assembly.
//!
//! The renderer needs the complete block sequence of a page up front:
//! children spliced in after their parent, depth-first, table rows right
//! after their table. This module defines the [`ContentSource`] trait the
//! backend client implements and the helpers that turn paginated child
//! listings into that flat sequence.
//!
//! # Example
//!
//! ```no_run
//! use textblob::fetch::{fetch_all_blocks, FetchOptions, SnapshotSource};
//!
//! fn main() -> textblob::Result<()> {
//!     let source = SnapshotSource::from_path("content.json")?;
//!     let blocks = fetch_all_blocks(&source, "experience", &FetchOptions::default())?;
//!     println!("{} blocks", blocks.len());
//!     Ok(())
//! }
//! ```

mod options;
mod snapshot;

pub use options::{ErrorMode, FetchOptions, MAX_PAGE_SIZE};
pub use snapshot::{Snapshot, SnapshotSource};

use std::collections::HashSet;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::model::{Block, PageProperties, PropertySchema};
use crate::parser::{number_property, page_properties_or_none, parse_blocks, text_property};

/// One page of a child listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChildrenPage {
    /// Raw block records in document order
    pub results: Vec<Value>,

    /// Cursor for the next page
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Whether more pages follow
    #[serde(default)]
    pub has_more: bool,
}

/// Value a database property is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A `number` property
    Number(i64),
    /// A `title` or `rich_text` property
    Text(String),
}

impl FieldValue {
    /// Check whether the named property of `properties` holds this value.
    pub fn matches(&self, properties: &Value, field: &str) -> bool {
        match self {
            FieldValue::Number(n) => number_property(properties, field) == Some(*n),
            FieldValue::Text(s) => text_property(properties, field).as_deref() == Some(s.as_str()),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Equality filter on a database property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Property name
    pub property: String,

    /// Expected value
    pub equals: FieldValue,
}

impl PropertyFilter {
    /// Create an equality filter.
    pub fn equals(property: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            property: property.into(),
            equals: value.into(),
        }
    }

    /// Check a page's properties against the filter.
    pub fn matches(&self, properties: &Value) -> bool {
        self.equals.matches(properties, &self.property)
    }
}

/// A content backend.
///
/// Implementations answer single requests; pagination, recursion and
/// validation are handled by the functions in this module.
pub trait ContentSource: Send + Sync {
    /// Get the name of this source.
    fn name(&self) -> &str;

    /// Retrieve a page object, `None` if the page does not exist.
    fn retrieve_page(&self, page_id: &str) -> Result<Option<Value>>;

    /// List one page of children of a block (or page).
    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ChildrenPage>;

    /// Query the page ids of a database, optionally filtered.
    fn query_database(
        &self,
        database_id: &str,
        filter: Option<&PropertyFilter>,
    ) -> Result<Vec<String>>;
}

/// Fetch and validate the properties of a page.
///
/// Missing pages and invalid records both yield `Ok(None)`.
pub fn fetch_page_properties<S: ContentSource + ?Sized>(
    source: &S,
    page_id: &str,
    schema: &PropertySchema,
) -> Result<Option<PageProperties>> {
    let record = match source.retrieve_page(page_id)? {
        Some(record) => record,
        None => {
            log::debug!("Page {} not found in {}", page_id, source.name());
            return Ok(None);
        }
    };
    Ok(page_properties_or_none(&record, schema))
}

/// Resolve a page id by an exact property match inside a database.
pub fn fetch_page_id_by_field<S: ContentSource + ?Sized>(
    source: &S,
    database_id: &str,
    field: &str,
    value: impl Into<FieldValue>,
) -> Result<Option<String>> {
    let filter = PropertyFilter::equals(field, value);
    let ids = source.query_database(database_id, Some(&filter))?;
    Ok(ids.into_iter().next())
}

/// Fetch the complete, flattened block sequence of a page.
pub fn fetch_all_blocks<S: ContentSource + ?Sized>(
    source: &S,
    page_id: &str,
    options: &FetchOptions,
) -> Result<Vec<Block>> {
    let records = list_all_children(source, page_id, options)?;
    let blocks = resolve_children(source, parse_blocks(&records), 0, options)?;
    log::debug!("Fetched {} blocks for page {}", blocks.len(), page_id);
    Ok(blocks)
}

/// Follow the cursor of a child listing until it is exhausted.
pub fn list_all_children<S: ContentSource + ?Sized>(
    source: &S,
    block_id: &str,
    options: &FetchOptions,
) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen_cursors = HashSet::new();

    loop {
        let page = match source.list_children(block_id, cursor.as_deref(), options.page_size) {
            Ok(page) => page,
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!(
                    "Stopping pagination of {} after {} records: {}",
                    block_id,
                    records.len(),
                    e
                );
                break;
            }
            Err(e) => return Err(e),
        };

        records.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) if seen_cursors.insert(next.clone()) => cursor = Some(next),
            _ => {
                log::warn!("Cursor for {} repeated, stopping", block_id);
                break;
            }
        }
    }

    Ok(records)
}

fn resolve_children<S: ContentSource + ?Sized>(
    source: &S,
    blocks: Vec<Block>,
    depth: usize,
    options: &FetchOptions,
) -> Result<Vec<Block>> {
    let groups: Vec<Vec<Block>> = if options.parallel {
        blocks
            .into_par_iter()
            .map(|block| expand_block(source, block, depth, options))
            .collect::<Result<_>>()?
    } else {
        blocks
            .into_iter()
            .map(|block| expand_block(source, block, depth, options))
            .collect::<Result<_>>()?
    };
    Ok(groups.into_iter().flatten().collect())
}

fn expand_block<S: ContentSource + ?Sized>(
    source: &S,
    block: Block,
    depth: usize,
    options: &FetchOptions,
) -> Result<Vec<Block>> {
    if !block.has_children || block.id.is_empty() {
        return Ok(vec![block]);
    }
    if depth >= options.max_depth {
        log::debug!("Not resolving children of {} beyond depth {}", block.id, depth);
        return Ok(vec![block]);
    }

    let records = list_all_children(source, &block.id, options)?;
    let children = resolve_children(source, parse_blocks(&records), depth + 1, options)?;

    let mut group = Vec::with_capacity(children.len() + 1);
    group.push(block);
    group.extend(children);
    Ok(group)
}
