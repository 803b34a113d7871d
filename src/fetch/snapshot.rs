//! Offline content source backed by a JSON snapshot.
//!
//! A snapshot holds raw page objects, child listings and database
//! membership in the backend's own record shapes:
//!
//! ```json
//! {
//!   "pages":     { "<page id>": { "properties": { ... } } },
//!   "children":  { "<block id>": [ { "id": "..", "type": "paragraph", ... } ] },
//!   "databases": { "<database id>": [ "<page id>", ... ] }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ChildrenPage, ContentSource, PropertyFilter, MAX_PAGE_SIZE};
use crate::error::{Error, Result};

/// Raw snapshot contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Page objects by id
    #[serde(default)]
    pub pages: HashMap<String, Value>,

    /// Child records by parent block id
    #[serde(default)]
    pub children: HashMap<String, Vec<Value>>,

    /// Page ids by database id, in query order
    #[serde(default)]
    pub databases: HashMap<String, Vec<String>>,
}

/// [`ContentSource`] serving a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    page_size: usize,
}

impl SnapshotSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::from_snapshot(Snapshot::default())
    }

    /// Create a source from snapshot contents.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Load a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        // Struct fields would otherwise also accept a positional array
        if !value.is_object() {
            return Err(Error::Source(
                "snapshot must be a JSON object with pages, children and databases".to_string(),
            ));
        }
        let snapshot: Snapshot = serde_json::from_value(value)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a snapshot file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let source = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded snapshot {} ({} pages, {} block listings, {} databases)",
            path.display(),
            source.snapshot.pages.len(),
            source.snapshot.children.len(),
            source.snapshot.databases.len()
        );
        Ok(source)
    }

    /// Cap the number of records served per listing page.
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Add a page object.
    pub fn with_page(mut self, page_id: impl Into<String>, record: Value) -> Self {
        self.snapshot.pages.insert(page_id.into(), record);
        self
    }

    /// Add the child records of a block.
    pub fn with_children(mut self, block_id: impl Into<String>, records: Vec<Value>) -> Self {
        self.snapshot.children.insert(block_id.into(), records);
        self
    }

    /// Add a database with its page ids.
    pub fn with_database(mut self, database_id: impl Into<String>, page_ids: Vec<String>) -> Self {
        self.snapshot.databases.insert(database_id.into(), page_ids);
        self
    }

    /// Get the snapshot contents.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl Default for SnapshotSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn retrieve_page(&self, page_id: &str) -> Result<Option<Value>> {
        Ok(self.snapshot.pages.get(page_id).cloned())
    }

    fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<ChildrenPage> {
        let records = match self.snapshot.children.get(block_id) {
            Some(records) => records,
            None => return Ok(ChildrenPage::default()),
        };

        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| Error::Source(format!("invalid cursor '{}'", c)))?,
            None => 0,
        };
        if start > records.len() {
            return Err(Error::Source(format!(
                "cursor {} is past the end of {}",
                start, block_id
            )));
        }

        let size = page_size.clamp(1, self.page_size);
        let end = (start + size).min(records.len());
        let has_more = end < records.len();

        Ok(ChildrenPage {
            results: records[start..end].to_vec(),
            next_cursor: has_more.then(|| end.to_string()),
            has_more,
        })
    }

    fn query_database(
        &self,
        database_id: &str,
        filter: Option<&PropertyFilter>,
    ) -> Result<Vec<String>> {
        let ids = self
            .snapshot
            .databases
            .get(database_id)
            .ok_or_else(|| Error::Source(format!("unknown database '{}'", database_id)))?;

        let matches = |id: &&String| match filter {
            None => true,
            Some(filter) => self
                .snapshot
                .pages
                .get(id.as_str())
                .map(|page| filter.matches(page.get("properties").unwrap_or(page)))
                .unwrap_or(false),
        };

        Ok(ids.iter().filter(matches).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> SnapshotSource {
        let records = (0..5)
            .map(|i| json!({"id": format!("b{}", i), "type": "divider", "divider": {}}))
            .collect();
        SnapshotSource::new()
            .with_children("page", records)
            .with_page(
                "p1",
                json!({"properties": {"postId": {"number": 1}}}),
            )
            .with_page(
                "p2",
                json!({"properties": {"postId": {"number": 2}}}),
            )
            .with_database("db", vec!["p1".to_string(), "p2".to_string(), "gone".to_string()])
    }

    #[test]
    fn test_listing_pages() {
        let source = source();
        let first = source.list_children("page", None, 2).unwrap();
        assert_eq!(first.results.len(), 2);
        assert!(first.has_more);
        assert_eq!(first.next_cursor.as_deref(), Some("2"));

        let last = source.list_children("page", Some("4"), 2).unwrap();
        assert_eq!(last.results.len(), 1);
        assert!(!last.has_more);
        assert_eq!(last.next_cursor, None);
    }

    #[test]
    fn test_bad_cursor() {
        let source = source();
        assert!(source.list_children("page", Some("abc"), 2).is_err());
        assert!(source.list_children("page", Some("9"), 2).is_err());
    }

    #[test]
    fn test_unknown_block_is_empty() {
        let page = source().list_children("nope", None, 10).unwrap();
        assert!(page.results.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_query_database() {
        let source = source();
        assert_eq!(source.query_database("db", None).unwrap().len(), 3);

        let filter = PropertyFilter::equals("postId", 2i64);
        assert_eq!(
            source.query_database("db", Some(&filter)).unwrap(),
            vec!["p2".to_string()]
        );
        assert!(source.query_database("other", None).is_err());
    }

    #[test]
    fn test_from_json_str() {
        let source = SnapshotSource::from_json_str(r#"{"pages": {"x": {}}}"#).unwrap();
        assert!(source.retrieve_page("x").unwrap().is_some());
        assert!(source.retrieve_page("y").unwrap().is_none());
        assert!(SnapshotSource::from_json_str("[]").is_err());
    }

    #[test]
    fn test_block_list_is_not_a_snapshot() {
        let result =
            SnapshotSource::from_json_str(r#"[{"id":"b1","type":"divider","divider":{}}]"#);
        assert!(matches!(result, Err(Error::Source(_))));
    }
}
