//! Decoding of raw block records.
//!
//! Records have the backend's shape: a `type` string plus a payload object
//! keyed by that same string, e.g.
//! `{"id": "..", "type": "paragraph", "paragraph": {"rich_text": [..]}}`.
//! Older exports name the run array `text` instead of `rich_text`; both
//! are accepted. Decoding never fails: anything unrecognised or malformed
//! becomes [`BlockContent::Unsupported`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::model::{Block, BlockContent, BlockKind, TableInfo, TextRun, TextStyle};

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: Option<String>,

    #[serde(rename = "type", default)]
    kind: Option<String>,

    #[serde(default)]
    has_children: bool,

    #[serde(flatten)]
    payload: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawRichText {
    #[serde(default)]
    plain_text: Option<String>,

    #[serde(default)]
    href: Option<String>,

    #[serde(default)]
    annotations: TextStyle,

    #[serde(default)]
    text: Option<RawTextContent>,
}

#[derive(Debug, Deserialize)]
struct RawTextContent {
    #[serde(default)]
    content: String,

    #[serde(default)]
    link: Option<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawLink {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawTable {
    #[serde(default)]
    table_width: u32,

    #[serde(default)]
    has_column_header: bool,

    #[serde(default)]
    has_row_header: bool,
}

/// Decode one raw block record.
pub fn parse_block(value: &Value) -> Block {
    let raw = match RawBlock::deserialize(value) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("Skipping malformed block record: {}", e);
            return Block::unsupported("", "");
        }
    };

    let kind_name = raw.kind.unwrap_or_default();
    let id = match raw.id {
        Some(id) if !id.is_empty() => id,
        _ => {
            log::debug!("Block record of type '{}' has no id", kind_name);
            return Block::unsupported("", kind_name);
        }
    };

    let payload = raw.payload.get(&kind_name);
    let content = match parse_content(BlockKind::from_type_name(&kind_name), payload) {
        Some(content) => content,
        None => {
            log::debug!("Block {} of type '{}' is not renderable", id, kind_name);
            BlockContent::Unsupported { kind: kind_name }
        }
    };

    Block {
        id,
        has_children: raw.has_children,
        content,
    }
}

/// Decode a sequence of raw block records, preserving order.
pub fn parse_blocks(values: &[Value]) -> Vec<Block> {
    values.iter().map(parse_block).collect()
}

/// Decode blocks from JSON text.
///
/// Accepts a bare array of records or a list response object with a
/// `results` array.
pub fn parse_blocks_json(json: &str) -> Result<Vec<Block>> {
    let value: Value = serde_json::from_str(json)?;
    let records = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    };
    Ok(parse_blocks(records))
}

fn parse_content(kind: BlockKind, payload: Option<&Value>) -> Option<BlockContent> {
    let content = match kind {
        BlockKind::Paragraph => BlockContent::Paragraph {
            text: parse_text_field(payload)?,
        },
        BlockKind::Heading(level) => BlockContent::Heading {
            level,
            text: parse_text_field(payload)?,
        },
        BlockKind::NumberedListItem => BlockContent::NumberedListItem {
            text: parse_text_field(payload)?,
        },
        BlockKind::BulletedListItem => BlockContent::BulletedListItem {
            text: parse_text_field(payload)?,
        },
        BlockKind::Divider => BlockContent::Divider,
        BlockKind::Table => {
            let raw = match payload {
                Some(value) => RawTable::deserialize(value).ok()?,
                None => RawTable::default(),
            };
            BlockContent::Table(TableInfo {
                column_count: raw.table_width,
                has_column_header: raw.has_column_header,
                has_row_header: raw.has_row_header,
            })
        }
        BlockKind::TableRow => {
            let cells = payload?.get("cells")?.as_array()?;
            BlockContent::TableRow {
                cells: cells
                    .iter()
                    .map(|cell| cell.as_array().map(|runs| parse_runs(runs)))
                    .collect::<Option<Vec<_>>>()?,
            }
        }
        BlockKind::Unsupported => return None,
    };
    Some(content)
}

fn parse_text_field(payload: Option<&Value>) -> Option<Vec<TextRun>> {
    let payload = payload?;
    let runs = payload
        .get("rich_text")
        .or_else(|| payload.get("text"))?
        .as_array()?;
    Some(parse_runs(runs))
}

/// Decode a rich-text array. Entries that are not run objects are dropped.
pub fn parse_runs(values: &[Value]) -> Vec<TextRun> {
    values
        .iter()
        .filter_map(|value| match RawRichText::deserialize(value) {
            Ok(raw) => Some(raw.into_run()),
            Err(e) => {
                log::debug!("Dropping malformed text run: {}", e);
                None
            }
        })
        .collect()
}

impl RawRichText {
    fn into_run(self) -> TextRun {
        let (content, link) = match self.text {
            Some(text) => (Some(text.content), text.link.map(|l| l.url)),
            None => (None, None),
        };
        TextRun {
            text: self.plain_text.or(content).unwrap_or_default(),
            link: self.href.or(link).filter(|href| !href.is_empty()),
            style: self.annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;
    use serde_json::json;

    fn run(text: &str) -> Value {
        json!({
            "type": "text",
            "plain_text": text,
            "href": null,
            "annotations": {
                "bold": false, "italic": false, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            }
        })
    }

    #[test]
    fn test_parse_paragraph_rich_text() {
        let block = parse_block(&json!({
            "id": "p1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": { "rich_text": [run("Hello")], "color": "default" }
        }));
        assert!(block.is_paragraph());
        assert_eq!(block.id, "p1");
        assert_eq!(block.plain_text(), "Hello");
    }

    #[test]
    fn test_parse_legacy_text_key() {
        let block = parse_block(&json!({
            "id": "h",
            "type": "heading_3",
            "heading_3": { "text": [run("Recent News")] }
        }));
        assert!(block.is_heading(HeadingLevel::H3));
        assert_eq!(block.plain_text(), "Recent News");
    }

    #[test]
    fn test_parse_annotations_and_link() {
        let block = parse_block(&json!({
            "id": "p",
            "type": "paragraph",
            "paragraph": { "rich_text": [{
                "plain_text": "site",
                "href": "https://example.com",
                "annotations": { "bold": true, "underline": true, "color": "red" }
            }]}
        }));
        let runs = block.text().unwrap();
        assert_eq!(runs[0].link.as_deref(), Some("https://example.com"));
        assert!(runs[0].style.bold);
        assert!(runs[0].style.underline);
        assert!(!runs[0].style.italic);
    }

    #[test]
    fn test_parse_text_content_fallback() {
        let runs = parse_runs(&[json!({
            "type": "text",
            "text": { "content": "docs", "link": { "url": "https://docs.rs" } }
        })]);
        assert_eq!(runs[0].text, "docs");
        assert_eq!(runs[0].link.as_deref(), Some("https://docs.rs"));
    }

    #[test]
    fn test_parse_table_and_rows() {
        let table = parse_block(&json!({
            "id": "t",
            "type": "table",
            "has_children": true,
            "table": { "table_width": 2, "has_column_header": false, "has_row_header": true }
        }));
        assert!(table.is_table());
        assert!(table.has_children);
        assert_eq!(
            table.content,
            BlockContent::Table(TableInfo {
                column_count: 2,
                has_column_header: false,
                has_row_header: true,
            })
        );

        let row = parse_block(&json!({
            "id": "r",
            "type": "table_row",
            "table_row": { "cells": [[run("2023")], [run("Joined"), run(" team")]] }
        }));
        match row.content {
            BlockContent::TableRow { cells } => {
                assert_eq!(cells.len(), 2);
                assert_eq!(cells[1].len(), 2);
            }
            other => panic!("expected table row, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_and_malformed_records() {
        let callout = parse_block(&json!({"id": "c", "type": "callout", "callout": {}}));
        assert_eq!(callout.kind(), BlockKind::Unsupported);
        assert_eq!(callout.id, "c");

        let no_payload = parse_block(&json!({"id": "p", "type": "paragraph"}));
        assert!(!no_payload.is_paragraph());

        let no_id = parse_block(&json!({"type": "divider", "divider": {}}));
        assert!(!no_id.is_divider());

        let not_object = parse_block(&json!(42));
        assert!(!not_object.is_text_block());
    }

    #[test]
    fn test_divider_without_payload() {
        let block = parse_block(&json!({"id": "d", "type": "divider"}));
        assert!(block.is_divider());
    }

    #[test]
    fn test_parse_blocks_json_list_response() {
        let json = json!({
            "object": "list",
            "results": [
                {"id": "a", "type": "divider", "divider": {}},
                {"id": "b", "type": "bulleted_list_item", "bulleted_list_item": {"rich_text": []}}
            ],
            "has_more": false
        })
        .to_string();
        let blocks = parse_blocks_json(&json).unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].is_bulleted_list_item());

        assert!(parse_blocks_json("not json").is_err());
    }
}
