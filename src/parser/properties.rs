//! Decoding of page property records.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{PageProperties, PropertySchema};

/// Decode page properties.
///
/// `record` may be a full page object (with a `properties` field) or the
/// properties object itself. Title and publication date are required;
/// subtitle and numeric id are optional here and checked by callers that
/// need them.
pub fn parse_page_properties(record: &Value, schema: &PropertySchema) -> Result<PageProperties> {
    let properties = record.get("properties").unwrap_or(record);

    let title = text_property(properties, &schema.title)
        .ok_or_else(|| Error::MissingProperty(schema.title.clone()))?;

    let date_text = properties
        .get(&schema.published_date)
        .and_then(|p| p.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingProperty(schema.published_date.clone()))?;
    let published_date = parse_date(date_text)?;

    Ok(PageProperties {
        title,
        published_date,
        subtitle: text_property(properties, &schema.subtitle),
        numeric_id: number_property(properties, &schema.numeric_id),
    })
}

/// Decode page properties, mapping any invalid record to `None`.
pub fn page_properties_or_none(record: &Value, schema: &PropertySchema) -> Option<PageProperties> {
    match parse_page_properties(record, schema) {
        Ok(props) => Some(props),
        Err(e) => {
            log::warn!("Rejecting page properties: {}", e);
            None
        }
    }
}

/// Read the first run of a `title` or `rich_text` property.
pub fn text_property(properties: &Value, name: &str) -> Option<String> {
    let property = properties.get(name)?;
    property
        .get("title")
        .or_else(|| property.get("rich_text"))?
        .as_array()?
        .first()?
        .get("plain_text")?
        .as_str()
        .map(str::to_string)
}

/// Read a `number` property as an integer.
pub fn number_property(properties: &Value, name: &str) -> Option<i64> {
    let number = properties.get(name)?.get("number")?;
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64)
    })
}

/// Parse a backend date (`YYYY-MM-DD`, optionally followed by a time).
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| Error::InvalidDate(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post_record() -> Value {
        json!({
            "object": "page",
            "id": "page-1",
            "properties": {
                "Name": { "type": "title", "title": [{ "plain_text": "On Rust" }] },
                "datePublished": { "type": "date", "date": { "start": "2023-11-05" } },
                "subtitle": { "type": "rich_text", "rich_text": [{ "plain_text": "Notes" }] },
                "postId": { "type": "number", "number": 12 }
            }
        })
    }

    #[test]
    fn test_parse_full_record() {
        let props = parse_page_properties(&post_record(), &PropertySchema::default()).unwrap();
        assert_eq!(props.title, "On Rust");
        assert_eq!(
            props.published_date,
            NaiveDate::from_ymd_opt(2023, 11, 5).unwrap()
        );
        assert_eq!(props.subtitle.as_deref(), Some("Notes"));
        assert_eq!(props.numeric_id, Some(12));
    }

    #[test]
    fn test_parse_bare_properties_object() {
        let record = post_record();
        let props = parse_page_properties(&record["properties"], &PropertySchema::default());
        assert!(props.is_ok());
    }

    #[test]
    fn test_missing_title() {
        let mut record = post_record();
        record["properties"]["Name"]["title"] = json!([]);
        let err = parse_page_properties(&record, &PropertySchema::default()).unwrap_err();
        assert!(matches!(err, Error::MissingProperty(name) if name == "Name"));
    }

    #[test]
    fn test_missing_date() {
        let mut record = post_record();
        record["properties"]["datePublished"]["date"] = Value::Null;
        assert!(page_properties_or_none(&record, &PropertySchema::default()).is_none());
    }

    #[test]
    fn test_invalid_date() {
        let mut record = post_record();
        record["properties"]["datePublished"]["date"]["start"] = json!("next week");
        let err = parse_page_properties(&record, &PropertySchema::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[test]
    fn test_date_with_time() {
        let date = parse_date("2022-01-31T10:00:00.000+00:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 1, 31).unwrap());
    }

    #[test]
    fn test_optional_fields_absent() {
        let mut record = post_record();
        record["properties"]["postId"]["number"] = Value::Null;
        record["properties"]["subtitle"]["rich_text"] = json!([]);
        let props = parse_page_properties(&record, &PropertySchema::default()).unwrap();
        assert_eq!(props.numeric_id, None);
        assert_eq!(props.subtitle, None);
        assert!(!props.is_valid_post());
    }

    #[test]
    fn test_number_property_float() {
        let props = json!({ "postId": { "number": 3.0 } });
        assert_eq!(number_property(&props, "postId"), Some(3));
        let props = json!({ "postId": { "number": 3.5 } });
        assert_eq!(number_property(&props, "postId"), None);
    }
}
