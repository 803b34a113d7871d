//! Page property types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Metadata of a content page (a post or a book-notes entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProperties {
    /// Page title
    pub title: String,

    /// Publication date
    pub published_date: NaiveDate,

    /// Optional subtitle
    pub subtitle: Option<String>,

    /// Numeric identifier used for routing posts
    pub numeric_id: Option<i64>,
}

impl PageProperties {
    /// Create properties with the required fields.
    pub fn new(title: impl Into<String>, published_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            published_date,
            subtitle: None,
            numeric_id: None,
        }
    }

    /// Set the subtitle and return self.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the numeric id and return self.
    pub fn with_numeric_id(mut self, id: i64) -> Self {
        self.numeric_id = Some(id);
        self
    }

    /// Check if the record is usable as a post (needs a numeric id).
    pub fn is_valid_post(&self) -> bool {
        self.numeric_id.is_some()
    }

    /// Project into a post listing entry, `None` when not a valid post.
    pub fn to_post_info(&self) -> Option<PostInfo> {
        let post_id = self.numeric_id?;
        Some(PostInfo {
            title: self.title.clone(),
            date: self.published_date,
            subtitle: self.subtitle.clone().unwrap_or_default(),
            post_id,
        })
    }
}

/// Entry of the writing index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Subtitle, empty when the post has none
    pub subtitle: String,

    /// Routable post id
    pub post_id: i64,
}

/// Names of the backend properties that hold page metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySchema {
    /// Title property
    pub title: String,

    /// Date property
    pub published_date: String,

    /// Subtitle property
    pub subtitle: String,

    /// Numeric id property
    pub numeric_id: String,

    /// Slug property used by book notes
    pub slug: String,
}

impl PropertySchema {
    /// Create the default schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title property name.
    pub fn with_title(mut self, name: impl Into<String>) -> Self {
        self.title = name.into();
        self
    }

    /// Set the date property name.
    pub fn with_published_date(mut self, name: impl Into<String>) -> Self {
        self.published_date = name.into();
        self
    }

    /// Set the numeric id property name.
    pub fn with_numeric_id(mut self, name: impl Into<String>) -> Self {
        self.numeric_id = name.into();
        self
    }

    /// Set the slug property name.
    pub fn with_slug(mut self, name: impl Into<String>) -> Self {
        self.slug = name.into();
        self
    }
}

impl Default for PropertySchema {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            published_date: "datePublished".to_string(),
            subtitle: "subtitle".to_string(),
            numeric_id: "postId".to_string(),
            slug: "slug".to_string(),
        }
    }
}
