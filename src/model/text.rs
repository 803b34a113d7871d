//! Rich-text run types.

use serde::{Deserialize, Serialize};

/// A run of text with consistent styling and an optional link target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Link target, if the run is a hyperlink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    /// Text styling
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            bold: true,
            ..Default::default()
        })
    }

    /// Create an italic text run.
    pub fn italic(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            italic: true,
            ..Default::default()
        })
    }

    /// Create a linked text run.
    pub fn link(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            link: Some(href.into()),
            ..Self::new(text)
        }
    }

    /// Replace the style and return self.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if this run is a hyperlink.
    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Text annotations. Every flag is independent of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Strikethrough text
    pub strikethrough: bool,

    /// Inline code
    pub code: bool,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold || self.italic || self.underline || self.strikethrough || self.code
    }
}

/// Concatenate the text of a run sequence.
pub fn plain_text(runs: &[TextRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
