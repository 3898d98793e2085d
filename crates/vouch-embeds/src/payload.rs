//! Embed payload types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One name/value pair of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a row with its neighbours.
    pub inline: bool,
}

impl EmbedField {
    /// Creates a field.
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// A rendered vouch notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VouchEmbed {
    /// Embed title.
    pub title: String,
    /// Sidebar colour as `0xRRGGBB`.
    pub colour: u32,
    /// Thumbnail image URL.
    pub thumbnail: Option<String>,
    /// Fields in display order.
    pub fields: Vec<EmbedField>,
    /// Footer text.
    pub footer: String,
    /// Timestamp shown next to the footer.
    pub timestamp: DateTime<Utc>,
}

impl VouchEmbed {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
