use serde::{Deserialize, Serialize};

use crate::content::text::normalize_spaces;

/// One typed content block of an article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { body: String },
    Heading { body: String, level: u8 },
    Quote { body: String },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Image {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Video { platform_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Text,
    Heading,
    Quote,
    Link,
    Image,
    Video,
}

impl ItemKind {
    /// Kinds ancestor eviction never removes and never climbs past.
    pub fn is_protected(self) -> bool {
        matches!(self, ItemKind::Heading | ItemKind::Quote | ItemKind::Link)
    }
}

impl ContentItem {
    pub fn text(body: &str) -> Self {
        ContentItem::Text { body: normalize_spaces(body) }
    }

    pub fn heading(body: &str, level: u8) -> Self {
        ContentItem::Heading { body: normalize_spaces(body), level }
    }

    pub fn quote(body: &str) -> Self {
        ContentItem::Quote { body: normalize_spaces(body) }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ContentItem::Text { .. } => ItemKind::Text,
            ContentItem::Heading { .. } => ItemKind::Heading,
            ContentItem::Quote { .. } => ItemKind::Quote,
            ContentItem::Link { .. } => ItemKind::Link,
            ContentItem::Image { .. } => ItemKind::Image,
            ContentItem::Video { .. } => ItemKind::Video,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, ContentItem::Image { .. })
    }

    pub fn is_link(&self) -> bool {
        matches!(self, ContentItem::Link { .. })
    }

    /// Human-readable text the item carries, if any.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            ContentItem::Text { body }
            | ContentItem::Heading { body, .. }
            | ContentItem::Quote { body } => Some(body.as_str()),
            ContentItem::Link { text, .. } => text.as_deref(),
            ContentItem::Image { .. } | ContentItem::Video { .. } => None,
        }
    }

    /// Merge more text into a text-bearing item, separated by a single
    /// space. Returns `false` (and leaves the item untouched) for kinds that
    /// carry no body.
    pub fn append(&mut self, text: &str) -> bool {
        let body = match self {
            ContentItem::Text { body }
            | ContentItem::Heading { body, .. }
            | ContentItem::Quote { body } => body,
            _ => return false,
        };

        let addition = normalize_spaces(text);
        if addition.is_empty() {
            return true;
        }
        if !body.is_empty() {
            body.push(' ');
        }
        body.push_str(&addition);
        true
    }
}
