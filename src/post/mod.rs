pub mod assembler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;

pub use assembler::PostAssembler;

/// Format of [`Post::published_at`].
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What a preview list or feed knows about an article before its page is read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewMetadata {
    pub title: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl PreviewMetadata {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
            ..Self::default()
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// Final article record handed to storage or publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub source_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_image: Option<String>,
    pub items: Vec<ContentItem>,
}

impl Post {
    /// Plain-text rendering used by the CLI's `text` output.
    pub fn to_text(&self) -> String {
        let mut text = String::new();

        text.push_str(&format!("Title: {}\n", self.title));
        text.push_str(&format!("Published: {}\n", self.published_at));
        text.push_str(&format!("Link: {}\n", self.source_uri));
        if let Some(image) = &self.lead_image {
            text.push_str(&format!("Image: {}\n", image));
        }
        text.push_str(&format!("\n{}\n\n---\n", self.description));

        for item in &self.items {
            let line = match item {
                ContentItem::Text { body } => body.clone(),
                ContentItem::Heading { body, level } => {
                    format!("{} {}", "#".repeat(usize::from(*level)), body)
                }
                ContentItem::Quote { body } => format!("> {}", body),
                ContentItem::Link { url, text } => match text {
                    Some(text) => format!("[{}]({})", text, url),
                    None => format!("<{}>", url),
                },
                ContentItem::Image { url, alt } => {
                    format!("![{}]({})", alt.as_deref().unwrap_or_default(), url)
                }
                ContentItem::Video { platform_id } => {
                    format!("https://www.youtube.com/watch?v={}", platform_id)
                }
            };
            text.push('\n');
            text.push_str(&line);
            text.push('\n');
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_builder() {
        let preview = PreviewMetadata::new("Title", "https://e.com/a")
            .with_image("https://e.com/a.jpg")
            .with_description("Lead");

        assert_eq!(preview.title, "Title");
        assert_eq!(preview.image.as_deref(), Some("https://e.com/a.jpg"));
        assert_eq!(preview.description.as_deref(), Some("Lead"));
        assert!(preview.published_at.is_none());
    }

    #[test]
    fn test_post_to_text() {
        let post = Post {
            source_id: "test".to_string(),
            title: "Title".to_string(),
            description: "Lead".to_string(),
            published_at: "2024-03-16 10:00:00".to_string(),
            source_uri: "https://e.com/a".to_string(),
            lead_image: None,
            items: vec![
                ContentItem::heading("Section", 2),
                ContentItem::quote("Said"),
                ContentItem::Link { url: "https://e.com/b".to_string(), text: Some("more".to_string()) },
            ],
        };

        let text = post.to_text();
        assert!(text.starts_with("Title: Title\n"));
        assert!(text.contains("## Section"));
        assert!(text.contains("> Said"));
        assert!(text.contains("[more](https://e.com/b)"));
    }
}
