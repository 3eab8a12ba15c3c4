use chrono::Utc;
use tracing::info;

use crate::content::text::{is_blank, normalize_spaces};
use crate::content::ContentItem;
use crate::error::{Error, Result};
use crate::post::{Post, PreviewMetadata, PUBLISHED_AT_FORMAT};

pub const DEFAULT_DESCRIPTION_LENGTH: usize = 200;

/// Builds the final [`Post`] from preview metadata and classified items.
///
/// The first image becomes the lead image and later copies of it are
/// dropped. Without an explicit description, leading items are folded
/// into one until it reaches `description_length` characters; links keep
/// their place in the content while lending their text.
#[derive(Debug, Clone)]
pub struct PostAssembler {
    source_id: String,
    description_length: usize,
}

impl PostAssembler {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            description_length: DEFAULT_DESCRIPTION_LENGTH,
        }
    }

    pub fn with_description_length(mut self, description_length: usize) -> Self {
        self.description_length = description_length;
        self
    }

    pub fn assemble(&self, metadata: PreviewMetadata, items: Vec<ContentItem>) -> Result<Post> {
        if is_blank(&metadata.title) {
            return Err(Error::InvalidTitle(metadata.uri));
        }

        let published_at = metadata
            .published_at
            .unwrap_or_else(Utc::now)
            .format(PUBLISHED_AT_FORMAT)
            .to_string();

        let explicit_description = metadata.description.filter(|text| !is_blank(text));
        let mut lead_image = metadata.image.filter(|uri| !uri.trim().is_empty());
        let mut auto_description = String::new();
        let mut kept = Vec::with_capacity(items.len());

        for item in items {
            if let ContentItem::Image { url, .. } = &item {
                if lead_image.is_none() {
                    lead_image = Some(url.clone());
                    continue;
                }
                if lead_image.as_deref() == Some(url.as_str()) {
                    continue;
                }
            }

            if explicit_description.is_some() {
                kept.push(item);
                continue;
            }

            if !item.is_image() && auto_description.chars().count() < self.description_length {
                if let Some(text) = item.text_content().filter(|text| !text.is_empty()) {
                    if !auto_description.is_empty() {
                        auto_description.push(' ');
                    }
                    auto_description.push_str(text);
                }
                if !item.is_link() {
                    continue;
                }
            }

            kept.push(item);
        }

        let description = match explicit_description {
            Some(description) => description,
            None if !auto_description.is_empty() => normalize_spaces(&auto_description),
            None => metadata.title.clone(),
        };

        info!(
            "Assembled '{}': {} items, description {} chars",
            metadata.title,
            kept.len(),
            description.chars().count()
        );

        Ok(Post {
            source_id: self.source_id.clone(),
            title: metadata.title,
            description,
            published_at,
            source_uri: metadata.uri,
            lead_image,
            items: kept,
        })
    }
}
