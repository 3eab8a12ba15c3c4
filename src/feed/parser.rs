use crate::content::text::{is_blank, normalize_spaces};
use crate::content::DocumentTree;
use crate::error::{Error, Result};
use crate::feed::Preview;
use crate::post::PreviewMetadata;
use feed_rs::model::Entry;
use feed_rs::parser as feed_parser;
use std::io::BufRead;
use tracing::debug;

pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Turn an RSS/Atom document into article previews. Entries without a
    /// link cannot be resolved and are skipped; entries without a title are
    /// kept and rejected later by the assembler.
    pub fn parse_feed<R: BufRead>(&self, reader: R) -> Result<Vec<Preview>> {
        let feed = feed_parser::parse(reader)
            .map_err(|e| Error::FeedParse(format!("Failed to parse feed: {}", e)))?;

        let previews: Vec<Preview> = feed
            .entries
            .into_iter()
            .filter_map(|entry| self.preview_from_entry(entry))
            .collect();

        debug!("Parsed {} previews", previews.len());
        Ok(previews)
    }

    fn preview_from_entry(&self, entry: Entry) -> Option<Preview> {
        let uri = entry.links.first().map(|l| l.href.clone())?;
        let title = entry
            .title
            .map(|t| normalize_spaces(&t.content))
            .unwrap_or_default();

        let mut metadata = PreviewMetadata::new(title, uri);
        metadata.published_at = entry.published.or(entry.updated);
        metadata.description = entry
            .summary
            .map(|s| plain_text(&s.content))
            .filter(|s| !is_blank(s));
        metadata.image = entry.media.iter().find_map(|media| {
            media
                .content
                .iter()
                .find(|content| {
                    content
                        .content_type
                        .as_ref()
                        .map_or(false, |mime| mime.to_string().starts_with("image/"))
                })
                .and_then(|content| content.url.as_ref().map(|url| url.to_string()))
                .or_else(|| media.thumbnails.first().map(|thumb| thumb.image.uri.clone()))
        });

        let content = entry
            .content
            .and_then(|c| c.body)
            .filter(|body| !is_blank(body));

        Some(Preview { metadata, content })
    }

    pub fn validate_feed_url(&self, url: &str) -> Result<()> {
        let parsed_url = url::Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("Invalid URL: {}", e)))?;

        match parsed_url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(Error::InvalidUrl(format!("Unsupported scheme: {}", scheme))),
        }
    }
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed summaries are often HTML; keep only their text.
fn plain_text(html: &str) -> String {
    let tree = DocumentTree::parse(html);
    match tree.body() {
        Some(body) => normalize_spaces(&tree.text_content(body)),
        None => normalize_spaces(html),
    }
}
