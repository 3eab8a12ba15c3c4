pub mod fetcher;
pub mod parser;

use async_trait::async_trait;

use crate::error::Result;
use crate::post::PreviewMetadata;

pub use fetcher::PageFetcher;
pub use parser::FeedParser;

/// One candidate article: its metadata plus, when the listing already
/// carries it, the article HTML itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub metadata: PreviewMetadata,
    pub content: Option<String>,
}

impl Preview {
    pub fn new(metadata: PreviewMetadata) -> Self {
        Self { metadata, content: None }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Where article previews come from.
#[async_trait]
pub trait PreviewSource: Send + Sync {
    /// Identifier stamped on every post built from this source.
    fn source_id(&self) -> &str;

    async fn previews(&self, limit: usize) -> Result<Vec<Preview>>;
}

/// An RSS/Atom feed read over HTTP.
pub struct FeedSource {
    name: String,
    url: String,
    fetcher: PageFetcher,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, fetcher: PageFetcher) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl PreviewSource for FeedSource {
    fn source_id(&self) -> &str {
        &self.name
    }

    async fn previews(&self, limit: usize) -> Result<Vec<Preview>> {
        let mut previews = self.fetcher.fetch_feed(&self.url).await?;
        previews.truncate(limit);
        Ok(previews)
    }
}

/// A fixed list of previews, e.g. a single URL given on the command line.
pub struct StaticSource {
    name: String,
    previews: Vec<Preview>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, previews: Vec<Preview>) -> Self {
        Self {
            name: name.into(),
            previews,
        }
    }
}

#[async_trait]
impl PreviewSource for StaticSource {
    fn source_id(&self) -> &str {
        &self.name
    }

    async fn previews(&self, limit: usize) -> Result<Vec<Preview>> {
        Ok(self.previews.iter().take(limit).cloned().collect())
    }
}
