use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::content::ContentExtractor;
use crate::error::Result;
use crate::feed::{PageFetcher, Preview, PreviewSource};
use crate::post::{Post, PostAssembler};

/// An article that could not be turned into a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarvestFailure {
    pub uri: String,
    pub code: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestReport {
    pub posts: Vec<Post>,
    pub failures: Vec<HarvestFailure>,
}

impl HarvestReport {
    pub fn total(&self) -> usize {
        self.posts.len() + self.failures.len()
    }
}

/// Runs previews through fetch, extraction and assembly one article at a
/// time. An article-local failure is recorded and the batch moves on; any
/// other error ends the batch.
pub struct Harvester {
    fetcher: PageFetcher,
    extractor: ContentExtractor,
    description_length: usize,
    page_delay: Duration,
    pages_between_delay: usize,
}

impl Harvester {
    pub fn new(fetcher: PageFetcher, extractor: ContentExtractor) -> Self {
        Self {
            fetcher,
            extractor,
            description_length: crate::post::assembler::DEFAULT_DESCRIPTION_LENGTH,
            page_delay: Duration::ZERO,
            pages_between_delay: 0,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = PageFetcher::from_settings(&config.fetch);
        let extractor = ContentExtractor::with_selectors(config.selectors.clone())?
            .with_limits(config.extraction.depth_limits());

        Ok(Self::new(fetcher, extractor)
            .with_description_length(config.extraction.description_length)
            .with_delay(config.fetch.page_delay(), config.fetch.pages_between_delay))
    }

    pub fn with_description_length(mut self, description_length: usize) -> Self {
        self.description_length = description_length;
        self
    }

    /// Sleep for `delay` after the first fetched page and then after every
    /// `every` pages. Zero disables it.
    pub fn with_delay(mut self, delay: Duration, every: usize) -> Self {
        self.page_delay = delay;
        self.pages_between_delay = every;
        self
    }

    pub async fn harvest(&self, source: &dyn PreviewSource, limit: usize) -> Result<HarvestReport> {
        let previews = source.previews(limit).await?;
        info!("Harvesting {} articles from {}", previews.len(), source.source_id());

        let assembler =
            PostAssembler::new(source.source_id()).with_description_length(self.description_length);
        let mut report = HarvestReport::default();
        let mut fetched = 0usize;

        for preview in previews {
            let uri = preview.metadata.uri.clone();
            let needs_fetch = preview.content.is_none();

            match self.harvest_one(&assembler, preview).await {
                Ok(post) => report.posts.push(post),
                Err(e) if e.is_article_local() => {
                    warn!(
                        code = e.error_code(),
                        temporary = e.is_temporary(),
                        "Skipping article {}: {}",
                        uri,
                        e
                    );
                    report.failures.push(HarvestFailure {
                        uri,
                        code: e.error_code(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }

            if needs_fetch {
                fetched += 1;
                self.pause_if_due(fetched).await;
            }
        }

        info!(
            "Harvested {} posts from {} ({} failed)",
            report.posts.len(),
            source.source_id(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Build one post. Feed-embedded content is used as-is; otherwise the
    /// article page is downloaded.
    pub async fn harvest_one(&self, assembler: &PostAssembler, preview: Preview) -> Result<Post> {
        let Preview { metadata, content } = preview;

        let items = match content {
            Some(html) => {
                debug!("Using inline content for {}", metadata.uri);
                self.extractor.extract_fragment(&html, &metadata.uri)?
            }
            None => {
                let html = self.fetcher.fetch_page(&metadata.uri).await?;
                self.extractor.extract_page(&html, &metadata.uri)?
            }
        };

        assembler.assemble(metadata, items)
    }

    async fn pause_if_due(&self, fetched: usize) {
        if self.page_delay.is_zero() || !pause_due(fetched, self.pages_between_delay) {
            return;
        }
        debug!("Pausing {:?} after {} pages", self.page_delay, fetched);
        tokio::time::sleep(self.page_delay).await;
    }
}

/// Pauses fall after the first fetched page and then after every `every`
/// pages: 1, 1 + every, 1 + 2 * every...
fn pause_due(fetched: usize, every: usize) -> bool {
    every > 0 && fetched > 0 && (fetched - 1) % every == 0
}
