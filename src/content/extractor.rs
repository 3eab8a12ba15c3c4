use tracing::debug;

use crate::content::item::ContentItem;
use crate::content::pipeline::{ClassificationPipeline, DepthLimits};
use crate::content::tree::{DocumentTree, NodeId};
use crate::content::{matches_selector, ContentSelectors};
use crate::error::{Error, Result};

/// Turns article HTML into an ordered list of content items: locate the
/// article body, purify it, classify what is left.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    selectors: ContentSelectors,
    pipeline: ClassificationPipeline,
}

impl ContentExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: ContentSelectors::default(),
            pipeline: ClassificationPipeline::new()?,
        })
    }

    pub fn with_selectors(selectors: ContentSelectors) -> Result<Self> {
        Ok(Self {
            selectors,
            pipeline: ClassificationPipeline::new()?,
        })
    }

    pub fn with_limits(mut self, limits: DepthLimits) -> Self {
        self.pipeline = self.pipeline.with_limits(limits);
        self
    }

    /// Extract a full page: the first matching article container, or the
    /// whole body when none of the candidates is present.
    pub fn extract_page(&self, html: &str, base_uri: &str) -> Result<Vec<ContentItem>> {
        let mut tree = DocumentTree::parse(html);
        let body = tree
            .body()
            .ok_or_else(|| Error::ContentExtraction("Document has no body".to_string()))?;
        let root = self.locate_article(&tree, body).unwrap_or(body);

        self.purify(&mut tree, root);
        Ok(self.pipeline.classify(&tree, root, base_uri))
    }

    /// Extract an already isolated fragment, such as feed-embedded content.
    pub fn extract_fragment(&self, html: &str, base_uri: &str) -> Result<Vec<ContentItem>> {
        let mut tree = DocumentTree::parse(html);
        let body = tree
            .body()
            .ok_or_else(|| Error::ContentExtraction("Fragment has no body".to_string()))?;

        self.purify(&mut tree, body);
        Ok(self.pipeline.classify(&tree, body, base_uri))
    }

    pub fn locate_article(&self, tree: &DocumentTree, body: NodeId) -> Option<NodeId> {
        self.selectors.article.iter().find_map(|selector| {
            tree.descendants(body)
                .find(|node| matches_selector(tree, *node, selector))
        })
    }

    /// Detach removal-list elements and `javascript:` anchors below `root`.
    /// Must run before classification. Returns how many subtrees were removed.
    pub fn purify(&self, tree: &mut DocumentTree, root: NodeId) -> usize {
        let view: &DocumentTree = tree;
        let doomed: Vec<NodeId> = view
            .descendants(root)
            .filter(|node| {
                self.selectors
                    .remove
                    .iter()
                    .any(|selector| matches_selector(view, *node, selector))
                    || is_script_anchor(view, *node)
            })
            .collect();

        for node in &doomed {
            tree.detach(*node);
        }

        debug!("Purified {} subtrees", doomed.len());
        doomed.len()
    }

    pub fn classify(&self, tree: &DocumentTree, root: NodeId, base_uri: &str) -> Vec<ContentItem> {
        self.pipeline.classify(tree, root, base_uri)
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new().expect("Failed to create default ContentExtractor")
    }
}

fn is_script_anchor(tree: &DocumentTree, node: NodeId) -> bool {
    tree.tag(node) == Some("a")
        && tree
            .attr(node, "href")
            .map_or(false, |href| href.trim_start().to_ascii_lowercase().starts_with("javascript"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://news.example.com/story";

    #[test]
    fn test_extractor_creation() {
        assert!(ContentExtractor::new().is_ok());
    }

    #[test]
    fn test_purify_removes_disallowed_elements() {
        let extractor = ContentExtractor::new().unwrap();
        let mut tree = DocumentTree::parse(
            "<p>Keep</p><script>var x = 1;</script><style>p{}</style><form><input></form>\
             <table><tr><td>cell</td></tr></table><video src=\"v.mp4\"></video>\
             <a href=\"javascript:void(0)\">click</a>",
        );
        let body = tree.body().unwrap();

        let removed = extractor.purify(&mut tree, body);

        assert_eq!(removed, 6);
        assert_eq!(tree.text_content(body), "Keep");
    }

    #[test]
    fn test_extract_fragment_drops_scripts() {
        let extractor = ContentExtractor::new().unwrap();
        let items = extractor
            .extract_fragment("<p>Visible</p><script>hidden()</script>", BASE)
            .unwrap();

        assert_eq!(items, vec![ContentItem::Text { body: "Visible".to_string() }]);
    }

    #[test]
    fn test_extract_page_prefers_article_container() {
        let extractor = ContentExtractor::new().unwrap();
        let html = "<html><body><nav><a href=\"/home\">Home</a></nav>\
                    <article><h1>Story</h1><p>Body text.</p></article>\
                    <footer>Footer</footer></body></html>";

        let items = extractor.extract_page(html, BASE).unwrap();

        assert_eq!(
            items,
            vec![
                ContentItem::Heading { body: "Story".to_string(), level: 1 },
                ContentItem::Text { body: "Body text.".to_string() },
            ]
        );
    }

    #[test]
    fn test_extract_page_falls_back_to_body() {
        let extractor = ContentExtractor::with_selectors(ContentSelectors {
            article: vec!["#missing".to_string()],
            ..ContentSelectors::default()
        })
        .unwrap();

        let items = extractor.extract_page("<div><p>Only</p></div>", BASE).unwrap();
        assert_eq!(items, vec![ContentItem::Text { body: "Only".to_string() }]);
    }
}
