//! Stateless node predicates.
//!
//! Every test here reads the tree and nothing else. Promotion to an
//! ancestor happens in [`crate::content::resolver`]; claiming and merging
//! happen in the pipeline.

use regex::Regex;

use crate::content::text::is_blank;
use crate::content::tree::{DocumentTree, NodeId};
use crate::content::uri;
use crate::error::{Error, Result};

const QUOTE_TAGS: [&str; 2] = ["q", "blockquote"];

const HEADING_TAGS: [(&str, u8); 6] = [
    ("h1", 1),
    ("h2", 2),
    ("h3", 3),
    ("h4", 4),
    ("h5", 5),
    ("h6", 6),
];

const IMAGE_TAGS: [&str; 2] = ["img", "amp-img"];

/// Inline tags whose text belongs to the enclosing block.
const FORMATTING_TAGS: [&str; 7] = ["strong", "b", "span", "s", "i", "a", "em"];

const LINK_SCHEMES: [&str; 2] = ["http", "https"];

const VIDEO_ID_PATTERN: &str =
    r"(?i)(youtu\.be/|youtube\.com/(watch\?(.*&)?v=|(embed|v)/))([\w-]{11})";

#[derive(Debug, Clone)]
pub struct NodeClassifier {
    video_id: Regex,
}

impl NodeClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            video_id: Regex::new(VIDEO_ID_PATTERN)
                .map_err(|e| Error::ContentExtraction(e.to_string()))?,
        })
    }

    pub fn has_text(&self, tree: &DocumentTree, node: NodeId) -> bool {
        !is_blank(&tree.text_content(node))
    }

    pub fn is_quote(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.tag(node).map_or(false, |tag| QUOTE_TAGS.contains(&tag))
    }

    pub fn heading_level(&self, tree: &DocumentTree, node: NodeId) -> Option<u8> {
        let tag = tree.tag(node)?;
        HEADING_TAGS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, level)| *level)
    }

    pub fn is_image(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.tag(node).map_or(false, |tag| IMAGE_TAGS.contains(&tag))
    }

    /// Direct child of a `picture` wrapper (`source` or `img`).
    pub fn is_picture_child(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.is_element(node)
            && tree.parent(node).and_then(|parent| tree.tag(parent)) == Some("picture")
    }

    pub fn is_iframe(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.tag(node) == Some("iframe")
    }

    pub fn is_formatting(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.tag(node).map_or(false, |tag| FORMATTING_TAGS.contains(&tag))
    }

    pub fn is_line_break(&self, tree: &DocumentTree, node: NodeId) -> bool {
        tree.tag(node) == Some("br")
    }

    /// Anchor with a non-empty `href` whose scheme, when present, is http(s).
    pub fn is_link(&self, tree: &DocumentTree, node: NodeId) -> bool {
        if tree.tag(node) != Some("a") {
            return false;
        }

        let href = tree.attr(node, "href").unwrap_or_default();
        if href.trim().is_empty() {
            return false;
        }

        match uri::scheme(href) {
            Some(scheme) => LINK_SCHEMES.contains(&scheme.as_str()),
            None => true,
        }
    }

    /// 11-character video id from `watch?v=`, `youtu.be/`, `embed/` or `v/` URLs.
    pub fn video_id(&self, src: &str) -> Option<String> {
        self.video_id
            .captures(src)
            .and_then(|captures| captures.get(5))
            .map(|id| id.as_str().to_string())
    }
}

impl Default for NodeClassifier {
    fn default() -> Self {
        Self::new().expect("Failed to compile video id pattern")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(tree: &DocumentTree, tag: &str) -> NodeId {
        tree.find_first(tree.body().unwrap(), tag).unwrap()
    }

    #[test]
    fn test_video_id_forms() {
        let classifier = NodeClassifier::new().unwrap();

        for src in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "//www.youtube.com/v/dQw4w9WgXcQ",
            "HTTPS://WWW.YOUTUBE.COM/EMBED/dQw4w9WgXcQ",
        ] {
            assert_eq!(classifier.video_id(src).as_deref(), Some("dQw4w9WgXcQ"), "{}", src);
        }

        assert_eq!(classifier.video_id("https://vimeo.com/123456789"), None);
        assert_eq!(classifier.video_id("https://youtu.be/short"), None);
    }

    #[test]
    fn test_link_schemes() {
        let classifier = NodeClassifier::new().unwrap();
        let tree = DocumentTree::parse(
            "<a href=\"/x\">a</a><a href=\"mailto:me@example.com\">b</a><a href=\"\">c</a><a>d</a><a href=\"https://e.com\">e</a>",
        );
        let anchors: Vec<NodeId> = tree
            .descendants(tree.body().unwrap())
            .filter(|id| tree.tag(*id) == Some("a"))
            .collect();

        let verdicts: Vec<bool> = anchors.iter().map(|id| classifier.is_link(&tree, *id)).collect();
        assert_eq!(verdicts, vec![true, false, false, false, true]);
    }

    #[test]
    fn test_heading_levels() {
        let classifier = NodeClassifier::new().unwrap();
        let tree = DocumentTree::parse("<h3>Three</h3><p>para</p>");

        assert_eq!(classifier.heading_level(&tree, first(&tree, "h3")), Some(3));
        assert_eq!(classifier.heading_level(&tree, first(&tree, "p")), None);
    }

    #[test]
    fn test_blank_text_is_not_text() {
        let classifier = NodeClassifier::new().unwrap();
        let tree = DocumentTree::parse("<blockquote>\u{00A0} \u{200B}</blockquote><q>said</q>");

        assert!(!classifier.has_text(&tree, first(&tree, "blockquote")));
        assert!(classifier.has_text(&tree, first(&tree, "q")));
        assert!(classifier.is_quote(&tree, first(&tree, "q")));
    }

    #[test]
    fn test_picture_child() {
        let classifier = NodeClassifier::new().unwrap();
        let tree = DocumentTree::parse(
            "<picture><source srcset=\"a.webp\"><img src=\"a.jpg\">caption</picture><img src=\"b.jpg\">",
        );
        let picture = first(&tree, "picture");
        let images: Vec<NodeId> = tree
            .descendants(tree.body().unwrap())
            .filter(|id| tree.tag(*id) == Some("img"))
            .collect();

        assert!(classifier.is_picture_child(&tree, first(&tree, "source")));
        assert!(classifier.is_picture_child(&tree, images[0]));
        assert!(!classifier.is_picture_child(&tree, images[1]));
        assert!(!classifier.is_picture_child(&tree, tree.children(picture)[2]));
        assert!(classifier.is_image(&tree, images[1]));
    }
}
