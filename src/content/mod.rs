pub mod attachment;
pub mod classifier;
pub mod extractor;
pub mod item;
pub mod pipeline;
pub mod resolver;
pub mod text;
pub mod tree;
pub mod uri;

use serde::{Deserialize, Serialize};

pub use attachment::{AttachmentMap, Claim};
pub use classifier::NodeClassifier;
pub use extractor::ContentExtractor;
pub use item::{ContentItem, ItemKind};
pub use pipeline::{ClassificationPipeline, DepthLimits};
pub use resolver::{AncestorResolver, Predicate};
pub use tree::{DocumentTree, NodeId};

/// Simple selectors for locating the article body and pruning it:
/// `tag`, `.class` or `#id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSelectors {
    #[serde(default = "default_article")]
    pub article: Vec<String>,
    #[serde(default = "default_remove")]
    pub remove: Vec<String>,
}

impl Default for ContentSelectors {
    fn default() -> Self {
        Self {
            article: default_article(),
            remove: default_remove(),
        }
    }
}

fn default_article() -> Vec<String> {
    vec![
        "article".to_string(),
        ".post-content".to_string(),
        ".entry-content".to_string(),
        ".article-body".to_string(),
        "main".to_string(),
    ]
}

fn default_remove() -> Vec<String> {
    vec![
        "script".to_string(),
        "style".to_string(),
        "form".to_string(),
        "video".to_string(),
        "table".to_string(),
    ]
}

/// Whether `selector` matches the node.
pub fn matches_selector(tree: &DocumentTree, node: NodeId, selector: &str) -> bool {
    let selector = selector.trim();

    if let Some(class) = selector.strip_prefix('.') {
        tree.attr(node, "class")
            .map_or(false, |classes| classes.split_whitespace().any(|c| c == class))
    } else if let Some(id) = selector.strip_prefix('#') {
        tree.attr(node, "id") == Some(id)
    } else {
        tree.tag(node)
            .map_or(false, |tag| tag.eq_ignore_ascii_case(selector))
    }
}
