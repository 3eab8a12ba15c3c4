use crate::content::classifier::NodeClassifier;
use crate::content::tree::{DocumentTree, NodeId};

/// The closed set of tests a node can be promoted towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Quote,
    Heading,
    Link,
    Iframe,
    /// Outermost formatting tag of a chain: a formatting tag whose parent
    /// is not one.
    FormattingRoot,
}

/// Bounded upward search from a node to the nearest ancestor satisfying a
/// [`Predicate`].
pub struct AncestorResolver<'a> {
    tree: &'a DocumentTree,
    classifier: &'a NodeClassifier,
}

impl<'a> AncestorResolver<'a> {
    pub fn new(tree: &'a DocumentTree, classifier: &'a NodeClassifier) -> Self {
        Self { tree, classifier }
    }

    pub fn matches(&self, predicate: Predicate, node: NodeId) -> bool {
        let (tree, classifier) = (self.tree, self.classifier);
        match predicate {
            Predicate::Quote => classifier.is_quote(tree, node),
            Predicate::Heading => classifier.heading_level(tree, node).is_some(),
            Predicate::Link => classifier.is_link(tree, node),
            Predicate::Iframe => classifier.is_iframe(tree, node),
            Predicate::FormattingRoot => {
                let parent_formats = tree
                    .parent(node)
                    .map_or(false, |parent| classifier.is_formatting(tree, parent));
                !parent_formats && classifier.is_formatting(tree, node)
            }
        }
    }

    /// `node` itself when it matches, otherwise the first ancestor within
    /// `max_depth` parent steps that does.
    pub fn promote(&self, node: NodeId, predicate: Predicate, max_depth: usize) -> Option<NodeId> {
        let mut current = node;
        let mut depth = max_depth;

        loop {
            if self.matches(predicate, current) {
                return Some(current);
            }
            if depth == 0 {
                return None;
            }
            current = self.tree.parent(current)?;
            depth -= 1;
        }
    }
}
