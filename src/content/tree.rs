//! Arena-backed HTML document model.
//!
//! Nodes are addressed by [`NodeId`], a stable index into the arena. The
//! index space mirrors the `select` document the tree was built from, so a
//! node found with a `select` predicate maps straight onto the arena.
//! Nothing ever leaves the arena: [`DocumentTree::detach`] only unlinks a
//! subtree from its parent, which keeps every previously issued id valid.

use select::document::Document;
use select::node::Data;

/// Stable identity of a node inside one [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element { name: String, attrs: Vec<(String, String)> },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: Vec<TreeNode>,
}

impl From<&Document> for DocumentTree {
    fn from(document: &Document) -> Self {
        let nodes = (0..document.nodes.len())
            .filter_map(|index| document.nth(index))
            .map(|node| {
                let data = match node.data() {
                    Data::Element(name, attrs) => NodeData::Element {
                        name: name.local.to_string().to_ascii_lowercase(),
                        attrs: attrs
                            .iter()
                            .map(|(key, value)| (key.local.to_string(), value.to_string()))
                            .collect(),
                    },
                    Data::Text(text) => NodeData::Text(text.to_string()),
                    Data::Comment(text) => NodeData::Comment(text.to_string()),
                };

                TreeNode {
                    data,
                    parent: node.parent().map(|parent| NodeId(parent.index())),
                    children: node.children().map(|child| NodeId(child.index())).collect(),
                }
            })
            .collect();

        Self { nodes }
    }
}

impl DocumentTree {
    /// Parse an HTML document or fragment. Fragments are wrapped in the
    /// implicit `html`/`body` elements the HTML5 parser synthesizes.
    pub fn parse(html: &str) -> Self {
        Self::from(&Document::from(html))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Map a raw `select` node index onto the arena.
    pub fn node_id(&self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then_some(NodeId(index))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Lowercase tag name for elements, `None` for text and comments.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.get(id).map(|node| &node.data) {
            Some(NodeData::Element { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.tag(id).is_some()
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|node| &node.data), Some(NodeData::Text(_)))
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.get(id).map(|node| &node.data), Some(NodeData::Comment(_)))
    }

    /// Attribute value, with an absent attribute and a missing node both `None`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.get(id).map(|node| &node.data) {
            Some(NodeData::Element { attrs, .. }) => attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of the node and all its descendants, comments excluded.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else { continue };
            match &node.data {
                NodeData::Text(value) => text.push_str(value),
                NodeData::Comment(_) => {}
                NodeData::Element { .. } => stack.extend(node.children.iter().rev()),
            }
        }

        text
    }

    /// Pre-order walk of everything below `root`, `root` itself excluded.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(root).iter().rev().copied().collect(),
        }
    }

    /// Childless descendants of `root` in document order.
    pub fn leaves(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(root)
            .filter(move |id| self.children(*id).is_empty())
    }

    /// First element below `root` (inclusive) with the given tag.
    pub fn find_first(&self, root: NodeId, tag: &str) -> Option<NodeId> {
        if self.tag(root) == Some(tag) {
            return Some(root);
        }
        self.descendants(root).find(|id| self.tag(*id) == Some(tag))
    }

    /// The document `body` element, present for anything the HTML5 parser built.
    pub fn body(&self) -> Option<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .find(|id| self.tag(*id) == Some("body"))
    }

    /// Unlink a subtree from its parent. The subtree stays in the arena but
    /// is no longer reachable from any ancestor.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else { return };

        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|child| *child != id);
        }
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.parent = None;
        }
    }
}

pub struct Descendants<'a> {
    tree: &'a DocumentTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
