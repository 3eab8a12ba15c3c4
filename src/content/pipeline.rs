//! Node classification pipeline.
//!
//! Walks the leaves of an article body in document order and runs the
//! classifiers in fixed priority: quote, heading, link, video, image, text.
//! Each classifier may promote the leaf to a semantic ancestor first, then
//! claims that target in the pass's [`AttachmentMap`].

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::content::attachment::{AttachmentMap, Claim};
use crate::content::classifier::NodeClassifier;
use crate::content::item::ContentItem;
use crate::content::resolver::{AncestorResolver, Predicate};
use crate::content::text::normalize_spaces;
use crate::content::tree::{DocumentTree, NodeId};
use crate::content::uri;
use crate::error::Result;

/// Upward search limits, in parent steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLimits {
    pub quote: usize,
    pub heading: usize,
    pub link: usize,
    pub video: usize,
    pub formatting: usize,
    pub eviction: usize,
}

impl Default for DepthLimits {
    fn default() -> Self {
        Self {
            quote: 5,
            heading: 5,
            link: 5,
            video: 3,
            formatting: 6,
            eviction: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Quote,
    Heading,
    Link,
    Video,
    Image,
    Text,
}

const PRIORITY: [Step; 6] = [
    Step::Quote,
    Step::Heading,
    Step::Link,
    Step::Video,
    Step::Image,
    Step::Text,
];

enum Outcome {
    /// The classifier does not apply; the next one gets the node.
    Skip,
    /// The node is settled without a new item: duplicate claim or merged text.
    Absorbed,
    Produced,
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationPipeline {
    classifier: NodeClassifier,
    limits: DepthLimits,
}

impl ClassificationPipeline {
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: NodeClassifier::new()?,
            limits: DepthLimits::default(),
        })
    }

    pub fn with_limits(mut self, limits: DepthLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> DepthLimits {
        self.limits
    }

    /// Classify everything below `root`. Relative link and image targets
    /// resolve against `base_uri`. The tree is only read; each call starts
    /// from an empty attachment map.
    pub fn classify(&self, tree: &DocumentTree, root: NodeId, base_uri: &str) -> Vec<ContentItem> {
        let mut pass = Pass {
            tree,
            classifier: &self.classifier,
            resolver: AncestorResolver::new(tree, &self.classifier),
            limits: self.limits,
            base_uri,
            attachments: AttachmentMap::new(),
            items: Vec::new(),
        };

        for leaf in tree.leaves(root) {
            pass.visit(leaf);
        }

        debug!(
            "Classified {} items, {} still attached",
            pass.items.len(),
            pass.attachments.len()
        );
        pass.items
    }
}

struct Pass<'a> {
    tree: &'a DocumentTree,
    classifier: &'a NodeClassifier,
    resolver: AncestorResolver<'a>,
    limits: DepthLimits,
    base_uri: &'a str,
    attachments: AttachmentMap,
    items: Vec<ContentItem>,
}

impl Pass<'_> {
    fn visit(&mut self, node: NodeId) {
        for step in PRIORITY {
            let outcome = match step {
                Step::Quote => self.quote(node),
                Step::Heading => self.heading(node),
                Step::Link => self.link(node),
                Step::Video => self.video(node),
                Step::Image => self.image(node),
                Step::Text => self.text(node),
            };
            match outcome {
                Outcome::Skip => continue,
                Outcome::Absorbed | Outcome::Produced => return,
            }
        }

        if self.classifier.is_line_break(self.tree, node) {
            self.evict_above(node);
        }
    }

    fn quote(&mut self, node: NodeId) -> Outcome {
        let target = self
            .resolver
            .promote(node, Predicate::Quote, self.limits.quote)
            .unwrap_or(node);

        if !self.classifier.is_quote(self.tree, target) || !self.classifier.has_text(self.tree, target) {
            return Outcome::Skip;
        }

        let body = self.tree.text_content(target);
        self.produce(target, ContentItem::quote(&body))
    }

    fn heading(&mut self, node: NodeId) -> Outcome {
        let target = self
            .resolver
            .promote(node, Predicate::Heading, self.limits.heading)
            .unwrap_or(node);

        let Some(level) = self.classifier.heading_level(self.tree, target) else {
            return Outcome::Skip;
        };
        if !self.classifier.has_text(self.tree, target) {
            return Outcome::Skip;
        }

        let body = self.tree.text_content(target);
        self.produce(target, ContentItem::heading(&body, level))
    }

    fn link(&mut self, node: NodeId) -> Outcome {
        if self.classifier.is_image(self.tree, node) {
            return Outcome::Skip;
        }

        let target = self
            .resolver
            .promote(node, Predicate::Link, self.limits.link)
            .unwrap_or(node);
        if !self.classifier.is_link(self.tree, target) {
            return Outcome::Skip;
        }

        let href = self.tree.attr(target, "href").unwrap_or_default();
        let url = match uri::resolve(href, self.base_uri) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping link: {}", e);
                return Outcome::Skip;
            }
        };

        let text = self
            .classifier
            .has_text(self.tree, target)
            .then(|| normalize_spaces(&self.tree.text_content(target)));

        self.produce(target, ContentItem::Link { url, text })
    }

    fn video(&mut self, node: NodeId) -> Outcome {
        let target = self
            .resolver
            .promote(node, Predicate::Iframe, self.limits.video)
            .unwrap_or(node);
        if !self.classifier.is_iframe(self.tree, target) {
            return Outcome::Skip;
        }
        if let Claim::DuplicateClaim { .. } = self.attachments.claim(target) {
            return Outcome::Absorbed;
        }

        let src = self.tree.attr(target, "src").unwrap_or_default();
        match self.classifier.video_id(src) {
            Some(platform_id) => self.produce(target, ContentItem::Video { platform_id }),
            None => Outcome::Skip,
        }
    }

    fn image(&mut self, node: NodeId) -> Outcome {
        let in_picture = self.classifier.is_picture_child(self.tree, node);
        if !self.classifier.is_image(self.tree, node) && !in_picture {
            return Outcome::Skip;
        }

        let mut target = node;
        let mut image = node;

        if in_picture {
            let Some(picture) = self.tree.parent(node) else {
                return Outcome::Skip;
            };
            if let Claim::DuplicateClaim { .. } = self.attachments.claim(picture) {
                return Outcome::Absorbed;
            }
            if let Some(img) = self.tree.find_first(picture, "img") {
                image = img;
            }
            target = picture;
        }

        let src = self.tree.attr(image, "src").unwrap_or_default().trim();
        if src.is_empty() || src.get(..5).map_or(false, |head| head.eq_ignore_ascii_case("data:")) {
            return Outcome::Skip;
        }

        let url = match uri::resolve(src, self.base_uri) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping image: {}", e);
                return Outcome::Skip;
            }
        };

        let alt = self
            .tree
            .attr(image, "alt")
            .filter(|alt| !alt.is_empty())
            .map(str::to_string);

        self.produce(target, ContentItem::Image { url, alt })
    }

    fn text(&mut self, node: NodeId) -> Outcome {
        if self.tree.is_comment(node) || !self.classifier.has_text(self.tree, node) {
            return Outcome::Skip;
        }

        let mut target = node;
        if self.tree.is_text(node) {
            target = self
                .resolver
                .promote(node, Predicate::FormattingRoot, self.limits.formatting)
                .or_else(|| self.tree.parent(node))
                .unwrap_or(node);
        }
        if self.classifier.is_formatting(self.tree, target) {
            target = self.tree.parent(target).unwrap_or(target);
        }

        let body = self.tree.text_content(node);

        if let Claim::DuplicateClaim { slot } = self.attachments.claim(target) {
            let merged = self.items.get_mut(slot).map_or(false, |item| item.append(&body));
            if merged {
                trace!("Merged text into item {}", slot);
                return Outcome::Absorbed;
            }
            // The holder cannot take text (an image under `picture`, say),
            // so the text stands alone without claiming the node.
            debug!("Item {}: Text beside item {} at node {}", self.items.len(), slot, target.index());
            self.items.push(ContentItem::text(&body));
            return Outcome::Produced;
        }

        self.produce(target, ContentItem::text(&body))
    }

    /// Attach a fresh item to `target` and emit it, unless `target` is
    /// already claimed. A new attachment supersedes the ones above it.
    fn produce(&mut self, target: NodeId, item: ContentItem) -> Outcome {
        let slot = self.items.len();
        if let Claim::DuplicateClaim { slot: existing } = self.attachments.attach(target, slot) {
            trace!("Node {} already holds item {}", target.index(), existing);
            return Outcome::Absorbed;
        }

        let kind = item.kind();
        debug!("Item {}: {:?} at node {}", slot, kind, target.index());
        self.items.push(item);

        self.evict_above(target);
        Outcome::Produced
    }

    /// Detach unprotected attachments on up to `limits.eviction` ancestors
    /// of `node`, stopping at the first protected one.
    fn evict_above(&mut self, node: NodeId) {
        let mut current = self.tree.parent(node);
        let mut remaining = self.limits.eviction;

        while let Some(ancestor) = current {
            if remaining == 0 || self.tree.parent(ancestor).is_none() {
                break;
            }

            if let Some(slot) = self.attachments.get(ancestor) {
                if self.items[slot].kind().is_protected() {
                    break;
                }
                self.attachments.detach(ancestor);
                debug!("Evicted item {} from node {}", slot, ancestor.index());
            }

            remaining -= 1;
            current = self.tree.parent(ancestor);
        }
    }
}
