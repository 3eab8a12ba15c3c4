use std::collections::HashMap;

use crate::content::tree::NodeId;

/// Outcome of asking whether a node may take a new item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Free,
    /// The node already holds the item at `slot` in the output list.
    DuplicateClaim { slot: usize },
}

/// Node → item table for one extraction pass.
///
/// Values are slots in the pass's append-only output list, so the map and
/// the list share each item. Detaching drops only the map entry; the item
/// stays in the list.
#[derive(Debug, Default)]
pub struct AttachmentMap {
    slots: HashMap<NodeId, usize>,
}

impl AttachmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, node: NodeId) -> Claim {
        match self.slots.get(&node) {
            Some(&slot) => Claim::DuplicateClaim { slot },
            None => Claim::Free,
        }
    }

    /// Attach `node` to `slot`. An already attached node keeps its existing
    /// slot and the duplicate claim is reported back.
    pub fn attach(&mut self, node: NodeId, slot: usize) -> Claim {
        match self.claim(node) {
            Claim::Free => {
                self.slots.insert(node, slot);
                Claim::Free
            }
            duplicate => duplicate,
        }
    }

    pub fn get(&self, node: NodeId) -> Option<usize> {
        self.slots.get(&node).copied()
    }

    pub fn detach(&mut self, node: NodeId) -> Option<usize> {
        self.slots.remove(&node)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
