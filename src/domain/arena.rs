use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult, MoveDirection};
use crate::domain::node::{NodeData, NodeRecord};
use crate::domain::NodeId;

/// Tree node in the arena-based forest.
#[derive(Debug)]
pub struct TreeNode {
    /// Node payload
    pub data: NodeData,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Where a new node goes relative to the existing forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Appended to the children of `parent`, or to the roots if `parent` is empty
    LastChildOf(NodeId),
    /// Spliced into the sibling sequence right before the target
    Before(NodeId),
    /// Spliced into the sibling sequence right after the target
    After(NodeId),
}

/// Arena-based forest with an identifier index.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Every node reachable from `roots` has exactly one entry in `index` and
/// there are no other entries.
#[derive(Debug, Default)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
    /// Top-level nodes in display order
    roots: Vec<Index>,
    /// Normalized id -> arena slot
    index: HashMap<NodeId, Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Arena slot for a normalized id. The empty id is never found.
    pub fn lookup(&self, id: &NodeId) -> Option<Index> {
        if id.is_empty() {
            return None;
        }
        self.index.get(id).copied()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        self.lookup(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut TreeNode> {
        let idx = self.lookup(id)?;
        self.arena.get_mut(idx)
    }

    pub fn exists(&self, id: &NodeId) -> bool {
        self.lookup(id).is_some()
    }

    /// Inserts a node.
    ///
    /// Returns `None` without touching the forest when the id is empty, the id
    /// is already taken, or the parent/target cannot be found.
    /// `data.parent_id` is overwritten with the actual parent.
    #[instrument(level = "debug", skip(self, data), fields(id = %data.id))]
    pub fn insert(&mut self, data: NodeData, placement: Placement) -> Option<Index> {
        if data.id.is_empty() || self.exists(&data.id) {
            debug!("insert skipped: empty or duplicate id");
            return None;
        }

        let (parent, position) = match &placement {
            Placement::LastChildOf(parent_id) if parent_id.is_empty() => (None, None),
            Placement::LastChildOf(parent_id) => (Some(self.lookup(parent_id)?), None),
            Placement::Before(target) | Placement::After(target) => {
                let target_idx = self.lookup(target)?;
                let parent = self.arena.get(target_idx)?.parent;
                let pos = self.position(target_idx)?;
                let pos = if matches!(placement, Placement::After(_)) {
                    pos + 1
                } else {
                    pos
                };
                (parent, Some(pos))
            }
        };

        let id = data.id.clone();
        let node_idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
        });
        self.attach(node_idx, parent, position);
        self.index.insert(id, node_idx);
        Some(node_idx)
    }

    /// Removes a node together with its subtree.
    ///
    /// Returns the removed ids in pre-order (the node itself first), empty if
    /// the node does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &NodeId) -> Vec<NodeId> {
        let Some(idx) = self.lookup(id) else {
            return Vec::new();
        };
        self.detach(idx);

        let subtree = self.subtree(idx);
        let mut removed = Vec::with_capacity(subtree.len());
        for node_idx in subtree {
            if let Some(node) = self.arena.remove(node_idx) {
                self.index.remove(&node.data.id);
                removed.push(node.data.id);
            }
        }
        removed
    }

    /// Removes every direct child of a node (and their subtrees).
    #[instrument(level = "debug", skip(self))]
    pub fn remove_children(&mut self, id: &NodeId) -> Vec<NodeId> {
        let child_ids: Vec<NodeId> = self
            .find(id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.arena.get(c))
                    .map(|c| c.data.id.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut removed = Vec::new();
        for child_id in &child_ids {
            removed.extend(self.remove(child_id));
        }
        if let Some(node) = self.find_mut(id) {
            node.children.clear();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.roots.clear();
        self.index.clear();
    }

    /// Ordered sibling sequence containing `idx` (roots or parent's children).
    pub fn siblings(&self, idx: Index) -> Option<&[Index]> {
        match self.arena.get(idx)?.parent {
            Some(parent) => self.arena.get(parent).map(|p| p.children.as_slice()),
            None => Some(self.roots.as_slice()),
        }
    }

    /// Position of `idx` within its sibling sequence.
    pub fn position(&self, idx: Index) -> Option<usize> {
        self.siblings(idx)?.iter().position(|&s| s == idx)
    }

    /// Promotes a node to be a sibling of its parent (appended after the
    /// grandparent's existing children, or to the roots).
    #[instrument(level = "debug", skip(self))]
    pub fn move_left(&mut self, id: &NodeId) -> DomainResult<()> {
        let idx = self.require(id)?;
        let Some(parent) = self.arena[idx].parent else {
            return Err(DomainError::invalid_move(
                id,
                MoveDirection::Left,
                "node is already at root level",
            ));
        };
        let grandparent = self.arena.get(parent).and_then(|p| p.parent);
        self.detach(idx);
        self.attach(idx, grandparent, None);
        Ok(())
    }

    /// Demotes a node to the last child of its preceding sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_right(&mut self, id: &NodeId) -> DomainResult<()> {
        let idx = self.require(id)?;
        let pos = self.position(idx).unwrap_or(0);
        if pos == 0 {
            return Err(DomainError::invalid_move(
                id,
                MoveDirection::Right,
                "first node has no preceding sibling",
            ));
        }
        let new_parent = self.siblings(idx).map(|s| s[pos - 1]);
        self.detach(idx);
        self.attach(idx, new_parent, None);
        Ok(())
    }

    /// Swaps a node with its preceding sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_up(&mut self, id: &NodeId) -> DomainResult<()> {
        let idx = self.require(id)?;
        let parent = self.arena[idx].parent;
        let pos = self.position(idx).unwrap_or(0);
        if pos == 0 {
            return Err(DomainError::invalid_move(
                id,
                MoveDirection::Up,
                "node is already first",
            ));
        }
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.swap(pos - 1, pos);
        }
        Ok(())
    }

    /// Swaps a node with its following sibling.
    #[instrument(level = "debug", skip(self))]
    pub fn move_down(&mut self, id: &NodeId) -> DomainResult<()> {
        let idx = self.require(id)?;
        let parent = self.arena[idx].parent;
        let pos = self.position(idx).unwrap_or(0);
        let len = self.siblings(idx).map_or(0, <[Index]>::len);
        if pos + 1 >= len {
            return Err(DomainError::invalid_move(
                id,
                MoveDirection::Down,
                "node is already last",
            ));
        }
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.swap(pos, pos + 1);
        }
        Ok(())
    }

    /// Moves a node (with its subtree) to the end of `target`'s children.
    ///
    /// Rejects dropping a node onto itself or onto one of its descendants.
    #[instrument(level = "debug", skip(self))]
    pub fn reparent(&mut self, id: &NodeId, target: &NodeId) -> DomainResult<()> {
        let idx = self.require(id)?;
        let target_idx = self.require(target)?;
        if idx == target_idx {
            return Err(DomainError::InvalidDrop {
                dragged: id.clone(),
                target: target.clone(),
                reason: "node cannot be dropped onto itself",
            });
        }
        if self.is_ancestor(idx, target_idx) {
            return Err(DomainError::InvalidDrop {
                dragged: id.clone(),
                target: target.clone(),
                reason: "node cannot be dropped onto its own descendant",
            });
        }
        self.detach(idx);
        self.attach(idx, Some(target_idx), None);
        Ok(())
    }

    /// True if `ancestor` lies on the parent chain of `idx`.
    pub fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = self.arena.get(idx).and_then(|n| n.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.arena.get(p).and_then(|n| n.parent);
        }
        false
    }

    /// Applies `f` to a node and every descendant in pre-order.
    ///
    /// Returns false if the node does not exist.
    #[instrument(level = "trace", skip(self, f))]
    pub fn apply_recursive<F>(&mut self, id: &NodeId, mut f: F) -> bool
    where
        F: FnMut(&mut NodeData),
    {
        let Some(idx) = self.lookup(id) else {
            return false;
        };
        for node_idx in self.subtree(idx) {
            if let Some(node) = self.arena.get_mut(node_idx) {
                f(&mut node.data);
            }
        }
        true
    }

    /// Pre-order traversal of the whole forest.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.roots.iter().rev().copied().collect())
    }

    /// Pre-order slots of `idx` and its descendants.
    pub fn subtree(&self, idx: Index) -> Vec<Index> {
        TreeIterator::new(self, vec![idx]).map(|(i, _)| i).collect()
    }

    /// Number of levels in the deepest tree of the forest.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Ids of all leaf nodes, in pre-order.
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| node.data.id.clone())
            .collect()
    }

    /// Nested record of a node, optionally with its subtree.
    pub fn record(&self, idx: Index, include_children: bool) -> Option<NodeRecord> {
        let node = self.arena.get(idx)?;
        let mut record = node.data.to_record();
        if include_children {
            record.nodes = node
                .children
                .iter()
                .filter_map(|&c| self.record(c, true))
                .collect();
        }
        Some(record)
    }

    /// The whole forest as nested records.
    pub fn to_records(&self) -> Vec<NodeRecord> {
        self.roots
            .iter()
            .filter_map(|&root| self.record(root, true))
            .collect()
    }

    fn require(&self, id: &NodeId) -> DomainResult<Index> {
        self.lookup(id)
            .ok_or_else(|| DomainError::NodeNotFound(id.clone()))
    }

    fn siblings_mut(&mut self, parent: Option<Index>) -> Option<&mut Vec<Index>> {
        match parent {
            Some(p) => self.arena.get_mut(p).map(|n| &mut n.children),
            None => Some(&mut self.roots),
        }
    }

    /// Unlinks `idx` from its sibling sequence; the subtree stays intact.
    fn detach(&mut self, idx: Index) {
        let parent = self.arena.get(idx).and_then(|n| n.parent);
        if let Some(siblings) = self.siblings_mut(parent) {
            siblings.retain(|&s| s != idx);
        }
    }

    /// Links `idx` into the sibling sequence of `parent` at `position`
    /// (appended when `None`) and rewrites its parent references.
    fn attach(&mut self, idx: Index, parent: Option<Index>, position: Option<usize>) {
        let parent_id = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.data.id.clone())
            .unwrap_or_default();
        if let Some(siblings) = self.siblings_mut(parent) {
            match position {
                Some(pos) if pos <= siblings.len() => siblings.insert(pos, idx),
                _ => siblings.push(idx),
            }
        }
        if let Some(node) = self.arena.get_mut(idx) {
            node.parent = parent;
            node.data.parent_id = parent_id;
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, stack: Vec<Index>) -> Self {
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
