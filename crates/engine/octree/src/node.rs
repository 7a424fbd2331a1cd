//! Arena storage for octree nodes
//!
//! Nodes live in a flat `Vec` owned by the [`Octree`](crate::Octree). Parent
//! and child links are [`NodeId`] handles into that arena, never pointers, so
//! the tree has a single owner and no reference cycles. Freed slots bump
//! their generation, which turns every outstanding handle to a collapsed
//! node into a detectable stale handle instead of an alias for whatever
//! reuses the slot.

use crate::Octant;

/// Non-owning handle to a node in one octree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// The root of every tree; it lives outside the arena and is never freed
    pub const ROOT: NodeId = NodeId {
        index: u32::MAX,
        generation: u32::MAX,
    };

    /// Placeholder for child links that are filled in right after allocation
    pub(crate) const DANGLING: NodeId = NodeId {
        index: u32::MAX,
        generation: 0,
    };

    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

/// A node is either uniform over its whole volume or split into 8 children
#[derive(Debug, Clone, PartialEq)]
pub enum Node<T> {
    Leaf(T),
    Branch([NodeId; 8]),
}

impl<T> Node<T> {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    #[inline]
    pub fn leaf_value(&self) -> Option<&T> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Branch(_) => None,
        }
    }

    #[inline]
    pub fn children(&self) -> Option<&[NodeId; 8]> {
        match self {
            Node::Leaf(_) => None,
            Node::Branch(children) => Some(children),
        }
    }
}

/// One arena cell
#[derive(Debug, Clone)]
pub(crate) struct Slot<T> {
    pub generation: u32,
    pub entry: Option<Entry<T>>,
}

/// A live node together with its place in the tree
#[derive(Debug, Clone)]
pub(crate) struct Entry<T> {
    pub node: Node<T>,
    /// Absent at the root
    pub parent: Option<NodeId>,
    /// Position inside the parent; `Octant::A` at the root
    pub octant: Octant,
}
