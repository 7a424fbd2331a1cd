//! Flattened pre-order node stream
//!
//! A tree flattens to one [`FlatNode`] per node, parents before children and
//! children in `Octant::ALL` order. Leaves carry their value; branches carry
//! nothing, since their 8 children follow. Placement (`origin`, `size`) is
//! not part of the stream and is supplied again when rebuilding.
//!
//! Rebuilding accepts non-canonical streams (8 equal leaves under a branch)
//! and collapses them, so the result always satisfies the canonical form.

use crate::error::Result;
use crate::node::{Node, NodeId};
use crate::{Octant, Octree, OctreeError};
use glam::IVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlatNode<T> {
    Branch,
    Leaf(T),
}

impl<T: Clone> Octree<T> {
    /// Flatten the tree into its pre-order node stream
    pub fn to_flat(&self) -> Vec<FlatNode<T>> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack = vec![self.root_id()];
        while let Some(id) = stack.pop() {
            match self.node(id) {
                Ok(Node::Leaf(value)) => out.push(FlatNode::Leaf(value.clone())),
                Ok(Node::Branch(children)) => {
                    out.push(FlatNode::Branch);
                    stack.extend(children.iter().rev());
                }
                Err(_) => {}
            }
        }
        out
    }
}

impl<T: Clone + PartialEq> Octree<T> {
    /// Rebuild a tree from a pre-order node stream
    ///
    /// The stream must describe exactly one complete tree: running out early
    /// fails with [`OctreeError::TruncatedStream`], leftover nodes with
    /// [`OctreeError::TrailingNodes`]. A branch at unit size is rejected with
    /// [`OctreeError::UnitBranch`].
    pub fn from_flat<I>(origin: IVec3, size: i32, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = FlatNode<T>>,
    {
        Self::check_placement(origin, size)?;
        let mut nodes = nodes.into_iter();
        let first = nodes.next().ok_or(OctreeError::TruncatedStream(0))?;
        let mut read = 1;

        let mut tree = match first {
            FlatNode::Leaf(value) => Self::new(origin, size, value)?,
            FlatNode::Branch => {
                if size < 2 {
                    return Err(OctreeError::UnitBranch(0));
                }
                let mut tree = Self::with_root(origin, size, Node::Branch([NodeId::DANGLING; 8]))?;
                let children = tree.read_children(&mut nodes, &mut read, NodeId::ROOT, size)?;
                tree.entry_mut(NodeId::ROOT)?.node = Node::Branch(children);
                tree
            }
        };

        let trailing = nodes.count();
        if trailing > 0 {
            return Err(OctreeError::TrailingNodes(trailing));
        }

        tree.collapse_uniform(NodeId::ROOT);
        tracing::debug!(
            nodes = read,
            kept = tree.node_count(),
            "Rebuilt octree from flattened stream"
        );
        Ok(tree)
    }

    fn read_children<I>(
        &mut self,
        nodes: &mut I,
        read: &mut usize,
        parent: NodeId,
        size: i32,
    ) -> Result<[NodeId; 8]>
    where
        I: Iterator<Item = FlatNode<T>>,
    {
        let mut children = [NodeId::DANGLING; 8];
        for octant in Octant::ALL {
            children[octant.index()] = self.read_node(nodes, read, parent, octant, size / 2)?;
        }
        Ok(children)
    }

    fn read_node<I>(
        &mut self,
        nodes: &mut I,
        read: &mut usize,
        parent: NodeId,
        octant: Octant,
        size: i32,
    ) -> Result<NodeId>
    where
        I: Iterator<Item = FlatNode<T>>,
    {
        let position = *read;
        let flat = nodes.next().ok_or(OctreeError::TruncatedStream(position))?;
        *read += 1;

        match flat {
            FlatNode::Leaf(value) => Ok(self.alloc(Node::Leaf(value), Some(parent), octant)),
            FlatNode::Branch => {
                if size < 2 {
                    return Err(OctreeError::UnitBranch(position));
                }
                let id = self.alloc(Node::Branch([NodeId::DANGLING; 8]), Some(parent), octant);
                let children = self.read_children(nodes, read, id, size)?;
                self.entry_mut(id)?.node = Node::Branch(children);
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cuboid;

    fn sample() -> Octree<u8> {
        let mut t = Octree::new(IVec3::new(0, -4, 0), 4, 0u8).unwrap();
        t.set_cuboid(Cuboid::new(0, -4, 0, 2, 2, 2), 1);
        t.set_cuboid(Cuboid::new(3, -1, 3, 1, 1, 1), 2);
        t
    }

    #[test]
    fn test_single_leaf_stream() {
        let t = Octree::new(IVec3::ZERO, 8, 5u8).unwrap();
        assert_eq!(t.to_flat(), vec![FlatNode::Leaf(5)]);
    }

    #[test]
    fn test_stream_is_pre_order() {
        let t = sample();
        let flat = t.to_flat();
        // root, A leaf, B..G leaves, H branch, 8 units
        assert_eq!(flat.len(), 1 + 8 + 8);
        assert_eq!(flat[0], FlatNode::Branch);
        assert_eq!(flat[1], FlatNode::Leaf(1));
        assert_eq!(flat[8], FlatNode::Branch);
        assert_eq!(flat[16], FlatNode::Leaf(2));
        assert_eq!(flat.len(), t.node_count());
    }

    #[test]
    fn test_rebuild_matches_original() {
        let t = sample();
        let rebuilt = Octree::from_flat(t.origin(), t.size(), t.to_flat()).unwrap();
        assert_eq!(rebuilt, t);
        assert!(rebuilt.is_canonical());
        assert_eq!(rebuilt.get(IVec3::new(3, -1, 3)), Some(&2));
    }

    #[test]
    fn test_rebuild_collapses_uniform_branches() {
        let mut flat = vec![FlatNode::Branch, FlatNode::Branch];
        flat.extend(std::iter::repeat(FlatNode::Leaf(3u8)).take(8));
        flat.extend(std::iter::repeat(FlatNode::Leaf(3u8)).take(7));
        let t = Octree::from_flat(IVec3::ZERO, 4, flat).unwrap();
        assert_eq!(t.node_count(), 1);
        assert_eq!(t.value(t.root_id()), Ok(&3));
    }

    #[test]
    fn test_truncated_stream() {
        let flat = vec![FlatNode::Branch, FlatNode::Leaf(1u8), FlatNode::Leaf(2)];
        assert_eq!(
            Octree::from_flat(IVec3::ZERO, 2, flat),
            Err(OctreeError::TruncatedStream(3))
        );
        assert_eq!(
            Octree::<u8>::from_flat(IVec3::ZERO, 2, Vec::new()),
            Err(OctreeError::TruncatedStream(0))
        );
    }

    #[test]
    fn test_trailing_nodes() {
        let flat = vec![FlatNode::Leaf(1u8), FlatNode::Leaf(2), FlatNode::Branch];
        assert_eq!(
            Octree::from_flat(IVec3::ZERO, 2, flat),
            Err(OctreeError::TrailingNodes(2))
        );
    }

    #[test]
    fn test_unit_branch_rejected() {
        let mut flat = vec![FlatNode::Branch, FlatNode::Branch];
        flat.extend(std::iter::repeat(FlatNode::Leaf(0u8)).take(15));
        assert_eq!(
            Octree::from_flat(IVec3::ZERO, 2, flat),
            Err(OctreeError::UnitBranch(1))
        );
    }

    #[test]
    fn test_stream_serializes_as_json() {
        let t = sample();
        let json = serde_json::to_string(&t.to_flat()).unwrap();
        let flat: Vec<FlatNode<u8>> = serde_json::from_str(&json).unwrap();
        let rebuilt = Octree::from_flat(t.origin(), t.size(), flat).unwrap();
        assert_eq!(rebuilt, t);
    }
}
