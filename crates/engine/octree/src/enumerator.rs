//! Lazy depth-first enumeration of leaf nodes
//!
//! Leaves come out in traversal order (`Octant::ALL` at every level), which
//! is also the order the flattened stream uses. Branches are walked, never
//! yielded. Placement is tracked incrementally: descending halves the size
//! and adds `octant * size`, ascending undoes it.
//!
//! With a face filter only the octants touching every side in it are
//! entered, so the walk visits exactly the leaves lying on all of those
//! sides of the start node. A single side selects a boundary layer, two
//! adjacent sides an edge, three a corner. No child touches two opposite
//! sides, so a filter holding an opposite pair yields the start node if it
//! is a leaf and nothing otherwise.

use crate::node::{Node, NodeId};
use crate::{Container, Face, NodeRef, Octant, Octree};
use glam::IVec3;
use std::iter::FusedIterator;

struct Frame<'a> {
    children: &'a [NodeId; 8],
    /// Where the branch sits inside its own parent
    octant: Octant,
    next: usize,
}

/// Iterator over the leaves below a node
///
/// The tree is borrowed for the iterator's lifetime, so it cannot change
/// while an enumeration is in progress.
pub struct Leaves<'a, T> {
    tree: &'a Octree<T>,
    container: Option<&'a dyn Container<T>>,
    start: Option<NodeRef<'a, T>>,
    filter: Face,
    stack: Vec<Frame<'a>>,
    origin: IVec3,
    size: i32,
}

impl<'a, T> Leaves<'a, T> {
    pub(crate) fn new(start: NodeRef<'a, T>, filter: Face) -> Self {
        Self {
            tree: start.tree(),
            container: start.container(),
            start: Some(start),
            filter,
            stack: Vec::new(),
            origin: start.origin(),
            size: start.size(),
        }
    }
}

impl<'a, T> Iterator for Leaves<'a, T> {
    type Item = NodeRef<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(start) = self.start.take() {
            match start.node() {
                Node::Leaf(_) => return Some(start),
                Node::Branch(children) => self.stack.push(Frame {
                    children,
                    octant: Octant::A,
                    next: 0,
                }),
            }
        }

        loop {
            let frame = self.stack.last_mut()?;

            if frame.next == Octant::ALL.len() {
                let finished = frame.octant;
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.origin -= finished.offset() * self.size;
                    self.size *= 2;
                }
                continue;
            }

            let octant = Octant::ALL[frame.next];
            frame.next += 1;
            if !octant.faces().contains(self.filter) {
                continue;
            }

            let id = frame.children[octant.index()];
            let entry = self.tree.entry(id).ok()?;
            let size = self.size / 2;
            let origin = self.origin + octant.offset() * size;

            match &entry.node {
                Node::Leaf(_) => {
                    return Some(NodeRef::from_parts(
                        self.tree,
                        id,
                        entry,
                        origin,
                        size,
                        self.container,
                    ));
                }
                Node::Branch(children) => {
                    self.stack.push(Frame {
                        children,
                        octant,
                        next: 0,
                    });
                    self.origin = origin;
                    self.size = size;
                }
            }
        }
    }
}

impl<T> FusedIterator for Leaves<'_, T> {}

#[cfg(test)]
mod tests {
    use crate::{Cuboid, Face, Octree};
    use glam::IVec3;

    #[test]
    fn test_single_leaf() {
        let t = Octree::new(IVec3::new(4, 4, 4), 4, 7u8).unwrap();
        let leaves: Vec<_> = t.root().leaves().collect();
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].origin(), IVec3::new(4, 4, 4));
        assert_eq!(leaves[0].size(), 4);
        assert_eq!(leaves[0].value(), Ok(&7));
    }

    #[test]
    fn test_leaves_in_traversal_order_with_positions() {
        let mut t = Octree::new(IVec3::ZERO, 2, 0u8).unwrap();
        for (i, octant) in crate::Octant::ALL.iter().enumerate() {
            let p = octant.offset();
            t.set_cuboid(Cuboid::new(p.x, p.y, p.z, 1, 1, 1), i as u8 + 1);
        }

        let leaves: Vec<_> = t.root().leaves().collect();
        assert_eq!(leaves.len(), 8);
        for (i, (leaf, octant)) in leaves.iter().zip(crate::Octant::ALL).enumerate() {
            assert_eq!(leaf.value(), Ok(&(i as u8 + 1)));
            assert_eq!(leaf.origin(), octant.offset());
            assert_eq!(leaf.size(), 1);
        }
    }

    #[test]
    fn test_mixed_depths_report_absolute_bounds() {
        let mut t = Octree::new(IVec3::new(-8, 0, 8), 8, 0u8).unwrap();
        t.set_cuboid(Cuboid::new(-1, 7, 15, 1, 1, 1), 1);

        let leaves: Vec<_> = t.root().leaves().collect();
        // 7 coarse + 7 medium + 8 unit leaves
        assert_eq!(leaves.len(), 22);
        assert_eq!(leaves.len(), t.leaf_count());

        let total: i64 = leaves.iter().map(|l| (l.size() as i64).pow(3)).sum();
        assert_eq!(total, 512);

        for leaf in &leaves {
            assert!(t.bounds().contains(&leaf.bounds()));
            assert_eq!(t.find_node(leaf.origin(), leaf.size()).unwrap().id(), leaf.id());
        }

        let last = leaves.last().unwrap();
        assert_eq!(last.origin(), IVec3::new(-1, 7, 15));
        assert_eq!(last.value(), Ok(&1));
    }

    #[test]
    fn test_face_filter_visits_only_boundary_leaves() {
        let mut t = Octree::new(IVec3::ZERO, 8, 0u8).unwrap();
        t.set_cuboid(Cuboid::new(0, 0, 0, 1, 1, 1), 1);
        t.set_cuboid(Cuboid::new(7, 7, 7, 1, 1, 1), 2);

        for side in Face::sides() {
            let d = side.direction();
            let r = t.bounds();
            let all = t.root().leaves().filter(|leaf| {
                let b = leaf.bounds();
                (d.x < 0 && b.left() == r.left())
                    || (d.x > 0 && b.right() == r.right())
                    || (d.y < 0 && b.bottom() == r.bottom())
                    || (d.y > 0 && b.top() == r.top())
                    || (d.z < 0 && b.front() == r.front())
                    || (d.z > 0 && b.back() == r.back())
            });
            let expected: Vec<_> = all.map(|leaf| leaf.id()).collect();
            let filtered: Vec<_> = t.root().leaves_facing(side).map(|leaf| leaf.id()).collect();
            assert_eq!(filtered, expected, "{:?}", side);
        }

        let right: Vec<_> = t.root().leaves_facing(Face::RIGHT).collect();
        assert!(right.iter().all(|leaf| leaf.bounds().right() == 8));
        assert!(right.iter().any(|leaf| leaf.value() == Ok(&2)));
        assert!(right.iter().all(|leaf| leaf.value() != Ok(&1)));
    }

    #[test]
    fn test_composite_filter_needs_every_side() {
        let mut t = Octree::new(IVec3::ZERO, 4, 0u8).unwrap();
        t.set_cuboid(Cuboid::new(0, 0, 0, 1, 1, 1), 1);

        let edge: Vec<_> = t.root().leaves_facing(Face::RIGHT | Face::TOP).collect();
        // Octants G and H, both coarse leaves
        assert_eq!(edge.len(), 2);
        for leaf in &edge {
            assert_eq!(leaf.bounds().right(), 4);
            assert_eq!(leaf.bounds().top(), 4);
        }

        let corner: Vec<_> = t
            .root()
            .leaves_facing(Face::LEFT | Face::BOTTOM | Face::FRONT)
            .collect();
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].bounds(), Cuboid::new(0, 0, 0, 1, 1, 1));

        // Opposite sides: a branch has no leaf on both, a leaf start is on both
        assert_eq!(t.root().leaves_facing(Face::LEFT | Face::RIGHT).count(), 0);
        assert_eq!(t.root().leaves_facing(Face::ALL).count(), 0);
        let leaf = Octree::new(IVec3::ZERO, 4, 0u8).unwrap();
        assert_eq!(leaf.root().leaves_facing(Face::LEFT | Face::RIGHT).count(), 1);
    }

    #[test]
    fn test_enumerate_from_inner_node() {
        let mut t = Octree::new(IVec3::ZERO, 4, 0u8).unwrap();
        t.set_cuboid(Cuboid::new(2, 2, 2, 1, 1, 1), 3);
        let h = t.root().child(crate::Octant::H).unwrap();
        let leaves: Vec<_> = h.leaves().collect();
        assert_eq!(leaves.len(), 8);
        assert_eq!(leaves[0].origin(), IVec3::new(2, 2, 2));
        assert_eq!(leaves[0].value(), Ok(&3));
        assert!(leaves.iter().all(|leaf| h.bounds().contains(&leaf.bounds())));
    }

    #[test]
    fn test_exhausted_iterator_stays_empty() {
        let t = Octree::new(IVec3::ZERO, 2, 0u8).unwrap();
        let mut leaves = t.root().leaves();
        assert!(leaves.next().is_some());
        assert!(leaves.next().is_none());
        assert!(leaves.next().is_none());
    }
}
