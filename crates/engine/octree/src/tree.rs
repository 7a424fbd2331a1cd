//! Octree - arena-backed sparse voxel octree
//!
//! The tree owns every node. Only the root carries explicit placement
//! (`origin`, `size`); the bounds of any other node follow from the chain of
//! octants leading to it. The root lives outside the arena under
//! [`NodeId::ROOT`], so it can never be freed or go stale.
//!
//! # Canonical form
//!
//! A branch never holds 8 leaf children with equal values. Every mutation
//! funnels through [`Octree::merge`], which collapses such a branch into a
//! single leaf and keeps checking upwards until the invariant holds again.

use crate::error::Result;
use crate::node::{Entry, Node, NodeId, Slot};
use std::iter;
use crate::{Cuboid, Octant, OctreeError};
use glam::IVec3;

#[derive(Debug, Clone)]
pub struct Octree<T> {
    root: Entry<T>,
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    origin: IVec3,
    size: i32,
}

impl<T> Octree<T> {
    /// Create a tree covering `[origin, origin + size)` filled with `value`
    ///
    /// `size` must be a positive power of two, and `origin + size` must stay
    /// inside the `i32` range on every axis.
    pub fn new(origin: IVec3, size: i32, value: T) -> Result<Self> {
        Self::with_root(origin, size, Node::Leaf(value))
    }

    /// Tree whose root is `node`; branch children are the caller's job
    pub(crate) fn with_root(origin: IVec3, size: i32, node: Node<T>) -> Result<Self> {
        Self::check_placement(origin, size)?;
        Ok(Self {
            root: Entry {
                node,
                parent: None,
                octant: Octant::A,
            },
            slots: Vec::new(),
            free: Vec::new(),
            origin,
            size,
        })
    }

    pub(crate) fn check_placement(origin: IVec3, size: i32) -> Result<()> {
        if size <= 0 || (size & (size - 1)) != 0 {
            return Err(OctreeError::InvalidSize(size));
        }
        let fits = [origin.x, origin.y, origin.z]
            .iter()
            .all(|min| min.checked_add(size).is_some());
        if !fits {
            return Err(OctreeError::OutOfRange { origin, size });
        }
        Ok(())
    }

    /// Minimum corner of the root cube in global coordinates
    #[inline]
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    /// Edge length of the root cube
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Region covered by the whole tree, in global coordinates
    #[inline]
    pub fn bounds(&self) -> Cuboid {
        Cuboid::cube(self.origin, self.size)
    }

    /// Handle of the root node, always live
    #[inline]
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    #[inline]
    pub(crate) fn root_entry(&self) -> &Entry<T> {
        &self.root
    }

    /// Check if `id` still refers to a live node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.entry(id).is_ok()
    }

    /// Node behind a handle, or [`OctreeError::StaleNode`] once it has been
    /// collapsed away
    pub fn node(&self, id: NodeId) -> Result<&Node<T>> {
        Ok(&self.entry(id)?.node)
    }

    /// Value of a leaf node
    ///
    /// Fails with [`OctreeError::BranchHasNoValue`] on a branch.
    pub fn value(&self, id: NodeId) -> Result<&T> {
        self.node(id)?
            .leaf_value()
            .ok_or(OctreeError::BranchHasNoValue(id))
    }

    /// Parent handle; `None` for the root
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.entry(id)?.parent)
    }

    /// Global origin and edge length of a node, derived from its octant path
    pub fn node_bounds(&self, id: NodeId) -> Result<(IVec3, i32)> {
        let mut path = Vec::new();
        let mut current = self.entry(id)?;
        while let Some(parent) = current.parent {
            path.push(current.octant);
            current = self.entry(parent)?;
        }

        let mut origin = self.origin;
        let mut size = self.size;
        for octant in path.iter().rev() {
            size /= 2;
            origin += octant.offset() * size;
        }
        Ok((origin, size))
    }

    /// Number of live nodes, branches included
    pub fn node_count(&self) -> usize {
        1 + self.slots.len() - self.free.len()
    }

    /// Number of live leaves; a uniform tree has exactly one
    pub fn leaf_count(&self) -> usize {
        self.live_entries().filter(|entry| entry.node.is_leaf()).count()
    }

    /// Number of branch levels above the deepest leaf (0 for a single leaf)
    pub fn depth(&self) -> u32 {
        let mut deepest = 0;
        let mut stack = vec![(NodeId::ROOT, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Ok(Node::Branch(children)) = self.node(id) {
                stack.extend(children.iter().map(|&child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Value of the unit cell at `point`, `None` outside the tree
    pub fn get(&self, point: IVec3) -> Option<&T> {
        if !self.bounds().contains_point(point) {
            return None;
        }

        let mut local = point - self.origin;
        let mut size = self.size;
        let mut entry = &self.root;
        loop {
            match &entry.node {
                Node::Leaf(value) => return Some(value),
                Node::Branch(children) => {
                    size /= 2;
                    let octant = Octant::from_xyz(local.x >= size, local.y >= size, local.z >= size);
                    local -= octant.offset() * size;
                    entry = self.entry(children[octant.index()]).ok()?;
                }
            }
        }
    }

    pub(crate) fn entry(&self, id: NodeId) -> Result<&Entry<T>> {
        if id == NodeId::ROOT {
            return Ok(&self.root);
        }
        match self.slots.get(id.index()) {
            Some(Slot {
                generation,
                entry: Some(entry),
            }) if *generation == id.generation() => Ok(entry),
            _ => Err(OctreeError::StaleNode(id)),
        }
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Result<&mut Entry<T>> {
        if id == NodeId::ROOT {
            return Ok(&mut self.root);
        }
        match self.slots.get_mut(id.index()) {
            Some(Slot {
                generation,
                entry: Some(entry),
            }) if *generation == id.generation() => Ok(entry),
            _ => Err(OctreeError::StaleNode(id)),
        }
    }

    fn live_entries(&self) -> impl Iterator<Item = &Entry<T>> {
        iter::once(&self.root).chain(self.slots.iter().filter_map(|slot| slot.entry.as_ref()))
    }

    /// Handles of every live node, root first
    fn live_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let arena = self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|_| NodeId::new(index as u32, slot.generation))
        });
        iter::once(NodeId::ROOT).chain(arena)
    }

    #[inline]
    fn is_branch(&self, id: NodeId) -> bool {
        matches!(self.node(id), Ok(Node::Branch(_)))
    }

    pub(crate) fn alloc(&mut self, node: Node<T>, parent: Option<NodeId>, octant: Octant) -> NodeId {
        let entry = Entry {
            node,
            parent,
            octant,
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeId::new(index, slot.generation)
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeId::new((self.slots.len() - 1) as u32, 0)
            }
        }
    }

    /// Free every descendant of `id`, leaving `id` itself in place
    fn release_children(&mut self, id: NodeId) {
        let mut stack: Vec<NodeId> = match self.node(id) {
            Ok(Node::Branch(children)) => children.to_vec(),
            _ => return,
        };
        while let Some(child) = stack.pop() {
            let Some(slot) = self.slots.get_mut(child.index()) else {
                continue;
            };
            if slot.generation != child.generation() {
                continue;
            }
            if let Some(entry) = slot.entry.take() {
                if let Node::Branch(grandchildren) = entry.node {
                    stack.extend_from_slice(&grandchildren);
                }
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(child.index() as u32);
            }
        }
    }
}

impl<T: Clone> Octree<T> {
    /// Split a leaf into 8 leaves carrying its value
    ///
    /// No-op on a branch. Unit-size leaves cannot be split.
    pub fn partition(&mut self, id: NodeId) -> Result<()> {
        if self.is_branch(id) {
            return Ok(());
        }
        let (_, size) = self.node_bounds(id)?;
        if size < 2 {
            return Err(OctreeError::Indivisible(id));
        }
        self.split(id)
    }

    fn split(&mut self, id: NodeId) -> Result<()> {
        let value = match &self.entry(id)?.node {
            Node::Leaf(value) => value.clone(),
            Node::Branch(_) => return Ok(()),
        };
        let children = Octant::ALL.map(|octant| self.alloc(Node::Leaf(value.clone()), Some(id), octant));
        self.entry_mut(id)?.node = Node::Branch(children);
        Ok(())
    }
}

impl<T: Clone + PartialEq> Octree<T> {
    /// Make `id` a leaf holding `value`, discarding any children, then
    /// collapse ancestors whose children became uniform
    pub fn merge(&mut self, id: NodeId, value: T) -> Result<()> {
        let mut id = id;
        let mut value = value;
        loop {
            self.entry(id)?;
            self.release_children(id);

            let entry = self.entry_mut(id)?;
            entry.node = Node::Leaf(value);
            let Some(parent) = entry.parent else {
                return Ok(());
            };

            match self.common_child_value(parent) {
                Some(common) => {
                    value = common;
                    id = parent;
                }
                None => return Ok(()),
            }
        }
    }

    /// Same as [`Octree::merge`]
    pub fn set_value(&mut self, id: NodeId, value: T) -> Result<()> {
        self.merge(id, value)
    }

    /// Replace the whole tree with a single leaf
    pub fn fill(&mut self, value: T) {
        self.release_children(NodeId::ROOT);
        self.root.node = Node::Leaf(value);
    }

    /// Check if all 8 children of `id` are leaves with equal values
    pub fn should_merge(&self, id: NodeId) -> bool {
        self.common_child_value(id).is_some()
    }

    fn common_child_value(&self, id: NodeId) -> Option<T> {
        let children = self.node(id).ok()?.children()?;
        let first = self.node(children[0]).ok()?.leaf_value()?;
        for &child in &children[1..] {
            if self.node(child).ok()?.leaf_value()? != first {
                return None;
            }
        }
        Some(first.clone())
    }

    /// Write `value` into every cell of `cuboid` (global coordinates)
    ///
    /// Parts of the cuboid outside the tree are ignored.
    pub fn set_cuboid(&mut self, cuboid: Cuboid, value: T) {
        tracing::trace!(?cuboid, origin = ?self.origin, size = self.size, "set_cuboid");
        // Clip first so the translation stays inside the tree's own range
        let Some(clipped) = cuboid.intersection(&self.bounds()) else {
            return;
        };
        let local = Cuboid::from_min_size(clipped.min() - self.origin, clipped.size());
        if let Err(err) = self.write_cuboid(NodeId::ROOT, local, self.size, &value) {
            tracing::warn!(%err, ?cuboid, "set_cuboid stopped early");
        }
    }

    /// Write `value` into `cuboid`, given in the local space of node `id`
    /// (the node's own minimum corner is the origin)
    pub fn set_cuboid_at(&mut self, id: NodeId, cuboid: Cuboid, value: T) -> Result<()> {
        let (_, size) = self.node_bounds(id)?;
        self.write_cuboid(id, cuboid, size, &value)
    }

    fn write_cuboid(&mut self, id: NodeId, cuboid: Cuboid, size: i32, value: &T) -> Result<()> {
        if self.node(id)?.leaf_value() == Some(value) {
            return Ok(());
        }

        let bounds = Cuboid::cube(IVec3::ZERO, size);
        let Some(hit) = cuboid.intersection(&bounds) else {
            return Ok(());
        };
        if hit == bounds {
            return self.merge(id, value.clone());
        }

        self.split(id)?;
        let Some(&children) = self.node(id)?.children() else {
            return Ok(());
        };

        let half = size / 2;
        for octant in Octant::ALL {
            let local = hit.translated(-octant.offset() * half);
            self.write_cuboid(children[octant.index()], local, half, value)?;
            // A child collapsing into its siblings turns this node (and maybe
            // its ancestors) into a leaf of `value`; the rest is already written
            if !self.is_branch(id) {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Collapse every uniform branch below `id`, bottom-up
    pub(crate) fn collapse_uniform(&mut self, id: NodeId) {
        let Ok(Node::Branch(children)) = self.node(id).cloned() else {
            return;
        };
        for child in children {
            self.collapse_uniform(child);
        }
        if let Some(common) = self.common_child_value(id) {
            self.release_children(id);
            if let Ok(entry) = self.entry_mut(id) {
                entry.node = Node::Leaf(common);
            }
        }
    }

    /// True if no branch in the tree could be replaced by a single leaf
    pub fn is_canonical(&self) -> bool {
        self.live_ids()
            .filter(|&id| self.is_branch(id))
            .all(|id| !self.should_merge(id))
    }
}

impl<T: PartialEq> Octree<T> {
    fn subtree_eq(&self, id: NodeId, other: &Octree<T>, other_id: NodeId) -> bool {
        let mut stack = vec![(id, other_id)];
        while let Some((a, b)) = stack.pop() {
            match (self.node(a), other.node(b)) {
                (Ok(Node::Leaf(x)), Ok(Node::Leaf(y))) => {
                    if x != y {
                        return false;
                    }
                }
                (Ok(Node::Branch(xs)), Ok(Node::Branch(ys))) => {
                    stack.extend(xs.iter().copied().zip(ys.iter().copied()));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Structural equality: same placement and the same tree shape and values,
/// regardless of where nodes sit in either arena
impl<T: PartialEq> PartialEq for Octree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.size == other.size
            && self.subtree_eq(NodeId::ROOT, other, NodeId::ROOT)
    }
}
