//! Read-only node views and spatial queries
//!
//! A [`NodeRef`] pairs a node with its absolute placement and the optional
//! [`Container`] it was opened with. Lookups walk up through parents while
//! the target lies outside the current node, then down through the
//! children. A lookup that escapes the root is handed to the container;
//! without one it simply finds nothing.

use crate::error::Result;
use crate::node::{Entry, Node, NodeId};
use crate::{Container, Cuboid, Face, Leaves, Octant, Octree, OctreeError};
use glam::IVec3;
use std::fmt;

/// Borrowed view of one node
pub struct NodeRef<'a, T> {
    tree: &'a Octree<T>,
    id: NodeId,
    entry: &'a Entry<T>,
    origin: IVec3,
    size: i32,
    container: Option<&'a dyn Container<T>>,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("size", &self.size)
            .field("leaf", &self.is_leaf())
            .finish()
    }
}

impl<T> Octree<T> {
    /// View of the root without a container
    pub fn root(&self) -> NodeRef<'_, T> {
        self.view(None)
    }

    /// View of the root that hands escaping queries to `container`
    pub fn with_container<'a>(&'a self, container: &'a dyn Container<T>) -> NodeRef<'a, T> {
        self.view(Some(container))
    }

    fn view<'a>(&'a self, container: Option<&'a dyn Container<T>>) -> NodeRef<'a, T> {
        NodeRef::from_parts(
            self,
            NodeId::ROOT,
            self.root_entry(),
            self.origin(),
            self.size(),
            container,
        )
    }

    /// View of an arbitrary live node
    pub fn node_ref(&self, id: NodeId) -> Result<NodeRef<'_, T>> {
        let (origin, size) = self.node_bounds(id)?;
        let entry = self.entry(id)?;
        Ok(NodeRef::from_parts(self, id, entry, origin, size, None))
    }

    /// Smallest node of this tree fully containing the cube at `position`
    pub fn find_node(&self, position: IVec3, size: i32) -> Option<NodeRef<'_, T>> {
        self.root().find_node(position, size)
    }
}

impl<'a, T> NodeRef<'a, T> {
    pub(crate) fn from_parts(
        tree: &'a Octree<T>,
        id: NodeId,
        entry: &'a Entry<T>,
        origin: IVec3,
        size: i32,
        container: Option<&'a dyn Container<T>>,
    ) -> Self {
        Self {
            tree,
            id,
            entry,
            origin,
            size,
            container,
        }
    }

    /// Tree this node belongs to
    #[inline]
    pub fn tree(&self) -> &'a Octree<T> {
        self.tree
    }

    /// Arena handle, usable with the owning tree's mutators
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Leaf value or child handles
    #[inline]
    pub fn node(&self) -> &'a Node<T> {
        &self.entry.node
    }

    /// Minimum corner in global coordinates
    #[inline]
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    #[inline]
    pub fn bounds(&self) -> Cuboid {
        Cuboid::cube(self.origin, self.size)
    }

    #[inline]
    pub fn container(&self) -> Option<&'a dyn Container<T>> {
        self.container
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.entry.node.is_leaf()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.entry.parent.is_none()
    }

    /// Value of a leaf; fails on a branch
    pub fn value(&self) -> Result<&'a T> {
        self.entry
            .node
            .leaf_value()
            .ok_or(OctreeError::BranchHasNoValue(self.id))
    }

    #[inline]
    pub fn leaf_value(&self) -> Option<&'a T> {
        self.entry.node.leaf_value()
    }

    /// Position inside the parent, `None` at the root
    pub fn octant(&self) -> Option<Octant> {
        self.entry.parent.map(|_| self.entry.octant)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, T>> {
        let parent = self.entry.parent?;
        let entry = self.tree.entry(parent).ok()?;
        Some(Self {
            id: parent,
            entry,
            origin: self.origin - self.entry.octant.offset() * self.size,
            size: self.size * 2,
            ..*self
        })
    }

    pub fn child(&self, octant: Octant) -> Option<NodeRef<'a, T>> {
        let Node::Branch(children) = &self.entry.node else {
            return None;
        };
        let id = children[octant.index()];
        let entry = self.tree.entry(id).ok()?;
        let size = self.size / 2;
        Some(Self {
            id,
            entry,
            origin: self.origin + octant.offset() * size,
            size,
            ..*self
        })
    }

    /// Children in traversal order; empty for a leaf
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, T>> + 'a
    where
        T: 'a,
    {
        let node = *self;
        Octant::ALL.into_iter().filter_map(move |octant| node.child(octant))
    }

    /// Depth-first leaves below this node
    pub fn leaves(&self) -> Leaves<'a, T> {
        Leaves::new(*self, Face::NONE)
    }

    /// Depth-first leaves below this node that touch every side in `face`
    ///
    /// Two adjacent sides pick out an edge and three a corner. Opposite
    /// sides match only when this node is itself a leaf.
    pub fn leaves_facing(&self, face: Face) -> Leaves<'a, T> {
        Leaves::new(*self, face)
    }

    /// Smallest node fully containing the cube at `position` with edge `size`
    ///
    /// The search climbs to the first ancestor that contains the cube, then
    /// descends. It stops early at a leaf, so asking for a cell inside a
    /// coarse uniform region returns that region's leaf. A cube that leaves
    /// the root is resolved by the container, or not at all.
    pub fn find_node(&self, position: IVec3, size: i32) -> Option<NodeRef<'a, T>> {
        if size <= 0 {
            return None;
        }
        // A cube running off the end of the coordinate range matches nothing
        position.x.checked_add(size)?;
        position.y.checked_add(size)?;
        position.z.checked_add(size)?;
        let target = Cuboid::cube(position, size);

        let mut node = *self;
        while !node.bounds().contains(&target) {
            match node.parent() {
                Some(parent) => node = parent,
                None => {
                    let container = self.container?;
                    tracing::trace!(?position, size, "lookup left the root, asking container");
                    return container.find_node(position, size);
                }
            }
        }
        Some(node.descend(&target))
    }

    fn descend(self, target: &Cuboid) -> NodeRef<'a, T> {
        let mut node = self;
        loop {
            if node.is_leaf() || node.bounds() == *target {
                return node;
            }
            let half = node.size / 2;
            let local = target.min() - node.origin;
            let octant = Octant::from_xyz(local.x >= half, local.y >= half, local.z >= half);
            match node.child(octant) {
                Some(child) if child.bounds().contains(target) => node = child,
                _ => return node,
            }
        }
    }

    /// Node of the same size directly across `face`
    ///
    /// Composite faces address edge and corner neighbours.
    pub fn find_neighbour(&self, face: Face) -> Option<NodeRef<'a, T>> {
        let step = face.direction() * self.size;
        // Nothing lies beyond the edge of the coordinate range
        let position = IVec3::new(
            self.origin.x.checked_add(step.x)?,
            self.origin.y.checked_add(step.y)?,
            self.origin.z.checked_add(step.z)?,
        );
        self.find_node(position, self.size)
    }

    /// Check if the whole outer `face` of this node is solid at every
    /// resolution
    ///
    /// `solidity` reports which faces of a value are solid. A composite
    /// `face` is solid only if each of its sides is.
    pub fn is_face_solid<F>(&self, face: Face, solidity: F) -> bool
    where
        F: Fn(&T) -> Face,
    {
        self.face_solid(face, &solidity)
    }

    fn face_solid<F>(&self, face: Face, solidity: &F) -> bool
    where
        F: Fn(&T) -> Face,
    {
        match &self.entry.node {
            Node::Leaf(value) => solidity(value).contains(face),
            Node::Branch(_) => face.iter().all(|side| {
                Octant::touching(side).all(|octant| {
                    self.child(octant)
                        .is_some_and(|child| child.face_solid(side, solidity))
                })
            }),
        }
    }

    /// Check if `face` needs geometry: nothing lies beyond it, or the
    /// neighbour's opposite face is not fully solid
    ///
    /// A composite `face` is exposed if any of its sides is.
    pub fn is_face_exposed<F>(&self, face: Face, solidity: F) -> bool
    where
        F: Fn(&T) -> Face,
    {
        face.iter().any(|side| match self.find_neighbour(side) {
            None => true,
            Some(neighbour) => !neighbour.face_solid(side.opposite(), &solidity),
        })
    }
}
