use crate::NodeRef;
use glam::IVec3;

/// Something that can resolve a cube of space into an octree node
///
/// A tree never points outside itself. When a query leaves the root's
/// bounds, the [`NodeRef`] it started from hands the query to the container
/// it was opened with (see [`Octree::with_container`](crate::Octree::with_container)).
/// That lets separately allocated trees, one per chunk or per vertical
/// slice, answer neighbour queries as one continuous volume.
///
/// Coordinates are global, the same space the trees themselves use.
/// Implementations should only return a node whose tree fully contains the
/// requested cube, and return `None` for space they do not cover.
pub trait Container<T> {
    fn find_node(&self, position: IVec3, size: i32) -> Option<NodeRef<'_, T>>;
}
