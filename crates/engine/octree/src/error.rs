use crate::{Cuboid, NodeId};
use glam::IVec3;
use thiserror::Error;

/// Invalid-state faults raised by octree operations
///
/// These indicate a caller bug. Ordinary absence (a lookup that leaves every
/// known structure) is reported as `None`, never as an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OctreeError {
    #[error("Node {0:?} is a branch and has no single value")]
    BranchHasNoValue(NodeId),

    #[error("Cuboids {a:?} and {b:?} do not intersect")]
    DisjointCuboids { a: Cuboid, b: Cuboid },

    #[error("Node {0:?} no longer exists in this octree")]
    StaleNode(NodeId),

    #[error("Node {0:?} has unit size and cannot be partitioned")]
    Indivisible(NodeId),

    #[error("Octree size must be a positive power of two, got {0}")]
    InvalidSize(i32),

    #[error("Octree at {origin} with size {size} reaches past the i32 coordinate range")]
    OutOfRange { origin: IVec3, size: i32 },

    #[error("Flattened stream ended after {0} nodes, before the tree was complete")]
    TruncatedStream(usize),

    #[error("Flattened stream entry {0} is a branch at unit size")]
    UnitBranch(usize),

    #[error("Flattened stream has {0} nodes left after the tree was complete")]
    TrailingNodes(usize),
}

pub type Result<T> = std::result::Result<T, OctreeError>;
