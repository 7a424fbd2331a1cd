//! Sparse voxel octree with canonical-form writes and cross-tree queries
//!
//! An [`Octree`] covers a cube of power-of-two size and stores one value per
//! uniform region. Writing a [`Cuboid`] splits only the nodes it partially
//! covers and merges any branch whose 8 children end up equal, so the tree
//! stays as small as its contents allow.
//!
//! Reads go through [`NodeRef`] views. A view can be opened with a
//! [`Container`], which answers queries that leave the tree; that is how
//! several trees stitch into one world without pointing at each other.

pub mod container;
pub mod cuboid;
pub mod enumerator;
pub mod error;
pub mod face;
pub mod flatten;
pub mod node;
pub mod octant;
pub mod query;
pub mod tree;

pub use container::Container;
pub use cuboid::Cuboid;
pub use enumerator::Leaves;
pub use error::{OctreeError, Result};
pub use face::Face;
pub use flatten::FlatNode;
pub use node::{Node, NodeId};
pub use octant::Octant;
pub use query::NodeRef;
pub use tree::Octree;

// Re-export glam for downstream crates
pub use glam;
