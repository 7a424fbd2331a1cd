//! Chunked voxel world stitched together from independent octrees
//!
//! A [`Chunk`] is a vertical column of octree slices; a [`World`] is a map of
//! loaded chunks. Neither tree knows about its neighbours. Both types
//! implement [`octree::Container`], so a view opened on any slice resolves
//! neighbour queries across slice and chunk seams as one continuous volume.

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod faces;
pub mod world;

pub use block::{block_solidity, BlockId, AIR};
pub use chunk::Chunk;
pub use config::WorldConfig;
pub use error::{Result, WorldError};
pub use faces::{boundary_faces, exposed_faces, ExposedFace};
pub use world::World;
