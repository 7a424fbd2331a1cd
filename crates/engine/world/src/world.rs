//! Map of loaded chunks
//!
//! Views handed out by the world carry the world itself as their container,
//! so a neighbour lookup that leaves a slice is answered by the next slice
//! up or down, and one that leaves a chunk by the adjacent loaded chunk.
//! Space with no loaded chunk is absent; faces facing it count as exposed.

use crate::faces::{boundary_faces, exposed_faces, ExposedFace};
use crate::{block_solidity, BlockId, Chunk, Result, WorldConfig, WorldError};
use glam::{IVec2, IVec3};
use octree::{Container, Cuboid, Face, NodeRef};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct World {
    config: WorldConfig,
    chunks: HashMap<IVec2, Chunk>,
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            chunks: HashMap::new(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chunk coordinates of the column containing `point`
    pub fn chunk_position(&self, point: IVec3) -> IVec2 {
        let size = self.config.chunk_size;
        IVec2::new(point.x.div_euclid(size), point.z.div_euclid(size))
    }

    /// Load a chunk filled with the configured default block
    ///
    /// An already loaded chunk is kept as it is.
    pub fn insert_chunk(&mut self, position: IVec2) -> Result<&mut Chunk> {
        let chunk = match self.chunks.entry(position) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(Chunk::new(position, &self.config)?)
            }
        };
        Ok(chunk)
    }

    pub fn chunk(&self, position: IVec2) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn chunk_mut(&mut self, position: IVec2) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    pub fn remove_chunk(&mut self, position: IVec2) -> Option<Chunk> {
        let removed = self.chunks.remove(&position);
        if removed.is_some() {
            tracing::debug!(?position, "Unloaded chunk");
        }
        removed
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Block at `point`, `None` where no chunk is loaded
    pub fn get(&self, point: IVec3) -> Option<&BlockId> {
        self.chunks.get(&self.chunk_position(point))?.get(point)
    }

    /// Write `value` over `cuboid` in every loaded chunk it overlaps
    ///
    /// Parts falling into unloaded space are dropped. Returns how many
    /// slices were written.
    pub fn set_cuboid(&mut self, cuboid: Cuboid, value: BlockId) -> usize {
        tracing::trace!(?cuboid, value, "World write");
        self.chunks
            .values_mut()
            .filter(|chunk| chunk.bounds().is_intersecting(&cuboid))
            .map(|chunk| chunk.set_cuboid(cuboid, value))
            .sum()
    }

    /// Root view of one slice, resolving queries across the whole world
    pub fn view(&self, position: IVec2, slice: usize) -> Option<NodeRef<'_, BlockId>> {
        Some(self.chunks.get(&position)?.slice(slice)?.with_container(self))
    }

    /// All exposed faces of a chunk, judged against loaded neighbours
    pub fn exposed_faces(&self, position: IVec2) -> Result<Vec<ExposedFace<BlockId>>> {
        let chunk = self
            .chunks
            .get(&position)
            .ok_or(WorldError::ChunkNotLoaded(position))?;
        let mut faces = Vec::new();
        for slice in chunk.slices() {
            faces.extend(exposed_faces(slice.with_container(self), block_solidity));
        }
        Ok(faces)
    }

    /// Exposed faces on one outer side of a chunk
    ///
    /// Only slices lying on that side of the column take part: the bottom
    /// slice for `BOTTOM`, the top slice for `TOP`, all of them for the four
    /// horizontal sides.
    pub fn seam_faces(&self, position: IVec2, face: Face) -> Result<Vec<ExposedFace<BlockId>>> {
        let chunk = self
            .chunks
            .get(&position)
            .ok_or(WorldError::ChunkNotLoaded(position))?;
        let column = chunk.bounds();
        let mut faces = Vec::new();
        for slice in chunk.slices() {
            let bounds = slice.bounds();
            if face.contains(Face::BOTTOM) && bounds.bottom() != column.bottom() {
                continue;
            }
            if face.contains(Face::TOP) && bounds.top() != column.top() {
                continue;
            }
            faces.extend(boundary_faces(
                slice.with_container(self),
                face,
                block_solidity,
            ));
        }
        Ok(faces)
    }
}

impl Container<BlockId> for World {
    fn find_node(&self, position: IVec3, size: i32) -> Option<NodeRef<'_, BlockId>> {
        if size <= 0 {
            return None;
        }
        let target = Cuboid::cube(position, size);
        self.chunks
            .get(&self.chunk_position(position))?
            .slice_containing(&target)?
            .with_container(self)
            .find_node(position, size)
    }
}
