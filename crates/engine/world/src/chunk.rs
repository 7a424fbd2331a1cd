//! Vertical column of octree slices
//!
//! Chunk `(cx, cz)` covers x in `[cx * size, (cx + 1) * size)`, the same on z,
//! and y from 0 up to `slices_per_chunk * size`. Slice `i` is an independent
//! octree with origin `(cx * size, i * size, cz * size)`.

use crate::{BlockId, Result, WorldConfig, WorldError};
use glam::{IVec2, IVec3};
use octree::{Container, Cuboid, NodeRef, Octree};

#[derive(Debug, Clone)]
pub struct Chunk {
    position: IVec2,
    /// Minimum corner of the bottom slice
    origin: IVec3,
    size: i32,
    slices: Vec<Octree<BlockId>>,
}

impl Chunk {
    pub fn new(position: IVec2, config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let size = config.chunk_size;
        let origin = match (position.x.checked_mul(size), position.y.checked_mul(size)) {
            (Some(x), Some(z)) => IVec3::new(x, 0, z),
            _ => return Err(WorldError::ChunkOutOfRange(position)),
        };
        // The column height fits in i32, so every slice origin does too
        let slices = (0..config.chunk_height())
            .step_by(size as usize)
            .map(|y| Octree::new(origin.with_y(y), size, config.default_block))
            .collect::<octree::Result<Vec<_>>>()
            .map_err(|_| WorldError::ChunkOutOfRange(position))?;

        tracing::debug!(
            ?position,
            size,
            slices = slices.len(),
            "Created chunk"
        );
        Ok(Self {
            position,
            origin,
            size,
            slices,
        })
    }

    /// Chunk coordinates on the XZ grid
    #[inline]
    pub fn position(&self) -> IVec2 {
        self.position
    }

    /// Edge length of each slice
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Global region covered by the whole column
    pub fn bounds(&self) -> Cuboid {
        Cuboid::from_min_size(self.origin, IVec3::new(self.size, self.height(), self.size))
    }

    /// Height of the column in blocks
    pub fn height(&self) -> i32 {
        self.slices.last().map_or(0, |top| top.bounds().top())
    }

    pub fn slices(&self) -> &[Octree<BlockId>] {
        &self.slices
    }

    pub fn slice(&self, index: usize) -> Option<&Octree<BlockId>> {
        self.slices.get(index)
    }

    pub fn slice_mut(&mut self, index: usize) -> Option<&mut Octree<BlockId>> {
        self.slices.get_mut(index)
    }

    /// Slice whose bounds fully contain `target`
    pub fn slice_containing(&self, target: &Cuboid) -> Option<&Octree<BlockId>> {
        if target.bottom() < 0 {
            return None;
        }
        let slice = self.slices.get((target.bottom() / self.size) as usize)?;
        slice.bounds().contains(target).then_some(slice)
    }

    /// Root view of slice `index` that resolves queries across the other
    /// slices of this chunk
    pub fn view(&self, index: usize) -> Option<NodeRef<'_, BlockId>> {
        Some(self.slices.get(index)?.with_container(self))
    }

    pub fn get(&self, point: IVec3) -> Option<&BlockId> {
        self.slice_containing(&Cuboid::cube(point, 1))?.get(point)
    }

    /// Write `value` into every slice `cuboid` overlaps; returns how many
    /// slices were touched
    pub fn set_cuboid(&mut self, cuboid: Cuboid, value: BlockId) -> usize {
        let mut touched = 0;
        for slice in &mut self.slices {
            if slice.bounds().is_intersecting(&cuboid) {
                slice.set_cuboid(cuboid, value);
                touched += 1;
            }
        }
        touched
    }

    pub fn node_count(&self) -> usize {
        self.slices.iter().map(Octree::node_count).sum()
    }
}

impl Container<BlockId> for Chunk {
    fn find_node(&self, position: IVec3, size: i32) -> Option<NodeRef<'_, BlockId>> {
        if size <= 0 {
            return None;
        }
        self.slice_containing(&Cuboid::cube(position, size))?
            .with_container(self)
            .find_node(position, size)
    }
}
