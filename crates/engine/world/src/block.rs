use octree::Face;

/// Opaque block handle stored in every leaf
pub type BlockId = u16;

pub const AIR: BlockId = 0;

/// Default solidity: air has no solid faces, every other block is a full cube
pub fn block_solidity(block: &BlockId) -> Face {
    if *block == AIR {
        Face::NONE
    } else {
        Face::ALL
    }
}
