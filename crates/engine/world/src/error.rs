use glam::IVec2;
use octree::OctreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error("Octree error: {0}")]
    Octree(#[from] OctreeError),

    #[error("Failed to parse world config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid world config: {0}")]
    InvalidConfig(String),

    #[error("Chunk {0} lies outside the i32 coordinate range")]
    ChunkOutOfRange(IVec2),

    #[error("Chunk {0} is not loaded")]
    ChunkNotLoaded(IVec2),
}

pub type Result<T> = std::result::Result<T, WorldError>;
