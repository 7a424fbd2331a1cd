//! World layout configuration
//!
//! Loaded from TOML; every field is optional and falls back to
//! [`WorldConfig::default`].
//!
//! ```toml
//! chunk_size = 16
//! slices_per_chunk = 8
//! default_block = 0
//! ```

use crate::{BlockId, Result, WorldError, AIR};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Edge length of one slice octree; a positive power of two
    pub chunk_size: i32,
    /// Number of slices stacked upwards from y = 0
    pub slices_per_chunk: u32,
    /// Block every new chunk is filled with
    pub default_block: BlockId,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            slices_per_chunk: 8,
            default_block: AIR,
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: WorldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let size = self.chunk_size;
        if size <= 0 || (size & (size - 1)) != 0 {
            return Err(WorldError::InvalidConfig(format!(
                "chunk_size must be a positive power of two, got {}",
                size
            )));
        }
        if self.slices_per_chunk == 0 {
            return Err(WorldError::InvalidConfig(
                "slices_per_chunk must be at least 1".to_string(),
            ));
        }
        let height = i32::try_from(self.slices_per_chunk)
            .ok()
            .and_then(|slices| size.checked_mul(slices));
        if height.is_none() {
            return Err(WorldError::InvalidConfig(format!(
                "{} slices of size {} do not fit in the i32 coordinate range",
                self.slices_per_chunk, size
            )));
        }
        Ok(())
    }

    /// Height of a chunk column in blocks
    ///
    /// Saturates for a config that fails [`WorldConfig::validate`].
    pub fn chunk_height(&self) -> i32 {
        let slices = i32::try_from(self.slices_per_chunk).unwrap_or(i32::MAX);
        self.chunk_size.saturating_mul(slices)
    }
}
