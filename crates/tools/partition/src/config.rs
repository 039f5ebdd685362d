//! Partitioning parameters

use crate::types::{PartitionError, Result};

/// Number of occupancy-grid cells along each axis.
///
/// Subvolume-grid indices at or beyond this bound are rejected rather than
/// growing the grid.
pub const GRID_CAPACITY: usize = 400;

/// Default subvolume edge length, in blocks
pub const DEFAULT_BATCH_SIZE: i64 = 16;

/// Default block edge length, in voxels
pub const DEFAULT_BLOCK_SIZE: i64 = 32;

/// Configuration for span partitioning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionConfig {
    /// Number of blocks along one axis of a subvolume
    pub batch_size: i64,
    /// Number of voxels along one axis of a block
    pub block_size: i64,
    /// Occupancy-grid cells per axis
    pub capacity: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            block_size: DEFAULT_BLOCK_SIZE,
            capacity: GRID_CAPACITY,
        }
    }
}

impl PartitionConfig {
    pub fn new(batch_size: i64, block_size: i64) -> Self {
        Self {
            batch_size,
            block_size,
            ..Default::default()
        }
    }

    /// Set the subvolume edge length in blocks
    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the block edge length in voxels
    pub fn with_block_size(mut self, block_size: i64) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the occupancy-grid capacity per axis
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Voxel edge length of one subvolume
    pub fn voxel_width(&self) -> i64 {
        self.batch_size * self.block_size
    }

    /// Block slots in one subvolume (batch_size³)
    pub fn blocks_per_subvolume(&self) -> u64 {
        let edge = self.batch_size as u64;
        edge * edge * edge
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size < 1 {
            return Err(PartitionError::InvalidConfig(format!(
                "batchsize must be at least 1, got {}",
                self.batch_size
            )));
        }

        if self.block_size < 1 {
            return Err(PartitionError::InvalidConfig(format!(
                "blocksize must be at least 1, got {}",
                self.block_size
            )));
        }

        if self.capacity == 0 {
            return Err(PartitionError::InvalidConfig(
                "grid capacity must be at least 1".to_string(),
            ));
        }

        let edge = self.batch_size as u64;
        if edge.checked_mul(edge).and_then(|area| area.checked_mul(edge)).is_none() {
            return Err(PartitionError::InvalidConfig(format!(
                "batchsize {} is too large: blocks per subvolume overflow",
                self.batch_size
            )));
        }

        // Largest voxel coordinate the emission sweep produces
        let max_voxel = self.batch_size.checked_mul(self.block_size).and_then(|width| {
            i64::try_from(self.capacity - 1)
                .ok()?
                .checked_mul(width)?
                .checked_add(width - 1)
        });
        if max_voxel.is_none() {
            return Err(PartitionError::InvalidConfig(format!(
                "batchsize {} with blocksize {} overflows voxel coordinates",
                self.batch_size, self.block_size
            )));
        }

        let cells = self
            .capacity
            .checked_mul(self.capacity)
            .and_then(|area| area.checked_mul(self.capacity));
        if cells.is_none() {
            return Err(PartitionError::InvalidConfig(format!(
                "grid capacity {} is too large",
                self.capacity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PartitionConfig::default();
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.block_size, 32);
        assert_eq!(config.capacity, 400);
        assert_eq!(config.voxel_width(), 512);
        assert_eq!(config.blocks_per_subvolume(), 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PartitionConfig::new(8, 64).with_capacity(10);
        assert_eq!(config.voxel_width(), 512);
        assert_eq!(config.blocks_per_subvolume(), 512);
        assert_eq!(config.capacity, 10);
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let zero_batch = PartitionConfig::default().with_batch_size(0);
        assert!(matches!(
            zero_batch.validate(),
            Err(PartitionError::InvalidConfig(_))
        ));

        let negative_block = PartitionConfig::default().with_block_size(-4);
        assert!(matches!(
            negative_block.validate(),
            Err(PartitionError::InvalidConfig(_))
        ));

        let no_capacity = PartitionConfig::default().with_capacity(0);
        assert!(no_capacity.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_block_count_overflow() {
        let config = PartitionConfig::default().with_batch_size(4_194_304);
        assert!(matches!(
            config.validate(),
            Err(PartitionError::InvalidConfig(_))
        ));

        // 2^21 cubed still fits in u64
        let largest = PartitionConfig::new(2_097_152, 1).with_capacity(1);
        assert!(largest.validate().is_ok());
        assert_eq!(largest.blocks_per_subvolume(), 1 << 63);
    }

    #[test]
    fn test_validate_rejects_voxel_overflow() {
        let huge_block = PartitionConfig::default().with_block_size(1_000_000_000_000_000_000);
        assert!(matches!(
            huge_block.validate(),
            Err(PartitionError::InvalidConfig(_))
        ));

        // Fits for one cell, overflows once the sweep reaches the last one
        let width = i64::MAX / 16;
        let one_cell = PartitionConfig::new(16, width / 16).with_capacity(1);
        assert!(one_cell.validate().is_ok());
        assert!(one_cell.with_capacity(400).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_capacity() {
        let config = PartitionConfig::new(1, 1).with_capacity(usize::MAX / 2);
        assert!(config.validate().is_err());
    }
}
