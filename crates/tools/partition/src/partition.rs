//! Subvolume emission and result aggregation
//!
//! The emission sweep walks the whole occupancy grid in row-major
//! `(z, y, x)` order, independent of which cells were touched, so the
//! subvolume list always comes out in the same order for the same input.

use crate::config::PartitionConfig;
use crate::occupancy::OccupancyGrid;
use crate::types::{ChunkExtents3d, Extents3d, PartitionResult, Point3d, Result, Span, Subvolume};
use tracing::info;

/// Voxel and block extents of one subvolume-grid cell along an axis
#[derive(Debug, Clone, Copy)]
struct AxisExtent {
    voxel_min: i64,
    voxel_max: i64,
    block_min: i64,
    block_max: i64,
}

impl AxisExtent {
    fn new(config: &PartitionConfig, index: usize) -> Self {
        let voxel_width = config.voxel_width();
        let voxel_min = index as i64 * voxel_width;
        let voxel_max = voxel_min + voxel_width - 1;
        Self {
            voxel_min,
            voxel_max,
            block_min: voxel_min / config.block_size,
            block_max: voxel_max / config.block_size,
        }
    }
}

/// Emit every non-empty cell of `grid` as a subvolume.
///
/// Returns the subvolumes in scan order together with the number of empty
/// cells that lie inside the bounding box of touched cells.
///
/// `config` is expected to have passed [`PartitionConfig::validate`], which
/// guarantees the voxel extents fit in `i64`.
pub fn emit_subvolumes(config: &PartitionConfig, grid: &OccupancyGrid) -> (Vec<Subvolume>, u64) {
    let capacity = grid.capacity();
    let total_blocks = config.blocks_per_subvolume();

    // Per-axis extents depend only on the cell index
    let extents: Vec<AxisExtent> = (0..capacity)
        .map(|index| AxisExtent::new(config, index))
        .collect();

    let mut subvolumes = Vec::with_capacity(grid.num_subvolumes() as usize);
    let mut pruned = 0u64;

    for z in 0..capacity {
        let ez = extents[z];
        for y in 0..capacity {
            let ey = extents[y];
            for x in 0..capacity {
                let count = grid.count(z, y, x);
                if count > 0 {
                    let ex = extents[x];
                    subvolumes.push(Subvolume {
                        extents: Extents3d {
                            min_point: Point3d::new(ex.voxel_min, ey.voxel_min, ez.voxel_min),
                            max_point: Point3d::new(ex.voxel_max, ey.voxel_max, ez.voxel_max),
                        },
                        chunk_extents: ChunkExtents3d {
                            min_chunk: Point3d::new(ex.block_min, ey.block_min, ez.block_min),
                            max_chunk: Point3d::new(ex.block_max, ey.block_max, ez.block_max),
                        },
                        total_blocks,
                        active_blocks: u64::from(count),
                    });
                } else if grid.within_touched_bounds(z, y, x) {
                    pruned += 1;
                }
            }
        }
    }

    (subvolumes, pruned)
}

/// Partition `spans` into subvolumes.
///
/// Fails without producing a result if the configuration is invalid or any
/// span maps outside the occupancy grid.
pub fn partition(config: &PartitionConfig, spans: &[Span]) -> Result<PartitionResult> {
    let grid = OccupancyGrid::from_spans(config, spans)?;
    let (subvolumes, subvols_pruned) = emit_subvolumes(config, &grid);

    let result = PartitionResult {
        num_total_blocks: grid
            .num_subvolumes()
            .saturating_mul(config.blocks_per_subvolume()),
        num_active_blocks: grid.num_active_blocks(),
        num_subvolumes: grid.num_subvolumes(),
        subvols_pruned,
        subvolumes,
    };

    info!(
        subvolumes = result.num_subvolumes,
        active_blocks = result.num_active_blocks,
        total_blocks = result.num_total_blocks,
        pruned = result.subvols_pruned,
        "partitioned spans"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> PartitionConfig {
        PartitionConfig::default().with_capacity(4)
    }

    #[test]
    fn test_single_full_row() {
        let result = partition(&small_config(), &[Span::new(0, 0, 0, 15)]).unwrap();

        assert_eq!(result.num_subvolumes, 1);
        assert_eq!(result.num_total_blocks, 4096);
        assert_eq!(result.num_active_blocks, 16);
        assert_eq!(result.subvols_pruned, 0);

        let subvol = &result.subvolumes[0];
        assert_eq!(subvol.extents.min_point, Point3d::ZERO);
        assert_eq!(subvol.extents.max_point, Point3d::splat(511));
        assert_eq!(subvol.chunk_extents.min_chunk, Point3d::ZERO);
        assert_eq!(subvol.chunk_extents.max_chunk, Point3d::splat(15));
        assert_eq!(subvol.total_blocks, 4096);
        assert_eq!(subvol.active_blocks, 16);
    }

    #[test]
    fn test_empty_input() {
        let result = partition(&small_config(), &[]).unwrap();
        assert_eq!(result, PartitionResult::default());
    }

    #[test]
    fn test_points_are_xyz_ordered() {
        // z cell 1, y cell 2, x cell 3
        let result = partition(&small_config(), &[Span::new(16, 32, 48, 48)]).unwrap();
        let subvol = &result.subvolumes[0];

        assert_eq!(subvol.extents.min_point, Point3d::new(1536, 1024, 512));
        assert_eq!(subvol.extents.max_point, Point3d::new(2047, 1535, 1023));
        assert_eq!(subvol.chunk_extents.min_chunk, Point3d::new(48, 32, 16));
        assert_eq!(subvol.chunk_extents.max_chunk, Point3d::new(63, 47, 31));
    }

    #[test]
    fn test_gap_between_cells_is_pruned() {
        let spans = [Span::new(0, 0, 0, 0), Span::new(0, 0, 32, 32)];
        let result = partition(&small_config(), &spans).unwrap();

        assert_eq!(result.num_subvolumes, 2);
        assert_eq!(result.subvols_pruned, 1);
        assert_eq!(result.num_total_blocks, 2 * 4096);
    }

    #[test]
    fn test_pruned_counts_bounding_box_holes_only() {
        // Touching (z=1, y=1, x=1) makes the bounding box 2x2x2 with one
        // occupied cell; cells past index 1 are never counted.
        let result = partition(&small_config(), &[Span::new(16, 16, 16, 16)]).unwrap();

        assert_eq!(result.num_subvolumes, 1);
        assert_eq!(result.subvols_pruned, 7);
    }

    #[test]
    fn test_scan_order_is_row_major() {
        let spans = [
            Span::new(16, 0, 0, 0),
            Span::new(0, 16, 0, 0),
            Span::new(0, 0, 16, 16),
            Span::new(0, 0, 0, 0),
        ];
        let result = partition(&small_config(), &spans).unwrap();

        let mins: Vec<Point3d> = result
            .subvolumes
            .iter()
            .map(|s| s.chunk_extents.min_chunk)
            .collect();
        assert_eq!(
            mins,
            vec![
                Point3d::new(0, 0, 0),
                Point3d::new(16, 0, 0),
                Point3d::new(0, 16, 0),
                Point3d::new(0, 0, 16),
            ]
        );
    }

    #[test]
    fn test_block_width_matches_batch_size() {
        let config = PartitionConfig::new(4, 8).with_capacity(8);
        let spans = [Span::new(3, 9, 0, 30), Span::new(27, 1, 5, 5)];
        let result = partition(&config, &spans).unwrap();

        for subvol in &result.subvolumes {
            let width = subvol.chunk_extents.max_chunk - subvol.chunk_extents.min_chunk + 1;
            assert_eq!(width, Point3d::splat(4));
            assert_eq!(subvol.total_blocks, 64);
            assert!(subvol.active_blocks <= subvol.total_blocks);
        }
    }

    #[test]
    fn test_capacity_error_aborts() {
        let spans = [Span::new(0, 0, 0, 0), Span::new(64, 0, 0, 0)];
        assert!(partition(&small_config(), &spans).is_err());
    }
}
