//! Dense occupancy grid over subvolume-grid coordinates
//!
//! Each cell counts how many active blocks fall inside the corresponding
//! subvolume. The grid has a fixed number of cells per axis and never
//! grows: a span that maps outside it is an error.

use crate::config::PartitionConfig;
use crate::types::{Axis, PartitionError, Result, Span};
use tracing::debug;

/// Fixed-capacity 3D counter array indexed by `(gz, gy, gx)`
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cells: Vec<u32>,
    capacity: usize,
    max_z: usize,
    max_y: usize,
    max_x: usize,
    num_subvolumes: u64,
    num_active_blocks: u64,
}

impl OccupancyGrid {
    /// Allocate a zeroed grid with `capacity` cells along each axis
    pub fn new(capacity: usize) -> Self {
        debug!(capacity, "allocating occupancy grid");
        Self {
            cells: vec![0; capacity * capacity * capacity],
            capacity,
            max_z: 0,
            max_y: 0,
            max_x: 0,
            num_subvolumes: 0,
            num_active_blocks: 0,
        }
    }

    /// Build a grid from `config` and accumulate all spans into it.
    ///
    /// Stops at the first span that falls outside the grid.
    pub fn from_spans(config: &PartitionConfig, spans: &[Span]) -> Result<Self> {
        config.validate()?;

        let mut grid = Self::new(config.capacity);
        for span in spans {
            grid.accumulate(config.batch_size, span)?;
        }

        debug!(
            spans = spans.len(),
            subvolumes = grid.num_subvolumes,
            active_blocks = grid.num_active_blocks,
            "accumulated spans"
        );
        Ok(grid)
    }

    /// Add every block of `span` to its subvolume cell.
    ///
    /// The row indices are checked (y, then z) before any block is
    /// counted; each x index is checked as it is reached, so a failing span
    /// may have counted its leading blocks before the error is returned.
    pub fn accumulate(&mut self, batch_size: i64, span: &Span) -> Result<()> {
        let gz = span.z / batch_size;
        let gy = span.y / batch_size;
        let gy = self.check_index(Axis::Y, gy)?;
        let gz = self.check_index(Axis::Z, gz)?;

        self.max_z = self.max_z.max(gz);
        self.max_y = self.max_y.max(gy);

        for x in span.x0..=span.x1 {
            let gx = self.check_index(Axis::X, x / batch_size)?;
            self.max_x = self.max_x.max(gx);

            self.increment(self.offset(gz, gy, gx));
        }

        Ok(())
    }

    /// Active block count of the cell at `(z, y, x)`
    #[inline]
    pub fn count(&self, z: usize, y: usize, x: usize) -> u32 {
        self.cells[self.offset(z, y, x)]
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest z cell index touched so far (0 if none)
    #[inline]
    pub fn max_z(&self) -> usize {
        self.max_z
    }

    /// Highest y cell index touched so far (0 if none)
    #[inline]
    pub fn max_y(&self) -> usize {
        self.max_y
    }

    /// Highest x cell index touched so far (0 if none)
    #[inline]
    pub fn max_x(&self) -> usize {
        self.max_x
    }

    /// Whether `(z, y, x)` lies inside the bounding box of touched cells
    #[inline]
    pub fn within_touched_bounds(&self, z: usize, y: usize, x: usize) -> bool {
        z <= self.max_z && y <= self.max_y && x <= self.max_x
    }

    /// Number of distinct cells with at least one active block
    #[inline]
    pub fn num_subvolumes(&self) -> u64 {
        self.num_subvolumes
    }

    /// Total active blocks added across all spans
    #[inline]
    pub fn num_active_blocks(&self) -> u64 {
        self.num_active_blocks
    }

    /// Count one active block in the cell at `index`.
    ///
    /// Cell counters saturate at `u32::MAX`; the block total keeps counting.
    fn increment(&mut self, index: usize) {
        let cell = &mut self.cells[index];
        if *cell == 0 {
            self.num_subvolumes += 1;
        }
        *cell = cell.saturating_add(1);
        self.num_active_blocks += 1;
    }

    fn check_index(&self, axis: Axis, index: i64) -> Result<usize> {
        if index < 0 || index >= self.capacity as i64 {
            return Err(PartitionError::CapacityExceeded {
                axis,
                index,
                capacity: self.capacity,
            });
        }
        Ok(index as usize)
    }

    #[inline]
    fn offset(&self, z: usize, y: usize, x: usize) -> usize {
        (z * self.capacity + y) * self.capacity + x
    }
}
