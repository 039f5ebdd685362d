//! Block span partitioning for Crossworld volume tooling
//!
//! This crate turns a list of 1-block-thick spans (rows of active blocks
//! along x at a fixed z and y) into a partitioning of the block grid into
//! fixed-size cubic subvolumes, reporting only the subvolumes that contain
//! active blocks.
//!
//! # Pipeline
//!
//! - **Parse**: read a JSON array of `[z, y, x0, x1]` spans
//! - **Accumulate**: count active blocks per subvolume in a fixed-capacity
//!   [`OccupancyGrid`]
//! - **Emit**: sweep the grid in `(z, y, x)` order and describe every
//!   non-empty subvolume with its voxel and block extents
//! - **Encode**: write the [`PartitionResult`] as indented JSON
//!
//! # Example
//!
//! ```
//! use ::partition::{partition, PartitionConfig, Span};
//!
//! let config = PartitionConfig::default().with_capacity(8);
//! let result = partition(&config, &[Span::new(0, 0, 0, 15)]).unwrap();
//!
//! assert_eq!(result.num_subvolumes, 1);
//! assert_eq!(result.num_active_blocks, 16);
//! assert_eq!(result.subvolumes[0].total_blocks, 4096);
//! ```

pub mod cli;
pub mod config;
pub mod io;
pub mod occupancy;
pub mod partition;
pub mod types;

pub use config::{PartitionConfig, GRID_CAPACITY};
pub use occupancy::OccupancyGrid;
pub use partition::{emit_subvolumes, partition};
pub use types::{
    Axis, ChunkExtents3d, Extents3d, PartitionError, PartitionResult, Point3d, Result, Span,
    Subvolume,
};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::PartitionConfig;
    pub use crate::io::{encode_result, parse_spans, read_spans, write_result};
    pub use crate::partition::partition;
    pub use crate::types::{PartitionError, PartitionResult, Span, Subvolume};
}
