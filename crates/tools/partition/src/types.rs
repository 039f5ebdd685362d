//! Types for span input, subvolume output and partitioning errors

use glam::I64Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type for partitioning operations
pub type Result<T> = std::result::Result<T, PartitionError>;

/// Partitioning error types
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error("error in reading from standard input: {0}")]
    StreamRead(#[source] std::io::Error),

    #[error("error writing to standard output: {0}")]
    StreamWrite(#[source] std::io::Error),

    #[error("error parsing JSON from stdin: {0}")]
    InputFormat(#[source] serde_json::Error),

    #[error("block {axis} index ({index}) exceeds static subvolume of {capacity} cells")]
    CapacityExceeded {
        axis: Axis,
        index: i64,
        capacity: usize,
    },

    #[error("error turning partitioning into JSON: {0}")]
    OutputEncoding(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Grid axis, used when reporting out-of-range indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// A point in voxel or block space, serialized as `[x, y, z]`
pub type Point3d = I64Vec3;

/// One row of contiguous active blocks at a fixed (z, y).
///
/// Deserializes from a 4-element array `[z, y, x0, x1]`; `x0..=x1` is
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 4]", into = "[i64; 4]")]
pub struct Span {
    pub z: i64,
    pub y: i64,
    pub x0: i64,
    pub x1: i64,
}

impl Span {
    pub fn new(z: i64, y: i64, x0: i64, x1: i64) -> Self {
        Self { z, y, x0, x1 }
    }

    /// Number of blocks covered by the span (0 when `x1 < x0`)
    pub fn width(&self) -> u64 {
        if self.x1 < self.x0 {
            0
        } else {
            self.x1.abs_diff(self.x0) + 1
        }
    }
}

impl From<[i64; 4]> for Span {
    fn from([z, y, x0, x1]: [i64; 4]) -> Self {
        Self { z, y, x0, x1 }
    }
}

impl From<Span> for [i64; 4] {
    fn from(span: Span) -> Self {
        [span.z, span.y, span.x0, span.x1]
    }
}

/// Closed voxel-space box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Extents3d {
    pub min_point: Point3d,
    pub max_point: Point3d,
}

/// Closed block-space box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChunkExtents3d {
    pub min_chunk: Point3d,
    pub max_chunk: Point3d,
}

/// A non-empty cell of the occupancy grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Subvolume {
    #[serde(flatten)]
    pub extents: Extents3d,
    #[serde(flatten)]
    pub chunk_extents: ChunkExtents3d,
    pub total_blocks: u64,
    pub active_blocks: u64,
}

/// Summary of a whole partitioning run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionResult {
    pub num_total_blocks: u64,
    pub num_active_blocks: u64,
    pub num_subvolumes: u64,
    pub subvols_pruned: u64,
    pub subvolumes: Vec<Subvolume>,
}
