//! Ray traversal through the voxel grid.

mod voxel_trace;

pub use voxel_trace::{OccupancyProbe, VoxelHit, trace};
