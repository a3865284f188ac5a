//! Coarse ambient-occlusion field: one fill ratio per cubic block of voxels,
//! fully baked on wholesale grid changes and patched per block after edits.

mod field;

pub use field::{DEFAULT_BLOCK_SIZE, OcclusionField};
