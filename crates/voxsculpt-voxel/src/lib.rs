//! Dense voxel storage: the grid, its emptiness contract, flat-file persistence,
//! and the texture-order export consumed by the renderer.

pub mod grid;
pub mod grid_serial;
pub mod parallel;
pub mod value;

pub use grid::{NEIGHBORS_6, VoxelGrid};
pub use grid_serial::GridSerError;
pub use parallel::for_each_slab_mut;
pub use value::VoxelValue;
