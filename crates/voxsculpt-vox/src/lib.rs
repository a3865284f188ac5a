//! Decoder for MagicaVoxel-style `.vox` files.
//!
//! [`parse`] reads the chunk stream into a [`VoxScene`] of positioned models
//! sharing one palette; [`VoxScene::composite`] flattens them into a single
//! colour grid. [`decode`] does both.

mod compose;
mod error;
mod palette;
mod reader;
mod scene;

pub use compose::{MAX_SCENE_VOLUME, MODEL_MARGIN};
pub use error::VoxError;
pub use palette::{DEFAULT_PALETTE, Palette};
pub use scene::{MAX_MODEL_SIZE, VoxModel, VoxScene, VoxVoxel, parse};

use glam::Vec3;
use voxsculpt_voxel::VoxelGrid;

/// Parses `bytes` and composites every model into one colour grid.
pub fn decode(bytes: &[u8]) -> Result<VoxelGrid<Vec3>, VoxError> {
    parse(bytes)?.composite()
}
