//! Flattening a scene into one colour grid.

use glam::{IVec3, Vec3};
use voxsculpt_voxel::VoxelGrid;

use crate::error::VoxError;
use crate::scene::VoxScene;

/// Inset applied to every model's extent and voxel positions. Files exported
/// by MagicaVoxel need it to line models up.
pub const MODEL_MARGIN: i32 = 3;

/// Most voxels a composited scene may span (`512^3`).
pub const MAX_SCENE_VOLUME: u64 = 1 << 27;

impl VoxScene {
    /// Union bounding box `(min, max)` of all models, each spanning
    /// `position .. position + size - MODEL_MARGIN` in file axes.
    pub fn bounds(&self) -> Result<(IVec3, IVec3), VoxError> {
        let mut bounds: Option<(IVec3, IVec3)> = None;
        for (i, model) in self.models.iter().enumerate() {
            let end = checked_add(model.position, model.size)
                .and_then(|end| checked_sub(end, IVec3::splat(MODEL_MARGIN)))
                .ok_or(VoxError::PositionOutOfRange {
                    model: i,
                    position: model.position.to_array(),
                })?;
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(model.position), max.max(end)),
                None => (model.position, end),
            });
        }
        bounds.ok_or(VoxError::NoModels)
    }

    /// Composites every model into a grid sized to [`bounds`](Self::bounds).
    ///
    /// The file is Z-up, so the grid is `(x, z, y)` of the file box. Voxels with
    /// palette index 0 and voxels landing outside the box are dropped. A palette
    /// entry of pure black produces an empty voxel, since zero is the empty value.
    /// Scenes spanning more than [`MAX_SCENE_VOLUME`] voxels are rejected before
    /// anything is allocated.
    pub fn composite(&self) -> Result<VoxelGrid<Vec3>, VoxError> {
        let (min, max) = self.bounds()?;
        let too_large = VoxError::SceneTooLarge {
            min: min.to_array(),
            max: max.to_array(),
            limit: MAX_SCENE_VOLUME,
        };
        let Some(extent) = checked_sub(max, min).map(|e| e.max(IVec3::ZERO)) else {
            return Err(too_large);
        };
        let volume = extent.x as u128 * extent.y as u128 * extent.z as u128;
        if volume > MAX_SCENE_VOLUME as u128 {
            return Err(too_large);
        }
        let mut grid = VoxelGrid::new(IVec3::new(extent.x, extent.z, extent.y).as_uvec3());

        let mut reserved_index = 0_usize;
        let mut outside = 0_usize;
        for model in &self.models {
            let base = checked_sub(model.position, min)
                .and_then(|rel| checked_sub(rel, IVec3::splat(MODEL_MARGIN)));
            for voxel in &model.voxels {
                let Some(color) = self.palette.color(voxel.index) else {
                    reserved_index += 1;
                    continue;
                };
                match base.and_then(|base| checked_add(base, voxel.position())) {
                    Some(world) if world.cmpge(IVec3::ZERO).all() && world.cmplt(extent).all() => {
                        grid.set(IVec3::new(world.x, world.z, world.y), color);
                    }
                    _ => outside += 1,
                }
            }
        }

        if reserved_index > 0 {
            tracing::warn!(count = reserved_index, "skipped voxels with palette index 0");
        }
        if outside > 0 {
            tracing::warn!(count = outside, "dropped voxels outside the model bounds");
        }
        tracing::info!(
            models = self.models.len(),
            size = %grid.size(),
            filled = grid.filled_count(),
            "vox scene composited"
        );
        Ok(grid)
    }
}

fn checked_add(a: IVec3, b: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        a.x.checked_add(b.x)?,
        a.y.checked_add(b.y)?,
        a.z.checked_add(b.z)?,
    ))
}

fn checked_sub(a: IVec3, b: IVec3) -> Option<IVec3> {
    Some(IVec3::new(
        a.x.checked_sub(b.x)?,
        a.y.checked_sub(b.y)?,
        a.z.checked_sub(b.z)?,
    ))
}
