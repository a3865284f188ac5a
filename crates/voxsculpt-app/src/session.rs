//! Owned grid plus its occlusion field, kept consistent across every edit.
//!
//! Wholesale replacements rebake the field; sculpt strokes patch only the
//! blocks they touched.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Instant;

use glam::{IVec3, UVec3, Vec3};
use voxsculpt_config::FlatFormat;
use voxsculpt_generate::Procedural;
use voxsculpt_occlusion::OcclusionField;
use voxsculpt_sculpt::{SculptEdit, sculpt};
use voxsculpt_trace::{VoxelHit, trace};
use voxsculpt_voxel::{GridSerError, VoxelGrid, VoxelValue};
use voxsculpt_vox::VoxError;

/// Errors from loading or saving session contents.
///
/// On any error the live grid is left untouched.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridSerError),

    #[error("model import failed: {0}")]
    Vox(#[from] VoxError),

    #[error("file access failed: {0}")]
    Io(#[from] std::io::Error),
}

/// What one pick-and-sculpt call did.
#[derive(Clone, Debug, PartialEq)]
pub struct SculptReport {
    pub hit: VoxelHit,
    pub edit: SculptEdit,
    /// Occlusion blocks recomputed for this stroke.
    pub blocks_updated: usize,
}

/// Renderer-ready copies of the grid and occlusion field, both in `[z][y][x]`
/// texture order.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureBuffers<V> {
    pub voxels: Vec<V>,
    pub voxel_size: UVec3,
    pub occlusion: Vec<f32>,
    pub occlusion_size: UVec3,
}

/// A voxel grid and its derived occlusion field.
pub struct SculptSession<V: VoxelValue> {
    grid: VoxelGrid<V>,
    occlusion: OcclusionField,
}

impl<V: VoxelValue> SculptSession<V> {
    /// Takes ownership of `grid` and bakes its occlusion field.
    pub fn new(grid: VoxelGrid<V>, block_size: u32) -> Self {
        let occlusion = OcclusionField::baked(&grid, block_size);
        Self { grid, occlusion }
    }

    pub fn grid(&self) -> &VoxelGrid<V> {
        &self.grid
    }

    pub fn occlusion(&self) -> &OcclusionField {
        &self.occlusion
    }

    /// Swaps in a new grid, possibly of a different size, and rebakes.
    pub fn replace_grid(&mut self, grid: VoxelGrid<V>) {
        tracing::info!(size = %grid.size(), filled = grid.filled_count(), "grid replaced");
        self.grid = grid;
        self.occlusion.bake_full(&self.grid);
    }

    /// Replaces the grid with a procedurally generated one.
    pub fn fill_procedural(&mut self, recipe: &Procedural, size: UVec3, fill: V) {
        self.replace_grid(recipe.generate(size, fill));
    }

    /// Loads a flat grid file sized like the current grid.
    pub fn load_flat(&mut self, path: &Path, format: FlatFormat) -> Result<(), SessionError> {
        let reader = BufReader::new(File::open(path)?);
        let size = self.grid.size();
        let grid = match format {
            FlatFormat::Json => VoxelGrid::load_json(reader, size)?,
            FlatFormat::Binary => VoxelGrid::load_binary(reader, size)?,
        };
        tracing::info!(path = %path.display(), ?format, "flat grid loaded");
        self.replace_grid(grid);
        Ok(())
    }

    /// Writes the grid as a flat file.
    pub fn save_flat(&self, path: &Path, format: FlatFormat) -> Result<(), SessionError> {
        let writer = BufWriter::new(File::create(path)?);
        match format {
            FlatFormat::Json => self.grid.save_json(writer)?,
            FlatFormat::Binary => self.grid.save_binary(writer)?,
        }
        tracing::info!(path = %path.display(), ?format, "flat grid saved");
        Ok(())
    }

    /// Applies one stroke at `center` and patches the occlusion blocks it touched.
    pub fn sculpt_at(&mut self, center: IVec3, radius: u32, value: V) -> (SculptEdit, usize) {
        let edit = sculpt(&mut self.grid, center, radius, value);
        let blocks = if edit.is_empty() {
            0
        } else {
            self.occlusion
                .update_incremental(&self.grid, &edit.changed, edit.corner)
        };
        (edit, blocks)
    }

    /// Traces a pick ray and sculpts at the first filled voxel it hits.
    ///
    /// Returns `None` when the ray hits nothing within `max_steps`; the grid is
    /// unchanged in that case.
    pub fn pick_and_sculpt(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        max_steps: u32,
        radius: u32,
        value: V,
    ) -> Option<SculptReport> {
        let start = Instant::now();
        let hit = trace(&self.grid, origin, direction, max_steps)?;
        let (edit, blocks_updated) = self.sculpt_at(hit.voxel, radius, value);
        tracing::debug!(
            voxel = %hit.voxel,
            steps = hit.steps,
            changed = edit.changed.len(),
            blocks_updated,
            elapsed_us = start.elapsed().as_micros() as u64,
            "pick and sculpt"
        );
        Some(SculptReport {
            hit,
            edit,
            blocks_updated,
        })
    }

    /// Permuted exports for volumetric texture upload.
    pub fn texture_buffers(&self) -> TextureBuffers<V> {
        TextureBuffers {
            voxels: self.grid.to_texture_order(),
            voxel_size: self.grid.size(),
            occlusion: self.occlusion.to_texture_order(),
            occlusion_size: self.occlusion.size(),
        }
    }
}

impl SculptSession<Vec3> {
    /// Decodes a `.vox` file and replaces the grid with it.
    ///
    /// Decoding finishes before the live grid is touched, so a truncated or
    /// invalid file leaves the session as it was.
    pub fn load_from_model(&mut self, bytes: &[u8]) -> Result<(), SessionError> {
        let grid = voxsculpt_vox::decode(bytes)?;
        self.replace_grid(grid);
        Ok(())
    }
}
