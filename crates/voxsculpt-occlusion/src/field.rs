//! Block fill-ratio grid used as a coarse ambient-occlusion term.
//!
//! Each entry is `filled / block_size^3` over one cubic block of the voxel grid.
//! The field covers `floor(grid_size / block_size)` blocks per axis; voxels in
//! the remainder past the last whole block are never sampled.

use std::time::Instant;

use glam::{IVec3, UVec3};
use rustc_hash::FxHashSet;
use voxsculpt_voxel::grid::{permute_to_texture_order, volume};
use voxsculpt_voxel::{VoxelGrid, VoxelValue, for_each_slab_mut};

/// Default block edge length, in voxels.
pub const DEFAULT_BLOCK_SIZE: u32 = 32;

/// Coarse occlusion values, one per block, stored row-major like the voxel grid.
#[derive(Clone, Debug, PartialEq)]
pub struct OcclusionField {
    block_size: u32,
    size: UVec3,
    values: Vec<f32>,
}

impl OcclusionField {
    /// Creates an all-zero field sized for a grid of `grid_size`.
    pub fn new(grid_size: UVec3, block_size: u32) -> Self {
        let block_size = block_size.max(1);
        let size = grid_size / block_size;
        Self {
            block_size,
            size,
            values: vec![0.0; volume(size)],
        }
    }

    /// Creates a field for `grid` and bakes every block.
    pub fn baked<V: VoxelValue>(grid: &VoxelGrid<V>, block_size: u32) -> Self {
        let mut field = Self::new(grid.size(), block_size);
        field.bake_full(grid);
        field
    }

    /// Block edge length in voxels.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of blocks per axis.
    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Row-major view of the block values.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Returns the value of `block`, or `0.0` outside the field.
    pub fn get(&self, block: IVec3) -> f32 {
        self.index_of(block).map_or(0.0, |i| self.values[i])
    }

    /// The values in the renderer's `[z][y][x]` texture order.
    pub fn to_texture_order(&self) -> Vec<f32> {
        permute_to_texture_order(&self.values, self.size)
    }

    /// Recomputes every block from `grid`. `O(grid volume)`, split into X slabs
    /// across worker threads.
    ///
    /// If the grid size no longer matches, the field is resized first.
    pub fn bake_full<V: VoxelValue>(&mut self, grid: &VoxelGrid<V>) {
        let start = Instant::now();
        if grid.size() / self.block_size != self.size {
            *self = Self::new(grid.size(), self.block_size);
        }

        let block_size = self.block_size;
        let (h, d) = (self.size.y as usize, self.size.z as usize);
        for_each_slab_mut(&mut self.values, h * d, |x, slab| {
            for (i, value) in slab.iter_mut().enumerate() {
                let block = IVec3::new(x as i32, (i / d) as i32, (i % d) as i32);
                *value = block_fill_ratio(grid, block, block_size);
            }
        });

        tracing::info!(
            blocks = self.values.len(),
            block_size,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "occlusion field baked"
        );
    }

    /// Recomputes only the blocks containing the given changed voxels.
    ///
    /// `changed_local` are offsets from `region_corner`, as reported by a sculpt
    /// stroke. Blocks outside the field (the uncovered remainder) are skipped.
    /// Returns the number of blocks recomputed. Cost is proportional to the
    /// number of distinct blocks touched, not to the grid size.
    pub fn update_incremental<V: VoxelValue>(
        &mut self,
        grid: &VoxelGrid<V>,
        changed_local: &[IVec3],
        region_corner: IVec3,
    ) -> usize {
        debug_assert_eq!(
            grid.size() / self.block_size,
            self.size,
            "occlusion field is stale for this grid"
        );

        let block_size = self.block_size as i32;
        let touched: FxHashSet<IVec3> = changed_local
            .iter()
            .map(|&local| (region_corner + local).div_euclid(IVec3::splat(block_size)))
            .collect();

        let mut updated = 0;
        for block in touched {
            if let Some(i) = self.index_of(block) {
                self.values[i] = block_fill_ratio(grid, block, self.block_size);
                updated += 1;
            }
        }

        tracing::debug!(
            changed = changed_local.len(),
            blocks = updated,
            "occlusion field patched"
        );
        updated
    }

    fn index_of(&self, block: IVec3) -> Option<usize> {
        let inside = block.cmpge(IVec3::ZERO).all() && block.as_uvec3().cmplt(self.size).all();
        inside.then(|| {
            let (h, d) = (self.size.y as usize, self.size.z as usize);
            block.x as usize * h * d + block.y as usize * d + block.z as usize
        })
    }
}

/// Fraction of filled voxels in one block.
fn block_fill_ratio<V: VoxelValue>(grid: &VoxelGrid<V>, block: IVec3, block_size: u32) -> f32 {
    let n = block_size as i32;
    let origin = block * n;
    let mut filled = 0_u32;
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                if grid.is_filled(origin + IVec3::new(x, y, z)) {
                    filled += 1;
                }
            }
        }
    }
    filled as f32 / (block_size * block_size * block_size) as f32
}
