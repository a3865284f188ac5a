//! Dense 3D voxel grid with bounds-checked access.
//!
//! Storage is a single row-major `Vec` indexed `x * height * depth + y * depth + z`,
//! the same order the flat save format uses. The size is fixed for the lifetime
//! of a grid; resizing means building a new one.

use glam::{IVec3, UVec3};

use crate::parallel::for_each_slab_mut;
use crate::value::VoxelValue;

/// The six face-adjacent neighbour offsets.
pub const NEIGHBORS_6: [IVec3; 6] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

/// A dense grid of voxel values.
///
/// Reads outside the grid return [`VoxelValue::EMPTY`] so neighbour probes near
/// the edges need no special casing.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid<V: VoxelValue> {
    size: UVec3,
    data: Vec<V>,
}

impl<V: VoxelValue> VoxelGrid<V> {
    /// Allocates an all-empty grid of the given size.
    pub fn new(size: UVec3) -> Self {
        Self {
            size,
            data: vec![V::EMPTY; volume(size)],
        }
    }

    /// Builds a grid from a row-major buffer. Returns `None` on a length mismatch.
    pub fn from_vec(size: UVec3, data: Vec<V>) -> Option<Self> {
        (data.len() == volume(size)).then_some(Self { size, data })
    }

    /// Builds a grid by evaluating `f` at every coordinate, split into X slabs
    /// across worker threads.
    pub fn from_fn_parallel<F>(size: UVec3, f: F) -> Self
    where
        F: Fn(IVec3) -> V + Sync,
    {
        let mut grid = Self::new(size);
        let slab_len = (size.y * size.z) as usize;
        let depth = size.z as usize;
        for_each_slab_mut(&mut grid.data, slab_len, |x, slab| {
            for (i, cell) in slab.iter_mut().enumerate() {
                let pos = IVec3::new(x as i32, (i / depth) as i32, (i % depth) as i32);
                *cell = f(pos);
            }
        });
        grid
    }

    /// Grid dimensions.
    pub fn size(&self) -> UVec3 {
        self.size
    }

    /// Total number of cells.
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if `pos` lies inside the grid.
    #[inline]
    pub fn contains(&self, pos: IVec3) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.size.x
            && (pos.y as u32) < self.size.y
            && (pos.z as u32) < self.size.z
    }

    /// Returns the stored value, or [`VoxelValue::EMPTY`] when out of bounds.
    #[inline]
    pub fn get(&self, pos: IVec3) -> V {
        match self.index_of(pos) {
            Some(i) => self.data[i],
            None => V::EMPTY,
        }
    }

    /// Returns `true` if the voxel at `pos` is filled. Out of bounds is empty.
    #[inline]
    pub fn is_filled(&self, pos: IVec3) -> bool {
        self.get(pos).is_filled()
    }

    /// Writes `value` at `pos`.
    ///
    /// An out-of-bounds write is a caller bug: it asserts in debug builds and is
    /// ignored in release builds. The backing store is never written out of range.
    #[inline]
    pub fn set(&mut self, pos: IVec3, value: V) {
        debug_assert!(
            self.contains(pos),
            "voxel write at {pos} outside grid of size {}",
            self.size
        );
        if let Some(i) = self.index_of(pos) {
            self.data[i] = value;
        }
    }

    /// A filled voxel with at least one empty 6-neighbour.
    pub fn is_surface(&self, pos: IVec3) -> bool {
        self.is_filled(pos) && NEIGHBORS_6.iter().any(|&n| !self.is_filled(pos + n))
    }

    /// Returns `true` if any 6-neighbour of `pos` is filled.
    pub fn touches_filled(&self, pos: IVec3) -> bool {
        NEIGHBORS_6.iter().any(|&n| self.is_filled(pos + n))
    }

    /// Counts filled voxels across the whole grid.
    pub fn filled_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_filled()).count()
    }

    /// Row-major view of the storage.
    pub fn as_slice(&self) -> &[V] {
        &self.data
    }

    /// Copies the grid into the renderer's texture order.
    ///
    /// The volumetric texture expects X to vary fastest (`[z][y][x]`), the
    /// reverse of the storage order. The permutation is applied here, at
    /// export time, and never stored.
    pub fn to_texture_order(&self) -> Vec<V> {
        permute_to_texture_order(&self.data, self.size)
    }

    #[inline]
    fn index_of(&self, pos: IVec3) -> Option<usize> {
        self.contains(pos).then(|| {
            let (h, d) = (self.size.y as usize, self.size.z as usize);
            pos.x as usize * h * d + pos.y as usize * d + pos.z as usize
        })
    }
}

/// Number of cells in a box of the given size.
pub fn volume(size: UVec3) -> usize {
    size.x as usize * size.y as usize * size.z as usize
}

/// Reorders a row-major `[x][y][z]` buffer into `[z][y][x]` (X fastest).
pub fn permute_to_texture_order<T: Copy>(data: &[T], size: UVec3) -> Vec<T> {
    let (w, h, d) = (size.x as usize, size.y as usize, size.z as usize);
    let mut out = Vec::with_capacity(data.len());
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                out.push(data[x * h * d + y * d + z]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = VoxelGrid::<f32>::new(UVec3::new(4, 5, 6));
        assert_eq!(grid.voxel_count(), 120);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let mut grid = VoxelGrid::<Vec3>::new(UVec3::splat(8));
        let c = Vec3::new(0.2, 0.4, 0.8);
        for pos in [IVec3::ZERO, IVec3::new(7, 0, 3), IVec3::splat(7)] {
            grid.set(pos, c);
            assert_eq!(grid.get(pos), c);
        }
        assert_eq!(grid.filled_count(), 3);
    }

    #[test]
    fn test_out_of_bounds_reads_are_empty() {
        let grid = VoxelGrid::from_fn_parallel(UVec3::splat(4), |_| 1.0_f32);
        for pos in [
            IVec3::new(-1, 0, 0),
            IVec3::new(0, -1, 0),
            IVec3::new(0, 0, -1),
            IVec3::new(4, 0, 0),
            IVec3::new(0, 4, 0),
            IVec3::new(0, 0, 4),
            IVec3::splat(i32::MAX),
        ] {
            assert_eq!(grid.get(pos), 0.0);
            assert!(!grid.is_filled(pos));
        }
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_out_of_bounds_write_is_ignored_in_release() {
        let mut grid = VoxelGrid::<f32>::new(UVec3::splat(2));
        grid.set(IVec3::new(2, 0, 0), 1.0);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside grid")]
    fn test_out_of_bounds_write_asserts_in_debug() {
        let mut grid = VoxelGrid::<f32>::new(UVec3::splat(2));
        grid.set(IVec3::new(2, 0, 0), 1.0);
    }

    #[test]
    fn test_row_major_layout() {
        let size = UVec3::new(2, 3, 4);
        let grid = VoxelGrid::from_fn_parallel(size, |p| (p.x * 100 + p.y * 10 + p.z) as f32);
        // flat[x * height * depth + y * depth + z]
        assert_eq!(grid.as_slice()[1 * 3 * 4 + 2 * 4 + 3], 123.0);
    }

    #[test]
    fn test_texture_order_puts_x_fastest() {
        let size = UVec3::new(2, 3, 4);
        let grid = VoxelGrid::from_fn_parallel(size, |p| (p.x * 100 + p.y * 10 + p.z) as f32);
        let tex = grid.to_texture_order();
        // tex[z * height * width + y * width + x]
        assert_eq!(tex[3 * 3 * 2 + 2 * 2 + 1], 123.0);
        assert_eq!(tex[1], 100.0);
    }

    #[test]
    fn test_surface_and_adjacency() {
        let mut grid = VoxelGrid::<f32>::new(UVec3::splat(5));
        for x in 1..4 {
            for y in 1..4 {
                for z in 1..4 {
                    grid.set(IVec3::new(x, y, z), 1.0);
                }
            }
        }
        assert!(!grid.is_surface(IVec3::splat(2)));
        assert!(grid.is_surface(IVec3::new(1, 2, 2)));
        assert!(grid.touches_filled(IVec3::new(0, 2, 2)));
        assert!(!grid.touches_filled(IVec3::new(0, 0, 0)));
    }

    #[test]
    fn test_edge_voxel_counts_as_surface() {
        let grid = VoxelGrid::from_fn_parallel(UVec3::splat(3), |_| 1.0_f32);
        assert!(grid.is_surface(IVec3::ZERO));
        assert!(!grid.is_surface(IVec3::ONE));
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(VoxelGrid::<f32>::from_vec(UVec3::splat(2), vec![0.0; 7]).is_none());
        assert!(VoxelGrid::<f32>::from_vec(UVec3::splat(2), vec![0.0; 8]).is_some());
    }
}
