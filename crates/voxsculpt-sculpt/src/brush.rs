//! Spherical brush strokes over a clamped cubic region.
//!
//! A stroke either grows empty voxels that touch existing fill or erodes filled
//! voxels that touch empty space. Candidates are gathered against the grid as
//! it was before the stroke and then written together, so no change made by a
//! stroke can affect another change's adjacency test within the same stroke.

use glam::{IVec3, UVec3, Vec3};
use voxsculpt_voxel::{VoxelGrid, VoxelValue};

/// Whether a stroke grows or erodes, derived from the brush value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    /// Fill empty voxels adjacent to the surface.
    Add,
    /// Clear filled voxels on the surface.
    Remove,
}

impl BrushMode {
    /// A filled value adds, the empty value removes.
    pub fn for_value<V: VoxelValue>(value: &V) -> Self {
        if value.is_filled() {
            Self::Add
        } else {
            Self::Remove
        }
    }
}

/// The cubic region a stroke covers after clamping into the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushRegion {
    /// Minimum corner of the region in grid coordinates.
    pub corner: IVec3,
    /// Edge length of the region, in voxels.
    pub edge: i32,
    /// How far the corner was shifted to stay in bounds. Subtracted from local
    /// coordinates so the sphere stays centred on the unclamped brush position.
    pub delta: IVec3,
}

impl BrushRegion {
    /// Centres a cube of edge `edge` on `center` and shifts it inside `grid_size`.
    ///
    /// `edge` is first capped at the grid's largest dimension.
    pub fn clamped(center: IVec3, edge: u32, grid_size: UVec3) -> Self {
        let edge = edge.min(grid_size.max_element()).min(i32::MAX as u32) as i32;
        let size = grid_size.as_ivec3();
        let mut corner = IVec3::ZERO;
        let mut delta = IVec3::ZERO;
        for axis in 0..3 {
            let start = center[axis].saturating_sub(edge / 2);
            let limit = size[axis] - edge;
            if start < 0 {
                delta[axis] = start;
            }
            if start > limit {
                delta[axis] = start.saturating_sub(limit);
            }
            corner[axis] = start.saturating_sub(delta[axis]);
        }
        Self {
            corner,
            edge,
            delta,
        }
    }

    /// Returns `true` if local coordinate `local` lies inside the brush sphere.
    ///
    /// The sphere has radius `edge / 2` (integer division) around the centre of
    /// the unclamped cube.
    pub fn in_sphere(&self, local: IVec3) -> bool {
        let center = Vec3::splat(self.edge as f32 / 2.0);
        (local.as_vec3() - self.delta.as_vec3()).distance(center) < (self.edge / 2) as f32
    }

    /// Iterates every local coordinate in `[0, edge)^3`.
    pub fn locals(&self) -> impl Iterator<Item = IVec3> + use<> {
        let edge = self.edge.max(0);
        (0..edge).flat_map(move |x| {
            (0..edge).flat_map(move |y| (0..edge).map(move |z| IVec3::new(x, y, z)))
        })
    }
}

/// The outcome of one stroke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SculptEdit {
    /// Corner of the clamped region; add to a local coordinate for world space.
    pub corner: IVec3,
    /// Mode the stroke ran in.
    pub mode: BrushMode,
    /// Region-local coordinates of every voxel that changed.
    pub changed: Vec<IVec3>,
}

impl SculptEdit {
    /// Returns `true` if the stroke changed nothing.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// World coordinates of the changed voxels.
    pub fn world_coords(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.changed.iter().map(move |&local| self.corner + local)
    }
}

/// Applies one brush stroke of edge `radius` centred on `center`.
///
/// With a filled `value`, empty voxels inside the sphere that touch a filled
/// 6-neighbour become `value`. With the empty value, filled voxels inside the
/// sphere that touch an empty 6-neighbour (or the grid edge) are cleared.
/// Cost is `O(radius^3)`.
pub fn sculpt<V: VoxelValue>(
    grid: &mut VoxelGrid<V>,
    center: IVec3,
    radius: u32,
    value: V,
) -> SculptEdit {
    let mode = BrushMode::for_value(&value);
    let region = BrushRegion::clamped(center, radius, grid.size());

    // Read phase: every test sees the pre-stroke grid.
    let snapshot: &VoxelGrid<V> = grid;
    let changed: Vec<IVec3> = region
        .locals()
        .filter(|&local| {
            let world = region.corner + local;
            if !snapshot.contains(world) || !region.in_sphere(local) {
                return false;
            }
            match mode {
                BrushMode::Add => !snapshot.is_filled(world) && snapshot.touches_filled(world),
                BrushMode::Remove => snapshot.is_surface(world),
            }
        })
        .collect();

    // Write phase.
    for &local in &changed {
        grid.set(region.corner + local, value);
    }

    tracing::debug!(
        ?mode,
        corner = %region.corner,
        radius,
        changed = changed.len(),
        "sculpt stroke applied"
    );

    SculptEdit {
        corner: region.corner,
        mode,
        changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: f32 = 0.6;

    fn floor_grid(size: u32, height: i32) -> VoxelGrid<f32> {
        VoxelGrid::from_fn_parallel(UVec3::splat(size), |p| if p.y < height { FILL } else { 0.0 })
    }

    fn solid_grid(size: u32) -> VoxelGrid<f32> {
        VoxelGrid::from_fn_parallel(UVec3::splat(size), |_| FILL)
    }

    #[test]
    fn test_remove_outside_fill_changes_nothing() {
        let mut grid = floor_grid(32, 4);
        let before = grid.clone();
        let edit = sculpt(&mut grid, IVec3::new(16, 24, 16), 8, 0.0);
        assert!(edit.is_empty());
        assert_eq!(edit.mode, BrushMode::Remove);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_add_grows_only_surface_adjacent_layer() {
        let mut grid = floor_grid(16, 4);
        let edit = sculpt(&mut grid, IVec3::new(8, 4, 8), 6, FILL);
        assert_eq!(edit.mode, BrushMode::Add);
        assert!(!edit.is_empty());
        // Only the layer directly on the floor qualifies; voxels above it were
        // not adjacent to fill before the stroke.
        for world in edit.world_coords() {
            assert_eq!(world.y, 4);
            assert_eq!(grid.get(world), FILL);
        }
        assert_eq!(grid.get(IVec3::new(8, 5, 8)), 0.0);
    }

    #[test]
    fn test_add_in_mid_air_creates_nothing() {
        let mut grid = floor_grid(32, 2);
        let edit = sculpt(&mut grid, IVec3::new(16, 20, 16), 8, FILL);
        assert!(edit.is_empty());
    }

    #[test]
    fn test_remove_erodes_only_surface() {
        let mut grid = solid_grid(16);
        let edit = sculpt(&mut grid, IVec3::new(8, 15, 8), 6, 0.0);
        assert!(!edit.is_empty());
        // The grid is solid, so only the top boundary layer is exposed.
        for world in edit.world_coords() {
            assert_eq!(world.y, 15);
            assert_eq!(grid.get(world), 0.0);
        }
        assert_eq!(grid.get(IVec3::new(8, 14, 8)), FILL);
    }

    #[test]
    fn test_changes_stay_inside_region_and_sphere() {
        let mut grid = floor_grid(32, 10);
        let radius = 9;
        let center = IVec3::new(12, 10, 17);
        let region = BrushRegion::clamped(center, radius, grid.size());
        let edit = sculpt(&mut grid, center, radius, FILL);
        assert_eq!(edit.corner, region.corner);
        let sphere_center = Vec3::splat(radius as f32 / 2.0);
        for &local in &edit.changed {
            assert!(local.cmpge(IVec3::ZERO).all());
            assert!(local.cmplt(IVec3::splat(radius as i32)).all());
            let d = (local - region.delta).as_vec3().distance(sphere_center);
            assert!(d < (radius / 2) as f32);
        }
    }

    #[test]
    fn test_clamp_keeps_sphere_on_unclamped_center() {
        let size = UVec3::splat(16);
        let region = BrushRegion::clamped(IVec3::ZERO, 8, size);
        assert_eq!(region.corner, IVec3::ZERO);
        assert_eq!(region.delta, IVec3::splat(-4));
        // The brush centre (0,0,0) maps to local (0,0,0) after the shift.
        assert!(region.in_sphere(IVec3::ZERO));
        assert!(!region.in_sphere(IVec3::new(4, 0, 0)));

        let region = BrushRegion::clamped(IVec3::splat(15), 8, size);
        assert_eq!(region.corner, IVec3::splat(8));
        assert_eq!(region.delta, IVec3::splat(3));
        // Brush centre 15 is local 7.
        assert!(region.in_sphere(IVec3::splat(7)));
    }

    #[test]
    fn test_remove_at_clamped_corner() {
        let mut grid = solid_grid(16);
        let edit = sculpt(&mut grid, IVec3::ZERO, 8, 0.0);
        assert_eq!(edit.corner, IVec3::ZERO);
        assert!(!edit.is_empty());
        for world in edit.world_coords() {
            assert!(world.as_vec3().length() < 4.0);
            assert!(world.min_element() == 0);
        }
    }

    #[test]
    fn test_single_voxel_add_is_idempotent() {
        let mut once = floor_grid(16, 4);
        let first = sculpt(&mut once, IVec3::new(8, 4, 8), 2, FILL);
        assert_eq!(first.changed.len(), 1);

        let mut twice = once.clone();
        let second = sculpt(&mut twice, IVec3::new(8, 4, 8), 2, FILL);
        assert!(second.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filling_a_pocket_is_idempotent() {
        let mut grid = solid_grid(16);
        for x in 7..9 {
            for y in 7..9 {
                for z in 7..9 {
                    grid.set(IVec3::new(x, y, z), 0.0);
                }
            }
        }
        let mut once = grid.clone();
        let first = sculpt(&mut once, IVec3::splat(8), 6, FILL);
        assert_eq!(first.changed.len(), 8);
        let mut twice = once.clone();
        assert!(sculpt(&mut twice, IVec3::splat(8), 6, FILL).is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_zero_radius_is_noop() {
        let mut grid = floor_grid(8, 4);
        let before = grid.clone();
        assert!(sculpt(&mut grid, IVec3::new(4, 4, 4), 0, FILL).is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_brush_larger_than_grid_stays_in_bounds() {
        let mut grid = floor_grid(4, 1);
        let edit = sculpt(&mut grid, IVec3::splat(2), 10, FILL);
        for world in edit.world_coords() {
            assert!(grid.contains(world));
        }
    }

    #[test]
    fn test_grid_edge_counts_as_exposed() {
        let mut grid = floor_grid(16, 4);
        let edit = sculpt(&mut grid, IVec3::new(0, 4, 8), 4, FILL);
        assert!(edit.world_coords().any(|w| w == IVec3::new(0, 4, 8)));
        assert_eq!(grid.get(IVec3::new(0, 4, 8)), FILL);

        let mut solid = solid_grid(8);
        sculpt(&mut solid, IVec3::new(0, 4, 4), 4, 0.0);
        assert_eq!(solid.get(IVec3::new(0, 4, 4)), 0.0);
    }

    #[test]
    fn test_huge_radius_is_capped_at_grid_extent() {
        let region = BrushRegion::clamped(IVec3::splat(2), u32::MAX, UVec3::new(4, 6, 5));
        assert_eq!(region.edge, 6);

        let mut grid = floor_grid(8, 2);
        let edit = sculpt(&mut grid, IVec3::new(4, 2, 4), u32::MAX, FILL);
        assert!(!edit.is_empty());
        for world in edit.world_coords() {
            assert!(grid.contains(world));
            assert_eq!(world.y, 2);
        }
    }

    #[test]
    fn test_extreme_centers_clamp_without_overflow() {
        let size = UVec3::splat(16);
        let high = BrushRegion::clamped(IVec3::splat(i32::MAX), 4, size);
        assert_eq!(high.corner, IVec3::splat(12));
        let low = BrushRegion::clamped(IVec3::splat(i32::MIN), 4, size);
        assert_eq!(low.corner, IVec3::ZERO);

        let mut grid = solid_grid(16);
        let before = grid.clone();
        let edit = sculpt(&mut grid, IVec3::splat(i32::MAX), 4, 0.0);
        // The sphere sits far outside the grid, so nothing inside qualifies.
        assert!(edit.is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_color_brush_uses_zero_vector_as_erase() {
        let mut grid =
            VoxelGrid::from_fn_parallel(UVec3::splat(8), |p| if p.y < 2 { Vec3::X } else { Vec3::ZERO });
        let edit = sculpt(&mut grid, IVec3::new(4, 1, 4), 4, Vec3::ZERO);
        assert_eq!(edit.mode, BrushMode::Remove);
        assert!(edit.world_coords().all(|w| grid.get(w) == Vec3::ZERO));
    }
}
