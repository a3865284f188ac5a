//! Grid traversal using the DDA (Amanatides & Woo) algorithm.
//!
//! Walks unit cells from a floating-point origin in strict parametric order,
//! one cell on one axis per iteration, and returns the first filled voxel.
//! Work is bounded by `max_steps`, not by the grid size.

use glam::{IVec3, Vec3};
use voxsculpt_voxel::{VoxelGrid, VoxelValue};

/// Read access to voxel occupancy by integer cell coordinate.
///
/// Out-of-range coordinates must report empty.
pub trait OccupancyProbe {
    /// Returns `true` if the cell at `pos` is filled.
    fn is_filled(&self, pos: IVec3) -> bool;
}

impl<V: VoxelValue> OccupancyProbe for VoxelGrid<V> {
    fn is_filled(&self, pos: IVec3) -> bool {
        self.get(pos).is_filled()
    }
}

/// Result of a successful trace.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelHit {
    /// Cell coordinate of the first filled voxel.
    pub voxel: IVec3,
    /// Normal of the face the ray entered through. Zero when the origin cell
    /// itself was filled.
    pub face_normal: IVec3,
    /// Parametric distance along `direction` at which the cell was entered.
    pub distance: f32,
    /// Number of cell advances taken before the hit.
    pub steps: u32,
}

/// Traces a ray through `world` and returns the first filled cell.
///
/// `direction` need not be normalized. At most `max_steps` cell advances are
/// taken, so at most `max_steps + 1` cells are tested. Returns `None` when
/// nothing is hit within that budget, or when `direction` is zero or not finite.
pub fn trace(
    world: &dyn OccupancyProbe,
    origin: Vec3,
    direction: Vec3,
    max_steps: u32,
) -> Option<VoxelHit> {
    if !origin.is_finite() || !direction.is_finite() || direction == Vec3::ZERO {
        tracing::warn!(%origin, %direction, "trace skipped: degenerate ray");
        return None;
    }

    let cell = origin.floor();
    let mut voxel = cell.as_ivec3();

    // Step direction per axis: +1 or -1.
    let step = IVec3::new(
        step_sign(direction.x),
        step_sign(direction.y),
        step_sign(direction.z),
    );

    // Parametric distance to cross one full cell on each axis.
    let t_delta = Vec3::new(
        inv_abs(direction.x),
        inv_abs(direction.y),
        inv_abs(direction.z),
    );

    // Parametric distance to the first grid line on each axis.
    let mut t_max = Vec3::new(
        initial_t_max(origin.x, cell.x, direction.x),
        initial_t_max(origin.y, cell.y, direction.y),
        initial_t_max(origin.z, cell.z, direction.z),
    );

    let mut face_normal = IVec3::ZERO;
    let mut distance = 0.0_f32;
    let mut steps = 0_u32;

    loop {
        if world.is_filled(voxel) {
            return Some(VoxelHit {
                voxel,
                face_normal,
                distance,
                steps,
            });
        }
        if steps >= max_steps {
            return None;
        }

        // Advance along the axis with the smallest t_max; ties go X, then Y, then Z.
        if t_max.x <= t_max.y && t_max.x <= t_max.z {
            distance = t_max.x;
            t_max.x += t_delta.x;
            voxel.x = voxel.x.saturating_add(step.x);
            face_normal = IVec3::new(-step.x, 0, 0);
        } else if t_max.y <= t_max.z {
            distance = t_max.y;
            t_max.y += t_delta.y;
            voxel.y = voxel.y.saturating_add(step.y);
            face_normal = IVec3::new(0, -step.y, 0);
        } else {
            distance = t_max.z;
            t_max.z += t_delta.z;
            voxel.z = voxel.z.saturating_add(step.z);
            face_normal = IVec3::new(0, 0, -step.z);
        }
        steps += 1;
    }
}

fn step_sign(d: f32) -> i32 {
    if d < 0.0 { -1 } else { 1 }
}

/// `1 / |d|`, or infinity for a zero component: that axis never crosses a boundary.
fn inv_abs(d: f32) -> f32 {
    if d == 0.0 { f32::INFINITY } else { 1.0 / d.abs() }
}

fn initial_t_max(origin: f32, cell: f32, d: f32) -> f32 {
    if d > 0.0 {
        (cell + 1.0 - origin) / d
    } else if d < 0.0 {
        (cell - origin) / d
    } else {
        f32::INFINITY
    }
}
