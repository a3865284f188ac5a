//! The per-voxel value contract.
//!
//! A voxel has no separate occupancy flag: a value equal to [`VoxelValue::EMPTY`]
//! is empty, anything else is filled and carries its own intensity or colour.
//! Surface tests, traversal, and occlusion all depend on this zero test.

use std::fmt::Debug;

use glam::Vec3;

/// A value storable in a [`VoxelGrid`](crate::VoxelGrid).
pub trait VoxelValue: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// The empty sentinel (scalar `0.0` or the zero colour).
    const EMPTY: Self;

    /// Number of `f32` components used by the flat-file format.
    const COMPONENTS: usize;

    /// Returns `true` if this value marks a filled voxel.
    #[inline]
    fn is_filled(&self) -> bool {
        *self != Self::EMPTY
    }

    /// Appends this value's components to `out`.
    fn push_components(&self, out: &mut Vec<f32>);

    /// Rebuilds a value from exactly [`COMPONENTS`](Self::COMPONENTS) floats.
    fn from_components(components: &[f32]) -> Self;
}

/// Scalar occupancy. Magnitude may carry auxiliary meaning such as a hue.
impl VoxelValue for f32 {
    const EMPTY: Self = 0.0;
    const COMPONENTS: usize = 1;

    fn push_components(&self, out: &mut Vec<f32>) {
        out.push(*self);
    }

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }
}

/// RGB colour in `[0, 1]` per channel.
impl VoxelValue for Vec3 {
    const EMPTY: Self = Vec3::ZERO;
    const COMPONENTS: usize = 3;

    fn push_components(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(&self.to_array());
    }

    fn from_components(components: &[f32]) -> Self {
        Vec3::new(components[0], components[1], components[2])
    }
}
