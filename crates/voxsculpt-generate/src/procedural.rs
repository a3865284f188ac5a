//! Wholesale grid generators.
//!
//! Every generator builds a fresh grid through [`VoxelGrid::from_fn_parallel`],
//! so each worker writes a disjoint X slab and no locking is needed.

use std::time::Instant;

use glam::{IVec3, UVec3, Vec3};
use voxsculpt_voxel::{VoxelGrid, VoxelValue};

use crate::layered_noise::{LayeredNoise, NoiseParams};

/// Solid sphere centred in the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SphereParams {
    /// Radius in voxels. Defaults to 40% of the smallest grid dimension.
    pub radius: Option<f32>,
}

/// A sphere resting above a flat floor slab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OcclusionTestParams {
    /// Sphere radius in voxels. Defaults to 20% of the smallest grid dimension.
    pub sphere_radius: Option<f32>,
    /// Voxels with `y` below this are floor. Defaults to
    /// `height / 2 - height * 5 / 32`, which is 88 on a 256-high grid.
    pub floor_height: Option<i32>,
}

/// A procedural fill recipe.
#[derive(Clone, Debug, PartialEq)]
pub enum Procedural {
    Sphere(SphereParams),
    Noise(NoiseParams),
    OcclusionTest(OcclusionTestParams),
}

impl Procedural {
    /// Short name used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere(_) => "sphere",
            Self::Noise(_) => "noise",
            Self::OcclusionTest(_) => "occlusion-test",
        }
    }

    /// Builds a new grid of `size`, writing `fill` into every solid cell.
    pub fn generate<V: VoxelValue>(&self, size: UVec3, fill: V) -> VoxelGrid<V> {
        let start = Instant::now();
        let center = size.as_vec3() / 2.0;
        let min_dim = size.min_element() as f32;

        let grid = match self {
            Self::Sphere(params) => {
                let radius = params.radius.unwrap_or(min_dim * 0.4);
                VoxelGrid::from_fn_parallel(size, |p| {
                    if in_ball(p, center, radius) { fill } else { V::EMPTY }
                })
            }
            Self::Noise(params) => {
                let noise = LayeredNoise::new(params.clone());
                VoxelGrid::from_fn_parallel(size, |p| {
                    if noise.is_solid(p.x as f64, p.y as f64, p.z as f64) {
                        fill
                    } else {
                        V::EMPTY
                    }
                })
            }
            Self::OcclusionTest(params) => {
                let radius = params.sphere_radius.unwrap_or(min_dim * 0.2);
                let height = size.y as i32;
                let floor = params
                    .floor_height
                    .unwrap_or(height / 2 - height * 5 / 32);
                VoxelGrid::from_fn_parallel(size, |p| {
                    if p.y < floor || in_ball(p, center, radius) {
                        fill
                    } else {
                        V::EMPTY
                    }
                })
            }
        };

        tracing::info!(
            generator = self.name(),
            size = %size,
            filled = grid.filled_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "procedural grid generated"
        );
        grid
    }
}

fn in_ball(p: IVec3, center: Vec3, radius: f32) -> bool {
    p.as_vec3().distance(center) < radius
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: Vec3 = Vec3::new(0.6, 0.6, 0.6);

    #[test]
    fn test_sphere_center_filled_corner_empty() {
        let grid = Procedural::Sphere(SphereParams::default()).generate(UVec3::splat(64), FILL);
        assert_eq!(grid.get(IVec3::splat(32)), FILL);
        assert_eq!(grid.get(IVec3::ZERO), Vec3::ZERO);
        assert_eq!(grid.get(IVec3::splat(63)), Vec3::ZERO);
    }

    #[test]
    fn test_sphere_radius_bounds_the_fill() {
        let radius = 5.0;
        let grid = Procedural::Sphere(SphereParams {
            radius: Some(radius),
        })
        .generate(UVec3::splat(20), 0.6_f32);
        let center = Vec3::splat(10.0);
        for x in 0..20 {
            for y in 0..20 {
                for z in 0..20 {
                    let p = IVec3::new(x, y, z);
                    let inside = p.as_vec3().distance(center) < radius;
                    assert_eq!(grid.is_filled(p), inside, "at {p}");
                }
            }
        }
    }

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let params = NoiseParams {
            seed: 7,
            frequency: 0.08,
            ..Default::default()
        };
        let a = Procedural::Noise(params.clone()).generate(UVec3::splat(24), 0.6_f32);
        let b = Procedural::Noise(params).generate(UVec3::splat(24), 0.6_f32);
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_threshold_controls_density() {
        let size = UVec3::splat(24);
        let sparse = Procedural::Noise(NoiseParams {
            frequency: 0.08,
            threshold: 0.7,
            ..Default::default()
        })
        .generate(size, 0.6_f32);
        let dense = Procedural::Noise(NoiseParams {
            frequency: 0.08,
            threshold: 0.3,
            ..Default::default()
        })
        .generate(size, 0.6_f32);
        assert!(sparse.filled_count() < dense.filled_count());
    }

    #[test]
    fn test_occlusion_scene_has_floor_and_sphere() {
        let size = UVec3::splat(64);
        let grid = Procedural::OcclusionTest(OcclusionTestParams::default()).generate(size, FILL);
        // Floor height on a 64-high grid is 32 - 10 = 22.
        assert!(grid.is_filled(IVec3::new(0, 21, 0)));
        assert!(!grid.is_filled(IVec3::new(0, 22, 0)));
        assert!(grid.is_filled(IVec3::splat(32)));
        assert!(!grid.is_filled(IVec3::new(0, 63, 0)));
    }

    #[test]
    fn test_occlusion_scene_respects_overrides() {
        let grid = Procedural::OcclusionTest(OcclusionTestParams {
            sphere_radius: Some(0.0),
            floor_height: Some(3),
        })
        .generate(UVec3::splat(8), 1.0_f32);
        assert_eq!(grid.filled_count(), 8 * 3 * 8);
    }
}
