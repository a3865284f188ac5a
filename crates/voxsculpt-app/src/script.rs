//! Glue between the config file and the session for headless runs.

use std::f32::consts::PI;

use glam::{UVec3, Vec3};
use voxsculpt_config::{GeneratorConfig, GeneratorKind};
use voxsculpt_generate::{NoiseParams, OcclusionTestParams, Procedural, SphereParams};

/// Builds the generator recipe named by `config`, seeding noise with `seed`.
pub fn procedural_from_config(config: &GeneratorConfig, seed: u64) -> Procedural {
    match config.kind {
        GeneratorKind::Sphere => Procedural::Sphere(SphereParams {
            radius: config.sphere_radius,
        }),
        GeneratorKind::Noise => Procedural::Noise(NoiseParams {
            seed,
            frequency: config.noise_frequency,
            octaves: config.noise_octaves,
            threshold: config.noise_threshold,
            ..Default::default()
        }),
        GeneratorKind::OcclusionTest => Procedural::OcclusionTest(OcclusionTestParams {
            sphere_radius: config.sphere_radius,
            floor_height: None,
        }),
    }
}

/// Camera position for scripted strokes: centred on X and Y, one grid depth
/// beyond the far Z face.
pub fn camera_origin(grid_size: UVec3) -> Vec3 {
    let size = grid_size.as_vec3();
    Vec3::new(size.x / 2.0, size.y / 2.0, size.z * 2.0)
}

/// Pick rays for `count` scripted strokes.
///
/// All rays start at [`camera_origin`] and aim down -Z at points on a
/// golden-angle spiral around the grid centre, spreading out to an eighth of
/// the smallest dimension.
pub fn stroke_rays(grid_size: UVec3, count: u32) -> impl Iterator<Item = (Vec3, Vec3)> {
    let origin = camera_origin(grid_size);
    let center = grid_size.as_vec3() / 2.0;
    let spread = grid_size.min_element() as f32 / 8.0;
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());

    (0..count).map(move |i| {
        let r = spread * ((i as f32 + 0.5) / count as f32).sqrt();
        let theta = i as f32 * golden_angle;
        let target = center + Vec3::new(r * theta.cos(), r * theta.sin(), 0.0);
        (origin, target - origin)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SculptSession;

    #[test]
    fn test_generator_mapping() {
        let mut config = GeneratorConfig::default();
        config.sphere_radius = Some(9.0);
        assert_eq!(
            procedural_from_config(&config, 0),
            Procedural::Sphere(SphereParams { radius: Some(9.0) })
        );

        config.kind = GeneratorKind::Noise;
        config.noise_threshold = 0.7;
        match procedural_from_config(&config, 42) {
            Procedural::Noise(params) => {
                assert_eq!(params.seed, 42);
                assert_eq!(params.threshold, 0.7);
                assert_eq!(params.frequency, 0.0075);
            }
            other => panic!("unexpected recipe {other:?}"),
        }
    }

    #[test]
    fn test_camera_sits_behind_far_face() {
        assert_eq!(camera_origin(UVec3::new(256, 128, 64)), Vec3::new(128.0, 64.0, 128.0));
    }

    #[test]
    fn test_stroke_rays_look_down_negative_z() {
        let rays: Vec<_> = stroke_rays(UVec3::splat(64), 10).collect();
        assert_eq!(rays.len(), 10);
        for (origin, dir) in rays {
            assert_eq!(origin, Vec3::new(32.0, 32.0, 128.0));
            assert!(dir.z < 0.0);
            assert!(dir.x.abs() <= 8.0 && dir.y.abs() <= 8.0);
        }
    }

    #[test]
    fn test_scripted_strokes_hit_default_sphere() {
        let size = UVec3::splat(32);
        let recipe = procedural_from_config(&GeneratorConfig::default(), 0);
        let mut session = SculptSession::new(recipe.generate(size, Vec3::ONE), 8);
        for (origin, dir) in stroke_rays(size, 6) {
            let report = session.pick_and_sculpt(origin, dir, 1024, 4, Vec3::ONE);
            assert!(report.is_some());
        }
    }
}
