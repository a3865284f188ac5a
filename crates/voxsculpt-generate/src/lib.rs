//! Procedural grid generators: a solid sphere, thresholded layered noise, and
//! a sphere-over-floor scene for checking the occlusion bake by eye.

mod layered_noise;
mod procedural;

pub use layered_noise::{LayeredNoise, NoiseParams};
pub use procedural::{OcclusionTestParams, Procedural, SphereParams};
