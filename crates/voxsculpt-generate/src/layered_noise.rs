//! Multi-octave 3D simplex noise normalized to `[0, 1]`.

use noise::{NoiseFn, Simplex};

/// Parameters for the layered noise generator.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    /// Seed for deterministic generation.
    pub seed: u64,
    /// Frequency of the first octave, in cycles per voxel.
    pub frequency: f64,
    /// Number of octaves to sum.
    pub octaves: u32,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// A voxel is filled where the normalized sample is strictly above this.
    pub threshold: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 0.0075,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            threshold: 0.5,
        }
    }
}

/// Fractal simplex sampler over voxel coordinates.
pub struct LayeredNoise {
    noise: Simplex,
    params: NoiseParams,
    max_amplitude: f64,
}

impl LayeredNoise {
    pub fn new(params: NoiseParams) -> Self {
        let noise = Simplex::new(params.seed as u32);
        let mut max_amplitude = 0.0;
        let mut amp = 1.0;
        for _ in 0..params.octaves.max(1) {
            max_amplitude += amp;
            amp *= params.persistence;
        }
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Samples the noise at a voxel coordinate, mapped into `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves.max(1) {
            total += self.noise.get([x * frequency, y * frequency, z * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        ((total / self.max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Returns `true` if the voxel at the given coordinate should be filled.
    pub fn is_solid(&self, x: f64, y: f64, z: f64) -> bool {
        self.sample(x, y, z) > self.params.threshold
    }

    pub fn params(&self) -> &NoiseParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_unit_range() {
        let noise = LayeredNoise::new(NoiseParams {
            frequency: 0.13,
            octaves: 6,
            ..Default::default()
        });
        for i in 0..500 {
            let v = noise.sample(i as f64 * 1.7, i as f64 * 0.3, i as f64 * 2.9);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = LayeredNoise::new(NoiseParams {
            seed: 42,
            ..Default::default()
        });
        let b = LayeredNoise::new(NoiseParams {
            seed: 42,
            ..Default::default()
        });
        for i in 0..50 {
            let p = i as f64 * 11.0;
            assert_eq!(a.sample(p, p * 0.5, -p), b.sample(p, p * 0.5, -p));
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = LayeredNoise::new(NoiseParams {
            seed: 1,
            frequency: 0.05,
            ..Default::default()
        });
        let b = LayeredNoise::new(NoiseParams {
            seed: 2,
            frequency: 0.05,
            ..Default::default()
        });
        let differs = (0..100).any(|i| {
            let p = i as f64 * 3.1;
            (a.sample(p, p, p) - b.sample(p, p, p)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn test_threshold_of_one_fills_nothing() {
        let noise = LayeredNoise::new(NoiseParams {
            threshold: 1.0,
            frequency: 0.2,
            ..Default::default()
        });
        for i in 0..200 {
            assert!(!noise.is_solid(i as f64, (i * 3) as f64, (i * 7) as f64));
        }
    }
}
