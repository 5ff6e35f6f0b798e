//! Multi-octave coherent noise used to roughen asteroid surfaces.

use glam::Vec3;
use noise::{NoiseFn, Perlin};

/// Octave count used when none is configured.
pub const DEFAULT_OCTAVES: u32 = 4;

/// Seed of the shared gradient table. Per-instance variety comes from the
/// noise offset, not from reseeding the table.
pub const NOISE_TABLE_SEED: u32 = 0;

/// Weighted sum of 4D Perlin octaves, normalized to `[0, 1]`.
///
/// Octave `i` samples at frequency `2^i` with weight `persistence^i`. The
/// fourth coordinate is a per-instance offset that moves each asteroid to an
/// unrelated slice of the noise field.
#[derive(Clone, Debug)]
pub struct NoiseOctaves {
    source: Perlin,
    weights: Vec<f64>,
    weight_sum: f64,
}

impl NoiseOctaves {
    /// Create an octave stack over the shared gradient table.
    pub fn new(octaves: u32, persistence: f32) -> Self {
        Self::with_source(Perlin::new(NOISE_TABLE_SEED), octaves, persistence)
    }

    /// Create an octave stack over an explicit Perlin source.
    pub fn with_source(source: Perlin, octaves: u32, persistence: f32) -> Self {
        let persistence = f64::from(persistence);
        let mut weights = Vec::with_capacity(octaves as usize);
        let mut weight = 1.0;
        for _ in 0..octaves {
            weights.push(weight);
            weight *= persistence;
        }
        let weight_sum = weights.iter().sum();
        Self {
            source,
            weights,
            weight_sum,
        }
    }

    /// Number of octaves summed per sample.
    pub fn octaves(&self) -> usize {
        self.weights.len()
    }

    /// Sample at `point` in the slice selected by `offset`. Returns `[0, 1]`.
    pub fn sample(&self, point: Vec3, offset: f32) -> f32 {
        if self.weight_sum.abs() <= f64::EPSILON {
            return 0.5;
        }

        let base = [
            f64::from(point.x),
            f64::from(point.y),
            f64::from(point.z),
            f64::from(offset),
        ];
        let mut total = 0.0;
        let mut frequency = 1.0;
        for &weight in &self.weights {
            let value = self.source.get(base.map(|c| c * frequency));
            total += weight * value;
            frequency *= 2.0;
        }

        let normalized = total / self.weight_sum;
        (normalized * 0.5 + 0.5).clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_unit_range() {
        let noise = NoiseOctaves::new(4, 0.95);
        for i in 0..500 {
            let t = i as f32 * 0.173;
            let p = Vec3::new(t.sin() * 3.0, t.cos() * 2.0, t * 0.1);
            let v = noise.sample(p, t * 13.0);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn test_sampling_is_deterministic() {
        let a = NoiseOctaves::new(4, 0.9);
        let b = NoiseOctaves::new(4, 0.9);
        let p = Vec3::new(0.3, -0.7, 0.2);
        assert_eq!(a.sample(p, 42.5).to_bits(), b.sample(p, 42.5).to_bits());
    }

    #[test]
    fn test_offset_selects_different_field() {
        let noise = NoiseOctaves::new(4, 0.95);
        let points: Vec<Vec3> = (0..32)
            .map(|i| Vec3::new(i as f32 * 0.11, 0.37, -0.21))
            .collect();
        let differs = points
            .iter()
            .any(|&p| noise.sample(p, 10.3) != noise.sample(p, 7531.9));
        assert!(differs);
    }

    #[test]
    fn test_octave_count() {
        assert_eq!(NoiseOctaves::new(DEFAULT_OCTAVES, 0.5).octaves(), 4);
    }

    #[test]
    fn test_zero_octaves_is_flat() {
        let noise = NoiseOctaves::new(0, 0.5);
        assert_eq!(noise.sample(Vec3::ONE, 1.0), 0.5);
    }
}
