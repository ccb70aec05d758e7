//! Range-dependent measurement noise model, used by simulations

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Affine noise model: the standard deviation of a range measurement grows
/// linearly with the measured distance.
#[derive(Debug, Clone, Copy)]
pub struct RangeNoise {
    a: f64,
    b: f64,
}

impl RangeNoise {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Standard deviation of a measurement at the given range, in meters
    pub fn sigma(&self, range: f64) -> f64 {
        self.a + self.b * range
    }
}

impl Default for RangeNoise {
    fn default() -> Self {
        // 2 cm floor plus 1 mm per meter, measured on DW1000 modules
        Self::new(0.02, 0.001)
    }
}

/// Gaussian sampler on top of [`RangeNoise`]
pub struct RangeRandomNoise {
    noise: RangeNoise,
    rng: StdRng,
}

impl RangeRandomNoise {
    pub fn new(noise: RangeNoise) -> Self {
        Self {
            noise,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sampler for reproducible simulations
    pub fn with_seed(noise: RangeNoise, seed: u64) -> Self {
        Self {
            noise,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a noisy measurement of the given true range
    pub fn draw(&mut self, range: f64) -> f64 {
        let sigma = self.noise.sigma(range);
        match Normal::new(range, sigma) {
            Ok(distribution) => distribution.sample(&mut self.rng),
            Err(_) => range,
        }
    }
}

impl Default for RangeRandomNoise {
    fn default() -> Self {
        Self::new(RangeNoise::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigma_grows_affinely_with_range() {
        let noise = RangeNoise::new(0.02, 0.001);
        assert_relative_eq!(noise.sigma(0.0), 0.02);
        assert_relative_eq!(noise.sigma(10.0), 0.03);
        assert_relative_eq!(noise.sigma(100.0), 0.12);
    }

    #[test]
    fn draws_stay_close_to_true_range() {
        let mut sampler = RangeRandomNoise::with_seed(RangeNoise::default(), 42);
        let mut sum = 0.0;
        let n = 1000;
        for _ in 0..n {
            let draw = sampler.draw(10.0);
            assert!((draw - 10.0).abs() < 0.5);
            sum += draw;
        }
        assert!((sum / n as f64 - 10.0).abs() < 0.05);
    }
}
