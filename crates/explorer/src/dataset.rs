//! Synthetic bivariate sample generation
//!
//! Draws a base variable from a unit normal and a dependent variable as a
//! fixed linear transform of it plus Gaussian noise. Generation is seeded,
//! so identical inputs produce bit-identical datasets.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal, StandardNormal};
use thiserror::Error;
use tracing::debug;

/// Slope of the underlying linear relationship between x and y
pub const BASE_SLOPE: f64 = 2.5;

/// Seed used for every in-session generation
pub const DEFAULT_SEED: u64 = 123;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("sample size must be positive, got {0}")]
    InvalidSampleSize(i64),

    #[error("noise sigma must be finite and non-negative, got {0}")]
    InvalidNoise(f64),
}

/// An ordered sample of (x, y) observations, immutable once produced
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    points: Vec<(f64, f64)>,
}

impl Dataset {
    pub fn from_points(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(x, _)| x)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, y)| y)
    }

    /// Observed (min, max) of x; None when the sample is empty
    pub fn x_range(&self) -> Option<(f64, f64)> {
        self.xs().fold(None, |range, x| match range {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
    }
}

/// Generate `sample_size` draws of `x ~ Normal(0, 1)` and
/// `y = BASE_SLOPE * x + Normal(0, noise_sigma)`.
pub fn generate(sample_size: i64, noise_sigma: f64, seed: u64) -> Result<Dataset, GenerateError> {
    if sample_size <= 0 {
        return Err(GenerateError::InvalidSampleSize(sample_size));
    }
    if !noise_sigma.is_finite() || noise_sigma < 0.0 {
        return Err(GenerateError::InvalidNoise(noise_sigma));
    }

    let noise =
        Normal::new(0.0, noise_sigma).map_err(|_| GenerateError::InvalidNoise(noise_sigma))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut points = Vec::with_capacity(sample_size as usize);
    for _ in 0..sample_size {
        let x: f64 = StandardNormal.sample(&mut rng);
        let y = BASE_SLOPE * x + noise.sample(&mut rng);
        points.push((x, y));
    }

    debug!(n = points.len(), sigma = noise_sigma, "dataset generated");
    Ok(Dataset { points })
}
