//! Pairwise weight functions scoring how much one pixel influences another

use crate::types::{Error, Pixel, Result};

/// Influence of pixel `v` on pixel `u`.
///
/// Implementations must return a finite, non-negative value that is strictly
/// positive at zero distance. Symmetry is not required. Any
/// `Fn(Pixel, Pixel) -> f64 + Sync` closure is a weight function.
pub trait WeightFunction: Sync {
    fn weight(&self, u: Pixel, v: Pixel) -> f64;
}

impl<F> WeightFunction for F
where
    F: Fn(Pixel, Pixel) -> f64 + Sync,
{
    fn weight(&self, u: Pixel, v: Pixel) -> f64 {
        self(u, v)
    }
}

/// Default kernel: `1 / (|u - v|^z + epsilon)`.
///
/// Depends only on the offset between the pixels, so it can be tabulated
/// once and applied by convolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceWeight {
    /// Decay exponent
    pub z: i32,
    /// Regularizer keeping the weight finite at distance 0
    pub epsilon: f64,
}

impl DistanceWeight {
    pub fn new(z: i32, epsilon: f64) -> Result<Self> {
        if z <= 0 {
            return Err(Error::Config(format!(
                "weight exponent z must be positive, got {}",
                z
            )));
        }
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(Error::Config(format!(
                "weight epsilon must be positive and finite, got {}",
                epsilon
            )));
        }
        Ok(Self { z, epsilon })
    }
}

impl WeightFunction for DistanceWeight {
    fn weight(&self, u: Pixel, v: Pixel) -> f64 {
        1.0 / (u.distance(&v).powi(self.z) + self.epsilon)
    }
}

/// Same weight for every pair; the recovered value becomes a plain mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformWeight(pub f64);

impl WeightFunction for UniformWeight {
    fn weight(&self, _u: Pixel, _v: Pixel) -> f64 {
        self.0
    }
}
