use serde::{Deserialize, Serialize};

use crate::traits::{constant, MappingAutonomousEndogenous, Scalar};

/// The Hénon map, `x' = y + 1 - a x^2`, `y' = b x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Henon {
    pub a: f64,
    pub b: f64,
}

impl Henon {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl Default for Henon {
    /// The classical chaotic parameters.
    fn default() -> Self {
        Self::new(1.4, 0.3)
    }
}

impl<T: Scalar> MappingAutonomousEndogenous<T, 2> for Henon {
    fn compute_rhs(&self, x: &[T; 2], rhs: &mut [T; 2]) {
        rhs[0] = x[1] + T::one() - constant::<T>(self.a) * x[0] * x[0];
        rhs[1] = constant::<T>(self.b) * x[0];
    }
}
