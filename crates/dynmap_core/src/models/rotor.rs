use serde::{Deserialize, Serialize};

use crate::traits::{constant, MappingNonAutonomousEndogenous, Scalar};

/// Chirikov standard map whose kick only fires on every `period`-th step.
///
/// State `[theta, p]`, independent variable the integer step index:
/// `p' = p + K sin(theta)` on kicked steps (`p' = p` otherwise) and
/// `theta' = theta + p'`. A period of zero never kicks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickedRotor {
    pub strength: f64,
    #[serde(default = "default_period")]
    pub period: usize,
}

fn default_period() -> usize {
    1
}

impl KickedRotor {
    pub fn new(strength: f64, period: usize) -> Self {
        Self { strength, period }
    }

    fn kicks_at(&self, step: usize) -> bool {
        step.checked_rem(self.period) == Some(0)
    }
}

impl<T: Scalar> MappingNonAutonomousEndogenous<usize, T, 2> for KickedRotor {
    fn compute_rhs(&self, step: usize, x: &[T; 2], rhs: &mut [T; 2]) {
        let momentum = if self.kicks_at(step) {
            x[1] + constant::<T>(self.strength) * x[0].sin()
        } else {
            x[1]
        };
        rhs[0] = x[0] + momentum;
        rhs[1] = momentum;
    }
}
