use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A trait for types that can be used as scalars in our dynamical systems.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// Converts an `f64` model parameter into the evaluation scalar.
///
/// Conversion cannot fail for the floating-point types this crate targets; a
/// type that rejects the value gets NaN, which then propagates through the
/// right-hand side like any other IEEE domain error.
#[inline]
pub fn constant<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// The four shapes a right-hand side can take.
///
/// Autonomous mappings do not depend explicitly on the independent variable
/// (time-invariant for flows). Exogenous mappings take external inputs that
/// the model does not explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingKind {
    NonAutonomousExogenous,
    AutonomousExogenous,
    AutonomousEndogenous,
    NonAutonomousEndogenous,
}

impl MappingKind {
    /// Picks the variant for a system with the given properties.
    pub fn select(depends_on_independent: bool, has_exogenous_input: bool) -> Self {
        match (depends_on_independent, has_exogenous_input) {
            (true, true) => MappingKind::NonAutonomousExogenous,
            (false, true) => MappingKind::AutonomousExogenous,
            (false, false) => MappingKind::AutonomousEndogenous,
            (true, false) => MappingKind::NonAutonomousEndogenous,
        }
    }

    pub fn is_autonomous(self) -> bool {
        matches!(
            self,
            MappingKind::AutonomousExogenous | MappingKind::AutonomousEndogenous
        )
    }

    pub fn is_exogenous(self) -> bool {
        matches!(
            self,
            MappingKind::NonAutonomousExogenous | MappingKind::AutonomousExogenous
        )
    }
}

/// `dx/dt = f(t, x, u)` or `x_{i+1} = f(i, x_i, u_i)`.
///
/// * `I`: independent variable, typically `f64` time or an integer step index.
/// * `T`: state scalar.
/// * `N`: dimension of the state space.
/// * `M`: dimension of the exogenous inputs.
pub trait MappingNonAutonomousExogenous<I, T: Scalar, const N: usize, const M: usize> {
    /// Writes the right-hand side at `(ti, x, u)` into every slot of `rhs`.
    fn compute_rhs(&self, ti: I, x: &[T; N], u: &[T; M], rhs: &mut [T; N]);
}

/// `dx/dt = f(x, u)` or `x_{i+1} = f(x_i, u_i)`.
pub trait MappingAutonomousExogenous<T: Scalar, const N: usize, const M: usize> {
    /// Writes the right-hand side at `(x, u)` into every slot of `rhs`.
    fn compute_rhs(&self, x: &[T; N], u: &[T; M], rhs: &mut [T; N]);
}

/// `dx/dt = f(x)` or `x_{i+1} = f(x_i)`.
///
/// No external driver of any kind; the call site cannot pass one.
pub trait MappingAutonomousEndogenous<T: Scalar, const N: usize> {
    /// Writes the right-hand side at `x` into every slot of `rhs`.
    fn compute_rhs(&self, x: &[T; N], rhs: &mut [T; N]);
}

/// `dx/dt = f(t, x)` or `x_{i+1} = f(i, x_i)`.
pub trait MappingNonAutonomousEndogenous<I, T: Scalar, const N: usize> {
    /// Writes the right-hand side at `(ti, x)` into every slot of `rhs`.
    fn compute_rhs(&self, ti: I, x: &[T; N], rhs: &mut [T; N]);
}
