use serde::{Deserialize, Serialize};

use super::STANDARD_GRAVITY;
use crate::traits::{
    constant, MappingAutonomousEndogenous, MappingAutonomousExogenous,
    MappingNonAutonomousEndogenous, MappingNonAutonomousExogenous, Scalar,
};

fn default_gravity() -> f64 {
    STANDARD_GRAVITY
}

fn default_mass() -> f64 {
    1.0
}

/// Angular acceleration of an undriven pendulum: `-(g/l) sin(theta)`.
fn restoring<T: Scalar>(length: f64, gravity: f64, theta: T) -> T {
    -(constant::<T>(gravity) / constant::<T>(length)) * theta.sin()
}

/// Angular acceleration produced by a torque on a point mass at `length`.
fn torque_response<T: Scalar>(length: f64, mass: f64, torque: T) -> T {
    let l = constant::<T>(length);
    torque / (constant::<T>(mass) * l * l)
}

/// Simple pendulum, state `[theta, omega]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    pub length: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
}

impl Pendulum {
    pub fn new(length: f64, gravity: f64) -> Self {
        Self { length, gravity }
    }

    /// A pendulum of the given length under standard gravity.
    pub fn with_length(length: f64) -> Self {
        Self::new(length, STANDARD_GRAVITY)
    }
}

impl<T: Scalar> MappingAutonomousEndogenous<T, 2> for Pendulum {
    fn compute_rhs(&self, x: &[T; 2], rhs: &mut [T; 2]) {
        rhs[0] = x[1];
        rhs[1] = restoring(self.length, self.gravity, x[0]);
    }
}

/// Pendulum driven by an external torque `u = [tau]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendulumWithTorque {
    pub length: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
}

impl PendulumWithTorque {
    pub fn new(length: f64, gravity: f64, mass: f64) -> Self {
        Self {
            length,
            gravity,
            mass,
        }
    }
}

impl<T: Scalar> MappingAutonomousExogenous<T, 2, 1> for PendulumWithTorque {
    fn compute_rhs(&self, x: &[T; 2], u: &[T; 1], rhs: &mut [T; 2]) {
        rhs[0] = x[1];
        rhs[1] = restoring(self.length, self.gravity, x[0])
            + torque_response(self.length, self.mass, u[0]);
    }
}

/// Pendulum with a periodic forcing term `amplitude * cos(frequency * t)`.
///
/// Time shares the state scalar type so the forcing can be differentiated
/// alongside the state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrivenPendulum {
    pub length: f64,
    #[serde(default = "default_gravity")]
    pub gravity: f64,
    pub amplitude: f64,
    pub frequency: f64,
}

impl DrivenPendulum {
    pub fn new(length: f64, gravity: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            length,
            gravity,
            amplitude,
            frequency,
        }
    }

    fn forcing<T: Scalar>(&self, t: T) -> T {
        constant::<T>(self.amplitude) * (constant::<T>(self.frequency) * t).cos()
    }
}

impl<T: Scalar> MappingNonAutonomousEndogenous<T, T, 2> for DrivenPendulum {
    fn compute_rhs(&self, t: T, x: &[T; 2], rhs: &mut [T; 2]) {
        rhs[0] = x[1];
        rhs[1] = restoring(self.length, self.gravity, x[0]) + self.forcing(t);
    }
}

/// Periodically forced pendulum that also accepts a control torque `u = [tau]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrivenPendulumWithTorque {
    #[serde(flatten)]
    pub driven: DrivenPendulum,
    #[serde(default = "default_mass")]
    pub mass: f64,
}

impl DrivenPendulumWithTorque {
    pub fn new(length: f64, gravity: f64, mass: f64, amplitude: f64, frequency: f64) -> Self {
        Self {
            driven: DrivenPendulum::new(length, gravity, amplitude, frequency),
            mass,
        }
    }
}

impl<T: Scalar> MappingNonAutonomousExogenous<T, T, 2, 1> for DrivenPendulumWithTorque {
    fn compute_rhs(&self, t: T, x: &[T; 2], u: &[T; 1], rhs: &mut [T; 2]) {
        let driven = &self.driven;
        rhs[0] = x[1];
        rhs[1] = restoring(driven.length, driven.gravity, x[0])
            + driven.forcing(t)
            + torque_response(driven.length, self.mass, u[0]);
    }
}
