//! Reference models used by the demo driver and the contract tests.
//!
//! Parameters are plain `f64` fields so a single model value can be evaluated
//! in `f64`, `f32` or [`Dual`](crate::autodiff::Dual) arithmetic. No parameter
//! is validated; a zero length produces IEEE infinities or NaN in the output.

mod henon;
mod pendulum;
mod rotor;

pub use henon::Henon;
pub use pendulum::{DrivenPendulum, DrivenPendulumWithTorque, Pendulum, PendulumWithTorque};
pub use rotor::KickedRotor;

/// Standard gravity, the default for every pendulum.
pub const STANDARD_GRAVITY: f64 = 9.81;
