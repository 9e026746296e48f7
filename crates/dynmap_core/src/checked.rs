//! Slice-based evaluation for callers that keep their buffers in `Vec`s.
//!
//! The mapping traits take fixed-size arrays, so a length mismatch cannot be
//! expressed at the call site. Integrators that size their scratch space at
//! runtime go through these extension traits instead: every buffer is checked
//! against the model's dimensions before the model runs, and `rhs` is left
//! untouched when a check fails.

use crate::error::{Buffer, DimensionError};
use crate::traits::{
    MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingNonAutonomousEndogenous,
    MappingNonAutonomousExogenous, Scalar,
};

fn fixed<'a, T, const LEN: usize>(
    values: &'a [T],
    buffer: Buffer,
) -> Result<&'a [T; LEN], DimensionError> {
    let found = values.len();
    values.try_into().map_err(|_| DimensionError {
        buffer,
        expected: LEN,
        found,
    })
}

fn fixed_mut<'a, T, const LEN: usize>(
    values: &'a mut [T],
    buffer: Buffer,
) -> Result<&'a mut [T; LEN], DimensionError> {
    let found = values.len();
    values.try_into().map_err(|_| DimensionError {
        buffer,
        expected: LEN,
        found,
    })
}

pub trait TryNonAutonomousExogenous<I, T: Scalar, const N: usize, const M: usize>:
    MappingNonAutonomousExogenous<I, T, N, M>
{
    fn try_compute_rhs(
        &self,
        ti: I,
        x: &[T],
        u: &[T],
        rhs: &mut [T],
    ) -> Result<(), DimensionError> {
        let x = fixed::<T, N>(x, Buffer::State)?;
        let u = fixed::<T, M>(u, Buffer::Input)?;
        let rhs = fixed_mut::<T, N>(rhs, Buffer::Rhs)?;
        self.compute_rhs(ti, x, u, rhs);
        Ok(())
    }
}

impl<I, T, S, const N: usize, const M: usize> TryNonAutonomousExogenous<I, T, N, M> for S
where
    T: Scalar,
    S: MappingNonAutonomousExogenous<I, T, N, M> + ?Sized,
{
}

pub trait TryAutonomousExogenous<T: Scalar, const N: usize, const M: usize>:
    MappingAutonomousExogenous<T, N, M>
{
    fn try_compute_rhs(&self, x: &[T], u: &[T], rhs: &mut [T]) -> Result<(), DimensionError> {
        let x = fixed::<T, N>(x, Buffer::State)?;
        let u = fixed::<T, M>(u, Buffer::Input)?;
        let rhs = fixed_mut::<T, N>(rhs, Buffer::Rhs)?;
        self.compute_rhs(x, u, rhs);
        Ok(())
    }
}

impl<T, S, const N: usize, const M: usize> TryAutonomousExogenous<T, N, M> for S
where
    T: Scalar,
    S: MappingAutonomousExogenous<T, N, M> + ?Sized,
{
}

pub trait TryAutonomousEndogenous<T: Scalar, const N: usize>:
    MappingAutonomousEndogenous<T, N>
{
    fn try_compute_rhs(&self, x: &[T], rhs: &mut [T]) -> Result<(), DimensionError> {
        let x = fixed::<T, N>(x, Buffer::State)?;
        let rhs = fixed_mut::<T, N>(rhs, Buffer::Rhs)?;
        self.compute_rhs(x, rhs);
        Ok(())
    }
}

impl<T, S, const N: usize> TryAutonomousEndogenous<T, N> for S
where
    T: Scalar,
    S: MappingAutonomousEndogenous<T, N> + ?Sized,
{
}

pub trait TryNonAutonomousEndogenous<I, T: Scalar, const N: usize>:
    MappingNonAutonomousEndogenous<I, T, N>
{
    fn try_compute_rhs(&self, ti: I, x: &[T], rhs: &mut [T]) -> Result<(), DimensionError> {
        let x = fixed::<T, N>(x, Buffer::State)?;
        let rhs = fixed_mut::<T, N>(rhs, Buffer::Rhs)?;
        self.compute_rhs(ti, x, rhs);
        Ok(())
    }
}

impl<I, T, S, const N: usize> TryNonAutonomousEndogenous<I, T, N> for S
where
    T: Scalar,
    S: MappingNonAutonomousEndogenous<I, T, N> + ?Sized,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrivenPendulum, DrivenPendulumWithTorque, Pendulum, PendulumWithTorque};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn accepts_matching_vec_buffers() {
        let pendulum = Pendulum::new(1.0, 1.0);
        let x = vec![FRAC_PI_2, 0.0];
        let mut rhs = vec![0.0; 2];
        pendulum
            .try_compute_rhs(x.as_slice(), rhs.as_mut_slice())
            .expect("matching buffers should evaluate");
        assert!(rhs[0].abs() < 1e-15);
        assert!((rhs[1] + 1.0).abs() < 1e-15);
    }

    #[test]
    fn rejects_short_state() {
        let pendulum = Pendulum::new(1.0, 1.0);
        let mut rhs = vec![7.0; 2];
        let err = pendulum
            .try_compute_rhs(&[0.0][..], rhs.as_mut_slice())
            .expect_err("short state must be rejected");
        assert_eq!(
            err,
            DimensionError {
                buffer: Buffer::State,
                expected: 2,
                found: 1,
            }
        );
        assert_eq!(rhs, vec![7.0, 7.0]);
    }

    #[test]
    fn rejects_oversized_rhs_without_writing() {
        let pendulum = Pendulum::new(1.0, 1.0);
        let mut rhs = vec![7.0; 3];
        let err = pendulum
            .try_compute_rhs(&[0.5, 0.5][..], rhs.as_mut_slice())
            .expect_err("rhs of length 3 must be rejected");
        assert_eq!(err.buffer, Buffer::Rhs);
        assert_eq!(err.expected, 2);
        assert_eq!(err.found, 3);
        assert_eq!(rhs, vec![7.0; 3]);
    }

    #[test]
    fn rejects_wrong_input_width() {
        let pendulum = PendulumWithTorque::new(1.0, 1.0, 1.0);
        let mut rhs = vec![0.0; 2];
        let err = pendulum
            .try_compute_rhs(&[0.0, 0.0][..], &[1.0, 2.0][..], rhs.as_mut_slice())
            .expect_err("two inputs for a one-input model must be rejected");
        assert_eq!(err.buffer, Buffer::Input);
        assert_eq!(err.expected, 1);
        assert_eq!(err.found, 2);
    }

    #[test]
    fn state_is_checked_before_input() {
        let pendulum = PendulumWithTorque::new(1.0, 1.0, 1.0);
        let mut rhs = vec![0.0; 2];
        let err = pendulum
            .try_compute_rhs(&[0.0][..], &[][..], rhs.as_mut_slice())
            .expect_err("both buffers are wrong");
        assert_eq!(err.buffer, Buffer::State);
    }

    #[test]
    fn non_autonomous_variants_check_their_buffers() {
        let driven = DrivenPendulum::new(1.0, 1.0, 0.5, 2.0);
        let mut rhs = vec![0.0; 2];
        driven
            .try_compute_rhs(0.0, &[0.0, 1.0][..], rhs.as_mut_slice())
            .expect("matching buffers should evaluate");
        assert_eq!(rhs, vec![1.0, 0.5]);

        let torqued = DrivenPendulumWithTorque::new(1.0, 1.0, 1.0, 0.5, 2.0);
        let err = torqued
            .try_compute_rhs(0.0, &[0.0, 1.0][..], &[1.0][..], &mut rhs[..1])
            .expect_err("short rhs must be rejected");
        assert_eq!(err.buffer, Buffer::Rhs);
        assert_eq!(err.found, 1);
    }
}
