//! Contract probes for model authors.
//!
//! Each probe evaluates a model twice with identical inputs, first into an
//! output filled with NaN and then into one filled with +inf. A slot that
//! still holds its fill value after both calls was never written. The two
//! results must agree bit for bit, and the inputs handed to the model must
//! come back unchanged (safe code cannot break the last rule, since the model
//! only sees shared references to `Copy` scalars). On success the probe
//! returns the computed right-hand side.

use crate::error::{Buffer, ContractViolation};
use crate::traits::{
    MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingKind,
    MappingNonAutonomousEndogenous, MappingNonAutonomousExogenous, Scalar,
};

fn same_bits<T: Scalar>(a: T, b: T) -> bool {
    (a.is_nan() && b.is_nan()) || a.integer_decode() == b.integer_decode()
}

fn check_unchanged<T: Scalar, const LEN: usize>(
    original: &[T; LEN],
    after: &[T; LEN],
    buffer: Buffer,
) -> Result<(), ContractViolation> {
    match (0..LEN).find(|&slot| !same_bits(original[slot], after[slot])) {
        Some(slot) => Err(ContractViolation::InputsMutated { buffer, slot }),
        None => Ok(()),
    }
}

fn check_outputs<T: Scalar, const N: usize>(
    first: &[T; N],
    second: &[T; N],
) -> Result<(), ContractViolation> {
    for slot in 0..N {
        if first[slot].is_nan() && second[slot] == T::infinity() {
            return Err(ContractViolation::Unwritten { slot });
        }
        if !same_bits(first[slot], second[slot]) {
            return Err(ContractViolation::NonDeterministic { slot });
        }
    }
    Ok(())
}

fn evaluate_twice<T: Scalar, const N: usize>(
    mut evaluate: impl FnMut(&mut [T; N]) -> Result<(), ContractViolation>,
) -> Result<[T; N], ContractViolation> {
    let mut first = [T::nan(); N];
    evaluate(&mut first)?;
    let mut second = [T::infinity(); N];
    evaluate(&mut second)?;
    check_outputs(&first, &second)?;
    Ok(first)
}

/// Runs `evaluate` against both sentinel fills and checks the results.
fn run<T: Scalar, const N: usize>(
    kind: MappingKind,
    evaluate: impl FnMut(&mut [T; N]) -> Result<(), ContractViolation>,
) -> Result<[T; N], ContractViolation> {
    let outcome = evaluate_twice(evaluate);
    if let Err(violation) = &outcome {
        log::warn!("{kind:?} model violated the evaluation contract: {violation}");
    }
    outcome
}

pub fn probe_non_autonomous_exogenous<I, T, S, const N: usize, const M: usize>(
    model: &S,
    ti: I,
    x: &[T; N],
    u: &[T; M],
) -> Result<[T; N], ContractViolation>
where
    I: Copy,
    T: Scalar,
    S: MappingNonAutonomousExogenous<I, T, N, M> + ?Sized,
{
    run(MappingKind::NonAutonomousExogenous, |rhs| {
        let (state, input) = (*x, *u);
        model.compute_rhs(ti, &state, &input, rhs);
        check_unchanged(x, &state, Buffer::State)?;
        check_unchanged(u, &input, Buffer::Input)
    })
}

pub fn probe_autonomous_exogenous<T, S, const N: usize, const M: usize>(
    model: &S,
    x: &[T; N],
    u: &[T; M],
) -> Result<[T; N], ContractViolation>
where
    T: Scalar,
    S: MappingAutonomousExogenous<T, N, M> + ?Sized,
{
    run(MappingKind::AutonomousExogenous, |rhs| {
        let (state, input) = (*x, *u);
        model.compute_rhs(&state, &input, rhs);
        check_unchanged(x, &state, Buffer::State)?;
        check_unchanged(u, &input, Buffer::Input)
    })
}

pub fn probe_autonomous_endogenous<T, S, const N: usize>(
    model: &S,
    x: &[T; N],
) -> Result<[T; N], ContractViolation>
where
    T: Scalar,
    S: MappingAutonomousEndogenous<T, N> + ?Sized,
{
    run(MappingKind::AutonomousEndogenous, |rhs| {
        let state = *x;
        model.compute_rhs(&state, rhs);
        check_unchanged(x, &state, Buffer::State)
    })
}

pub fn probe_non_autonomous_endogenous<I, T, S, const N: usize>(
    model: &S,
    ti: I,
    x: &[T; N],
) -> Result<[T; N], ContractViolation>
where
    I: Copy,
    T: Scalar,
    S: MappingNonAutonomousEndogenous<I, T, N> + ?Sized,
{
    run(MappingKind::NonAutonomousEndogenous, |rhs| {
        let state = *x;
        model.compute_rhs(ti, &state, rhs);
        check_unchanged(x, &state, Buffer::State)
    })
}
