//! Wrappers that present a model under a different mapping variant.
//!
//! Lifting (`TimeInvariant`, `Unforced`) adds a parameter the wrapped model
//! ignores, so a simple model can be handed to a routine written against a
//! richer variant. Closing (`HeldInput`, `InputSchedule`, `StateFeedback`)
//! supplies the exogenous input from somewhere else, producing an endogenous
//! model. None of them changes the state dimension.

use crate::traits::{
    MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingNonAutonomousEndogenous,
    MappingNonAutonomousExogenous, Scalar,
};

/// An autonomous model viewed as non-autonomous; the independent variable is
/// accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeInvariant<S> {
    pub model: S,
}

impl<S> TimeInvariant<S> {
    pub fn new(model: S) -> Self {
        Self { model }
    }

    pub fn into_inner(self) -> S {
        self.model
    }
}

impl<I, T, S, const N: usize> MappingNonAutonomousEndogenous<I, T, N> for TimeInvariant<S>
where
    T: Scalar,
    S: MappingAutonomousEndogenous<T, N>,
{
    fn compute_rhs(&self, _ti: I, x: &[T; N], rhs: &mut [T; N]) {
        self.model.compute_rhs(x, rhs);
    }
}

impl<I, T, S, const N: usize, const M: usize> MappingNonAutonomousExogenous<I, T, N, M>
    for TimeInvariant<S>
where
    T: Scalar,
    S: MappingAutonomousExogenous<T, N, M>,
{
    fn compute_rhs(&self, _ti: I, x: &[T; N], u: &[T; M], rhs: &mut [T; N]) {
        self.model.compute_rhs(x, u, rhs);
    }
}

/// An endogenous model viewed as exogenous with inputs of any width, all of
/// which are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unforced<S> {
    pub model: S,
}

impl<S> Unforced<S> {
    pub fn new(model: S) -> Self {
        Self { model }
    }

    pub fn into_inner(self) -> S {
        self.model
    }
}

impl<T, S, const N: usize, const M: usize> MappingAutonomousExogenous<T, N, M> for Unforced<S>
where
    T: Scalar,
    S: MappingAutonomousEndogenous<T, N>,
{
    fn compute_rhs(&self, x: &[T; N], _u: &[T; M], rhs: &mut [T; N]) {
        self.model.compute_rhs(x, rhs);
    }
}

impl<I, T, S, const N: usize, const M: usize> MappingNonAutonomousExogenous<I, T, N, M>
    for Unforced<S>
where
    T: Scalar,
    S: MappingNonAutonomousEndogenous<I, T, N>,
{
    fn compute_rhs(&self, ti: I, x: &[T; N], _u: &[T; M], rhs: &mut [T; N]) {
        self.model.compute_rhs(ti, x, rhs);
    }
}

/// An exogenous model with its input frozen at an owned value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeldInput<S, T, const M: usize> {
    pub model: S,
    input: [T; M],
}

impl<S, T: Copy, const M: usize> HeldInput<S, T, M> {
    pub fn new(model: S, input: [T; M]) -> Self {
        Self { model, input }
    }

    pub fn input(&self) -> &[T; M] {
        &self.input
    }

    pub fn set_input(&mut self, input: [T; M]) {
        self.input = input;
    }
}

impl<T, S, const N: usize, const M: usize> MappingAutonomousEndogenous<T, N> for HeldInput<S, T, M>
where
    T: Scalar,
    S: MappingAutonomousExogenous<T, N, M>,
{
    fn compute_rhs(&self, x: &[T; N], rhs: &mut [T; N]) {
        self.model.compute_rhs(x, &self.input, rhs);
    }
}

impl<I, T, S, const N: usize, const M: usize> MappingNonAutonomousEndogenous<I, T, N>
    for HeldInput<S, T, M>
where
    T: Scalar,
    S: MappingNonAutonomousExogenous<I, T, N, M>,
{
    fn compute_rhs(&self, ti: I, x: &[T; N], rhs: &mut [T; N]) {
        self.model.compute_rhs(ti, x, &self.input, rhs);
    }
}

/// A non-autonomous exogenous model whose input is a known function of the
/// independent variable, `u = schedule(t)`.
///
/// Wrap an autonomous exogenous model in [`TimeInvariant`] first to drive it
/// from a schedule.
#[derive(Debug, Clone, Copy)]
pub struct InputSchedule<S, F, const M: usize> {
    pub model: S,
    schedule: F,
}

impl<S, F, const M: usize> InputSchedule<S, F, M> {
    pub fn new<I, T>(model: S, schedule: F) -> Self
    where
        F: Fn(I) -> [T; M],
    {
        Self { model, schedule }
    }
}

impl<I, T, S, F, const N: usize, const M: usize> MappingNonAutonomousEndogenous<I, T, N>
    for InputSchedule<S, F, M>
where
    I: Copy,
    T: Scalar,
    S: MappingNonAutonomousExogenous<I, T, N, M>,
    F: Fn(I) -> [T; M],
{
    fn compute_rhs(&self, ti: I, x: &[T; N], rhs: &mut [T; N]) {
        let u = (self.schedule)(ti);
        self.model.compute_rhs(ti, x, &u, rhs);
    }
}

/// An exogenous model closed by a control law of the state, `u = law(x)`.
#[derive(Debug, Clone, Copy)]
pub struct StateFeedback<S, F, const M: usize> {
    pub model: S,
    law: F,
}

impl<S, F, const M: usize> StateFeedback<S, F, M> {
    pub fn new<T, const N: usize>(model: S, law: F) -> Self
    where
        F: Fn(&[T; N]) -> [T; M],
    {
        Self { model, law }
    }
}

impl<T, S, F, const N: usize, const M: usize> MappingAutonomousEndogenous<T, N>
    for StateFeedback<S, F, M>
where
    T: Scalar,
    S: MappingAutonomousExogenous<T, N, M>,
    F: Fn(&[T; N]) -> [T; M],
{
    fn compute_rhs(&self, x: &[T; N], rhs: &mut [T; N]) {
        let u = (self.law)(x);
        self.model.compute_rhs(x, &u, rhs);
    }
}

impl<I, T, S, F, const N: usize, const M: usize> MappingNonAutonomousEndogenous<I, T, N>
    for StateFeedback<S, F, M>
where
    T: Scalar,
    S: MappingNonAutonomousExogenous<I, T, N, M>,
    F: Fn(&[T; N]) -> [T; M],
{
    fn compute_rhs(&self, ti: I, x: &[T; N], rhs: &mut [T; N]) {
        let u = (self.law)(x);
        self.model.compute_rhs(ti, x, &u, rhs);
    }
}
