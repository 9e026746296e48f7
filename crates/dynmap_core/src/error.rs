use std::fmt;
use thiserror::Error;

/// Names one of the vectors involved in a right-hand-side evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Buffer {
    State,
    Input,
    Rhs,
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Buffer::State => "state",
            Buffer::Input => "input",
            Buffer::Rhs => "rhs",
        };
        f.write_str(name)
    }
}

/// A runtime buffer whose length does not match the model's fixed dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{buffer} buffer has length {found}, expected {expected}")]
pub struct DimensionError {
    pub buffer: Buffer,
    pub expected: usize,
    pub found: usize,
}

/// A model that broke the evaluation contract during a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("rhs slot {slot} was never written")]
    Unwritten { slot: usize },
    #[error("rhs slot {slot} differs between two evaluations with identical inputs")]
    NonDeterministic { slot: usize },
    /// Only reachable from a model that writes through its shared input
    /// references with `unsafe` code; scalars have no interior mutability.
    #[error("{buffer} slot {slot} was modified during evaluation")]
    InputsMutated { buffer: Buffer, slot: usize },
}
