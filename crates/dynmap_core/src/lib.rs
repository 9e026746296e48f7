pub mod adapters;
pub mod autodiff;
pub mod checked;
pub mod error;
pub mod models;
pub mod probe;
/// The `dynmap_core` crate describes the right-hand side of dynamical systems,
/// either ODEs (`dx/dt = f(...)`) or discrete maps (`x_{i+1} = f(...)`), so
/// that integrators and simulators can drive arbitrary user models.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction) and the four mapping
///   contracts, split by autonomy (explicit dependence on time or step index)
///   and by exogenous inputs. State and input widths are const generics.
/// - **Checked**: slice-based evaluation for callers holding runtime-sized buffers.
/// - **Adapters**: lift a model to a richer variant or close its inputs.
/// - **Autodiff**: Dual numbers and Jacobians of generic models.
/// - **Probe**: checks that a model honours the evaluation contract.
/// - **Models**: pendulums, the Hénon map and a kicked rotor.
pub mod traits;

pub use error::{Buffer, ContractViolation, DimensionError};
pub use traits::{
    MappingAutonomousEndogenous, MappingAutonomousExogenous, MappingKind,
    MappingNonAutonomousEndogenous, MappingNonAutonomousExogenous, Scalar,
};
