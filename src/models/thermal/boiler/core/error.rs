//! Errors raised while marching or solving the boiler.

use std::fmt;

use thiserror::Error;
use uom::si::f64::{Length, Pressure, ThermodynamicTemperature};

use crate::support::{thermo::PropertyError, units::SpecificEnthalpy};

use super::{geometry::GeometryError, stage::StageId};

/// Inner iterative solver that failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericSolver {
    /// Colebrook–White friction factor.
    FrictionFactor,
    /// Gas-side wall temperature equilibrium.
    WallTemperature,
}

impl fmt::Display for NumericSolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericSolver::FrictionFactor => f.write_str("friction factor solve"),
            NumericSolver::WallTemperature => f.write_str("wall temperature solve"),
        }
    }
}

/// Marching state `[T_gas, P_gas, h_water]` at the point of failure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchState {
    pub gas_temperature: ThermodynamicTemperature,
    pub gas_pressure: Pressure,
    pub water_enthalpy: SpecificEnthalpy,
}

/// Why an axial integration was abandoned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationFailureReason {
    #[error("non-finite derivative")]
    NonFiniteDerivative,

    #[error("step size {:e} m fell below the minimum", .step.value)]
    StepSizeUnderflow { step: Length },

    #[error("step budget of {steps} exhausted")]
    StepBudgetExhausted { steps: usize },

    /// A nozzle or stage produced a state with no physical meaning.
    #[error("non-physical state: {context}")]
    NonPhysicalState { context: String },
}

/// Errors that abort a boiler solve.
///
/// Failing to meet the outer enthalpy boundary is not an error; see
/// [`TrainOutcome::NotConverged`](super::TrainOutcome::NotConverged).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// An inner iterative solver exhausted its budget.
    #[error(
        "{solver} failed in {stage} at z = {:.4} m after {iters} iterations: {reason}",
        .position.value
    )]
    NumericNonConvergence {
        solver: NumericSolver,
        stage: StageId,
        position: Length,
        iters: usize,
        /// Last iterate in SI units (friction factor, or wall temperature in K).
        last_iterate: f64,
        reason: String,
    },

    /// The adaptive integrator could not complete a stage.
    #[error("integration failed in {stage} at z = {:.4} m: {reason}", .position.value)]
    IntegrationFailure {
        stage: StageId,
        position: Length,
        reason: IntegrationFailureReason,
        last_state: MarchState,
    },

    /// A property provider failed. The provider error is kept unchanged.
    #[error("property evaluation failed in {stage} at z = {:.4} m", .position.value)]
    Property {
        stage: StageId,
        position: Length,
        #[source]
        source: PropertyError,
    },

    #[error("invalid geometry for {stage}")]
    InvalidGeometry {
        stage: StageId,
        #[source]
        source: GeometryError,
    },

    #[error("invalid input: {context}")]
    InvalidInput { context: String },
}

impl SolveError {
    pub(crate) fn invalid_input(context: impl Into<String>) -> Self {
        Self::InvalidInput {
            context: context.into(),
        }
    }
}
