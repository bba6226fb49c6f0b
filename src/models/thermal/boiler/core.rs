//! Axial marching of a three-pass fire-tube boiler.
//!
//! Flue gas enters the furnace tube and passes through six stages in series:
//! pass 1, reversal chamber 1, pass 2, reversal chamber 2, pass 3 and the
//! economiser. Each stage is integrated along its length as a small ODE whose
//! right-hand side balances the gas-side and water-side heat fluxes through
//! the tube wall. Water travels the same path, so the inlet water enthalpy is
//! found by shooting until the terminal enthalpy meets the boundary value.

mod chain;
mod config;
mod correlations;
mod error;
mod geometry;
mod integrator;
mod nozzle;
mod profile;
mod resistance;
mod shooting;
mod stage;
mod stage_ode;
mod state;
mod wall;

#[cfg(test)]
pub(crate) mod test_support;

pub use chain::{BoilerStages, ChainRun, StageResult};
pub use config::{FrictionConfig, IntegratorConfig, ShootingConfig, SolverConfig, WallConfig};
pub use correlations::friction::FrictionModel;
pub use error::{IntegrationFailureReason, MarchState, NumericSolver, SolveError};
pub use geometry::{
    Fouling, FoulingLayer, GeometryError, Nozzle, ReversalChamber, StageGeometry, StageKind,
    TubeArrangement, TubeBank, TubeSection, TubeWall, WaterSide,
};
pub use profile::{Profile, ProfileSample, WallPoint};
pub use stage::StageId;
pub use state::{GasState, WaterState};

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassRate, Power, Pressure},
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{GasPropertyModel, WaterPropertyModel},
    units::SpecificEnthalpy,
};

use chain::ChainModel;
use shooting::ShootingOutcome;
use stage::ResolvedStage;

/// Inlet gas, water flow and the enthalpy boundary for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainBoundary {
    pub gas_inlet: GasState,
    pub water_mass_flow: MassRate,
    /// Shell-side pressure, constant along the boiler.
    pub water_pressure: Pressure,
    /// Water enthalpy required at the end of the economiser.
    pub boundary_enthalpy: SpecificEnthalpy,
    /// Starting inlet enthalpy for shooting. Defaults to `boundary_enthalpy`.
    pub inlet_enthalpy_guess: Option<SpecificEnthalpy>,
}

impl TrainBoundary {
    /// Water entering pass 1 at `enthalpy`.
    #[must_use]
    pub fn water_inlet(&self, enthalpy: SpecificEnthalpy) -> WaterState {
        WaterState {
            mass_flow: self.water_mass_flow,
            enthalpy,
            pressure: self.water_pressure,
        }
    }

    /// Checks flows, pressures and temperatures are physical.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidInput`] naming the first offending value.
    pub fn validate(&self) -> Result<(), SolveError> {
        let positive = [
            ("gas inlet temperature", self.gas_inlet.temperature.get::<kelvin>()),
            ("gas inlet pressure", self.gas_inlet.pressure.get::<pascal>()),
            ("gas mass flow", self.gas_inlet.mass_flow.get::<kilogram_per_second>()),
            ("water mass flow", self.water_mass_flow.get::<kilogram_per_second>()),
            ("water pressure", self.water_pressure.get::<pascal>()),
        ];
        for (name, value) in positive {
            if StrictlyPositive::check(&value).is_err() {
                return Err(SolveError::invalid_input(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let enthalpies = [Some(self.boundary_enthalpy), self.inlet_enthalpy_guess];
        if enthalpies
            .into_iter()
            .flatten()
            .any(|h| !h.get::<joule_per_kilogram>().is_finite())
        {
            return Err(SolveError::invalid_input("water enthalpy must be finite"));
        }

        Ok(())
    }
}

/// Converged or best-effort state of the whole boiler.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSolution {
    pub profile: Profile,
    pub stages: Vec<StageResult>,
    pub converged: bool,
    /// Number of full marches performed.
    pub iterations: usize,
    /// Terminal water enthalpy minus the boundary value.
    pub residual: SpecificEnthalpy,
    pub gas_inlet: GasState,
    pub gas_outlet: GasState,
    pub water_inlet: WaterState,
    pub water_outlet: WaterState,
    /// Total heat transferred to the water.
    pub duty: Power,
}

/// Result of [`FireTubeBoiler::solve`].
///
/// Both variants carry a full solution. `NotConverged` holds the march with
/// the smallest enthalpy residual seen before the shooting budget ran out.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainOutcome {
    Converged(TrainSolution),
    NotConverged(TrainSolution),
}

impl TrainOutcome {
    #[must_use]
    pub fn is_converged(&self) -> bool {
        matches!(self, TrainOutcome::Converged(_))
    }

    #[must_use]
    pub fn solution(&self) -> &TrainSolution {
        match self {
            TrainOutcome::Converged(solution) | TrainOutcome::NotConverged(solution) => solution,
        }
    }

    #[must_use]
    pub fn into_solution(self) -> TrainSolution {
        match self {
            TrainOutcome::Converged(solution) | TrainOutcome::NotConverged(solution) => solution,
        }
    }
}

/// A validated boiler ready to be solved.
///
/// Geometry is checked and reduced to SI values once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FireTubeBoiler {
    geometry: BoilerStages,
    stages: [ResolvedStage; 6],
    config: SolverConfig,
}

impl FireTubeBoiler {
    /// Creates a boiler from its stage geometry.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidGeometry`] for the first stage whose
    /// geometry is not physical.
    pub fn new(geometry: BoilerStages, config: SolverConfig) -> Result<Self, SolveError> {
        let stages = geometry.resolve()?;
        Ok(Self {
            geometry,
            stages,
            config,
        })
    }

    #[must_use]
    pub fn geometry(&self) -> &BoilerStages {
        &self.geometry
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Marches every stage once from the given inlet water enthalpy.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the boundary is invalid or any stage fails.
    pub fn march(
        &self,
        boundary: &TrainBoundary,
        inlet_enthalpy: SpecificEnthalpy,
        gas_model: &impl GasPropertyModel,
        water_model: &impl WaterPropertyModel,
    ) -> Result<ChainRun, SolveError> {
        boundary.validate()?;
        chain::march(
            &self.stages,
            &boundary.gas_inlet,
            &boundary.water_inlet(inlet_enthalpy),
            gas_model,
            water_model,
            &self.config,
        )
    }

    /// Finds the inlet water enthalpy that meets the boundary enthalpy.
    ///
    /// # Errors
    ///
    /// Returns a [`SolveError`] if the boundary is invalid or any march fails.
    /// Running out of shooting iterations is reported as
    /// [`TrainOutcome::NotConverged`].
    pub fn solve<G, W>(
        &self,
        boundary: &TrainBoundary,
        gas_model: &G,
        water_model: &W,
    ) -> Result<TrainOutcome, SolveError>
    where
        G: GasPropertyModel,
        W: WaterPropertyModel,
    {
        boundary.validate()?;

        let model = ChainModel {
            stages: &self.stages,
            gas_inlet: &boundary.gas_inlet,
            water_inlet: boundary.water_inlet(boundary.boundary_enthalpy),
            gas_model,
            water_model,
            config: &self.config,
        };
        let initial = boundary
            .inlet_enthalpy_guess
            .unwrap_or(boundary.boundary_enthalpy);

        let ShootingOutcome {
            best,
            iterations,
            converged,
        } = shooting::shoot(
            &model,
            initial,
            boundary.boundary_enthalpy,
            |run: &ChainRun| run.water_outlet.enthalpy,
            &self.config.shooting,
        )?;

        let run = best.output;
        let solution = TrainSolution {
            duty: run.duty(),
            profile: run.profile,
            stages: run.stages,
            converged,
            iterations,
            residual: SpecificEnthalpy::new::<joule_per_kilogram>(best.residual),
            gas_inlet: boundary.gas_inlet.clone(),
            gas_outlet: run.gas_outlet,
            water_inlet: boundary.water_inlet(SpecificEnthalpy::new::<joule_per_kilogram>(
                best.inlet_enthalpy,
            )),
            water_outlet: run.water_outlet,
        };

        Ok(if converged {
            TrainOutcome::Converged(solution)
        } else {
            TrainOutcome::NotConverged(solution)
        })
    }
}
