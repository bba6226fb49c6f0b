//! Fire-tube boiler model.
//!
//! [`FireTubeBoilerModel`] is a [`twine_core::Model`] that maps a
//! [`TrainBoundary`] to a [`TrainOutcome`]. The computation lives in the
//! internal [`core`] module; [`FireTubeBoiler`] exposes it directly for
//! callers who want single marches or per-call property models.

pub(crate) mod core;

pub use self::core::{
    BoilerStages, ChainRun, FireTubeBoiler, Fouling, FoulingLayer, FrictionConfig, FrictionModel,
    GasState, GeometryError, IntegrationFailureReason, IntegratorConfig, MarchState, Nozzle,
    NumericSolver, Profile, ProfileSample, ReversalChamber, ShootingConfig, SolveError,
    SolverConfig, StageGeometry, StageId, StageKind, StageResult, TrainBoundary, TrainOutcome,
    TrainSolution, TubeArrangement, TubeBank, TubeSection, TubeWall, WallConfig, WallPoint,
    WaterSide, WaterState,
};

use twine_core::Model;

use crate::support::thermo::{GasPropertyModel, WaterPropertyModel};

/// A boiler bundled with the property models it is solved with.
#[derive(Debug, Clone)]
pub struct FireTubeBoilerModel<G, W> {
    boiler: FireTubeBoiler,
    gas_model: G,
    water_model: W,
}

impl<G, W> FireTubeBoilerModel<G, W>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    pub fn new(boiler: FireTubeBoiler, gas_model: G, water_model: W) -> Self {
        Self {
            boiler,
            gas_model,
            water_model,
        }
    }

    pub fn boiler(&self) -> &FireTubeBoiler {
        &self.boiler
    }
}

impl<G, W> Model for FireTubeBoilerModel<G, W>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    type Input = TrainBoundary;
    type Output = TrainOutcome;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.boiler.solve(input, &self.gas_model, &self.water_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::MassRate, mass_rate::kilogram_per_second};

    use crate::support::thermo::model::Memoized;

    use super::core::test_support::{
        flue_gas, gas_inlet, gas_model, stages, water_model, water_pressure,
    };

    fn boundary() -> TrainBoundary {
        TrainBoundary {
            gas_inlet: gas_inlet(1_200.0, flue_gas()),
            water_mass_flow: MassRate::new::<kilogram_per_second>(4.0),
            water_pressure: water_pressure(),
            boundary_enthalpy: water_model().enthalpy_at_quality(0.05),
            inlet_enthalpy_guess: None,
        }
    }

    #[test]
    fn model_matches_direct_solve() {
        let boiler = FireTubeBoiler::new(stages(), SolverConfig::default()).unwrap();
        let direct = boiler
            .solve(&boundary(), &gas_model(), &water_model())
            .unwrap();

        let model = FireTubeBoilerModel::new(boiler, gas_model(), water_model());
        let outcome = model.call(&boundary()).unwrap();

        assert!(outcome.is_converged());
        assert_eq!(outcome, direct);
    }

    #[test]
    fn memoized_providers_give_identical_results() {
        let boiler = FireTubeBoiler::new(stages(), SolverConfig::default()).unwrap();
        let plain = FireTubeBoilerModel::new(boiler.clone(), gas_model(), water_model());
        let cached = FireTubeBoilerModel::new(
            boiler,
            Memoized::new(gas_model()),
            Memoized::new(water_model()),
        );

        assert_eq!(
            plain.call(&boundary()).unwrap(),
            cached.call(&boundary()).unwrap()
        );
    }
}
