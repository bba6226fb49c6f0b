//! Marching the gas and water through all six stages.

use tracing::debug;
use twine_core::Model;
use uom::si::{
    f64::{
        HeatFluxDensity, Length, Power, Pressure, ThermalConductance, ThermodynamicTemperature,
    },
    heat_flux_density::watt_per_square_meter,
    length::meter,
    mass_rate::kilogram_per_second,
    power::watt,
    pressure::pascal,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{GasPropertyModel, WaterPropertyModel},
    units::{SpecificEnthalpy, linear_heat_rate},
};

use super::{
    config::SolverConfig,
    error::{MarchState, SolveError},
    geometry::{StageGeometry, StageKind},
    nozzle::{self, NozzleFlow},
    profile::{Profile, ProfileSample, WallPoint},
    stage::{ResolvedStage, StageId},
    stage_ode::{CONDUCTANCE, DUTY, GAS_PRESSURE, StageOde, Streams, march_state},
    state::{GasState, WaterState},
    wall::WallSolution,
};

/// Geometry of every stage, in gas-flow order.
///
/// Any slot may hold any kind of stage. Nozzle losses are applied wherever the
/// geometry is a [`StageGeometry::ReversalChamber`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoilerStages {
    pub pass1: StageGeometry,
    pub reversal1: StageGeometry,
    pub pass2: StageGeometry,
    pub reversal2: StageGeometry,
    pub pass3: StageGeometry,
    pub economiser: StageGeometry,
}

impl BoilerStages {
    pub fn iter(&self) -> impl Iterator<Item = (StageId, &StageGeometry)> {
        StageId::ALL.into_iter().zip([
            &self.pass1,
            &self.reversal1,
            &self.pass2,
            &self.reversal2,
            &self.pass3,
            &self.economiser,
        ])
    }

    pub(crate) fn resolve(&self) -> Result<[ResolvedStage; 6], SolveError> {
        Ok([
            ResolvedStage::new(StageId::Pass1, &self.pass1)?,
            ResolvedStage::new(StageId::Reversal1, &self.reversal1)?,
            ResolvedStage::new(StageId::Pass2, &self.pass2)?,
            ResolvedStage::new(StageId::Reversal2, &self.reversal2)?,
            ResolvedStage::new(StageId::Pass3, &self.pass3)?,
            ResolvedStage::new(StageId::Economiser, &self.economiser)?,
        ])
    }
}

/// Summary of one stage of a march.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    pub id: StageId,
    pub kind: StageKind,
    pub start: Length,
    pub end: Length,
    pub gas_inlet: GasState,
    pub gas_outlet: GasState,
    pub water_inlet: WaterState,
    pub water_outlet: WaterState,
    /// Heat transferred from gas to water.
    pub duty: Power,
    pub friction_pressure_drop: Pressure,
    /// Sum of inlet and outlet nozzle losses. Zero outside reversal chambers.
    pub nozzle_pressure_drop: Pressure,
    /// Effective conductance `∫U′dz`.
    pub conductance: ThermalConductance,
    /// Highest gas-side wall temperature at an accepted point.
    pub max_wall_temperature: ThermodynamicTemperature,
    /// Integrator steps attempted.
    pub steps: usize,
}

/// Result of marching all stages from one inlet water enthalpy.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun {
    pub profile: Profile,
    pub stages: Vec<StageResult>,
    pub gas_outlet: GasState,
    pub water_outlet: WaterState,
}

impl ChainRun {
    /// Total heat transferred to the water.
    #[must_use]
    pub fn duty(&self) -> Power {
        self.stages
            .iter()
            .fold(Power::new::<watt>(0.0), |sum, stage| sum + stage.duty)
    }
}

/// Marches gas and water through every stage.
///
/// Gas and water travel in the same direction; the water pressure is constant.
///
/// # Errors
///
/// Returns the first [`SolveError`] met in any stage.
pub(crate) fn march<G, W>(
    stages: &[ResolvedStage; 6],
    gas_inlet: &GasState,
    water_inlet: &WaterState,
    gas_model: &G,
    water_model: &W,
    config: &SolverConfig,
) -> Result<ChainRun, SolveError>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    let streams = Streams {
        composition: &gas_inlet.composition,
        gas_mass_flow: gas_inlet.mass_flow.get::<kilogram_per_second>(),
        water_mass_flow: water_inlet.mass_flow.get::<kilogram_per_second>(),
        water_pressure: water_inlet.pressure.get::<pascal>(),
    };
    let sample = |position: f64, stage: StageId, state: &MarchState, wall: Option<WallPoint>| {
        ProfileSample {
            position: Length::new::<meter>(position),
            stage,
            gas: gas_inlet.with(state.gas_temperature, state.gas_pressure),
            water: water_inlet.with_enthalpy(state.water_enthalpy),
            wall,
        }
    };

    let mut profile = Profile::new();
    let mut results = Vec::with_capacity(stages.len());
    let mut state = MarchState {
        gas_temperature: gas_inlet.temperature,
        gas_pressure: gas_inlet.pressure,
        water_enthalpy: water_inlet.enthalpy,
    };
    let mut z = 0.0;

    for stage in stages {
        let inlet = state;
        let start = z;
        let mut nozzle_drop = Pressure::new::<pascal>(0.0);
        let flow = NozzleFlow {
            stage: stage.id,
            position: Length::new::<meter>(z),
            mass_flow: streams.gas_mass_flow,
            composition: streams.composition,
        };

        if let Some(nozzles) = &stage.nozzles {
            let drop = nozzle::pressure_drop(&nozzles.inlet, gas_model, &state, &flow)?;
            state.gas_pressure -= drop;
            nozzle_drop += drop;
            profile.push(sample(z, stage.id, &state, None));
        }

        let ode = StageOde::new(stage, gas_model, water_model, streams, config);
        let trajectory = ode.integrate(
            z,
            [
                state.gas_temperature.get::<kelvin>(),
                state.gas_pressure.get::<pascal>(),
                state.water_enthalpy.value,
            ],
        )?;
        for point in &trajectory.points {
            profile.push(sample(
                point.z,
                stage.id,
                &march_state(&point.y),
                Some(wall_point(&point.sample)),
            ));
        }

        let end = trajectory.last();
        let friction_drop = trajectory.points[0].y[GAS_PRESSURE] - end.y[GAS_PRESSURE];
        state = march_state(&end.y);
        z = end.z;

        if let Some(nozzles) = &stage.nozzles {
            let flow = NozzleFlow {
                position: Length::new::<meter>(z),
                ..flow
            };
            let drop = nozzle::pressure_drop(&nozzles.outlet, gas_model, &state, &flow)?;
            state.gas_pressure -= drop;
            nozzle_drop += drop;
            profile.push(sample(z, stage.id, &state, None));
        }

        let max_wall = trajectory
            .points
            .iter()
            .map(|p| p.sample.gas_wall_temperature)
            .fold(f64::NEG_INFINITY, f64::max);

        let result = StageResult {
            id: stage.id,
            kind: stage.kind,
            start: Length::new::<meter>(start),
            end: Length::new::<meter>(z),
            gas_inlet: gas_inlet.with(inlet.gas_temperature, inlet.gas_pressure),
            gas_outlet: gas_inlet.with(state.gas_temperature, state.gas_pressure),
            water_inlet: water_inlet.with_enthalpy(inlet.water_enthalpy),
            water_outlet: water_inlet.with_enthalpy(state.water_enthalpy),
            duty: Power::new::<watt>(end.y[DUTY]),
            friction_pressure_drop: Pressure::new::<pascal>(friction_drop),
            nozzle_pressure_drop: nozzle_drop,
            conductance: ThermalConductance::new::<watt_per_kelvin>(end.y[CONDUCTANCE]),
            max_wall_temperature: ThermodynamicTemperature::new::<kelvin>(max_wall),
            steps: trajectory.attempts,
        };
        debug!(
            stage = %stage.id,
            duty_w = end.y[DUTY],
            gas_outlet_k = state.gas_temperature.get::<kelvin>(),
            water_outlet_j_per_kg = state.water_enthalpy.value,
            steps = trajectory.attempts,
            "stage complete"
        );
        results.push(result);
    }

    Ok(ChainRun {
        profile,
        stages: results,
        gas_outlet: gas_inlet.with(state.gas_temperature, state.gas_pressure),
        water_outlet: water_inlet.with_enthalpy(state.water_enthalpy),
    })
}

fn wall_point(wall: &WallSolution) -> WallPoint {
    WallPoint {
        gas_side_temperature: ThermodynamicTemperature::new::<kelvin>(wall.gas_wall_temperature),
        water_side_temperature: ThermodynamicTemperature::new::<kelvin>(
            wall.water_wall_temperature,
        ),
        heat_rate: linear_heat_rate(wall.heat_rate),
        heat_flux: HeatFluxDensity::new::<watt_per_square_meter>(wall.heat_flux),
    }
}

/// The full march as a function of the inlet water enthalpy.
pub(crate) struct ChainModel<'a, G, W> {
    pub(crate) stages: &'a [ResolvedStage; 6],
    pub(crate) gas_inlet: &'a GasState,
    pub(crate) water_inlet: WaterState,
    pub(crate) gas_model: &'a G,
    pub(crate) water_model: &'a W,
    pub(crate) config: &'a SolverConfig,
}

impl<G, W> Model for ChainModel<'_, G, W>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    type Input = SpecificEnthalpy;
    type Output = ChainRun;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        march(
            self.stages,
            self.gas_inlet,
            &self.water_inlet.with_enthalpy(*input),
            self.gas_model,
            self.water_model,
            self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{available_energy::joule_per_kilogram, f64::MassRate};

    use crate::models::thermal::boiler::core::test_support::{
        flue_gas, gas_inlet, gas_model, stages, tube_bank, water_model, water_pressure,
    };

    fn water_inlet(enthalpy: SpecificEnthalpy) -> WaterState {
        WaterState {
            mass_flow: MassRate::new::<kilogram_per_second>(5.0),
            enthalpy,
            pressure: water_pressure(),
        }
    }

    fn run(boiler: &BoilerStages) -> ChainRun {
        let resolved = boiler.resolve().unwrap();
        let water = water_model();
        march(
            &resolved,
            &gas_inlet(1_500.0, flue_gas()),
            &water_inlet(water.enthalpy_at_quality(0.05)),
            &gas_model(),
            &water,
            &SolverConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn marches_every_stage_in_order() {
        let run = run(&stages());

        let ids: Vec<_> = run.stages.iter().map(|s| s.id).collect();
        assert_eq!(ids, StageId::ALL);

        let positions: Vec<_> = run.profile.iter().map(|s| s.position).collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));

        for pair in run.stages.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(
                pair[0].gas_outlet.temperature,
                pair[1].gas_inlet.temperature
            );
            assert_eq!(pair[0].gas_outlet.pressure, pair[1].gas_inlet.pressure);
            assert_eq!(pair[0].water_outlet.enthalpy, pair[1].water_inlet.enthalpy);
        }

        let mass_flow = run.gas_outlet.mass_flow;
        assert!(run.profile.iter().all(|s| s.gas.mass_flow == mass_flow));
        let gas_inlet = &run.stages[0].gas_inlet;
        assert!(run.gas_outlet.temperature < gas_inlet.temperature);
    }

    #[test]
    fn nozzles_only_in_reversal_chambers() {
        let run = run(&stages());

        for stage in &run.stages {
            let nozzle_samples = run
                .profile
                .stage(stage.id)
                .filter(|s| s.wall.is_none())
                .count();
            if stage.kind == StageKind::ReversalChamber {
                assert_eq!(nozzle_samples, 2);
                assert!(stage.nozzle_pressure_drop.get::<pascal>() > 0.0);
            } else {
                assert_eq!(nozzle_samples, 0);
                assert_eq!(stage.nozzle_pressure_drop.get::<pascal>(), 0.0);
            }
            assert!(stage.friction_pressure_drop.get::<pascal>() > 0.0);
        }
    }

    #[test]
    fn stage_duties_balance_both_streams() {
        let run = run(&stages());
        let cp = 1_180.0;

        for stage in &run.stages {
            let duty = stage.duty.get::<watt>();
            let gas = 1.2
                * cp
                * (stage.gas_inlet.temperature.get::<kelvin>()
                    - stage.gas_outlet.temperature.get::<kelvin>());
            let water = 5.0
                * (stage.water_outlet.enthalpy - stage.water_inlet.enthalpy)
                    .get::<joule_per_kilogram>();
            assert_relative_eq!(gas, duty, max_relative = 0.01);
            assert_relative_eq!(water, duty, max_relative = 0.01);
            assert!(stage.conductance.get::<watt_per_kelvin>() > 0.0);
            assert!(stage.max_wall_temperature < stage.gas_inlet.temperature);
        }

        let total: f64 = run.stages.iter().map(|s| s.duty.get::<watt>()).sum();
        assert_relative_eq!(run.duty().get::<watt>(), total);
    }

    #[test]
    fn any_slot_accepts_any_stage_kind() {
        let boiler = BoilerStages {
            pass3: tube_bank(),
            ..stages()
        };
        let run = run(&boiler);
        let bank = &run.stages[4];
        assert_eq!(bank.kind, StageKind::TubeBank);
        assert!(bank.duty.get::<watt>() > 0.0);
    }
}
