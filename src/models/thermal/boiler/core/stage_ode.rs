//! Axial ODE for one stage.
//!
//! The state is `[T_gas, P_gas, h_water, Q, UA]`:
//!
//! ```text
//! dT/dz  = −q′ / (ṁ_gas·cp)
//! dP/dz  = −f·G² / (2·ρ·D_h)
//! dh/dz  = q′ / ṁ_water
//! dQ/dz  = q′
//! dUA/dz = U′
//! ```
//!
//! `q′` and `U′` come from the wall equilibrium at each evaluation, and `f`
//! from the configured friction model. The last two components are
//! quadratures for the stage duty and effective conductance.

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Length, Pressure, ThermodynamicTemperature},
    length::meter,
    pressure::pascal,
    reciprocal_length::reciprocal_meter,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{Composition, GasPropertyModel, PropertyError, WaterPropertyModel},
    units::SpecificEnthalpy,
};

use super::{
    config::SolverConfig,
    correlations::{
        GasTransport,
        friction::{self, FrictionError},
        gas,
    },
    error::{IntegrationFailureReason, MarchState, NumericSolver, SolveError},
    integrator::{self, IntegrationError, OdeSystem, Trajectory},
    stage::{ResolvedStage, StageId},
    wall::{self, WallInputs, WallSolution, WaterBulk},
};

pub(crate) const GAS_TEMPERATURE: usize = 0;
pub(crate) const GAS_PRESSURE: usize = 1;
pub(crate) const WATER_ENTHALPY: usize = 2;
pub(crate) const DUTY: usize = 3;
pub(crate) const CONDUCTANCE: usize = 4;

pub(crate) const STATE_LEN: usize = 5;

pub(crate) type StageTrajectory = Trajectory<STATE_LEN, WallSolution>;

/// Flow data shared by every stage of one march.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Streams<'a> {
    pub(crate) composition: &'a Composition,
    pub(crate) gas_mass_flow: f64,
    pub(crate) water_mass_flow: f64,
    pub(crate) water_pressure: f64,
}

pub(crate) struct StageOde<'a, G, W> {
    stage: &'a ResolvedStage,
    gas_model: &'a G,
    water_model: &'a W,
    streams: Streams<'a>,
    emissivity: f64,
    config: &'a SolverConfig,
}

impl<'a, G, W> StageOde<'a, G, W>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    pub(crate) fn new(
        stage: &'a ResolvedStage,
        gas_model: &'a G,
        water_model: &'a W,
        streams: Streams<'a>,
        config: &'a SolverConfig,
    ) -> Self {
        let kappa = streams
            .composition
            .absorption_coefficient()
            .get::<reciprocal_meter>();
        Self {
            stage,
            gas_model,
            water_model,
            streams,
            emissivity: gas::emissivity(kappa, stage.path_length),
            config,
        }
    }

    /// Integrates the stage from `start` with inlet `[T_gas, P_gas, h_water]`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SolveError`] raised by the right-hand side, or
    /// [`SolveError::IntegrationFailure`] if the integrator gives up.
    pub(crate) fn integrate(
        &self,
        start: f64,
        inlet: [f64; 3],
    ) -> Result<StageTrajectory, SolveError> {
        let y0 = [inlet[0], inlet[1], inlet[2], 0.0, 0.0];
        integrator::integrate(
            self,
            start,
            start + self.stage.length,
            y0,
            &self.config.integrator,
        )
        .map_err(|err| integration_failure(err, self.stage.id))
    }

    fn property_failure(&self, position: Length) -> impl Fn(PropertyError) -> SolveError {
        let stage = self.stage.id;
        move |source| SolveError::Property {
            stage,
            position,
            source,
        }
    }
}

impl<G, W> OdeSystem<STATE_LEN> for StageOde<'_, G, W>
where
    G: GasPropertyModel,
    W: WaterPropertyModel,
{
    type Sample = WallSolution;
    type Error = SolveError;

    fn evaluate(
        &self,
        z: f64,
        y: &[f64; STATE_LEN],
    ) -> Result<([f64; STATE_LEN], WallSolution), SolveError> {
        let stage = self.stage;
        let streams = &self.streams;
        let position = Length::new::<meter>(z);
        let t_gas = y[GAS_TEMPERATURE];

        let gas = self
            .gas_model
            .gas_properties(
                ThermodynamicTemperature::new::<kelvin>(t_gas),
                Pressure::new::<pascal>(y[GAS_PRESSURE]),
                streams.composition,
            )
            .map_err(self.property_failure(position))?;
        let gas = GasTransport::from(&gas);

        let water_pressure = Pressure::new::<pascal>(streams.water_pressure);
        let enthalpy = SpecificEnthalpy::new::<joule_per_kilogram>(y[WATER_ENTHALPY]);
        let water = self
            .water_model
            .water_properties(water_pressure, enthalpy)
            .map_err(self.property_failure(position))?;
        let water = WaterBulk::new(
            &water,
            enthalpy,
            water_pressure,
            stage.water_channel(streams.water_mass_flow),
        );

        let mass_flux = streams.gas_mass_flow / stage.flow_area;
        let film = gas::film(
            &stage.nusselt,
            &gas,
            mass_flux,
            stage.characteristic_length,
            t_gas >= water.temperature,
        );

        let inputs = WallInputs {
            gas_temperature: t_gas,
            convective_coefficient: film.coefficient,
            emissivity: self.emissivity,
            gas_perimeter: stage.gas_perimeter,
            water_perimeter: stage.water_perimeter,
            fixed: stage.fixed,
            water,
        };
        let wall = wall::solve(&inputs, self.water_model, &self.config.wall)
            .map_err(|err| err.at(stage.id, position))?;

        let reynolds = mass_flux * stage.hydraulic_diameter / gas.viscosity;
        let f = friction::darcy(reynolds, stage.relative_roughness, &self.config.friction)
            .map_err(|err| friction_failure(&err, stage.id, position))?;

        let q = wall.heat_rate;
        let mut dy = [0.0; STATE_LEN];
        dy[GAS_TEMPERATURE] = -q / (streams.gas_mass_flow * gas.cp);
        dy[GAS_PRESSURE] =
            -f * mass_flux * mass_flux / (2.0 * gas.density * stage.hydraulic_diameter);
        dy[WATER_ENTHALPY] = q / streams.water_mass_flow;
        dy[DUTY] = q;
        dy[CONDUCTANCE] = wall.network.conductance();

        Ok((dy, wall))
    }
}

fn friction_failure(err: &FrictionError, stage: StageId, position: Length) -> SolveError {
    match *err {
        FrictionError::NonConvergence {
            iters,
            last_iterate,
            ..
        } => SolveError::NumericNonConvergence {
            solver: NumericSolver::FrictionFactor,
            stage,
            position,
            iters,
            last_iterate,
            reason: err.to_string(),
        },
        FrictionError::Reynolds { .. } | FrictionError::Roughness { .. } => {
            SolveError::invalid_input(format!(
                "friction factor in {stage} at z = {:.4} m: {err}",
                position.get::<meter>()
            ))
        }
    }
}

pub(crate) fn march_state(y: &[f64; STATE_LEN]) -> MarchState {
    MarchState {
        gas_temperature: ThermodynamicTemperature::new::<kelvin>(y[GAS_TEMPERATURE]),
        gas_pressure: Pressure::new::<pascal>(y[GAS_PRESSURE]),
        water_enthalpy: SpecificEnthalpy::new::<joule_per_kilogram>(y[WATER_ENTHALPY]),
    }
}

fn integration_failure(
    err: IntegrationError<SolveError, STATE_LEN>,
    stage: StageId,
) -> SolveError {
    let (z, reason, state) = match err {
        IntegrationError::Rhs { error, .. } => return error,
        IntegrationError::NonFiniteDerivative { z, state } => {
            (z, IntegrationFailureReason::NonFiniteDerivative, state)
        }
        IntegrationError::StepSizeUnderflow { z, step, state } => (
            z,
            IntegrationFailureReason::StepSizeUnderflow {
                step: Length::new::<meter>(step),
            },
            state,
        ),
        IntegrationError::StepBudgetExhausted { z, steps, state } => (
            z,
            IntegrationFailureReason::StepBudgetExhausted { steps },
            state,
        ),
    };
    SolveError::IntegrationFailure {
        stage,
        position: Length::new::<meter>(z),
        reason,
        last_state: march_state(&state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::boiler::core::{
        config::IntegratorConfig,
        test_support::{
            ViscosityWindow, first_pass, flue_gas, gas_model, second_pass, transparent_gas,
            water_model, water_pressure,
        },
    };

    fn streams(composition: &Composition, water_mass_flow: f64) -> Streams<'_> {
        Streams {
            composition,
            gas_mass_flow: 1.2,
            water_mass_flow,
            water_pressure: water_pressure().get::<pascal>(),
        }
    }

    #[test]
    fn stage_energy_balances() {
        let stage = ResolvedStage::new(StageId::Pass2, &second_pass()).unwrap();
        let composition = flue_gas();
        let config = SolverConfig::default();
        let gas = gas_model();
        let water = water_model();
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 5.0), &config);

        let h_in = water.enthalpy_at_quality(0.1).get::<joule_per_kilogram>();
        let trajectory = ode.integrate(4.8, [1_100.0, 110e3, h_in]).unwrap();
        let start = &trajectory.points[0];
        let end = trajectory.last();

        assert_relative_eq!(end.z, 8.8);
        let duty = end.y[DUTY];
        assert!(duty > 0.0);

        let cp = 1_180.0;
        let gas_side = 1.2 * cp * (start.y[GAS_TEMPERATURE] - end.y[GAS_TEMPERATURE]);
        let water_side = 5.0 * (end.y[WATER_ENTHALPY] - start.y[WATER_ENTHALPY]);
        assert_relative_eq!(gas_side, duty, max_relative = 0.01);
        assert_relative_eq!(water_side, duty, max_relative = 0.01);
        assert!(end.y[GAS_PRESSURE] < 110e3);

        for point in &trajectory.points {
            let wall = &point.sample;
            assert!(wall.water_wall_temperature < wall.gas_wall_temperature);
            assert!(wall.gas_wall_temperature < point.y[GAS_TEMPERATURE]);
        }
    }

    #[test]
    fn transparent_gas_decays_exponentially() {
        let stage = ResolvedStage::new(StageId::Pass1, &first_pass()).unwrap();
        let composition = transparent_gas();
        let config = SolverConfig {
            integrator: IntegratorConfig {
                relative_tol: 1e-9,
                absolute_tol: 1e-9,
                ..IntegratorConfig::default()
            },
            ..SolverConfig::default()
        };
        let gas = gas_model();
        let water = water_model();

        // A very large water flow holds the water temperature fixed.
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 1e4), &config);
        let t_water = 350.0;
        let h_in = water
            .subcooled_enthalpy(ThermodynamicTemperature::new::<kelvin>(t_water))
            .get::<joule_per_kilogram>();
        let t_in = 1_000.0;

        let trajectory = ode.integrate(0.0, [t_in, 110e3, h_in]).unwrap();
        let start = &trajectory.points[0];
        let conductance = start.sample.network.conductance();
        assert_relative_eq!(
            start.sample.heat_rate,
            conductance * (t_in - t_water),
            max_relative = 1e-6
        );

        let m_cp = 1.2 * 1_180.0;
        for point in &trajectory.points {
            let expected = (t_in - t_water) * (-conductance * point.z / m_cp).exp();
            assert_relative_eq!(
                point.y[GAS_TEMPERATURE] - t_water,
                expected,
                max_relative = 1e-3
            );
        }
        assert_relative_eq!(
            trajectory.last().y[CONDUCTANCE],
            conductance * 4.0,
            max_relative = 1e-6
        );
    }

    #[test]
    fn equal_temperatures_leave_the_thermal_state_unchanged() {
        let stage = ResolvedStage::new(StageId::Pass2, &second_pass()).unwrap();
        let composition = flue_gas();
        let config = SolverConfig::default();
        let gas = gas_model();
        let water = water_model();
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 5.0), &config);

        let t_sat = 453.03;
        let h = water.enthalpy_at_quality(0.5).get::<joule_per_kilogram>();
        let trajectory = ode.integrate(0.0, [t_sat, 110e3, h]).unwrap();
        let end = trajectory.last();

        assert_eq!(end.y[GAS_TEMPERATURE], t_sat);
        assert_eq!(end.y[WATER_ENTHALPY], h);
        assert_eq!(end.y[DUTY], 0.0);
        assert!(end.y[GAS_PRESSURE] < 110e3, "friction still acts");
        assert!(trajectory.points.iter().all(|p| p.sample.heat_rate == 0.0));
    }

    #[test]
    fn property_failure_names_stage_and_position() {
        let stage = ResolvedStage::new(StageId::Pass1, &first_pass()).unwrap();
        let composition = flue_gas();
        let config = SolverConfig::default();
        let gas = gas_model();
        let water = water_model();
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 5.0), &config);

        // Above the gas model's temperature range.
        let h = water.enthalpy_at_quality(0.5).get::<joule_per_kilogram>();
        match ode.integrate(2.0, [3_000.0, 110e3, h]) {
            Err(SolveError::Property {
                stage, position, ..
            }) => {
                assert_eq!(stage, StageId::Pass1);
                assert_relative_eq!(position.get::<meter>(), 2.0);
            }
            other => panic!("Expected Property, got: {other:?}"),
        }
    }

    #[test]
    fn unbracketed_wall_fails_the_stage() {
        let stage = ResolvedStage::new(StageId::Pass1, &first_pass()).unwrap();
        let composition = flue_gas();
        let config = SolverConfig::default();
        let gas = gas_model();
        let water = ViscosityWindow::nowhere();
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 5.0), &config);

        let h = water_model()
            .subcooled_enthalpy(ThermodynamicTemperature::new::<kelvin>(400.0))
            .get::<joule_per_kilogram>();
        match ode.integrate(0.0, [1_200.0, 110e3, h]) {
            Err(SolveError::NumericNonConvergence {
                solver,
                stage,
                position,
                iters,
                last_iterate,
                ..
            }) => {
                assert_eq!(solver, NumericSolver::WallTemperature);
                assert_eq!(stage, StageId::Pass1);
                assert_eq!(position.get::<meter>(), 0.0);
                assert_eq!(iters, config.wall.scan_intervals + 1);
                assert_relative_eq!(last_iterate, 1_200.0);
            }
            other => panic!("Expected NumericNonConvergence, got: {other:?}"),
        }
    }

    #[test]
    fn step_budget_reports_last_state() {
        let stage = ResolvedStage::new(StageId::Pass2, &second_pass()).unwrap();
        let composition = flue_gas();
        let config = SolverConfig {
            integrator: IntegratorConfig {
                max_steps: 1,
                initial_step: Some(Length::new::<meter>(0.01)),
                ..IntegratorConfig::default()
            },
            ..SolverConfig::default()
        };
        let gas = gas_model();
        let water = water_model();
        let ode = StageOde::new(&stage, &gas, &water, streams(&composition, 5.0), &config);

        let h = water.enthalpy_at_quality(0.2).get::<joule_per_kilogram>();
        match ode.integrate(0.0, [1_100.0, 110e3, h]) {
            Err(SolveError::IntegrationFailure {
                stage,
                reason,
                last_state,
                ..
            }) => {
                assert_eq!(stage, StageId::Pass2);
                assert_eq!(
                    reason,
                    IntegrationFailureReason::StepBudgetExhausted { steps: 1 }
                );
                assert!(last_state.gas_temperature.get::<kelvin>() <= 1_100.0);
            }
            other => panic!("Expected IntegrationFailure, got: {other:?}"),
        }
    }

    #[test]
    fn friction_non_convergence_is_reported() {
        let err = friction_failure(
            &FrictionError::NonConvergence {
                iters: 50,
                last_iterate: 0.02,
                residual: 1e-3,
            },
            StageId::Economiser,
            Length::new::<meter>(20.0),
        );
        assert!(matches!(
            err,
            SolveError::NumericNonConvergence {
                solver: NumericSolver::FrictionFactor,
                stage: StageId::Economiser,
                iters: 50,
                ..
            }
        ));
    }
}
