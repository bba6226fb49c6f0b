//! Flux-balance residual for the wall temperature solve.

use std::{cell::RefCell, convert::Infallible};

use twine_core::{EquationProblem, Model};
use uom::si::{
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{Pressure, ThermodynamicTemperature},
    pressure::pascal,
    thermodynamic_temperature::kelvin,
};

use crate::{
    models::thermal::boiler::core::{
        correlations::{gas::radiative_coefficient, water},
        resistance::ResistanceNetwork,
    },
    support::{
        thermo::{PropertyError, WaterPropertyModel},
        units::SpecificEnthalpy,
    },
};

use super::{WallInputs, WallSolution};

/// Both sides of the wall evaluated at a trial gas-side wall temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallEvaluation {
    pub(crate) gas_wall_temperature: f64,
    pub(crate) water_wall_temperature: f64,
    /// Heat rate leaving the gas, W/m.
    pub(crate) gas_heat_rate: f64,
    /// Heat rate entering the water, W/m.
    pub(crate) water_heat_rate: f64,
    /// Convective plus radiative gas coefficient, W/(m²·K).
    pub(crate) gas_coefficient: f64,
    pub(crate) water_coefficient: f64,
}

impl WallEvaluation {
    pub(crate) fn residual(&self) -> f64 {
        self.gas_heat_rate - self.water_heat_rate
    }

    pub(crate) fn into_solution(self, inputs: &WallInputs) -> WallSolution {
        WallSolution {
            gas_wall_temperature: self.gas_wall_temperature,
            water_wall_temperature: self.water_wall_temperature,
            heat_rate: self.gas_heat_rate,
            heat_flux: self.gas_heat_rate / inputs.gas_perimeter,
            network: ResistanceNetwork::new(
                self.gas_coefficient,
                inputs.gas_perimeter,
                &inputs.fixed,
                self.water_coefficient,
                inputs.water_perimeter,
            ),
        }
    }
}

/// Evaluates the wall at a trial gas-side temperature.
///
/// The first provider failure is kept so it can be reported unchanged after
/// the root finder gives up.
pub(crate) struct WallModel<'a, W> {
    inputs: &'a WallInputs,
    water_model: &'a W,
    failure: RefCell<Option<PropertyError>>,
}

impl<'a, W: WaterPropertyModel> WallModel<'a, W> {
    pub(crate) fn new(inputs: &'a WallInputs, water_model: &'a W) -> Self {
        Self {
            inputs,
            water_model,
            failure: RefCell::new(None),
        }
    }

    pub(crate) fn take_failure(&self) -> Option<PropertyError> {
        self.failure.borrow_mut().take()
    }

    pub(crate) fn evaluate(&self, t_wall: f64) -> Result<WallEvaluation, PropertyError> {
        let inputs = self.inputs;
        let water = &inputs.water;
        let t_gas = inputs.gas_temperature;

        let gas_coefficient = inputs.convective_coefficient
            + radiative_coefficient(inputs.emissivity, t_gas, t_wall);
        let gas_heat_rate = (t_gas - t_wall) * gas_coefficient * inputs.gas_perimeter;

        let water_wall_temperature = t_wall - gas_heat_rate * inputs.fixed.through_wall();
        let heat_flux = gas_heat_rate.abs() / inputs.water_perimeter;
        let viscosity_ratio = self.viscosity_ratio(water_wall_temperature)?;

        let water_coefficient = water::coefficient(
            water.regime,
            &water.bulk,
            &water.saturation,
            &water.channel,
            heat_flux,
            viscosity_ratio,
        );
        let water_heat_rate = (water_wall_temperature - water.temperature)
            * water_coefficient
            * inputs.water_perimeter;

        Ok(WallEvaluation {
            gas_wall_temperature: t_wall,
            water_wall_temperature,
            gas_heat_rate,
            water_heat_rate,
            gas_coefficient,
            water_coefficient,
        })
    }

    /// `μ_bulk/μ_wall` for liquid films, with `μ_wall` taken at the enthalpy
    /// `h + cp·(T_wall − T_bulk)`.
    fn viscosity_ratio(&self, t_water_wall: f64) -> Result<f64, PropertyError> {
        let water = &self.inputs.water;
        if !water.regime.needs_wall_viscosity() {
            return Ok(1.0);
        }

        let liquid = water.reference_liquid();
        let h_wall = water.liquid_enthalpy + liquid.cp * (t_water_wall - water.temperature);
        let wall = self.water_model.water_properties(
            Pressure::new::<pascal>(water.pressure),
            SpecificEnthalpy::new::<joule_per_kilogram>(h_wall),
        )?;

        Ok(liquid.viscosity / wall.viscosity.get::<pascal_second>())
    }
}

impl<W: WaterPropertyModel> Model for WallModel<'_, W> {
    type Input = ThermodynamicTemperature;
    type Output = WallEvaluation;
    type Error = PropertyError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.evaluate(input.get::<kelvin>()).inspect_err(|err| {
            self.failure.borrow_mut().get_or_insert_with(|| err.clone());
        })
    }
}

/// Residual `q′_gas − q′_water` in W/m.
pub(crate) struct WallProblem;

impl EquationProblem<1> for WallProblem {
    type Input = ThermodynamicTemperature;
    type Output = WallEvaluation;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(ThermodynamicTemperature::new::<kelvin>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        Ok([output.residual()])
    }
}
