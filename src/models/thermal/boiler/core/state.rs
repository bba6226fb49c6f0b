//! Gas and water stream states at a point in the boiler.

use std::sync::Arc;

use uom::si::f64::{MassRate, Pressure, ThermodynamicTemperature};

use crate::support::{
    thermo::{
        Composition, GasProperties, GasPropertyModel, PropertyError, WaterProperties,
        WaterPropertyModel,
    },
    units::SpecificEnthalpy,
};

/// Flue gas at one point of the path.
///
/// The composition does not change along the boiler and is shared between
/// samples.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub mass_flow: MassRate,
    pub composition: Arc<Composition>,
}

impl GasState {
    /// Evaluates transport properties through `model`.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`PropertyError`].
    pub fn properties(
        &self,
        model: &impl GasPropertyModel,
    ) -> Result<GasProperties, PropertyError> {
        model.gas_properties(self.temperature, self.pressure, &self.composition)
    }

    /// Same gas at a new temperature and pressure.
    #[must_use]
    pub fn with(&self, temperature: ThermodynamicTemperature, pressure: Pressure) -> Self {
        Self {
            temperature,
            pressure,
            mass_flow: self.mass_flow,
            composition: Arc::clone(&self.composition),
        }
    }
}

/// Water or steam on the shell side, identified by enthalpy.
///
/// Temperature, phase and quality are derived through a
/// [`WaterPropertyModel`] on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterState {
    pub mass_flow: MassRate,
    pub enthalpy: SpecificEnthalpy,
    pub pressure: Pressure,
}

impl WaterState {
    /// Evaluates phase and properties through `model`.
    ///
    /// # Errors
    ///
    /// Propagates the provider's [`PropertyError`].
    pub fn properties(
        &self,
        model: &impl WaterPropertyModel,
    ) -> Result<WaterProperties, PropertyError> {
        model.water_properties(self.pressure, self.enthalpy)
    }

    /// Same stream at a new enthalpy.
    #[must_use]
    pub fn with_enthalpy(&self, enthalpy: SpecificEnthalpy) -> Self {
        Self { enthalpy, ..*self }
    }
}
