use uom::si::f64::{Pressure, ThermodynamicTemperature};

use crate::support::units::SpecificEnthalpy;

use super::{Composition, GasProperties, PropertyError, WaterProperties};

/// Flue gas property engine.
///
/// Implementations must be deterministic over 250–2500 K and must not retain
/// observable state between calls.
pub trait GasPropertyModel {
    /// Evaluates gas properties at `(T, P, composition)`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the state is outside the model's domain
    /// or the evaluation fails.
    fn gas_properties(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        composition: &Composition,
    ) -> Result<GasProperties, PropertyError>;
}

/// Water/steam property engine keyed on pressure and specific enthalpy.
///
/// Implementations must be enthalpy-continuous across quality 0 and 1.
pub trait WaterPropertyModel {
    /// Evaluates water properties at `(P, h)`.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the state is outside the model's domain
    /// or the evaluation fails.
    fn water_properties(
        &self,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<WaterProperties, PropertyError>;
}

impl<T: GasPropertyModel + ?Sized> GasPropertyModel for &T {
    fn gas_properties(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        composition: &Composition,
    ) -> Result<GasProperties, PropertyError> {
        (**self).gas_properties(temperature, pressure, composition)
    }
}

impl<T: WaterPropertyModel + ?Sized> WaterPropertyModel for &T {
    fn water_properties(
        &self,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<WaterProperties, PropertyError> {
        (**self).water_properties(pressure, enthalpy)
    }
}
