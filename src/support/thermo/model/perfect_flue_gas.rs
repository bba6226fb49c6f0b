//! Flue gas with constant transport properties.
//!
//! `PerfectFlueGas` treats combustion products as an ideal gas mixture with
//! constant `cp`, viscosity and conductivity. Density follows `p = ρ·R·T`, with
//! `R` taken from the mixture molar mass of the supplied [`Composition`].
//!
//! # When To Use
//!
//! Quick estimates and tests where the temperature dependence of transport
//! properties is not important. Real designs should supply a gas engine that
//! varies `cp`, `μ` and `k` with temperature.

use thiserror::Error;
use uom::si::{
    dynamic_viscosity::pascal_second,
    f64::{
        DynamicViscosity, Pressure, SpecificHeatCapacity, ThermalConductivity,
        ThermodynamicTemperature,
    },
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{Composition, GasProperties, GasPropertyModel, PropertyError},
};

use super::ideal_gas_eos;

/// Lowest gas temperature accepted, K.
const MIN_TEMPERATURE: f64 = 250.0;

/// Highest gas temperature accepted, K.
const MAX_TEMPERATURE: f64 = 2_500.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PerfectFlueGasError {
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("invalid viscosity: {viscosity:?}")]
    Viscosity { viscosity: DynamicViscosity },
    #[error("invalid conductivity: {conductivity:?}")]
    Conductivity { conductivity: ThermalConductivity },
}

/// Ideal-gas flue gas with constant `cp`, `μ` and `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerfectFlueGas {
    cp: SpecificHeatCapacity,
    viscosity: DynamicViscosity,
    conductivity: ThermalConductivity,
}

impl PerfectFlueGas {
    /// Creates a model from constant transport properties.
    ///
    /// # Errors
    ///
    /// Returns [`PerfectFlueGasError`] if any property is not strictly positive.
    pub fn new(
        cp: SpecificHeatCapacity,
        viscosity: DynamicViscosity,
        conductivity: ThermalConductivity,
    ) -> Result<Self, PerfectFlueGasError> {
        if StrictlyPositive::check(&cp.get::<joule_per_kilogram_kelvin>()).is_err() {
            return Err(PerfectFlueGasError::Cp { cp });
        }
        if StrictlyPositive::check(&viscosity.get::<pascal_second>()).is_err() {
            return Err(PerfectFlueGasError::Viscosity { viscosity });
        }
        if StrictlyPositive::check(&conductivity.get::<watt_per_meter_kelvin>()).is_err() {
            return Err(PerfectFlueGasError::Conductivity { conductivity });
        }

        Ok(Self {
            cp,
            viscosity,
            conductivity,
        })
    }

    /// Typical natural-gas combustion products around 800 K.
    #[must_use]
    pub fn natural_gas_products() -> Self {
        Self {
            cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(1_180.0),
            viscosity: DynamicViscosity::new::<pascal_second>(3.6e-5),
            conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(0.058),
        }
    }
}

impl GasPropertyModel for PerfectFlueGas {
    fn gas_properties(
        &self,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
        composition: &Composition,
    ) -> Result<GasProperties, PropertyError> {
        let t = temperature.get::<kelvin>();
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&t) {
            return Err(PropertyError::out_of_domain(format!(
                "gas temperature {t} K outside {MIN_TEMPERATURE}..{MAX_TEMPERATURE} K"
            )));
        }
        if StrictlyPositive::check(&pressure.get::<pascal>()).is_err() {
            return Err(PropertyError::out_of_domain(format!(
                "gas pressure must be positive, got {} Pa",
                pressure.get::<pascal>()
            )));
        }

        let r = ideal_gas_eos::gas_constant(composition.molar_mass());

        Ok(GasProperties {
            density: ideal_gas_eos::density(temperature, pressure, r),
            viscosity: self.viscosity,
            cp: self.cp,
            conductivity: self.conductivity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{mass_density::kilogram_per_cubic_meter, pressure::kilopascal};

    use crate::support::thermo::{Component, Species};

    fn nitrogen() -> Composition {
        Composition::new(vec![Component::transparent(Species::Nitrogen, 1.0)]).unwrap()
    }

    #[test]
    fn density_follows_ideal_gas_law() {
        let gas = PerfectFlueGas::natural_gas_products();
        let props = gas
            .gas_properties(
                ThermodynamicTemperature::new::<kelvin>(600.0),
                Pressure::new::<kilopascal>(101.325),
                &nitrogen(),
            )
            .unwrap();

        let r = 8.314_462_618 / 0.028_013_4;
        assert_relative_eq!(
            props.density.get::<kilogram_per_cubic_meter>(),
            101_325.0 / (r * 600.0),
            epsilon = 1e-9
        );
        assert_relative_eq!(props.cp.get::<joule_per_kilogram_kelvin>(), 1_180.0);
    }

    #[test]
    fn rejects_temperatures_outside_domain() {
        let gas = PerfectFlueGas::natural_gas_products();
        let result = gas.gas_properties(
            ThermodynamicTemperature::new::<kelvin>(3_000.0),
            Pressure::new::<kilopascal>(101.325),
            &nitrogen(),
        );
        assert!(matches!(result, Err(PropertyError::OutOfDomain { .. })));
    }

    #[test]
    fn rejects_non_physical_parameters() {
        let result = PerfectFlueGas::new(
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(0.0),
            DynamicViscosity::new::<pascal_second>(3e-5),
            ThermalConductivity::new::<watt_per_meter_kelvin>(0.05),
        );
        assert!(matches!(result, Err(PerfectFlueGasError::Cp { .. })));
    }
}
