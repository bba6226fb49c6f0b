//! Heat transfer and friction correlations.
//!
//! Correlations work on plain SI values. Provider results are converted once
//! per evaluation into [`GasTransport`] and [`FilmTransport`].

pub(crate) mod friction;
pub(crate) mod gas;
pub(crate) mod water;

use uom::si::{
    dynamic_viscosity::pascal_second, mass_density::kilogram_per_cubic_meter,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::thermo::{FilmProperties, GasProperties};

/// Gas transport properties in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct GasTransport {
    pub(crate) density: f64,
    pub(crate) viscosity: f64,
    pub(crate) cp: f64,
    pub(crate) conductivity: f64,
}

impl GasTransport {
    pub(crate) fn prandtl(&self) -> f64 {
        self.viscosity * self.cp / self.conductivity
    }
}

impl From<&GasProperties> for GasTransport {
    fn from(props: &GasProperties) -> Self {
        Self {
            density: props.density.get::<kilogram_per_cubic_meter>(),
            viscosity: props.viscosity.get::<pascal_second>(),
            cp: props.cp.get::<joule_per_kilogram_kelvin>(),
            conductivity: props.conductivity.get::<watt_per_meter_kelvin>(),
        }
    }
}

/// Single-phase water or steam transport properties in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FilmTransport {
    pub(crate) density: f64,
    pub(crate) viscosity: f64,
    pub(crate) conductivity: f64,
    pub(crate) cp: f64,
}

impl FilmTransport {
    pub(crate) fn prandtl(&self) -> f64 {
        self.viscosity * self.cp / self.conductivity
    }
}

impl From<&FilmProperties> for FilmTransport {
    fn from(props: &FilmProperties) -> Self {
        Self {
            density: props.density.get::<kilogram_per_cubic_meter>(),
            viscosity: props.viscosity.get::<pascal_second>(),
            conductivity: props.conductivity.get::<watt_per_meter_kelvin>(),
            cp: props.cp.get::<joule_per_kilogram_kelvin>(),
        }
    }
}
