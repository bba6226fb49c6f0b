use uom::si::f64::{
    DynamicViscosity, MassDensity, SpecificHeatCapacity, ThermalConductivity,
    ThermodynamicTemperature,
};

use crate::support::{
    constraint::{Constrained, UnitInterval},
    units::{SpecificEnthalpy, SurfaceTension},
};

/// Transport properties of flue gas at a given `(T, P, composition)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasProperties {
    pub density: MassDensity,
    pub viscosity: DynamicViscosity,
    pub cp: SpecificHeatCapacity,
    pub conductivity: ThermalConductivity,
}

/// Transport properties of one saturated phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmProperties {
    pub density: MassDensity,
    pub viscosity: DynamicViscosity,
    pub conductivity: ThermalConductivity,
    pub cp: SpecificHeatCapacity,
}

/// Phase of water at a given `(P, h)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaterPhase {
    Subcooled,
    Saturated {
        quality: Constrained<f64, UnitInterval>,
    },
    Superheated,
}

impl WaterPhase {
    /// Vapour mass fraction, or `None` outside the vapour dome.
    #[must_use]
    pub fn quality(&self) -> Option<f64> {
        match self {
            WaterPhase::Saturated { quality } => Some(quality.into_inner()),
            WaterPhase::Subcooled | WaterPhase::Superheated => None,
        }
    }
}

/// Water/steam properties at a given `(P, h)`.
///
/// Bulk properties (`temperature` through `cp`) describe the local mixture.
/// The saturation fields describe the vapour dome at the same pressure and are
/// needed by two-phase correlations in every phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterProperties {
    pub phase: WaterPhase,
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub viscosity: DynamicViscosity,
    pub conductivity: ThermalConductivity,
    pub cp: SpecificHeatCapacity,
    pub surface_tension: SurfaceTension,
    pub latent_heat: SpecificEnthalpy,
    pub saturation_temperature: ThermodynamicTemperature,
    pub saturated_liquid: FilmProperties,
    pub saturated_vapor: FilmProperties,
}
