//! Water/steam at a fixed saturation state.
//!
//! `SaturatedWater` describes water near one operating pressure with constant
//! saturated-phase properties. It is the simplest model that still exercises
//! every branch a boiler solver meets: subcooled liquid, the vapour dome and
//! superheated steam.
//!
//! # Assumptions
//!
//! - The saturation temperature, latent heat and phase properties do not vary
//!   with the supplied pressure.
//! - Subcooled liquid and superheated vapour have constant `cp`, so
//!   temperature is linear in enthalpy away from the dome.
//! - Inside the dome the mixture density is homogeneous
//!   (`1/ρ = x/ρ_v + (1−x)/ρ_l`) and `μ`, `k`, `cp` are quality-weighted.
//!
//! These choices make every bulk property continuous in enthalpy across
//! quality 0 and quality 1.

use thiserror::Error;
use uom::si::{
    available_energy::{joule_per_kilogram, kilojoule_per_kilogram},
    dynamic_viscosity::pascal_second,
    f64::{
        DynamicViscosity, MassDensity, Pressure, SpecificHeatCapacity, ThermalConductivity,
        ThermodynamicTemperature,
    },
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    constraint::{Constraint, StrictlyPositive, UnitInterval},
    thermo::{FilmProperties, PropertyError, WaterPhase, WaterProperties, WaterPropertyModel},
    units::{SpecificEnthalpy, SurfaceTension, surface_tension},
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaturatedWaterError {
    #[error("invalid saturation temperature: {0:?}")]
    SaturationTemperature(ThermodynamicTemperature),
    #[error("invalid latent heat: {0:?}")]
    LatentHeat(SpecificEnthalpy),
    #[error("invalid surface tension: {0:?}")]
    SurfaceTension(SurfaceTension),
    #[error("invalid {phase} property: {property}")]
    Film {
        phase: &'static str,
        property: &'static str,
    },
}

/// Saturation data for [`SaturatedWater`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturatedWaterParameters {
    pub saturation_temperature: ThermodynamicTemperature,
    pub liquid_enthalpy: SpecificEnthalpy,
    pub latent_heat: SpecificEnthalpy,
    pub surface_tension: SurfaceTension,
    pub liquid: FilmProperties,
    pub vapor: FilmProperties,
}

impl SaturatedWaterParameters {
    /// Saturated water and steam at 10 bar (IAPWS-IF97 values).
    #[must_use]
    pub fn ten_bar() -> Self {
        Self {
            saturation_temperature: ThermodynamicTemperature::new::<kelvin>(453.03),
            liquid_enthalpy: SpecificEnthalpy::new::<kilojoule_per_kilogram>(762.52),
            latent_heat: SpecificEnthalpy::new::<kilojoule_per_kilogram>(2_014.6),
            surface_tension: surface_tension(0.042_2),
            liquid: FilmProperties {
                density: MassDensity::new::<kilogram_per_cubic_meter>(887.0),
                viscosity: DynamicViscosity::new::<pascal_second>(1.50e-4),
                conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(0.673),
                cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(4_405.0),
            },
            vapor: FilmProperties {
                density: MassDensity::new::<kilogram_per_cubic_meter>(5.145),
                viscosity: DynamicViscosity::new::<pascal_second>(1.50e-5),
                conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(0.037_5),
                cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(2_710.0),
            },
        }
    }
}

/// Water/steam model with constant saturation data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturatedWater {
    params: SaturatedWaterParameters,
}

impl SaturatedWater {
    /// Creates a model from saturation data.
    ///
    /// # Errors
    ///
    /// Returns [`SaturatedWaterError`] if any temperature, latent heat, surface
    /// tension or phase property is not strictly positive.
    pub fn new(params: SaturatedWaterParameters) -> Result<Self, SaturatedWaterError> {
        if StrictlyPositive::check(&params.saturation_temperature.get::<kelvin>()).is_err() {
            return Err(SaturatedWaterError::SaturationTemperature(
                params.saturation_temperature,
            ));
        }
        if StrictlyPositive::check(&params.latent_heat.get::<joule_per_kilogram>()).is_err() {
            return Err(SaturatedWaterError::LatentHeat(params.latent_heat));
        }
        if StrictlyPositive::check(&params.surface_tension.value).is_err() {
            return Err(SaturatedWaterError::SurfaceTension(params.surface_tension));
        }
        check_film("liquid", &params.liquid)?;
        check_film("vapor", &params.vapor)?;

        Ok(Self { params })
    }

    /// Specific enthalpy of saturated liquid (`x = 0`).
    #[must_use]
    pub fn saturated_liquid_enthalpy(&self) -> SpecificEnthalpy {
        self.params.liquid_enthalpy
    }

    /// Specific enthalpy of saturated vapour (`x = 1`).
    #[must_use]
    pub fn saturated_vapor_enthalpy(&self) -> SpecificEnthalpy {
        self.params.liquid_enthalpy + self.params.latent_heat
    }

    /// Specific enthalpy of a mixture with quality `x`.
    #[must_use]
    pub fn enthalpy_at_quality(&self, quality: f64) -> SpecificEnthalpy {
        self.params.liquid_enthalpy + self.params.latent_heat * quality.clamp(0.0, 1.0)
    }

    /// Specific enthalpy of subcooled liquid at `temperature`.
    #[must_use]
    pub fn subcooled_enthalpy(&self, temperature: ThermodynamicTemperature) -> SpecificEnthalpy {
        let subcooling = self.params.saturation_temperature.get::<kelvin>()
            - temperature.get::<kelvin>();
        let cp = self.params.liquid.cp.get::<joule_per_kilogram_kelvin>();
        self.params.liquid_enthalpy - SpecificEnthalpy::new::<joule_per_kilogram>(cp * subcooling)
    }

    fn properties(&self, h: f64) -> Result<WaterProperties, PropertyError> {
        let p = &self.params;
        let t_sat = p.saturation_temperature.get::<kelvin>();
        let h_f = p.liquid_enthalpy.get::<joule_per_kilogram>();
        let h_fg = p.latent_heat.get::<joule_per_kilogram>();
        let h_g = h_f + h_fg;

        let (phase, temperature, bulk) = if h < h_f {
            let cp = p.liquid.cp.get::<joule_per_kilogram_kelvin>();
            (WaterPhase::Subcooled, t_sat - (h_f - h) / cp, p.liquid)
        } else if h > h_g {
            let cp = p.vapor.cp.get::<joule_per_kilogram_kelvin>();
            (WaterPhase::Superheated, t_sat + (h - h_g) / cp, p.vapor)
        } else {
            let quality = UnitInterval::clamped((h - h_f) / h_fg).map_err(|_| {
                PropertyError::Calculation {
                    context: format!("quality undefined at h = {h} J/kg"),
                }
            })?;
            let bulk = mixture(&p.liquid, &p.vapor, quality.into_inner());
            (WaterPhase::Saturated { quality }, t_sat, bulk)
        };

        if temperature <= 0.0 {
            return Err(PropertyError::out_of_domain(format!(
                "enthalpy {h} J/kg implies a non-positive temperature"
            )));
        }

        Ok(WaterProperties {
            phase,
            temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
            density: bulk.density,
            viscosity: bulk.viscosity,
            conductivity: bulk.conductivity,
            cp: bulk.cp,
            surface_tension: p.surface_tension,
            latent_heat: p.latent_heat,
            saturation_temperature: p.saturation_temperature,
            saturated_liquid: p.liquid,
            saturated_vapor: p.vapor,
        })
    }
}

impl WaterPropertyModel for SaturatedWater {
    fn water_properties(
        &self,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<WaterProperties, PropertyError> {
        if StrictlyPositive::check(&pressure.get::<pascal>()).is_err() {
            return Err(PropertyError::out_of_domain(format!(
                "water pressure must be positive, got {} Pa",
                pressure.get::<pascal>()
            )));
        }
        let h = enthalpy.get::<joule_per_kilogram>();
        if !h.is_finite() {
            return Err(PropertyError::InvalidState {
                context: format!("non-finite water enthalpy {h}"),
            });
        }
        self.properties(h)
    }
}

/// Quality-weighted mixture properties with homogeneous density.
fn mixture(liquid: &FilmProperties, vapor: &FilmProperties, x: f64) -> FilmProperties {
    let lerp = |l: f64, v: f64| (1.0 - x) * l + x * v;

    let rho_l = liquid.density.get::<kilogram_per_cubic_meter>();
    let rho_v = vapor.density.get::<kilogram_per_cubic_meter>();

    FilmProperties {
        density: MassDensity::new::<kilogram_per_cubic_meter>(
            1.0 / (x / rho_v + (1.0 - x) / rho_l),
        ),
        viscosity: DynamicViscosity::new::<pascal_second>(lerp(
            liquid.viscosity.get::<pascal_second>(),
            vapor.viscosity.get::<pascal_second>(),
        )),
        conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(lerp(
            liquid.conductivity.get::<watt_per_meter_kelvin>(),
            vapor.conductivity.get::<watt_per_meter_kelvin>(),
        )),
        cp: SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(lerp(
            liquid.cp.get::<joule_per_kilogram_kelvin>(),
            vapor.cp.get::<joule_per_kilogram_kelvin>(),
        )),
    }
}

fn check_film(phase: &'static str, film: &FilmProperties) -> Result<(), SaturatedWaterError> {
    let checks = [
        ("density", film.density.get::<kilogram_per_cubic_meter>()),
        ("viscosity", film.viscosity.get::<pascal_second>()),
        ("conductivity", film.conductivity.get::<watt_per_meter_kelvin>()),
        ("cp", film.cp.get::<joule_per_kilogram_kelvin>()),
    ];
    for (property, value) in checks {
        if StrictlyPositive::check(&value).is_err() {
            return Err(SaturatedWaterError::Film { phase, property });
        }
    }
    Ok(())
}
