use std::{ops::RangeInclusive, sync::Arc};

use uom::si::{
    area::square_meter,
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{
        Area, DynamicViscosity, Length, MassRate, Pressure, ThermalConductivity,
        ThermodynamicTemperature,
    },
    length::{meter, millimeter},
    mass_rate::kilogram_per_second,
    pressure::{bar, kilopascal},
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{
        Component, Composition, PropertyError, Species, WaterProperties, WaterPropertyModel,
        model::{PerfectFlueGas, SaturatedWater, SaturatedWaterParameters},
    },
    units::SpecificEnthalpy,
};

use super::{
    chain::BoilerStages,
    geometry::{
        Fouling, Nozzle, ReversalChamber, StageGeometry, TubeArrangement, TubeBank, TubeSection,
        TubeWall, WaterSide,
    },
    state::GasState,
};

pub(crate) fn gas_model() -> PerfectFlueGas {
    PerfectFlueGas::natural_gas_products()
}

pub(crate) fn water_model() -> SaturatedWater {
    SaturatedWater::new(SaturatedWaterParameters::ten_bar()).expect("ten bar data is valid")
}

/// The 10 bar water model, but with a NaN viscosity outside an enthalpy window.
pub(crate) struct ViscosityWindow {
    inner: SaturatedWater,
    enthalpy: RangeInclusive<f64>,
}

impl ViscosityWindow {
    /// Finite viscosity only for enthalpies in `[low, high]` J/kg.
    pub(crate) fn between(low: f64, high: f64) -> Self {
        Self {
            inner: water_model(),
            enthalpy: low..=high,
        }
    }

    /// NaN viscosity at every state.
    pub(crate) fn nowhere() -> Self {
        Self::between(1.0, 0.0)
    }
}

impl WaterPropertyModel for ViscosityWindow {
    fn water_properties(
        &self,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<WaterProperties, PropertyError> {
        let mut props = self.inner.water_properties(pressure, enthalpy)?;
        if !self.enthalpy.contains(&enthalpy.get::<joule_per_kilogram>()) {
            props.viscosity = DynamicViscosity::new::<pascal_second>(f64::NAN);
        }
        Ok(props)
    }
}

pub(crate) fn water_pressure() -> Pressure {
    Pressure::new::<bar>(10.0)
}

/// Natural gas combustion products with radiating CO₂ and H₂O.
pub(crate) fn flue_gas() -> Arc<Composition> {
    let composition = Composition::new(vec![
        Component::radiating(Species::CarbonDioxide, 0.09, 0.4),
        Component::radiating(Species::Water, 0.18, 0.6),
        Component::transparent(Species::Nitrogen, 0.71),
        Component::transparent(Species::Oxygen, 0.02),
    ])
    .expect("mole fractions sum to one");
    Arc::new(composition)
}

/// Air, which does not radiate.
pub(crate) fn transparent_gas() -> Arc<Composition> {
    let composition = Composition::new(vec![
        Component::transparent(Species::Nitrogen, 0.79),
        Component::transparent(Species::Oxygen, 0.21),
    ])
    .expect("mole fractions sum to one");
    Arc::new(composition)
}

pub(crate) fn gas_inlet(temperature: f64, composition: Arc<Composition>) -> GasState {
    GasState {
        temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
        pressure: Pressure::new::<kilopascal>(110.0),
        mass_flow: MassRate::new::<kilogram_per_second>(1.2),
        composition,
    }
}

fn water_side() -> WaterSide {
    WaterSide {
        flow_area: Area::new::<square_meter>(0.5),
        hydraulic_diameter: Length::new::<meter>(0.1),
    }
}

fn steel(thickness_mm: f64) -> TubeWall {
    TubeWall {
        thickness: Length::new::<millimeter>(thickness_mm),
        conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(45.0),
    }
}

fn tubes(inner_diameter_mm: f64, length: f64, tube_count: u32) -> TubeSection {
    TubeSection {
        inner_diameter: Length::new::<millimeter>(inner_diameter_mm),
        length: Length::new::<meter>(length),
        tube_count,
        wall: steel(3.5),
        roughness: Length::new::<millimeter>(0.045),
        fouling: Fouling::clean(),
        water: water_side(),
    }
}

/// Furnace tube.
pub(crate) fn first_pass() -> StageGeometry {
    StageGeometry::TubePass(TubeSection {
        wall: steel(15.0),
        ..tubes(600.0, 4.0, 1)
    })
}

pub(crate) fn second_pass() -> StageGeometry {
    StageGeometry::TubePass(tubes(60.0, 4.0, 40))
}

pub(crate) fn third_pass() -> StageGeometry {
    StageGeometry::TubePass(tubes(50.0, 4.0, 50))
}

pub(crate) fn economiser() -> StageGeometry {
    StageGeometry::Economiser(tubes(40.0, 2.0, 60))
}

pub(crate) fn reversal_chamber() -> StageGeometry {
    StageGeometry::ReversalChamber(ReversalChamber {
        inner_diameter: Length::new::<meter>(1.2),
        length: Length::new::<meter>(0.8),
        curvature_radius: Length::new::<meter>(0.6),
        wall: steel(15.0),
        roughness: Length::new::<millimeter>(0.045),
        fouling: Fouling::clean(),
        water: water_side(),
        inlet: Nozzle {
            diameter: Length::new::<meter>(0.6),
            loss_coefficient: 0.5,
        },
        outlet: Nozzle {
            diameter: Length::new::<meter>(0.5),
            loss_coefficient: 1.0,
        },
    })
}

pub(crate) fn tube_bank() -> StageGeometry {
    StageGeometry::TubeBank(TubeBank {
        outer_diameter: Length::new::<millimeter>(50.0),
        transverse_pitch: Length::new::<millimeter>(100.0),
        longitudinal_pitch: Length::new::<millimeter>(100.0),
        rows: 10,
        tubes_per_row: 8,
        tube_length: Length::new::<meter>(1.5),
        arrangement: TubeArrangement::Inline,
        wall: steel(3.0),
        roughness: Length::new::<millimeter>(0.045),
        fouling: Fouling::clean(),
        water: water_side(),
    })
}

/// A three-pass boiler with an economiser.
pub(crate) fn stages() -> BoilerStages {
    BoilerStages {
        pass1: first_pass(),
        reversal1: reversal_chamber(),
        pass2: second_pass(),
        reversal2: reversal_chamber(),
        pass3: third_pass(),
        economiser: economiser(),
    }
}
