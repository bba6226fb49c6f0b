//! Stage geometry.
//!
//! Every stage is described per unit of axial length: the solver integrates
//! along the gas flow path, so areas, perimeters and resistances are all
//! expressed per metre of that path.
//!
//! Tubes are characterised by their *tube density* `Λ`, the metres of tube per
//! metre of axial path. A pass of `N` parallel tubes has `Λ = N`; a crossflow
//! bank with `n` tubes per row, tube length `L_t` and longitudinal pitch `S_L`
//! has `Λ = n·L_t/S_L`.

use std::f64::consts::PI;

use thiserror::Error;
use uom::si::{
    area::square_meter,
    f64::{Area, Length, ThermalConductivity},
    length::meter,
    thermal_conductivity::watt_per_meter_kelvin,
};

use crate::support::constraint::{Constraint, ConstraintError, NonNegative, StrictlyPositive};

/// Errors found while validating a [`StageGeometry`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{field} is invalid")]
    Constraint {
        field: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("{field} must be at least 1")]
    Count { field: &'static str },

    #[error("tube pitch {pitch:?} must exceed the tube diameter {diameter:?}")]
    Pitch { pitch: Length, diameter: Length },
}

/// Tube or shell wall separating gas and water.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TubeWall {
    pub thickness: Length,
    pub conductivity: ThermalConductivity,
}

/// A deposit layer on one side of the wall.
///
/// Its resistance per unit surface area is `thickness / conductivity`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FoulingLayer {
    pub thickness: Length,
    pub conductivity: ThermalConductivity,
}

impl FoulingLayer {
    /// A surface without deposits.
    #[must_use]
    pub fn clean() -> Self {
        Self {
            thickness: Length::new::<meter>(0.0),
            conductivity: ThermalConductivity::new::<watt_per_meter_kelvin>(1.0),
        }
    }

    /// Resistance per unit area, m²·K/W.
    fn area_resistance(&self) -> f64 {
        self.thickness.get::<meter>() / self.conductivity.get::<watt_per_meter_kelvin>()
    }
}

/// Deposits on the gas-side (inner) and water-side (outer) surfaces.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fouling {
    pub gas_side: FoulingLayer,
    pub water_side: FoulingLayer,
}

impl Fouling {
    #[must_use]
    pub fn clean() -> Self {
        Self {
            gas_side: FoulingLayer::clean(),
            water_side: FoulingLayer::clean(),
        }
    }
}

/// Water-side flow passage alongside a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterSide {
    pub flow_area: Area,
    pub hydraulic_diameter: Length,
}

/// Reversal chamber inlet or outlet.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nozzle {
    pub diameter: Length,
    /// Loss coefficient `K` applied to the nozzle dynamic pressure.
    pub loss_coefficient: f64,
}

impl Nozzle {
    #[must_use]
    pub fn area(&self) -> Area {
        self.diameter * self.diameter * (PI / 4.0)
    }
}

/// Gas flowing inside parallel tubes (tube passes and the economiser).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TubeSection {
    pub inner_diameter: Length,
    pub length: Length,
    pub tube_count: u32,
    pub wall: TubeWall,
    pub roughness: Length,
    pub fouling: Fouling,
    pub water: WaterSide,
}

/// Gas turning through a cylindrical chamber between passes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReversalChamber {
    pub inner_diameter: Length,
    pub length: Length,
    pub curvature_radius: Length,
    pub wall: TubeWall,
    pub roughness: Length,
    pub fouling: Fouling,
    pub water: WaterSide,
    /// Contraction into the chamber.
    pub inlet: Nozzle,
    /// Expansion out of the chamber.
    pub outlet: Nozzle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TubeArrangement {
    Inline,
    Staggered,
}

/// Gas in crossflow over a bank of water tubes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TubeBank {
    pub outer_diameter: Length,
    pub transverse_pitch: Length,
    pub longitudinal_pitch: Length,
    /// Rows along the gas flow direction.
    pub rows: u32,
    pub tubes_per_row: u32,
    pub tube_length: Length,
    pub arrangement: TubeArrangement,
    pub wall: TubeWall,
    pub roughness: Length,
    pub fouling: Fouling,
    pub water: WaterSide,
}

/// Geometry of one boiler stage.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageGeometry {
    TubePass(TubeSection),
    ReversalChamber(ReversalChamber),
    TubeBank(TubeBank),
    Economiser(TubeSection),
}

/// Discriminant of [`StageGeometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageKind {
    TubePass,
    ReversalChamber,
    TubeBank,
    Economiser,
}

impl StageGeometry {
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            StageGeometry::TubePass(_) => StageKind::TubePass,
            StageGeometry::ReversalChamber(_) => StageKind::ReversalChamber,
            StageGeometry::TubeBank(_) => StageKind::TubeBank,
            StageGeometry::Economiser(_) => StageKind::Economiser,
        }
    }

    /// Axial length of the gas path through the stage.
    #[must_use]
    pub fn length(&self) -> Length {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => s.length,
            StageGeometry::ReversalChamber(c) => c.length,
            StageGeometry::TubeBank(b) => b.longitudinal_pitch * f64::from(b.rows),
        }
    }

    /// Gas flow area. For tube banks this is the minimum (gap) area.
    #[must_use]
    pub fn flow_area(&self) -> Area {
        Area::new::<square_meter>(self.flow_area_m2())
    }

    /// Hydraulic diameter of the gas passage.
    #[must_use]
    pub fn hydraulic_diameter(&self) -> Length {
        Length::new::<meter>(self.hydraulic_diameter_m())
    }

    /// Gas-side heat-transfer perimeter (surface area per axial length).
    #[must_use]
    pub fn heat_transfer_perimeter(&self) -> Length {
        Length::new::<meter>(PI * self.gas_side_diameter_m() * self.tube_density())
    }

    /// Mean beam length for gas radiation, `3.6·V/A`.
    #[must_use]
    pub fn path_length(&self) -> Length {
        Length::new::<meter>(self.path_length_m())
    }

    pub(crate) fn roughness(&self) -> Length {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => s.roughness,
            StageGeometry::ReversalChamber(c) => c.roughness,
            StageGeometry::TubeBank(b) => b.roughness,
        }
    }

    pub(crate) fn wall(&self) -> &TubeWall {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => &s.wall,
            StageGeometry::ReversalChamber(c) => &c.wall,
            StageGeometry::TubeBank(b) => &b.wall,
        }
    }

    pub(crate) fn fouling(&self) -> &Fouling {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => &s.fouling,
            StageGeometry::ReversalChamber(c) => &c.fouling,
            StageGeometry::TubeBank(b) => &b.fouling,
        }
    }

    pub(crate) fn water(&self) -> &WaterSide {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => &s.water,
            StageGeometry::ReversalChamber(c) => &c.water,
            StageGeometry::TubeBank(b) => &b.water,
        }
    }

    /// Metres of tube per metre of axial path.
    pub(crate) fn tube_density(&self) -> f64 {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => f64::from(s.tube_count),
            StageGeometry::ReversalChamber(_) => 1.0,
            StageGeometry::TubeBank(b) => {
                f64::from(b.tubes_per_row) * b.tube_length.get::<meter>()
                    / b.longitudinal_pitch.get::<meter>()
            }
        }
    }

    /// Diameter of the wall surface wetted by gas.
    pub(crate) fn gas_side_diameter_m(&self) -> f64 {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => {
                s.inner_diameter.get::<meter>()
            }
            StageGeometry::ReversalChamber(c) => c.inner_diameter.get::<meter>(),
            StageGeometry::TubeBank(b) => b.outer_diameter.get::<meter>(),
        }
    }

    /// Diameter of the wall surface wetted by water.
    pub(crate) fn water_side_diameter_m(&self) -> f64 {
        let t = self.wall().thickness.get::<meter>();
        match self {
            StageGeometry::TubeBank(_) => self.gas_side_diameter_m() - 2.0 * t,
            _ => self.gas_side_diameter_m() + 2.0 * t,
        }
    }

    pub(crate) fn flow_area_m2(&self) -> f64 {
        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => {
                let d = s.inner_diameter.get::<meter>();
                f64::from(s.tube_count) * PI * d * d / 4.0
            }
            StageGeometry::ReversalChamber(c) => {
                let d = c.inner_diameter.get::<meter>();
                PI * d * d / 4.0
            }
            StageGeometry::TubeBank(b) => {
                let d = b.outer_diameter.get::<meter>();
                let s_t = b.transverse_pitch.get::<meter>();
                let s_l = b.longitudinal_pitch.get::<meter>();
                let width_per_tube = match b.arrangement {
                    TubeArrangement::Inline => s_t - d,
                    TubeArrangement::Staggered => {
                        let s_d = (s_l * s_l + 0.25 * s_t * s_t).sqrt();
                        (s_t - d).min(2.0 * (s_d - d))
                    }
                };
                width_per_tube * f64::from(b.tubes_per_row) * b.tube_length.get::<meter>()
            }
        }
    }

    pub(crate) fn hydraulic_diameter_m(&self) -> f64 {
        match self {
            StageGeometry::TubeBank(b) => {
                // Volumetric hydraulic diameter of the bank.
                let d = b.outer_diameter.get::<meter>();
                let cell = b.transverse_pitch.get::<meter>() * b.longitudinal_pitch.get::<meter>();
                4.0 * (cell - PI * d * d / 4.0) / (PI * d)
            }
            _ => self.gas_side_diameter_m(),
        }
    }

    fn path_length_m(&self) -> f64 {
        let gas_volume_per_length = match self {
            StageGeometry::TubeBank(b) => {
                let d = b.outer_diameter.get::<meter>();
                let frontal = f64::from(b.tubes_per_row)
                    * b.transverse_pitch.get::<meter>()
                    * b.tube_length.get::<meter>();
                frontal - self.tube_density() * PI * d * d / 4.0
            }
            _ => self.flow_area_m2(),
        };
        3.6 * gas_volume_per_length / self.heat_transfer_perimeter().get::<meter>()
    }

    /// Validates dimensions, counts and pitches.
    ///
    /// # Errors
    ///
    /// Returns the first [`GeometryError`] found.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let wall = self.wall();
        positive("wall thickness", wall.thickness.get::<meter>())?;
        positive(
            "wall conductivity",
            wall.conductivity.get::<watt_per_meter_kelvin>(),
        )?;
        non_negative("roughness", self.roughness().get::<meter>())?;

        let fouling = self.fouling();
        for (field, layer) in [
            ("gas-side fouling", &fouling.gas_side),
            ("water-side fouling", &fouling.water_side),
        ] {
            non_negative(field, layer.thickness.get::<meter>())?;
            positive(field, layer.conductivity.get::<watt_per_meter_kelvin>())?;
        }

        let water = self.water();
        positive(
            "water flow area",
            water.flow_area.get::<square_meter>(),
        )?;
        positive(
            "water hydraulic diameter",
            water.hydraulic_diameter.get::<meter>(),
        )?;

        match self {
            StageGeometry::TubePass(s) | StageGeometry::Economiser(s) => {
                positive("inner diameter", s.inner_diameter.get::<meter>())?;
                positive("length", s.length.get::<meter>())?;
                count("tube count", s.tube_count)?;
            }
            StageGeometry::ReversalChamber(c) => {
                positive("inner diameter", c.inner_diameter.get::<meter>())?;
                positive("length", c.length.get::<meter>())?;
                positive("curvature radius", c.curvature_radius.get::<meter>())?;
                for (field, nozzle) in [("inlet nozzle", &c.inlet), ("outlet nozzle", &c.outlet)] {
                    positive(field, nozzle.diameter.get::<meter>())?;
                    non_negative(field, nozzle.loss_coefficient)?;
                }
            }
            StageGeometry::TubeBank(b) => {
                positive("outer diameter", b.outer_diameter.get::<meter>())?;
                positive("tube length", b.tube_length.get::<meter>())?;
                count("rows", b.rows)?;
                count("tubes per row", b.tubes_per_row)?;
                if b.transverse_pitch <= b.outer_diameter {
                    return Err(GeometryError::Pitch {
                        pitch: b.transverse_pitch,
                        diameter: b.outer_diameter,
                    });
                }
                positive("longitudinal pitch", b.longitudinal_pitch.get::<meter>())?;
                positive("water-side diameter", self.water_side_diameter_m())?;
                positive("gap flow area", self.flow_area_m2())?;
            }
        }

        Ok(())
    }

    /// Series resistances that do not depend on the flow, K·m/W.
    pub(crate) fn fixed_resistances(&self) -> FixedResistances {
        let d_gas = self.gas_side_diameter_m();
        let d_water = self.water_side_diameter_m();
        let (r_in, r_out) = if d_gas < d_water {
            (d_gas, d_water)
        } else {
            (d_water, d_gas)
        };
        let k = self.wall().conductivity.get::<watt_per_meter_kelvin>();
        let lambda = self.tube_density();

        let gas_perimeter = PI * d_gas * lambda;
        let water_perimeter = PI * d_water * lambda;
        let fouling = self.fouling();

        FixedResistances {
            gas_fouling: fouling.gas_side.area_resistance() / gas_perimeter,
            wall: (r_out / r_in).ln() / (2.0 * PI * k * lambda),
            water_fouling: fouling.water_side.area_resistance() / water_perimeter,
        }
    }
}

/// Flow-independent part of the resistance network, per unit axial length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FixedResistances {
    pub(crate) gas_fouling: f64,
    pub(crate) wall: f64,
    pub(crate) water_fouling: f64,
}

impl FixedResistances {
    /// Resistance between the two wall surfaces, including deposits.
    pub(crate) fn through_wall(&self) -> f64 {
        self.gas_fouling + self.wall + self.water_fouling
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), GeometryError> {
    StrictlyPositive::check(&value).map_err(|source| GeometryError::Constraint { field, source })
}

fn non_negative(field: &'static str, value: f64) -> Result<(), GeometryError> {
    NonNegative::check(&value).map_err(|source| GeometryError::Constraint { field, source })
}

fn count(field: &'static str, value: u32) -> Result<(), GeometryError> {
    if value == 0 {
        return Err(GeometryError::Count { field });
    }
    Ok(())
}
