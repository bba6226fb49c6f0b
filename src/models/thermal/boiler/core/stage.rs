//! Stage identity and geometry reduced to SI values.

use std::fmt;

use uom::si::{area::square_meter, length::meter};

use super::{
    correlations::{gas::GasNusselt, water::WaterChannel},
    error::SolveError,
    geometry::{FixedResistances, Nozzle, StageGeometry, StageKind},
};

/// Position of a stage in the gas path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageId {
    Pass1,
    Reversal1,
    Pass2,
    Reversal2,
    Pass3,
    Economiser,
}

impl StageId {
    /// All stages in gas-flow order.
    pub const ALL: [StageId; 6] = [
        StageId::Pass1,
        StageId::Reversal1,
        StageId::Pass2,
        StageId::Reversal2,
        StageId::Pass3,
        StageId::Economiser,
    ];
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageId::Pass1 => "pass 1",
            StageId::Reversal1 => "reversal chamber 1",
            StageId::Pass2 => "pass 2",
            StageId::Reversal2 => "reversal chamber 2",
            StageId::Pass3 => "pass 3",
            StageId::Economiser => "economiser",
        };
        f.write_str(name)
    }
}

/// Inlet and outlet nozzles of a reversal chamber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Nozzles {
    pub(crate) inlet: Nozzle,
    pub(crate) outlet: Nozzle,
}

/// A validated stage with every flow-independent quantity in SI units.
///
/// Resolved once per boiler so that no geometry dispatch happens inside the
/// right-hand side of the stage ODE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResolvedStage {
    pub(crate) id: StageId,
    pub(crate) kind: StageKind,
    pub(crate) length: f64,
    pub(crate) flow_area: f64,
    pub(crate) hydraulic_diameter: f64,
    /// Length in the gas Reynolds and Nusselt numbers.
    pub(crate) characteristic_length: f64,
    pub(crate) relative_roughness: f64,
    pub(crate) gas_perimeter: f64,
    pub(crate) water_perimeter: f64,
    pub(crate) path_length: f64,
    pub(crate) fixed: FixedResistances,
    pub(crate) nusselt: GasNusselt,
    pub(crate) water_flow_area: f64,
    pub(crate) water_hydraulic_diameter: f64,
    pub(crate) nozzles: Option<Nozzles>,
}

impl ResolvedStage {
    /// Validates `geometry` and resolves it for stage `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidGeometry`] if the geometry fails validation.
    pub(crate) fn new(id: StageId, geometry: &StageGeometry) -> Result<Self, SolveError> {
        geometry
            .validate()
            .map_err(|source| SolveError::InvalidGeometry { stage: id, source })?;

        let hydraulic_diameter = geometry.hydraulic_diameter_m();
        let characteristic_length = match geometry {
            StageGeometry::TubeBank(_) => geometry.gas_side_diameter_m(),
            _ => hydraulic_diameter,
        };
        let nozzles = match geometry {
            StageGeometry::ReversalChamber(c) => Some(Nozzles {
                inlet: c.inlet,
                outlet: c.outlet,
            }),
            _ => None,
        };
        let water = geometry.water();
        let gas_perimeter = geometry.heat_transfer_perimeter().get::<meter>();

        Ok(Self {
            id,
            kind: geometry.kind(),
            length: geometry.length().get::<meter>(),
            flow_area: geometry.flow_area_m2(),
            hydraulic_diameter,
            characteristic_length,
            relative_roughness: geometry.roughness().get::<meter>() / hydraulic_diameter,
            gas_perimeter,
            water_perimeter: gas_perimeter * geometry.water_side_diameter_m()
                / geometry.gas_side_diameter_m(),
            path_length: geometry.path_length().get::<meter>(),
            fixed: geometry.fixed_resistances(),
            nusselt: GasNusselt::for_geometry(geometry),
            water_flow_area: water.flow_area.get::<square_meter>(),
            water_hydraulic_diameter: water.hydraulic_diameter.get::<meter>(),
            nozzles,
        })
    }

    /// Water passage seen by the water-side correlations.
    pub(crate) fn water_channel(&self, water_mass_flow: f64) -> WaterChannel {
        WaterChannel {
            mass_flux: water_mass_flow / self.water_flow_area,
            hydraulic_diameter: self.water_hydraulic_diameter,
            heated_length: self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use crate::models::thermal::boiler::core::{
        geometry::GeometryError,
        test_support::{first_pass, reversal_chamber, tube_bank},
    };

    #[test]
    fn resolves_tube_pass() {
        let geometry = first_pass();
        let stage = ResolvedStage::new(StageId::Pass1, &geometry).unwrap();

        assert_eq!(stage.kind, StageKind::TubePass);
        assert!(stage.nozzles.is_none());
        assert_relative_eq!(stage.characteristic_length, stage.hydraulic_diameter);
        assert_relative_eq!(
            stage.water_perimeter / stage.gas_perimeter,
            geometry.water_side_diameter_m() / geometry.gas_side_diameter_m()
        );
    }

    #[test]
    fn chamber_keeps_its_nozzles() {
        let stage = ResolvedStage::new(StageId::Reversal1, &reversal_chamber()).unwrap();
        let nozzles = stage.nozzles.expect("chamber has nozzles");
        assert!(nozzles.inlet.loss_coefficient > 0.0);
        assert!(matches!(stage.nusselt, GasNusselt::Curved { .. }));
    }

    #[test]
    fn bank_uses_tube_diameter_for_film() {
        let geometry = tube_bank();
        let stage = ResolvedStage::new(StageId::Pass3, &geometry).unwrap();
        assert_relative_eq!(stage.characteristic_length, geometry.gas_side_diameter_m());
        assert_relative_eq!(
            stage.gas_perimeter,
            PI * geometry.gas_side_diameter_m() * geometry.tube_density()
        );
    }

    #[test]
    fn invalid_geometry_names_the_stage() {
        let StageGeometry::TubePass(mut section) = first_pass() else {
            panic!("expected a tube pass");
        };
        section.tube_count = 0;

        match ResolvedStage::new(StageId::Pass2, &StageGeometry::TubePass(section)) {
            Err(SolveError::InvalidGeometry { stage, source }) => {
                assert_eq!(stage, StageId::Pass2);
                assert_eq!(
                    source,
                    GeometryError::Count {
                        field: "tube count"
                    }
                );
            }
            other => panic!("Expected InvalidGeometry, got: {other:?}"),
        }
    }
}
