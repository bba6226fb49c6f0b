//! Axial profile recorded during a march.

use uom::si::f64::{HeatFluxDensity, Length, ThermodynamicTemperature};

use crate::support::units::LinearHeatRate;

use super::{
    stage::StageId,
    state::{GasState, WaterState},
};

/// Solved wall at one axial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallPoint {
    pub gas_side_temperature: ThermodynamicTemperature,
    pub water_side_temperature: ThermodynamicTemperature,
    /// Heat rate per unit axial length, positive from gas to water.
    pub heat_rate: LinearHeatRate,
    /// Heat flux on the gas-side surface.
    pub heat_flux: HeatFluxDensity,
}

/// One point of the axial profile.
///
/// Samples written by a nozzle step carry no wall solution and share the
/// position of the sample before them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSample {
    pub position: Length,
    pub stage: StageId,
    pub gas: GasState,
    pub water: WaterState,
    pub wall: Option<WallPoint>,
}

/// Append-only axial profile ordered by non-decreasing position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    samples: Vec<ProfileSample>,
}

impl Profile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, sample: ProfileSample) {
        debug_assert!(
            self.samples
                .last()
                .is_none_or(|last| last.position <= sample.position),
            "profile positions must not decrease"
        );
        self.samples.push(sample);
    }

    #[must_use]
    pub fn samples(&self) -> &[ProfileSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProfileSample> {
        self.samples.iter()
    }

    /// Samples belonging to one stage, in order.
    pub fn stage(&self, id: StageId) -> impl Iterator<Item = &ProfileSample> {
        self.samples.iter().filter(move |s| s.stage == id)
    }

    #[must_use]
    pub fn last(&self) -> Option<&ProfileSample> {
        self.samples.last()
    }
}

impl<'a> IntoIterator for &'a Profile {
    type Item = &'a ProfileSample;
    type IntoIter = std::slice::Iter<'a, ProfileSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
