use thiserror::Error;
use uom::si::{
    f64::{MolarMass, ReciprocalLength},
    molar_mass::gram_per_mole,
    reciprocal_length::reciprocal_meter,
};

use crate::support::constraint::{Constraint, NonNegative, UnitInterval};

/// Tolerance on the sum of mole fractions.
const MOLE_FRACTION_SUM_TOL: f64 = 1e-6;

/// Flue gas species tracked by a [`Composition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Species {
    CarbonDioxide,
    Water,
    Nitrogen,
    Oxygen,
    Argon,
    CarbonMonoxide,
    SulfurDioxide,
}

impl Species {
    /// Molar mass of the species.
    #[must_use]
    pub fn molar_mass(self) -> MolarMass {
        let grams_per_mole = match self {
            Species::CarbonDioxide => 44.0095,
            Species::Water => 18.01528,
            Species::Nitrogen => 28.0134,
            Species::Oxygen => 31.9988,
            Species::Argon => 39.948,
            Species::CarbonMonoxide => 28.0101,
            Species::SulfurDioxide => 64.066,
        };
        MolarMass::new::<gram_per_mole>(grams_per_mole)
    }
}

/// One species of a gas mixture with its radiative absorption coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub species: Species,
    pub mole_fraction: f64,
    pub absorption_coefficient: ReciprocalLength,
}

impl Component {
    /// Creates a component that does not participate in radiation.
    #[must_use]
    pub fn transparent(species: Species, mole_fraction: f64) -> Self {
        Self {
            species,
            mole_fraction,
            absorption_coefficient: ReciprocalLength::new::<reciprocal_meter>(0.0),
        }
    }

    /// Creates a radiating component with absorption coefficient `kappa` in 1/m.
    #[must_use]
    pub fn radiating(species: Species, mole_fraction: f64, kappa: f64) -> Self {
        Self {
            species,
            mole_fraction,
            absorption_coefficient: ReciprocalLength::new::<reciprocal_meter>(kappa),
        }
    }
}

/// Errors that can occur when building a [`Composition`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("composition has no components")]
    Empty,

    #[error("mole fraction of {species:?} must be in [0, 1]: {value}")]
    MoleFraction { species: Species, value: f64 },

    #[error("absorption coefficient of {species:?} must be non-negative")]
    AbsorptionCoefficient { species: Species },

    #[error("mole fractions must sum to 1, got {sum}")]
    Sum { sum: f64 },
}

/// Validated gas mixture: mole fractions in `[0, 1]` summing to 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Component>", into = "Vec<Component>")
)]
pub struct Composition {
    components: Vec<Component>,
}

impl Composition {
    /// Builds a composition from its components.
    ///
    /// # Errors
    ///
    /// Returns a [`CompositionError`] if the list is empty, a mole fraction is
    /// outside `[0, 1]`, an absorption coefficient is negative, or the mole
    /// fractions do not sum to 1 within `1e-6`.
    pub fn new(components: Vec<Component>) -> Result<Self, CompositionError> {
        if components.is_empty() {
            return Err(CompositionError::Empty);
        }

        for component in &components {
            if UnitInterval::check(&component.mole_fraction).is_err() {
                return Err(CompositionError::MoleFraction {
                    species: component.species,
                    value: component.mole_fraction,
                });
            }
            if NonNegative::check(&component.absorption_coefficient.get::<reciprocal_meter>())
                .is_err()
            {
                return Err(CompositionError::AbsorptionCoefficient {
                    species: component.species,
                });
            }
        }

        let sum: f64 = components.iter().map(|c| c.mole_fraction).sum();
        if (sum - 1.0).abs() > MOLE_FRACTION_SUM_TOL {
            return Err(CompositionError::Sum { sum });
        }

        Ok(Self { components })
    }

    /// Returns the components in insertion order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Mole-fraction weighted molar mass of the mixture.
    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        self.components
            .iter()
            .map(|c| c.species.molar_mass() * c.mole_fraction)
            .fold(MolarMass::new::<gram_per_mole>(0.0), |acc, m| acc + m)
    }

    /// Mixture absorption coefficient `κ = Σ xᵢ·κᵢ`.
    #[must_use]
    pub fn absorption_coefficient(&self) -> ReciprocalLength {
        ReciprocalLength::new::<reciprocal_meter>(
            self.components
                .iter()
                .map(|c| c.mole_fraction * c.absorption_coefficient.get::<reciprocal_meter>())
                .sum(),
        )
    }
}

impl TryFrom<Vec<Component>> for Composition {
    type Error = CompositionError;

    fn try_from(components: Vec<Component>) -> Result<Self, Self::Error> {
        Self::new(components)
    }
}

impl From<Composition> for Vec<Component> {
    fn from(composition: Composition) -> Self {
        composition.components
    }
}
