//! Ideal gas equation of state, `p = ρ·R·T`, for flue gas mixtures.

use uom::si::{
    f64::{MassDensity, MolarMass, Pressure, ThermodynamicTemperature},
    molar_mass::kilogram_per_mole,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Universal gas constant, J/(mol·K).
const UNIVERSAL_GAS_CONSTANT: f64 = 8.314_462_618;

/// Specific gas constant `R = Rᵤ / M` of a mixture with molar mass `M`.
#[must_use]
pub(crate) fn gas_constant(molar_mass: MolarMass) -> SpecificGasConstant {
    SpecificGasConstant::new::<joule_per_kilogram_kelvin>(
        UNIVERSAL_GAS_CONSTANT / molar_mass.get::<kilogram_per_mole>(),
    )
}

/// Computes density using the ideal gas equation of state.
#[must_use]
pub(crate) fn density(
    temperature: ThermodynamicTemperature,
    pressure: Pressure,
    gas_constant: SpecificGasConstant,
) -> MassDensity {
    pressure / (gas_constant * temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        mass_density::kilogram_per_cubic_meter, molar_mass::gram_per_mole, pressure::pascal,
        thermodynamic_temperature::kelvin,
    };

    #[test]
    fn air_gas_constant() {
        let r = gas_constant(MolarMass::new::<gram_per_mole>(28.965));
        assert_relative_eq!(r.get::<joule_per_kilogram_kelvin>(), 287.05, epsilon = 0.01);
    }

    #[test]
    fn hot_flue_gas_density() {
        let r = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(290.0);
        let rho = density(
            ThermodynamicTemperature::new::<kelvin>(1_000.0),
            Pressure::new::<pascal>(101_500.0),
            r,
        );
        assert_relative_eq!(
            rho.get::<kilogram_per_cubic_meter>(),
            101_500.0 / (290.0 * 1_000.0),
            epsilon = 1e-12
        );
    }
}
