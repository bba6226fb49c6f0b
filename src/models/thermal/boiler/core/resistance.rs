//! Series thermal resistances between bulk gas and bulk water.
//!
//! All resistances are per unit axial length, K·m/W:
//!
//! ```text
//! T_gas ─ R_gas ─ T_w,gas ─ R_foul,gas ─ R_wall ─ R_foul,water ─ T_w,water ─ R_water ─ T_water
//! ```
//!
//! `R_gas = 1/((h_conv + h_rad)·P_gas)` and `R_water = 1/(h_water·P_water)`.

use crate::models::thermal::boiler::core::geometry::FixedResistances;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ResistanceNetwork {
    pub(crate) gas_film: f64,
    pub(crate) fixed: FixedResistances,
    pub(crate) water_film: f64,
}

impl ResistanceNetwork {
    pub(crate) fn new(
        gas_coefficient: f64,
        gas_perimeter: f64,
        fixed: &FixedResistances,
        water_coefficient: f64,
        water_perimeter: f64,
    ) -> Self {
        Self {
            gas_film: 1.0 / (gas_coefficient * gas_perimeter),
            fixed: *fixed,
            water_film: 1.0 / (water_coefficient * water_perimeter),
        }
    }

    /// Resistance between the two wall surfaces, including deposits.
    pub(crate) fn through_wall(&self) -> f64 {
        self.fixed.through_wall()
    }

    pub(crate) fn total(&self) -> f64 {
        self.gas_film + self.through_wall() + self.water_film
    }

    /// Overall conductance per unit length `UA′`, W/(m·K).
    pub(crate) fn conductance(&self) -> f64 {
        1.0 / self.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn resistances_add_in_series() {
        let fixed = FixedResistances {
            gas_fouling: 1e-4,
            wall: 2e-5,
            water_fouling: 3e-5,
        };
        let network = ResistanceNetwork::new(50.0, 2.0, &fixed, 5_000.0, 2.5);

        assert_relative_eq!(network.gas_film, 0.01);
        assert_relative_eq!(network.water_film, 8e-5);
        assert_relative_eq!(network.through_wall(), 1.5e-4, epsilon = 1e-18);
        assert_relative_eq!(network.total(), 0.01 + 1.5e-4 + 8e-5, epsilon = 1e-15);
        assert_relative_eq!(network.conductance(), 1.0 / 0.01023, max_relative = 1e-12);
    }
}
