use uom::{
    si::{
        ISQ, Quantity, SI,
        f64::{Force, Length, Power},
        force::newton,
        length::meter,
        power::watt,
    },
    typenum::{N1, N2, N3, P1, P2, Z0},
};

/// Specific gas constant, J/kg·K in SI.
pub type SpecificGasConstant = Quantity<ISQ<P2, Z0, N2, Z0, N1, Z0, Z0>, SI<f64>, f64>;

/// Specific enthalpy, J/kg in SI.
pub type SpecificEnthalpy = Quantity<ISQ<P2, Z0, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Heat transfer rate per unit axial length, W/m in SI.
pub type LinearHeatRate = Quantity<ISQ<P1, P1, N3, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Surface tension, N/m in SI.
pub type SurfaceTension = Quantity<ISQ<Z0, P1, N2, Z0, Z0, Z0, Z0>, SI<f64>, f64>;

/// Creates a [`LinearHeatRate`] from a value in W/m.
#[must_use]
pub fn linear_heat_rate(watts_per_meter: f64) -> LinearHeatRate {
    Power::new::<watt>(watts_per_meter) / Length::new::<meter>(1.0)
}

/// Creates a [`SurfaceTension`] from a value in N/m.
#[must_use]
pub fn surface_tension(newtons_per_meter: f64) -> SurfaceTension {
    Force::new::<newton>(newtons_per_meter) / Length::new::<meter>(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::length::millimeter;

    #[test]
    fn linear_heat_rate_times_length_is_power() {
        let q = linear_heat_rate(2_500.0);
        let power: Power = q * Length::new::<millimeter>(400.0);
        assert_relative_eq!(power.get::<watt>(), 1_000.0);
        assert_relative_eq!(q.value, 2_500.0);
    }

    #[test]
    fn surface_tension_in_base_units() {
        assert_relative_eq!(surface_tension(0.042).value, 0.042);
    }
}
