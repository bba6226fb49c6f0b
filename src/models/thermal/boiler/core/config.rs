use twine_solvers::equation::bisection;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{Length, TemperatureInterval},
    length::{meter, micrometer},
    temperature_interval::kelvin as delta_kelvin,
};

use crate::support::units::{LinearHeatRate, SpecificEnthalpy, linear_heat_rate};

use super::correlations::friction::FrictionModel;

/// Friction factor settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrictionConfig {
    pub model: FrictionModel,

    /// Tolerance on the Colebrook residual `1/√f + 2·log10(…)`.
    pub tolerance: f64,

    /// Maximum Newton iterations for Colebrook.
    pub max_iters: usize,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            model: FrictionModel::Colebrook,
            tolerance: 1e-6,
            max_iters: 50,
        }
    }
}

/// Wall-temperature equilibrium settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WallConfig {
    /// Maximum bisection iterations.
    pub max_iters: usize,

    /// Absolute tolerance on the gas-side wall temperature.
    pub temperature_tol: TemperatureInterval,

    /// Tolerance on the flux mismatch (gas-side minus water-side heat rate).
    pub heat_rate_tol: LinearHeatRate,

    /// Sub-intervals scanned when the full bracket shows no sign change.
    pub scan_intervals: usize,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            temperature_tol: TemperatureInterval::new::<delta_kelvin>(1e-9),
            heat_rate_tol: linear_heat_rate(1e-6),
            scan_intervals: 16,
        }
    }
}

impl WallConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(crate) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.temperature_tol.get::<delta_kelvin>(),
            x_rel_tol: 0.0,
            residual_tol: self.heat_rate_tol.value,
        }
    }
}

/// Adaptive Runge–Kutta settings for the stage ODE.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegratorConfig {
    pub relative_tol: f64,

    /// Absolute tolerance applied to every state component in SI units.
    pub absolute_tol: f64,

    /// First trial step. Defaults to 1% of the stage length.
    pub initial_step: Option<Length>,

    /// Smallest step allowed before the integration is abandoned.
    pub min_step: Length,

    /// Accepted plus rejected steps allowed per stage.
    pub max_steps: usize,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            relative_tol: 1e-6,
            absolute_tol: 1e-6,
            initial_step: None,
            min_step: Length::new::<micrometer>(1e-3),
            max_steps: 20_000,
        }
    }
}

impl IntegratorConfig {
    pub(crate) fn initial_step_m(&self, span: f64) -> f64 {
        self.initial_step
            .map_or(0.01 * span, |step| step.get::<meter>())
    }
}

/// Outer shooting iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShootingConfig {
    /// Tolerance on `|h_L − h_boundary|`.
    pub enthalpy_tol: SpecificEnthalpy,

    /// Maximum chain evaluations.
    pub max_iters: usize,
}

impl Default for ShootingConfig {
    fn default() -> Self {
        Self {
            enthalpy_tol: SpecificEnthalpy::new::<joule_per_kilogram>(50.0),
            max_iters: 30,
        }
    }
}

/// All solver settings for a boiler train.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    pub friction: FrictionConfig,
    pub wall: WallConfig,
    pub integrator: IntegratorConfig,
    pub shooting: ShootingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn wall_bisection_tolerances() {
        let config = WallConfig::default().bisection();
        assert_eq!(config.max_iters, 100);
        assert_relative_eq!(config.x_abs_tol, 1e-9);
        assert_relative_eq!(config.residual_tol, 1e-6);
    }

    #[test]
    fn initial_step_defaults_to_a_fraction_of_the_span() {
        let config = IntegratorConfig::default();
        assert_relative_eq!(config.initial_step_m(4.0), 0.04);

        let fixed = IntegratorConfig {
            initial_step: Some(Length::new::<meter>(0.5)),
            ..config
        };
        assert_relative_eq!(fixed.initial_step_m(4.0), 0.5);
    }
}
