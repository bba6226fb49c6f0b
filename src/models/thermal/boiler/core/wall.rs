//! Wall temperature equilibrium.
//!
//! At each axial position the gas-side wall temperature `T_w` is the unknown
//! that balances the heat leaving the gas (convection plus linearised
//! radiation) against the heat entering the water through the wall, deposits
//! and the water film. The water coefficient depends on `T_w` through the
//! boiling heat flux and the liquid wall-viscosity correction, so the balance
//! is solved by bisection between the two bulk temperatures.

mod problem;

use thiserror::Error;
use tracing::trace;
use twine_solvers::equation::bisection;
use uom::si::{
    available_energy::joule_per_kilogram,
    dynamic_viscosity::pascal_second,
    f64::{Length, Pressure},
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermal_conductivity::watt_per_meter_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{PropertyError, WaterPhase, WaterProperties, WaterPropertyModel},
    units::SpecificEnthalpy,
};

use super::{
    config::WallConfig,
    correlations::{
        FilmTransport,
        water::{Regime, Saturation, WaterChannel},
    },
    error::{NumericSolver, SolveError},
    geometry::FixedResistances,
    resistance::ResistanceNetwork,
    stage::StageId,
};

use problem::{WallModel, WallProblem};

/// Bulk water seen by the wall at one position, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WaterBulk {
    pub(crate) temperature: f64,
    pub(crate) pressure: f64,
    pub(crate) regime: Regime,
    pub(crate) bulk: FilmTransport,
    pub(crate) saturation: Saturation,
    pub(crate) channel: WaterChannel,
    /// Enthalpy of the liquid part, anchoring the wall-viscosity lookup.
    pub(crate) liquid_enthalpy: f64,
}

impl WaterBulk {
    /// `enthalpy` and `pressure` are the state `props` was evaluated at.
    pub(crate) fn new(
        props: &WaterProperties,
        enthalpy: SpecificEnthalpy,
        pressure: Pressure,
        channel: WaterChannel,
    ) -> Self {
        let enthalpy = enthalpy.get::<joule_per_kilogram>();
        let pressure = pressure.get::<pascal>();
        let saturation = Saturation {
            liquid: FilmTransport::from(&props.saturated_liquid),
            vapor: FilmTransport::from(&props.saturated_vapor),
            latent_heat: props.latent_heat.get::<joule_per_kilogram>(),
            pressure,
        };
        let (regime, liquid_enthalpy) = match props.phase {
            WaterPhase::Subcooled => (Regime::Liquid, enthalpy),
            WaterPhase::Saturated { quality } => {
                let x = quality.into_inner();
                (
                    Regime::Boiling { quality: x },
                    enthalpy - x * saturation.latent_heat,
                )
            }
            WaterPhase::Superheated => (Regime::Vapor, enthalpy),
        };

        Self {
            temperature: props.temperature.get::<kelvin>(),
            pressure,
            regime,
            bulk: FilmTransport {
                density: props.density.get::<kilogram_per_cubic_meter>(),
                viscosity: props.viscosity.get::<pascal_second>(),
                conductivity: props.conductivity.get::<watt_per_meter_kelvin>(),
                cp: props.cp.get::<joule_per_kilogram_kelvin>(),
            },
            saturation,
            channel,
            liquid_enthalpy,
        }
    }

    /// Liquid whose viscosity the wall correction compares against.
    fn reference_liquid(&self) -> FilmTransport {
        match self.regime {
            Regime::Boiling { .. } => self.saturation.liquid,
            Regime::Liquid | Regime::Vapor => self.bulk,
        }
    }
}

/// Everything the wall solve needs at one axial position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallInputs {
    pub(crate) gas_temperature: f64,
    /// Gas convective coefficient, W/(m²·K).
    pub(crate) convective_coefficient: f64,
    pub(crate) emissivity: f64,
    pub(crate) gas_perimeter: f64,
    pub(crate) water_perimeter: f64,
    pub(crate) fixed: FixedResistances,
    pub(crate) water: WaterBulk,
}

/// Solved wall, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WallSolution {
    pub(crate) gas_wall_temperature: f64,
    pub(crate) water_wall_temperature: f64,
    /// Heat rate per unit length, W/m, positive from gas to water.
    pub(crate) heat_rate: f64,
    /// Heat flux on the gas-side surface, W/m².
    pub(crate) heat_flux: f64,
    pub(crate) network: ResistanceNetwork,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub(crate) enum WallError {
    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("no sign change in the flux balance between {low:.3} K and {high:.3} K")]
    NoBracket {
        low: f64,
        high: f64,
        evaluations: usize,
    },

    #[error("iteration limit reached with flux mismatch {residual:e} W/m")]
    MaxIters {
        iters: usize,
        last_iterate: f64,
        residual: f64,
    },

    #[error("bisection failed: {reason}")]
    Bisection { reason: String, bracket: [f64; 2] },
}

impl WallError {
    /// Attaches the stage and position where the solve failed.
    pub(crate) fn at(self, stage: StageId, position: Length) -> SolveError {
        let reason = self.to_string();
        let (iters, last_iterate) = match self {
            WallError::Property(source) => {
                return SolveError::Property {
                    stage,
                    position,
                    source,
                };
            }
            WallError::NoBracket {
                high, evaluations, ..
            } => (evaluations, high),
            WallError::MaxIters {
                iters,
                last_iterate,
                ..
            } => (iters, last_iterate),
            WallError::Bisection { bracket, .. } => (0, 0.5 * (bracket[0] + bracket[1])),
        };
        SolveError::NumericNonConvergence {
            solver: NumericSolver::WallTemperature,
            stage,
            position,
            iters,
            last_iterate,
            reason,
        }
    }
}

/// Where the flux balance changes sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bracket {
    /// A point with an exactly zero residual.
    Root(f64),
    Interval([f64; 2]),
}

impl Bracket {
    fn classify(a: f64, fa: f64, b: f64, fb: f64) -> Option<Self> {
        if !(fa.is_finite() && fb.is_finite()) {
            return None;
        }
        if fa == 0.0 {
            Some(Bracket::Root(a))
        } else if fb == 0.0 {
            Some(Bracket::Root(b))
        } else if (fa < 0.0) != (fb < 0.0) {
            Some(Bracket::Interval([a, b]))
        } else {
            None
        }
    }
}

/// Scans `[low, high]` in `intervals` equal steps for the first sign change.
///
/// # Errors
///
/// Propagates the first error returned by `residual`.
pub(crate) fn scan_for_bracket<E>(
    mut residual: impl FnMut(f64) -> Result<f64, E>,
    low: f64,
    high: f64,
    intervals: usize,
) -> Result<Option<Bracket>, E> {
    let n = intervals.max(1);
    #[allow(clippy::cast_precision_loss)]
    let step = (high - low) / n as f64;

    let mut a = low;
    let mut fa = residual(a)?;
    for i in 1..=n {
        #[allow(clippy::cast_precision_loss)]
        let b = if i == n { high } else { low + step * i as f64 };
        let fb = residual(b)?;
        trace!(a, b, fa, fb, "scanning wall bracket");
        if let Some(bracket) = Bracket::classify(a, fa, b, fb) {
            return Ok(Some(bracket));
        }
        a = b;
        fa = fb;
    }
    Ok(None)
}

/// Solves for the wall temperature that balances gas-side and water-side heat rates.
///
/// # Errors
///
/// Returns [`WallError::Property`] if the water provider fails during the
/// wall-viscosity lookup, or a convergence error if no root is found within
/// the configured budget.
pub(crate) fn solve<W: WaterPropertyModel>(
    inputs: &WallInputs,
    water_model: &W,
    config: &WallConfig,
) -> Result<WallSolution, WallError> {
    let model = WallModel::new(inputs, water_model);
    let t_gas = inputs.gas_temperature;
    let t_water = inputs.water.temperature;

    if t_gas == t_water {
        return Ok(model.evaluate(t_gas)?.into_solution(inputs));
    }

    let (low, high) = if t_water < t_gas {
        (t_water, t_gas)
    } else {
        (t_gas, t_water)
    };

    let f_low = model.evaluate(low)?.residual();
    let f_high = model.evaluate(high)?.residual();

    let bracket = match Bracket::classify(low, f_low, high, f_high) {
        Some(bracket) => bracket,
        None => {
            trace!(low, high, f_low, f_high, "wall bracket has no sign change");
            scan_for_bracket(
                |t| model.evaluate(t).map(|e| e.residual()),
                low,
                high,
                config.scan_intervals,
            )?
            .ok_or(WallError::NoBracket {
                low,
                high,
                evaluations: config.scan_intervals.max(1) + 1,
            })?
        }
    };

    let interval = match bracket {
        Bracket::Root(t) => return Ok(model.evaluate(t)?.into_solution(inputs)),
        Bracket::Interval(interval) => interval,
    };

    let solution = bisection::solve(
        &model,
        &WallProblem,
        interval,
        &config.bisection(),
        |_event: &bisection::Event<'_, _, _>| None,
    )
    .map_err(|err| match model.take_failure() {
        Some(source) => WallError::Property(source),
        None => WallError::Bisection {
            reason: err.to_string(),
            bracket: interval,
        },
    })?;

    if solution.status != bisection::Status::Converged {
        return Err(WallError::MaxIters {
            iters: solution.iters,
            last_iterate: solution.snapshot.output.gas_wall_temperature,
            residual: solution.residual,
        });
    }

    Ok(solution.snapshot.output.into_solution(inputs))
}
