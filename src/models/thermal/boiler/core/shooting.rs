//! Secant shooting on the inlet water enthalpy.
//!
//! The march is a function `h₀ ↦ h_L`. Shooting drives `F(h₀) = h_L − h_b`
//! to zero. The first step is the fixed-point update `h₁ = h₀ − F(h₀)`, which
//! is exact when the water duty does not depend on `h₀`; later steps use the
//! secant through the two most recent shots.

use tracing::{debug, warn};
use twine_core::Model;
use uom::si::available_energy::joule_per_kilogram;

use crate::support::units::SpecificEnthalpy;

use super::config::ShootingConfig;

/// The shot with the smallest residual.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Shot<O> {
    pub(crate) inlet_enthalpy: f64,
    pub(crate) residual: f64,
    pub(crate) output: O,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ShootingOutcome<O> {
    pub(crate) best: Shot<O>,
    /// Number of model evaluations.
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
}

/// Shoots on the model's input until its terminal enthalpy meets `boundary`.
///
/// Running out of evaluations is not an error: the best shot is returned with
/// `converged == false`.
///
/// # Errors
///
/// Propagates the first error returned by `model`.
pub(crate) fn shoot<M, T>(
    model: &M,
    initial: SpecificEnthalpy,
    boundary: SpecificEnthalpy,
    terminal: T,
    config: &ShootingConfig,
) -> Result<ShootingOutcome<M::Output>, M::Error>
where
    M: Model<Input = SpecificEnthalpy>,
    T: Fn(&M::Output) -> SpecificEnthalpy,
{
    let tolerance = config.enthalpy_tol.get::<joule_per_kilogram>().abs();
    let target = boundary.get::<joule_per_kilogram>();
    let max_iters = config.max_iters.max(1);

    let evaluate = |h: f64| -> Result<Shot<M::Output>, M::Error> {
        let output = model.call(&SpecificEnthalpy::new::<joule_per_kilogram>(h))?;
        let residual = terminal(&output).get::<joule_per_kilogram>() - target;
        Ok(Shot {
            inlet_enthalpy: h,
            residual,
            output,
        })
    };

    let mut previous = initial.get::<joule_per_kilogram>();
    let mut best = evaluate(previous)?;
    let mut iterations = 1;
    debug!(
        iteration = iterations,
        inlet_enthalpy = previous,
        residual = best.residual,
        "shot"
    );

    let mut previous_residual = best.residual;
    let mut next = previous - previous_residual;

    while best.residual.abs() > tolerance && iterations < max_iters && next.is_finite() {
        let shot = evaluate(next)?;
        iterations += 1;
        debug!(
            iteration = iterations,
            inlet_enthalpy = next,
            residual = shot.residual,
            "shot"
        );

        let current = next;
        let residual = shot.residual;
        next = secant_step(previous, previous_residual, current, residual);
        previous = current;
        previous_residual = residual;

        if residual.abs() < best.residual.abs() {
            best = shot;
        }
    }

    let converged = best.residual.abs() <= tolerance;
    if !converged {
        warn!(
            iterations,
            residual = best.residual,
            inlet_enthalpy = best.inlet_enthalpy,
            "shooting did not converge"
        );
    }

    Ok(ShootingOutcome {
        best,
        iterations,
        converged,
    })
}

/// Secant update, or a fixed-point step when the secant slope is unusable.
fn secant_step(x0: f64, f0: f64, x1: f64, f1: f64) -> f64 {
    let slope = (f1 - f0) / (x1 - x0);
    if slope.is_finite() && slope != 0.0 {
        x1 - f1 / slope
    } else {
        x1 - f1
    }
}
