//! Darcy friction factor.
//!
//! Laminar flow (`Re < 2300`) always uses `f = 64/Re`. Above that the model
//! selected in [`FrictionConfig`] applies: the implicit Colebrook–White
//! equation, or one of the explicit Haaland and Churchill approximations.

use std::f64::consts::LN_10;

use thiserror::Error;

use crate::models::thermal::boiler::core::config::FrictionConfig;

/// Reynolds number below which flow is treated as laminar.
pub(crate) const LAMINAR_LIMIT: f64 = 2_300.0;

/// Turbulent friction factor model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrictionModel {
    /// Implicit Colebrook–White, solved by Newton iteration.
    #[default]
    Colebrook,
    /// Explicit Haaland approximation.
    Haaland,
    /// Explicit Churchill correlation, valid across all regimes.
    Churchill,
}

/// Errors from friction factor evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrictionError {
    #[error("Reynolds number must be positive and finite, got {reynolds}")]
    Reynolds { reynolds: f64 },

    #[error("relative roughness must be non-negative and finite, got {relative_roughness}")]
    Roughness { relative_roughness: f64 },

    #[error("Colebrook iteration did not converge: residual {residual:e} after {iters} iterations")]
    NonConvergence {
        iters: usize,
        /// Last friction factor iterate.
        last_iterate: f64,
        residual: f64,
    },
}

/// Darcy friction factor for the given Reynolds number and relative roughness `ε/D`.
///
/// # Errors
///
/// Returns [`FrictionError`] on invalid inputs or if the Colebrook iteration
/// does not reach the configured tolerance.
pub(crate) fn darcy(
    reynolds: f64,
    relative_roughness: f64,
    config: &FrictionConfig,
) -> Result<f64, FrictionError> {
    if !(reynolds.is_finite() && reynolds > 0.0) {
        return Err(FrictionError::Reynolds { reynolds });
    }
    if !(relative_roughness.is_finite() && relative_roughness >= 0.0) {
        return Err(FrictionError::Roughness { relative_roughness });
    }

    if reynolds < LAMINAR_LIMIT {
        return Ok(64.0 / reynolds);
    }

    match config.model {
        FrictionModel::Colebrook => colebrook(reynolds, relative_roughness, config),
        FrictionModel::Haaland => Ok(haaland(reynolds, relative_roughness)),
        FrictionModel::Churchill => Ok(churchill(reynolds, relative_roughness)),
    }
}

/// Residual of the Colebrook–White equation at friction factor `f`:
/// `1/√f + 2·log10(ε/(3.7D) + 2.51/(Re·√f))`.
#[cfg(test)]
pub(crate) fn colebrook_residual(reynolds: f64, relative_roughness: f64, f: f64) -> f64 {
    residual_in_x(1.0 / f.sqrt(), relative_roughness / 3.7, 2.51 / reynolds)
}

/// Colebrook residual in `x = 1/√f`, with `a = ε/(3.7D)` and `b = 2.51/Re`.
fn residual_in_x(x: f64, a: f64, b: f64) -> f64 {
    x + 2.0 * (a + b * x).log10()
}

/// Solves Colebrook–White by Newton iteration on `x = 1/√f`, seeded by Haaland.
fn colebrook(
    reynolds: f64,
    relative_roughness: f64,
    config: &FrictionConfig,
) -> Result<f64, FrictionError> {
    let a = relative_roughness / 3.7;
    let b = 2.51 / reynolds;

    let mut x = 1.0 / haaland(reynolds, relative_roughness).sqrt();
    let mut residual = residual_in_x(x, a, b);

    for iter in 0..config.max_iters {
        if residual.abs() < config.tolerance {
            return Ok(1.0 / (x * x));
        }

        let slope = 1.0 + 2.0 * b / ((a + b * x) * LN_10);
        x -= residual / slope;
        if !(x.is_finite() && x > 0.0) {
            return Err(FrictionError::NonConvergence {
                iters: iter + 1,
                last_iterate: 1.0 / (x * x),
                residual,
            });
        }
        residual = residual_in_x(x, a, b);
    }

    if residual.abs() < config.tolerance {
        return Ok(1.0 / (x * x));
    }

    Err(FrictionError::NonConvergence {
        iters: config.max_iters,
        last_iterate: 1.0 / (x * x),
        residual,
    })
}

/// Haaland's explicit approximation.
pub(crate) fn haaland(reynolds: f64, relative_roughness: f64) -> f64 {
    let term = (relative_roughness / 3.7).powf(1.11) + 6.9 / reynolds;
    let inv_sqrt = -1.8 * term.log10();
    1.0 / (inv_sqrt * inv_sqrt)
}

/// Churchill's correlation, continuous over laminar, transitional and turbulent flow.
pub(crate) fn churchill(reynolds: f64, relative_roughness: f64) -> f64 {
    let a = (2.457 * (1.0 / ((7.0 / reynolds).powf(0.9) + 0.27 * relative_roughness)).ln())
        .powi(16);
    let b = (37_530.0 / reynolds).powi(16);
    8.0 * ((8.0 / reynolds).powi(12) + (a + b).powf(-1.5)).powf(1.0 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn config(model: FrictionModel) -> FrictionConfig {
        FrictionConfig {
            model,
            ..FrictionConfig::default()
        }
    }

    #[test]
    fn laminar_is_64_over_re_for_every_model() {
        for model in [
            FrictionModel::Colebrook,
            FrictionModel::Haaland,
            FrictionModel::Churchill,
        ] {
            for re in [1.0, 150.0, 1_000.0, 2_299.0] {
                let f = darcy(re, 0.01, &config(model)).unwrap();
                assert_relative_eq!(f, 64.0 / re, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn colebrook_satisfies_its_equation() {
        let cfg = FrictionConfig::default();
        for re in [4e3, 2e4, 1e5, 1e6, 1e8] {
            for rr in [1e-6, 1e-4, 1e-3, 0.01, 0.05] {
                let f = darcy(re, rr, &cfg).unwrap();
                assert!(
                    colebrook_residual(re, rr, f).abs() < 1e-6,
                    "Re={re}, ε/D={rr}, f={f}"
                );
            }
        }
    }

    #[test]
    fn smooth_pipe_reference_value() {
        // Moody chart: smooth pipe at Re = 1e5 gives f ≈ 0.0180.
        let f = darcy(1e5, 0.0, &FrictionConfig::default()).unwrap();
        assert_relative_eq!(f, 0.0180, max_relative = 0.01);
    }

    #[test]
    fn explicit_models_track_colebrook() {
        for (re, rr) in [(1e4, 1e-4), (1e5, 1e-3), (1e6, 0.01)] {
            let exact = darcy(re, rr, &FrictionConfig::default()).unwrap();
            let h = darcy(re, rr, &config(FrictionModel::Haaland)).unwrap();
            let c = darcy(re, rr, &config(FrictionModel::Churchill)).unwrap();
            assert_relative_eq!(h, exact, max_relative = 0.03);
            assert_relative_eq!(c, exact, max_relative = 0.03);
        }
    }

    #[test]
    fn zero_iteration_budget_does_not_converge() {
        let cfg = FrictionConfig {
            max_iters: 0,
            ..FrictionConfig::default()
        };
        match darcy(5e4, 1e-3, &cfg) {
            Err(FrictionError::NonConvergence {
                iters,
                last_iterate,
                residual,
            }) => {
                assert_eq!(iters, 0);
                assert_relative_eq!(last_iterate, haaland(5e4, 1e-3), max_relative = 1e-12);
                // The reported residual is the Colebrook residual at the last iterate.
                assert_relative_eq!(
                    residual,
                    colebrook_residual(5e4, 1e-3, last_iterate),
                    epsilon = 1e-12
                );
                assert!(residual.abs() > cfg.tolerance);
            }
            other => panic!("Expected NonConvergence, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_inputs() {
        let cfg = FrictionConfig::default();
        assert!(matches!(
            darcy(0.0, 0.0, &cfg),
            Err(FrictionError::Reynolds { .. })
        ));
        assert!(matches!(
            darcy(f64::NAN, 0.0, &cfg),
            Err(FrictionError::Reynolds { .. })
        ));
        assert!(matches!(
            darcy(1e5, -1e-3, &cfg),
            Err(FrictionError::Roughness { .. })
        ));
    }

    proptest! {
        #[test]
        fn colebrook_residual_is_small(
            log_re in 3.61f64..8.0,
            log_rr in -6.0f64..-1.302,
        ) {
            let re = 10f64.powf(log_re);
            let rr = 10f64.powf(log_rr);
            let f = darcy(re, rr, &FrictionConfig::default()).unwrap();
            prop_assert!(colebrook_residual(re, rr, f).abs() < 1e-6);
        }
    }
}
