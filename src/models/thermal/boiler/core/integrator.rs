//! Adaptive Dormand–Prince 5(4) integration.
//!
//! Steps are accepted when the RMS of the embedded error estimate, scaled by
//! `atol + rtol·max(|y_n|, |y_{n+1}|)`, does not exceed one. The last stage
//! of an accepted step is reused as the first stage of the next.

use thiserror::Error;
use uom::si::length::meter;

use super::config::IntegratorConfig;

const C: [f64; 6] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0];

const A: [[f64; 6]; 6] = [
    [0.0; 6],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19_372.0 / 6_561.0,
        -25_360.0 / 2_187.0,
        64_448.0 / 6_561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9_017.0 / 3_168.0,
        -355.0 / 33.0,
        46_732.0 / 5_247.0,
        49.0 / 176.0,
        -5_103.0 / 18_656.0,
        0.0,
    ],
];

/// Fifth-order weights.
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1_113.0,
    125.0 / 192.0,
    -2_187.0 / 6_784.0,
    11.0 / 84.0,
];

/// Difference between fifth- and fourth-order weights, including the FSAL stage.
const ERROR_WEIGHTS: [f64; 7] = [
    71.0 / 57_600.0,
    0.0,
    -71.0 / 16_695.0,
    71.0 / 1_920.0,
    -17_253.0 / 339_200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// A first-order system `dy/dz = f(z, y)`.
///
/// Each evaluation also returns a sample (for example the solved wall) that
/// is kept for accepted points.
pub(crate) trait OdeSystem<const N: usize> {
    type Sample;
    type Error;

    /// Evaluates the derivative at `(z, y)`.
    ///
    /// # Errors
    ///
    /// Any error aborts the integration and is returned unchanged.
    fn evaluate(&self, z: f64, y: &[f64; N]) -> Result<([f64; N], Self::Sample), Self::Error>;
}

/// An accepted point of the solution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Point<const N: usize, S> {
    pub(crate) z: f64,
    pub(crate) y: [f64; N],
    pub(crate) sample: S,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Trajectory<const N: usize, S> {
    /// Accepted points, starting with the initial condition.
    pub(crate) points: Vec<Point<N, S>>,
    /// Attempted steps, accepted or rejected.
    pub(crate) attempts: usize,
}

impl<const N: usize, S> Trajectory<N, S> {
    pub(crate) fn last(&self) -> &Point<N, S> {
        // Always holds the initial point.
        &self.points[self.points.len() - 1]
    }
}

#[derive(Debug, Error)]
pub(crate) enum IntegrationError<E, const N: usize> {
    #[error("right-hand side failed at z = {z}")]
    Rhs { z: f64, error: E },

    #[error("non-finite derivative at z = {z}")]
    NonFiniteDerivative { z: f64, state: [f64; N] },

    #[error("step size {step:e} below minimum at z = {z}")]
    StepSizeUnderflow { z: f64, step: f64, state: [f64; N] },

    #[error("{steps} steps attempted without reaching the end at z = {z}")]
    StepBudgetExhausted {
        z: f64,
        steps: usize,
        state: [f64; N],
    },
}

/// Integrates `system` from `z0` to `z1` starting at `y0`.
///
/// # Errors
///
/// Returns [`IntegrationError`] if the system fails, yields a non-finite
/// derivative, or the step controller runs out of room.
pub(crate) fn integrate<Sys, const N: usize>(
    system: &Sys,
    z0: f64,
    z1: f64,
    y0: [f64; N],
    config: &IntegratorConfig,
) -> Result<Trajectory<N, Sys::Sample>, IntegrationError<Sys::Error, N>>
where
    Sys: OdeSystem<N>,
{
    type Evaluation<S, Err, const M: usize> = Result<([f64; M], S), IntegrationError<Err, M>>;

    let evaluate = |z: f64,
                    y: &[f64; N],
                    accepted: &[f64; N]|
     -> Evaluation<Sys::Sample, Sys::Error, N> {
        let (dy, sample) = system
            .evaluate(z, y)
            .map_err(|error| IntegrationError::Rhs { z, error })?;
        if dy.iter().all(|d| d.is_finite()) {
            Ok((dy, sample))
        } else {
            Err(IntegrationError::NonFiniteDerivative {
                z,
                state: *accepted,
            })
        }
    };

    let (mut k_first, sample) = evaluate(z0, &y0, &y0)?;
    let mut points = vec![Point {
        z: z0,
        y: y0,
        sample,
    }];

    let span = z1 - z0;
    if span <= 0.0 {
        return Ok(Trajectory {
            points,
            attempts: 0,
        });
    }

    let min_step = config.min_step.get::<meter>();
    let mut step = config.initial_step_m(span).min(span).max(min_step);
    let mut z = z0;
    let mut y = y0;
    let mut attempts = 0;

    while z < z1 {
        if attempts >= config.max_steps {
            return Err(IntegrationError::StepBudgetExhausted {
                z,
                steps: attempts,
                state: y,
            });
        }
        attempts += 1;

        let remaining = z1 - z;
        let last = step >= remaining;
        let h = if last { remaining } else { step };

        let mut k = [[0.0; N]; 7];
        k[0] = k_first;
        for s in 1..6 {
            let y_stage = combine(&y, h, &A[s][..s], &k[..s]);
            k[s] = evaluate(z + C[s] * h, &y_stage, &y)?.0;
        }
        let y_next = combine(&y, h, &B, &k[..6]);
        let z_next = if last { z1 } else { z + h };
        let (k_last, sample) = evaluate(z_next, &y_next, &y)?;
        k[6] = k_last;

        let error = error_norm(&y, &y_next, h, &k, config);
        let factor = if error == 0.0 {
            MAX_FACTOR
        } else {
            (SAFETY * error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
        };

        if error <= 1.0 {
            z = z_next;
            y = y_next;
            k_first = k_last;
            points.push(Point { z, y, sample });
            step = (h * factor).max(min_step);
        } else {
            step = h * factor.min(1.0);
            if step < min_step {
                return Err(IntegrationError::StepSizeUnderflow {
                    z,
                    step,
                    state: y,
                });
            }
        }
    }

    Ok(Trajectory { points, attempts })
}

/// `y + h·Σ w_i·k_i`.
fn combine<const N: usize>(y: &[f64; N], h: f64, weights: &[f64], k: &[[f64; N]]) -> [f64; N] {
    let mut out = *y;
    for (w, k_i) in weights.iter().zip(k) {
        if *w != 0.0 {
            for (o, d) in out.iter_mut().zip(k_i) {
                *o += h * w * d;
            }
        }
    }
    out
}

fn error_norm<const N: usize>(
    y: &[f64; N],
    y_next: &[f64; N],
    h: f64,
    k: &[[f64; N]; 7],
    config: &IntegratorConfig,
) -> f64 {
    let mut sum = 0.0;
    for i in 0..N {
        let estimate = h * ERROR_WEIGHTS.iter().zip(k).map(|(e, k_j)| e * k_j[i]).sum::<f64>();
        let scale = config.absolute_tol + config.relative_tol * y[i].abs().max(y_next[i].abs());
        sum += (estimate / scale).powi(2);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = N as f64;
    (sum / n).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::f64::Length;

    struct Decay {
        rate: f64,
    }

    impl OdeSystem<1> for Decay {
        type Sample = ();
        type Error = ();

        fn evaluate(&self, _z: f64, y: &[f64; 1]) -> Result<([f64; 1], ()), ()> {
            Ok(([-self.rate * y[0]], ()))
        }
    }

    /// `y = (cos z, sin z)` with a sample recording `z`.
    struct Rotation;

    impl OdeSystem<2> for Rotation {
        type Sample = f64;
        type Error = ();

        fn evaluate(&self, z: f64, y: &[f64; 2]) -> Result<([f64; 2], f64), ()> {
            Ok(([-y[1], y[0]], z))
        }
    }

    #[test]
    fn exponential_decay() {
        let config = IntegratorConfig {
            relative_tol: 1e-9,
            absolute_tol: 1e-12,
            ..IntegratorConfig::default()
        };
        let trajectory = integrate(&Decay { rate: 0.8 }, 0.0, 5.0, [3.0], &config).unwrap();

        let end = trajectory.last();
        assert_eq!(end.z, 5.0);
        assert_relative_eq!(end.y[0], 3.0 * (-4.0_f64).exp(), max_relative = 1e-7);

        for point in &trajectory.points {
            let exact = 3.0 * (-0.8 * point.z).exp();
            assert_relative_eq!(point.y[0], exact, max_relative = 1e-7);
        }
        assert!(trajectory.points.windows(2).all(|w| w[0].z < w[1].z));
    }

    #[test]
    fn samples_belong_to_accepted_points() {
        let config = IntegratorConfig::default();
        let trajectory = integrate(&Rotation, 0.0, 3.0, [1.0, 0.0], &config).unwrap();
        for point in &trajectory.points {
            assert_eq!(point.sample, point.z);
        }
        let end = trajectory.last();
        assert_relative_eq!(end.y[0], 3.0_f64.cos(), epsilon = 1e-5);
        assert_relative_eq!(end.y[1], 3.0_f64.sin(), epsilon = 1e-5);
    }

    #[test]
    fn empty_span_returns_initial_point() {
        let config = IntegratorConfig::default();
        let trajectory = integrate(&Decay { rate: 1.0 }, 2.0, 2.0, [1.0], &config).unwrap();
        assert_eq!(trajectory.points.len(), 1);
        assert_eq!(trajectory.attempts, 0);
    }

    #[test]
    fn non_finite_derivative_is_fatal() {
        struct Blowup;

        impl OdeSystem<1> for Blowup {
            type Sample = ();
            type Error = ();

            fn evaluate(&self, z: f64, _y: &[f64; 1]) -> Result<([f64; 1], ()), ()> {
                let d = if z > 0.5 { f64::NAN } else { 1.0 };
                Ok(([d], ()))
            }
        }

        let err = integrate(&Blowup, 0.0, 1.0, [0.0], &IntegratorConfig::default()).unwrap_err();
        match err {
            IntegrationError::NonFiniteDerivative { z, .. } => assert!(z > 0.5),
            other => panic!("Expected NonFiniteDerivative, got: {other:?}"),
        }
    }

    #[test]
    fn step_budget_is_enforced() {
        let config = IntegratorConfig {
            initial_step: Some(Length::new::<meter>(1e-3)),
            max_steps: 3,
            ..IntegratorConfig::default()
        };
        let err = integrate(&Decay { rate: 1.0 }, 0.0, 10.0, [1.0], &config).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::StepBudgetExhausted { steps: 3, .. }
        ));
    }

    #[test]
    fn stiff_problem_underflows_step() {
        let config = IntegratorConfig {
            relative_tol: 1e-12,
            absolute_tol: 1e-14,
            min_step: Length::new::<meter>(0.1),
            ..IntegratorConfig::default()
        };
        let err = integrate(&Decay { rate: 500.0 }, 0.0, 1.0, [1.0], &config).unwrap_err();
        assert!(matches!(err, IntegrationError::StepSizeUnderflow { .. }));
    }

    #[test]
    fn rhs_errors_pass_through() {
        struct Failing;

        impl OdeSystem<1> for Failing {
            type Sample = ();
            type Error = &'static str;

            fn evaluate(&self, _z: f64, _y: &[f64; 1]) -> Result<([f64; 1], ()), &'static str> {
                Err("no properties")
            }
        }

        let err = integrate(&Failing, 0.0, 1.0, [0.0], &IntegratorConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::Rhs {
                error: "no properties",
                ..
            }
        ));
    }
}
