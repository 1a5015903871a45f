//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ (f(x_i; p) - y_i)²` over the parameter vector `p`.
//!
//! Each iteration:
//! - solves the damped step with Marquardt scaling `D = diag(JᵀJ)^½`
//! - accepts the step if it lowers the sum of squares (and relaxes damping),
//!   otherwise rejects it and increases damping
//!
//! Convergence follows MINPACK's two tests: both the actual and the predicted
//! relative reductions in the sum of squares fall below `ftol`, or the step is
//! smaller than `xtol` relative to the parameter norm.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::error::KineticsError;
use crate::math::ols::solve_damped_step;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e16;
const LAMBDA_FACTOR: f64 = 10.0;

/// Solver budget and tolerances.
#[derive(Debug, Clone, Copy)]
pub struct LmOptions {
    pub max_iterations: usize,
    pub ftol: f64,
    pub xtol: f64,
}

/// Converged parameters.
#[derive(Debug, Clone)]
pub struct LmSolution {
    pub params: Vec<f64>,
    pub sse: f64,
    pub iterations: usize,
}

/// Fit `model(x, p)` to `(x, y)` starting at `p0`.
///
/// `jacobian(x, p, row)` must write `∂model/∂p_j` into `row[j]`.
pub fn levenberg_marquardt<M, J>(
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    model: M,
    jacobian: J,
    opts: &LmOptions,
) -> Result<LmSolution, KineticsError>
where
    M: Fn(f64, &[f64]) -> f64,
    J: Fn(f64, &[f64], &mut [f64]),
{
    let n = x.len();
    let m = p0.len();
    if n != y.len() {
        return Err(KineticsError::InvalidConfig(format!(
            "x/y length mismatch: {n} vs {}",
            y.len()
        )));
    }
    if !(opts.ftol > 0.0 && opts.xtol > 0.0) {
        return Err(KineticsError::InvalidConfig(
            "solver tolerances must be > 0".to_string(),
        ));
    }

    let residuals = |p: &[f64]| -> DVector<f64> {
        DVector::from_iterator(n, x.iter().zip(y).map(|(&xi, &yi)| model(xi, p) - yi))
    };

    let mut params = p0.to_vec();
    let mut r = residuals(&params);
    let mut sse = r.norm_squared();
    if !sse.is_finite() {
        return Err(KineticsError::FitDidNotConverge {
            iterations: 0,
            reason: "non-finite residuals at the initial guess".to_string(),
        });
    }

    let mut lambda = LAMBDA_INIT;
    let mut jac = DMatrix::<f64>::zeros(n, m);
    let mut row = vec![0.0; m];
    let mut scale = vec![0.0; m];

    for iteration in 1..=opts.max_iterations {
        if sse == 0.0 {
            return Ok(LmSolution {
                params,
                sse,
                iterations: iteration - 1,
            });
        }

        for (i, &xi) in x.iter().enumerate() {
            jacobian(xi, &params, &mut row);
            for j in 0..m {
                jac[(i, j)] = row[j];
            }
        }
        for (j, d) in scale.iter_mut().enumerate() {
            *d = jac.column(j).norm().max(f64::MIN_POSITIVE);
        }

        let Some(delta) = solve_damped_step(&jac, &r, &scale, lambda) else {
            lambda *= LAMBDA_FACTOR;
            continue;
        };

        let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt();
        let step_small = delta.norm() <= opts.xtol * (param_norm + opts.xtol);

        let trial: Vec<f64> = params.iter().zip(delta.iter()).map(|(p, d)| p + d).collect();
        let r_trial = residuals(&trial);
        let sse_trial = r_trial.norm_squared();

        trace!(iteration, lambda, sse, sse_trial, "lm step");

        if sse_trial.is_finite() && sse_trial < sse {
            let predicted = (&r + &jac * &delta).norm_squared();
            let actual_reduction = (sse - sse_trial) / sse;
            let predicted_reduction = (sse - predicted) / sse;

            params = trial;
            r = r_trial;
            sse = sse_trial;
            lambda = (lambda / LAMBDA_FACTOR).max(LAMBDA_MIN);

            if (actual_reduction <= opts.ftol && predicted_reduction.abs() <= opts.ftol) || step_small {
                debug!(iteration, sse, "lm converged");
                return Ok(LmSolution {
                    params,
                    sse,
                    iterations: iteration,
                });
            }
        } else {
            if step_small {
                debug!(iteration, sse, "lm converged (no smaller step improves)");
                return Ok(LmSolution {
                    params,
                    sse,
                    iterations: iteration,
                });
            }
            lambda *= LAMBDA_FACTOR;
            if lambda > LAMBDA_MAX {
                return Err(KineticsError::FitDidNotConverge {
                    iterations: iteration,
                    reason: "damping grew without finding a better step".to_string(),
                });
            }
        }
    }

    Err(KineticsError::FitDidNotConverge {
        iterations: opts.max_iterations,
        reason: "iteration budget exhausted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> LmOptions {
        LmOptions {
            max_iterations: 200,
            ftol: 1e-12,
            xtol: 1e-12,
        }
    }

    #[test]
    fn recovers_exponential_decay() {
        let x: Vec<f64> = (0..30).map(|i| i as f64 * 0.2).collect();
        let y: Vec<f64> = x.iter().map(|&t| 3.0 * (-0.7 * t).exp()).collect();

        let sol = levenberg_marquardt(
            &x,
            &y,
            &[1.0, 0.2],
            |t, p| p[0] * (-p[1] * t).exp(),
            |t, p, row| {
                let e = (-p[1] * t).exp();
                row[0] = e;
                row[1] = -p[0] * t * e;
            },
            &opts(),
        )
        .unwrap();

        assert!((sol.params[0] - 3.0).abs() < 1e-6, "{:?}", sol.params);
        assert!((sol.params[1] - 0.7).abs() < 1e-6, "{:?}", sol.params);
        assert!(sol.sse < 1e-12);
    }

    #[test]
    fn exact_start_returns_immediately() {
        let x = [1.0, 2.0, 3.0];
        let y = [2.0, 4.0, 6.0];
        let sol = levenberg_marquardt(&x, &y, &[2.0], |t, p| p[0] * t, |t, _, row| row[0] = t, &opts())
            .unwrap();
        assert_eq!(sol.iterations, 0);
        assert_eq!(sol.params, vec![2.0]);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let x: Vec<f64> = (0..30).map(|i| i as f64 * 0.2).collect();
        let y: Vec<f64> = x.iter().map(|&t| 3.0 * (-0.7 * t).exp()).collect();
        let tight = LmOptions {
            max_iterations: 1,
            ..opts()
        };

        let err = levenberg_marquardt(
            &x,
            &y,
            &[1.0, 0.2],
            |t, p| p[0] * (-p[1] * t).exp(),
            |t, p, row| {
                let e = (-p[1] * t).exp();
                row[0] = e;
                row[1] = -p[0] * t * e;
            },
            &tight,
        )
        .unwrap_err();

        assert!(matches!(err, KineticsError::FitDidNotConverge { iterations: 1, .. }));
    }

    #[test]
    fn non_finite_start_is_not_converged() {
        let err = levenberg_marquardt(
            &[1.0, 2.0],
            &[0.5, 0.7],
            &[1.0],
            |_, _| f64::NAN,
            |_, _, row| row[0] = 0.0,
            &opts(),
        )
        .unwrap_err();
        assert!(matches!(err, KineticsError::FitDidNotConverge { iterations: 0, .. }));
    }
}
