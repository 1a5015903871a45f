//! Damped linear least squares.
//!
//! Each Levenberg–Marquardt step solves
//!
//! ```text
//! minimize ‖J δ + r‖² + λ ‖D δ‖²
//! ```
//!
//! which is the ordinary least squares problem on the stacked system
//!
//! ```text
//! [   J   ] δ = [ -r ]
//! [ √λ D  ]     [  0 ]
//! ```
//!
//! We solve the stacked system with SVD rather than forming `JᵀJ + λD²`,
//! which squares the condition number. Nalgebra's `QR::solve` is meant for
//! square systems, so it is not an option for the tall stacked matrix.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Progressively looser singular-value cutoffs.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve the damped step `min ‖J δ + r‖² + λ ‖D δ‖²` for `δ`.
///
/// `scale` holds the diagonal of `D`.
pub fn solve_damped_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    scale: &[f64],
    lambda: f64,
) -> Option<DVector<f64>> {
    let n = jacobian.nrows();
    let m = jacobian.ncols();
    debug_assert_eq!(scale.len(), m);

    let mut a = DMatrix::<f64>::zeros(n + m, m);
    a.view_mut((0, 0), (n, m)).copy_from(jacobian);
    let sqrt_lambda = lambda.sqrt();
    for (j, &d) in scale.iter().enumerate() {
        a[(n + j, j)] = sqrt_lambda * d;
    }

    let mut b = DVector::<f64>::zeros(n + m);
    for i in 0..n {
        b[i] = -residuals[i];
    }

    solve_least_squares(&a, &b)
}
