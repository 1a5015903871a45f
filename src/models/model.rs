//! Exponential first-passage model evaluation.
//!
//! The fitter relies on two primitive operations:
//! - evaluate the CDF `F(t; a) = 1 - exp(-t/a)` (for residuals)
//! - fill the Jacobian row `∂F/∂a` (for the solver)
//!
//! `a` is the mean first-passage time; the rate is `1/a`.

/// Evaluate `F(t; a) = 1 - exp(-t/a)`.
///
/// Uses `expm1` so small `t/a` keeps full precision.
pub fn exponential_cdf(t: f64, a: f64) -> f64 {
    -(-t / a).exp_m1()
}

/// Fill the Jacobian row of [`exponential_cdf`] with respect to `params = [a]`.
///
/// `∂F/∂a = -(t / a²) exp(-t/a)`.
///
/// # Panics
/// Panics if `params` or `out` is empty.
pub fn fill_jacobian_row(t: f64, params: &[f64], out: &mut [f64]) {
    let a = params[0];
    out[0] = -(t / (a * a)) * (-t / a).exp();
}

/// Model adapter with the `(t, params)` shape the solver expects.
pub fn predict(t: f64, params: &[f64]) -> f64 {
    exponential_cdf(t, params[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cdf_limits() {
        assert_eq!(exponential_cdf(0.0, 3.0), 0.0);
        assert!((exponential_cdf(1e3, 1.0) - 1.0).abs() < 1e-12);
        assert!((exponential_cdf(2.0, 2.0) - (1.0 - (-1.0f64).exp())).abs() < 1e-15);
    }

    #[test]
    fn jacobian_matches_finite_difference() {
        let h = 1e-6;
        for &a in &[0.5, 2.0, 10.0] {
            for &t in &[0.1, 1.0, 5.0, 30.0] {
                let mut row = [0.0];
                fill_jacobian_row(t, &[a], &mut row);
                let fd = (exponential_cdf(t, a + h) - exponential_cdf(t, a - h)) / (2.0 * h);
                assert!((row[0] - fd).abs() < 1e-7, "t={t} a={a}: {} vs {fd}", row[0]);
            }
        }
    }
}
