//! `KineticsEstimator`: the public entry point for both estimation methods.
//!
//! The estimator only holds configuration. Every operation is a function of
//! its arguments; the windowed operations additionally sort the caller's
//! buffer ascending in place (hence `&mut [f64]`).

use crate::domain::{EstimationRow, EstimationTable, EstimatorConfig, FitOutcome};
use crate::error::KineticsError;
use crate::fit::{exponential_goodness_of_fit, fit_exponential};
use crate::scan::{best_position, build_estimation_table};

/// Estimates unbiased kinetics from rescaled first-passage times.
#[derive(Debug, Clone, Default)]
pub struct KineticsEstimator {
    config: EstimatorConfig,
}

impl KineticsEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Estimator with the default configuration and the given minimum sample size.
    pub fn with_min_sample_size(min_sample_size: usize) -> Self {
        Self::new(EstimatorConfig {
            min_sample_size,
            ..EstimatorConfig::default()
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    fn min_sample_size(&self, override_size: Option<usize>) -> usize {
        override_size.unwrap_or(self.config.min_sample_size)
    }

    /// Rate / quality table over every candidate cutoff.
    ///
    /// Sorts `samples` in place. `min_sample_size` overrides the configured value.
    pub fn build_estimation_table(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<EstimationTable, KineticsError> {
        build_estimation_table(samples, self.min_sample_size(min_sample_size))
    }

    /// Build the table and locate its best row (highest R², first on ties).
    ///
    /// Unlike [`select_best_row`](crate::scan::select_best_row), too few samples are reported as
    /// `InsufficientData` rather than `EmptyTable`. Sorts `samples` in place.
    pub fn scan(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<(EstimationTable, usize), KineticsError> {
        let min_sample_size = self.min_sample_size(min_sample_size);
        if samples.len() <= min_sample_size {
            return Err(KineticsError::InsufficientData(format!(
                "windowed scan needs more than {min_sample_size} samples, got {}",
                samples.len()
            )));
        }
        let table = build_estimation_table(samples, min_sample_size)?;
        let pos = best_position(&table)?;
        Ok((table, pos))
    }

    /// Best row of the windowed scan. Sorts `samples` in place.
    pub fn best_row(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<EstimationRow, KineticsError> {
        let (table, pos) = self.scan(samples, min_sample_size)?;
        Ok(table.rows()[pos])
    }

    /// Kinetic rate `k` of the best window. Sorts `samples` in place.
    pub fn estimate_rate(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<f64, KineticsError> {
        Ok(self.best_row(samples, min_sample_size)?.prediction)
    }

    /// Mean first-passage time `1/k` of the best window. Sorts `samples` in place.
    pub fn estimate_mfpt(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<f64, KineticsError> {
        Ok(1.0 / self.best_row(samples, min_sample_size)?.prediction)
    }

    /// Candidate cutoff time T* of the best window. Sorts `samples` in place.
    pub fn estimate_tstar(
        &self,
        samples: &mut [f64],
        min_sample_size: Option<usize>,
    ) -> Result<f64, KineticsError> {
        Ok(self.best_row(samples, min_sample_size)?.time)
    }

    /// Fitted MFPT from the direct exponential CDF fit.
    ///
    /// `samples` are paired with the empirical CDF in the order given; pass
    /// them ascending (or enable `sort_samples`). With `run_goodness_of_fit`
    /// the outcome carries the KS p-value against a synthetic population of
    /// `synthetic_sample_count` draws (the configured size when `None`).
    pub fn fit_mfpt(
        &self,
        samples: &[f64],
        run_goodness_of_fit: bool,
        synthetic_sample_count: Option<usize>,
    ) -> Result<FitOutcome, KineticsError> {
        self.fit(samples, run_goodness_of_fit, synthetic_sample_count, |a| a)
    }

    /// Same fit as [`fit_mfpt`](Self::fit_mfpt), reporting the rate `1/a`.
    pub fn fit_rate(
        &self,
        samples: &[f64],
        run_goodness_of_fit: bool,
        synthetic_sample_count: Option<usize>,
    ) -> Result<FitOutcome, KineticsError> {
        self.fit(samples, run_goodness_of_fit, synthetic_sample_count, |a| 1.0 / a)
    }

    fn fit(
        &self,
        samples: &[f64],
        run_goodness_of_fit: bool,
        synthetic_sample_count: Option<usize>,
        report: impl Fn(f64) -> f64,
    ) -> Result<FitOutcome, KineticsError> {
        let config = &self.config.curve_fit;
        let fit = fit_exponential(samples, config)?;

        let goodness_of_fit = if run_goodness_of_fit {
            Some(exponential_goodness_of_fit(
                samples,
                fit.mean,
                synthetic_sample_count.unwrap_or(config.synthetic_sample_count),
                config.seed,
            )?)
        } else {
            None
        };

        Ok(FitOutcome {
            value: report(fit.mean),
            fit,
            goodness_of_fit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_exponential_samples, make_rng};
    use crate::domain::CurveFitConfig;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;

    fn exponential(mean: f64, n: usize, seed: u64) -> Vec<f64> {
        generate_exponential_samples(mean, n, Some(seed)).unwrap()
    }

    /// Exponential quantiles at `(i + 0.5) / n`, shuffled.
    fn shuffled_quantiles(mean: f64, n: usize, seed: u64) -> Vec<f64> {
        let mut samples: Vec<f64> = (0..n)
            .map(|i| -mean * (-(i as f64 + 0.5) / n as f64).ln_1p())
            .collect();
        samples.shuffle(&mut make_rng(Some(seed)));
        samples
    }

    #[test]
    fn windowed_scan_recovers_mfpt_of_exponential_data() {
        let estimator = KineticsEstimator::default();
        let mut samples = shuffled_quantiles(10.0, 2000, 7);
        let mfpt = estimator.estimate_mfpt(&mut samples, Some(5)).unwrap();
        assert!((mfpt - 10.0).abs() / 10.0 < 0.02, "mfpt={mfpt}");
    }

    #[test]
    fn curve_fit_recovers_mfpt_after_windowed_sort() {
        let estimator = KineticsEstimator::default();
        let mut samples = shuffled_quantiles(10.0, 2000, 7);

        // The windowed call leaves `samples` ascending, which is what the
        // positional CDF pairing of the direct fit expects.
        estimator.estimate_rate(&mut samples, None).unwrap();
        let outcome = estimator.fit_mfpt(&samples, false, None).unwrap();

        assert!((outcome.value - 10.0).abs() / 10.0 < 0.02, "mfpt={}", outcome.value);
        assert!(outcome.p_value().is_none());
    }

    #[test]
    fn random_exponential_data_stays_near_true_mfpt() {
        let estimator = KineticsEstimator::default();
        let mut samples = exponential(10.0, 2000, 7);
        let windowed = estimator.estimate_mfpt(&mut samples, None).unwrap();
        let fitted = estimator.fit_mfpt(&samples, false, None).unwrap().value;
        assert!((windowed - 10.0).abs() / 10.0 < 0.1, "windowed={windowed}");
        assert!((fitted - 10.0).abs() / 10.0 < 0.1, "fitted={fitted}");
    }

    #[test]
    fn mfpt_is_reciprocal_of_rate() {
        let estimator = KineticsEstimator::default();
        let samples = exponential(2.5, 300, 17);

        let rate = estimator.estimate_rate(&mut samples.clone(), None).unwrap();
        let mfpt = estimator.estimate_mfpt(&mut samples.clone(), None).unwrap();
        assert_eq!(mfpt, 1.0 / rate);
    }

    #[test]
    fn one_to_ten_is_deterministic() {
        let estimator = KineticsEstimator::with_min_sample_size(5);
        let base: Vec<f64> = (1..=10).map(f64::from).collect();

        let table = estimator.build_estimation_table(&mut base.clone(), None).unwrap();
        assert_eq!(table.len(), 5);

        let first = estimator.best_row(&mut base.clone(), None).unwrap();
        for _ in 0..5 {
            assert_eq!(estimator.best_row(&mut base.clone(), None).unwrap(), first);
        }
        let tstar = estimator.estimate_tstar(&mut base.clone(), None).unwrap();
        assert_eq!(tstar, first.time);
        assert!(table.rows().contains(&first));
    }

    #[test]
    fn per_call_override_beats_configured_size() {
        let estimator = KineticsEstimator::with_min_sample_size(5);
        let mut samples: Vec<f64> = (1..=10).map(f64::from).collect();
        let table = estimator.build_estimation_table(&mut samples, Some(2)).unwrap();
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn too_few_samples_are_insufficient_data() {
        let estimator = KineticsEstimator::default();
        let mut empty: Vec<f64> = Vec::new();
        assert!(matches!(
            estimator.estimate_rate(&mut empty, None),
            Err(KineticsError::InsufficientData(_))
        ));

        let mut five = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(
            estimator.estimate_mfpt(&mut five, None),
            Err(KineticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn identical_samples_are_insufficient_for_fit() {
        let estimator = KineticsEstimator::default();
        assert!(matches!(
            estimator.fit_mfpt(&[7.0; 20], false, None),
            Err(KineticsError::InsufficientData(_))
        ));
        assert!(matches!(
            estimator.fit_rate(&[], true, None),
            Err(KineticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn fit_rate_and_mfpt_share_fit_and_p_value() {
        let estimator = KineticsEstimator::new(EstimatorConfig {
            curve_fit: CurveFitConfig {
                synthetic_sample_count: 20_000,
                seed: Some(5),
                ..CurveFitConfig::default()
            },
            ..EstimatorConfig::default()
        });
        let mut samples = exponential(4.0, 400, 23);
        samples.sort_by(f64::total_cmp);

        let mfpt = estimator.fit_mfpt(&samples, true, None).unwrap();
        let rate = estimator.fit_rate(&samples, true, None).unwrap();

        assert_eq!(rate.value, 1.0 / mfpt.value);
        assert_eq!(rate.fit, mfpt.fit);
        assert_eq!(rate.p_value(), mfpt.p_value());
        let p = mfpt.p_value().unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn per_call_synthetic_count_beats_configured_count() {
        let estimator = KineticsEstimator::new(EstimatorConfig {
            curve_fit: CurveFitConfig {
                synthetic_sample_count: 20_000,
                seed: Some(5),
                ..CurveFitConfig::default()
            },
            ..EstimatorConfig::default()
        });
        let mut samples = exponential(4.0, 400, 23);
        samples.sort_by(f64::total_cmp);

        let configured = estimator.fit_mfpt(&samples, true, None).unwrap();
        let overridden = estimator.fit_rate(&samples, true, Some(3_000)).unwrap();

        let configured = configured.goodness_of_fit.unwrap();
        let overridden = overridden.goodness_of_fit.unwrap();
        assert_eq!(configured.synthetic_sample_count, 20_000);
        assert_eq!(overridden.synthetic_sample_count, 3_000);
        assert!((0.0..=1.0).contains(&overridden.p_value));
        assert!(matches!(
            estimator.fit_mfpt(&samples, true, Some(0)),
            Err(KineticsError::InvalidConfig(_))
        ));
    }

    proptest! {
        #[test]
        fn sorting_is_idempotent(samples in prop::collection::vec(0.01f64..100.0, 6..60)) {
            let estimator = KineticsEstimator::default();
            let mut unsorted = samples.clone();
            let mut sorted = samples;
            sorted.sort_by(f64::total_cmp);

            let from_unsorted = estimator.build_estimation_table(&mut unsorted, None).unwrap();
            let mut sorted_twice = sorted.clone();
            estimator.build_estimation_table(&mut sorted_twice, None).unwrap();
            let from_sorted = estimator.build_estimation_table(&mut sorted_twice, None).unwrap();

            prop_assert_eq!(&unsorted, &sorted);
            prop_assert_eq!(from_unsorted.len(), from_sorted.len());
            for (a, b) in from_unsorted.rows().iter().zip(from_sorted.rows()) {
                prop_assert_eq!(a.time.to_bits(), b.time.to_bits());
                prop_assert_eq!(a.prediction.to_bits(), b.prediction.to_bits());
                prop_assert_eq!(a.r_squared.to_bits(), b.r_squared.to_bits());
            }
        }

        #[test]
        fn mfpt_reciprocal_holds_for_any_samples(samples in prop::collection::vec(0.01f64..50.0, 8..40)) {
            let estimator = KineticsEstimator::default();
            let rate = estimator.estimate_rate(&mut samples.clone(), None);
            let mfpt = estimator.estimate_mfpt(&mut samples.clone(), None);
            match (rate, mfpt) {
                (Ok(rate), Ok(mfpt)) => prop_assert_eq!(mfpt.to_bits(), (1.0 / rate).to_bits()),
                (rate, mfpt) => prop_assert_eq!(rate.is_err(), mfpt.is_err()),
            }
        }

        #[test]
        fn row_count_is_n_minus_min(n in 0usize..40, min in 1usize..10) {
            let mut samples: Vec<f64> = (0..n).map(|i| i as f64 + 0.5).collect();
            let table = build_estimation_table(&mut samples, min).unwrap();
            prop_assert_eq!(table.len(), n.saturating_sub(min));
        }
    }
}
