//! Sample validation and synthetic first-passage time generation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp};

use crate::error::KineticsError;

/// Reject negative or non-finite first-passage times.
///
/// The index in the error refers to the caller's order.
pub fn validate_samples(samples: &[f64]) -> Result<(), KineticsError> {
    match samples
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
    {
        Some((index, &value)) => Err(KineticsError::InvalidSample { index, value }),
        None => Ok(()),
    }
}

/// Seeded RNG, or one drawn from OS entropy when `seed` is `None`.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draw `count` i.i.d. samples from an exponential distribution with the given mean.
pub fn exponential_population(
    mean: f64,
    count: usize,
    rng: &mut StdRng,
) -> Result<Vec<f64>, KineticsError> {
    if !(mean.is_finite() && mean > 0.0) {
        return Err(KineticsError::InvalidConfig(format!(
            "exponential mean must be finite and > 0, got {mean}"
        )));
    }
    let exp = Exp::new(1.0 / mean)
        .map_err(|e| KineticsError::InvalidConfig(format!("exponential distribution error: {e}")))?;
    Ok((0..count).map(|_| exp.sample(&mut *rng)).collect())
}

/// Synthetic first-passage times with a known MFPT, for trying the estimators.
pub fn generate_exponential_samples(
    mean: f64,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<f64>, KineticsError> {
    if count == 0 {
        return Err(KineticsError::InvalidConfig("sample count must be > 0".to_string()));
    }
    let mut rng = make_rng(seed);
    exponential_population(mean, count, &mut rng)
}
