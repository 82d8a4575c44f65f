//! Synthetic adoption series generated from known Bass parameters

use crate::error::{BassError, Result};
use crate::forecast;
use crate::models::{BassParameters, RegressionResult};
use bass_math::quadratic_roots;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Sales `m · f(t)` for `t = 1..=periods` from the continuous Bass density
pub fn density_sales(params: &BassParameters, periods: usize) -> Result<Vec<f64>> {
    let time_index: Vec<f64> = (1..=periods).map(|t| t as f64).collect();
    Ok(params.forecast(&time_index)?.sales().to_vec())
}

/// Discrete adoption path that satisfies the Bass regression exactly.
///
/// Each period solves `s = a + b·(N + s) + c·(N + s)²` for `s`, where `N` is
/// the cumulative adoption before the period and `(a, b, c)` are the
/// coefficients implied by `params`.
pub fn recursive_sales(params: &BassParameters, periods: usize) -> Result<Vec<f64>> {
    if params.m <= 0.0 || params.p <= 0.0 || params.q <= 0.0 {
        return Err(BassError::InvalidParameter(
            "Simulation requires m, p and q to be positive".to_string(),
        ));
    }

    let RegressionResult {
        intercept: a,
        cumsales_coeff: b,
        cumsales_sq_coeff: c,
        ..
    } = RegressionResult::from_parameters(params);

    let mut cumulative = 0.0;
    let mut sales = Vec::with_capacity(periods);
    for _ in 0..periods {
        // c·x² + (b − 1)·x + (a + N) = 0 with x = N + s
        let (r1, r2) = quadratic_roots(c, b - 1.0, a + cumulative)?;
        let next = [r1, r2]
            .into_iter()
            .filter(|x| *x >= cumulative)
            .fold(f64::INFINITY, f64::min);
        if !next.is_finite() {
            return Err(BassError::DomainError(
                "No non-negative adoption step for the given parameters".to_string(),
            ));
        }
        sales.push(next - cumulative);
        cumulative = next;
    }

    Ok(sales)
}

/// Multiply each value by `1 + ε`, `ε ~ N(0, relative_sd²)`
pub fn with_noise<R: Rng + ?Sized>(
    sales: &[f64],
    relative_sd: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if !(relative_sd >= 0.0 && relative_sd.is_finite()) {
        return Err(BassError::InvalidParameter(format!(
            "Noise level must be finite and non-negative, got {}",
            relative_sd
        )));
    }
    let normal = Normal::new(0.0, relative_sd).map_err(|e| {
        BassError::InvalidParameter(format!("Invalid noise level {}: {}", relative_sd, e))
    })?;

    Ok(sales
        .iter()
        .map(|&s| s * (1.0 + normal.sample(rng)))
        .collect())
}

/// Cumulative adoption implied by the continuous model at `t = 1..=periods`
pub fn cumulative_adoption(params: &BassParameters, periods: usize) -> Result<Vec<f64>> {
    (1..=periods)
        .map(|t| Ok(params.m * forecast::bass_cdf(params.p, params.q, t as f64)?))
        .collect()
}
