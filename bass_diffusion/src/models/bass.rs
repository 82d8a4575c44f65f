//! Bass model estimation by the quadratic OLS regression
//!
//! The discrete Bass model gives
//! `sales ≈ a + b·cumsales + c·cumsales²` with `a = p·m`, `b = q − p` and
//! `c = −q/m`. Fitting the regression and solving `c·m² + b·m + a = 0`
//! recovers the market size, after which `p` and `q` follow directly.

use crate::data::SalesData;
use crate::error::{BassError, Result};
use crate::forecast::{self, ForecastSeries};
use crate::models::{DiffusionModel, TrainedDiffusionModel};
use bass_math::{quadratic_roots, OlsFit, OlsRegression};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Names of the regression coefficients, in order
pub const COEFFICIENT_NAMES: [&str; 3] = ["Intercept", "cumsales", "cum_sales_squared"];

/// Minimum number of observations to identify three coefficients
pub const MIN_OBSERVATIONS: usize = 3;

/// Coefficients of `sales ≈ intercept + cumsales_coeff·N + cumsales_sq_coeff·N²`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub intercept: f64,
    pub cumsales_coeff: f64,
    pub cumsales_sq_coeff: f64,
    /// Full OLS output, absent for hand-built coefficients
    diagnostics: Option<OlsFit>,
}

impl RegressionResult {
    /// Build a result from bare coefficients
    pub fn from_coefficients(intercept: f64, cumsales_coeff: f64, cumsales_sq_coeff: f64) -> Self {
        Self {
            intercept,
            cumsales_coeff,
            cumsales_sq_coeff,
            diagnostics: None,
        }
    }

    /// Coefficients implied by known Bass parameters
    pub fn from_parameters(params: &BassParameters) -> Self {
        Self::from_coefficients(
            params.p * params.m,
            params.q - params.p,
            -params.q / params.m,
        )
    }

    fn from_fit(fit: OlsFit) -> Result<Self> {
        let estimates = fit.estimates();
        match *estimates.as_slice() {
            [a, b, c] => Ok(Self {
                intercept: a,
                cumsales_coeff: b,
                cumsales_sq_coeff: c,
                diagnostics: Some(fit),
            }),
            _ => Err(BassError::InvalidParameter(format!(
                "Expected 3 regression coefficients, got {}",
                estimates.len()
            ))),
        }
    }

    /// Coefficients in `[intercept, cumsales, cum_sales_squared]` order
    pub fn coefficients(&self) -> [f64; 3] {
        [self.intercept, self.cumsales_coeff, self.cumsales_sq_coeff]
    }

    /// OLS diagnostics, when the result came from a fit
    pub fn diagnostics(&self) -> Option<&OlsFit> {
        self.diagnostics.as_ref()
    }
}

/// Bass model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BassParameters {
    /// Market size (maximum number of adopters)
    pub m: f64,
    /// Coefficient of innovation
    pub p: f64,
    /// Coefficient of imitation
    pub q: f64,
}

impl BassParameters {
    /// Create a parameter set
    pub fn new(m: f64, p: f64, q: f64) -> Result<Self> {
        if !(m.is_finite() && p.is_finite() && q.is_finite()) {
            return Err(BassError::InvalidParameter(
                "Bass parameters must be finite".to_string(),
            ));
        }
        Ok(Self { m, p, q })
    }

    /// Analytically predicted peak adoption time
    pub fn peak_time(&self) -> Result<f64> {
        forecast::predicted_peak_period(self.p, self.q)
    }

    /// Forecast over the given time index
    pub fn forecast(&self, time_index: &[f64]) -> Result<ForecastSeries> {
        forecast::forecast(self.m, self.p, self.q, time_index)
    }

    /// Whether `p > 0`, `q > 0` and `m` exceeds the observed cumulative sales
    pub fn is_plausible_for(&self, data: &SalesData) -> bool {
        self.p > 0.0 && self.q > 0.0 && self.m > data.total_sales()
    }
}

/// Bass model estimator
#[derive(Debug, Clone)]
pub struct BassEstimator {
    /// Name of the model
    name: String,
    /// Underlying regression
    regression: OlsRegression,
}

impl Default for BassEstimator {
    fn default() -> Self {
        Self {
            name: "Bass Diffusion (OLS)".to_string(),
            regression: OlsRegression::new(),
        }
    }
}

impl BassEstimator {
    /// Create a new estimator with 95% coefficient intervals
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the confidence level of the coefficient intervals
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        self.regression = self.regression.with_confidence_level(level)?;
        Ok(self)
    }

    /// Regress sales on cumulative sales and its square
    pub fn fit(&self, data: &SalesData) -> Result<RegressionResult> {
        if data.len() < MIN_OBSERVATIONS {
            return Err(BassError::UnderdeterminedFit(format!(
                "Need at least {} observations, got {}",
                MIN_OBSERVATIONS,
                data.len()
            )));
        }

        let fit = self.regression.fit(
            data.sales(),
            &[data.cumulative_sales(), data.cumulative_sales_squared()],
        )?;
        let result = RegressionResult::from_fit(fit)?;

        debug!(
            "Fitted '{}': intercept={:.6e}, cumsales={:.6e}, cum_sales_squared={:.6e}",
            data.source_name(),
            result.intercept,
            result.cumsales_coeff,
            result.cumsales_sq_coeff
        );
        Ok(result)
    }

    /// Invert regression coefficients into `(m, p, q)`
    ///
    /// `m` is the larger root of `c·m² + b·m + a = 0`; no check is made that
    /// it is economically sensible.
    pub fn predict(&self, result: &RegressionResult) -> Result<BassParameters> {
        let [a, b, c] = result.coefficients();
        if c == 0.0 {
            return Err(BassError::DomainError(
                "cum_sales_squared coefficient is zero, market size is undefined".to_string(),
            ));
        }

        let (root1, root2) = quadratic_roots(c, b, a)?;
        let m = root1.max(root2);
        if m == 0.0 {
            return Err(BassError::DomainError(
                "Market size root is zero, p = a / m is undefined".to_string(),
            ));
        }

        let params = BassParameters::new(m, a / m, -m * c)?;
        if params.p <= 0.0 || params.q <= 0.0 || params.m <= 0.0 {
            warn!(
                "Fitted parameters are not a valid diffusion: m={:.3}, p={:.5}, q={:.5}",
                params.m, params.p, params.q
            );
        }
        Ok(params)
    }
}

impl DiffusionModel for BassEstimator {
    type Trained = TrainedBass;

    fn train(&self, data: &SalesData) -> Result<TrainedBass> {
        let regression = self.fit(data)?;
        let parameters = self.predict(&regression)?;

        if parameters.m <= data.total_sales() {
            warn!(
                "Market size {:.3} does not exceed observed cumulative sales {:.3}",
                parameters.m,
                data.total_sales()
            );
        }

        Ok(TrainedBass {
            name: self.name.clone(),
            regression,
            parameters,
            observed: data.len(),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Trained Bass model
#[derive(Debug, Clone)]
pub struct TrainedBass {
    /// Name of the model
    name: String,
    /// Regression the parameters were derived from
    regression: RegressionResult,
    /// Fitted parameters
    parameters: BassParameters,
    /// Number of training periods
    observed: usize,
}

impl TrainedBass {
    /// Regression the parameters were derived from
    pub fn regression(&self) -> &RegressionResult {
        &self.regression
    }
}

impl TrainedDiffusionModel for TrainedBass {
    fn parameters(&self) -> &BassParameters {
        &self.parameters
    }

    fn forecast(&self, horizon: usize) -> Result<ForecastSeries> {
        forecast::forecast_horizon(&self.parameters, self.observed, horizon)
    }

    fn predict(&self, data: &SalesData) -> Result<ForecastSeries> {
        self.parameters.forecast(&data.time_index())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_predict_inverts_known_coefficients() {
        let truth = BassParameters::new(1000.0, 0.03, 0.38).unwrap();
        let result = RegressionResult::from_parameters(&truth);
        let params = BassEstimator::new().predict(&result).unwrap();

        assert_relative_eq!(params.m, 1000.0, max_relative = 1e-10);
        assert_relative_eq!(params.p, 0.03, max_relative = 1e-10);
        assert_relative_eq!(params.q, 0.38, max_relative = 1e-10);
    }

    #[test]
    fn test_predict_domain_errors() {
        let estimator = BassEstimator::new();

        let flat = RegressionResult::from_coefficients(10.0, 0.5, 0.0);
        assert!(matches!(estimator.predict(&flat), Err(BassError::DomainError(_))));

        // b² − 4ac = 1 − 4·1·1 < 0
        let complex = RegressionResult::from_coefficients(1.0, 1.0, 1.0);
        assert!(matches!(estimator.predict(&complex), Err(BassError::DomainError(_))));
    }

    #[test]
    fn test_fit_requires_three_points() {
        let data = SalesData::from_sales(vec![10.0, 20.0]).unwrap();
        let err = BassEstimator::new().fit(&data).unwrap_err();
        assert!(matches!(err, BassError::UnderdeterminedFit(_)));
    }

    #[test]
    fn test_fit_all_zero_sales_is_underdetermined() {
        let data = SalesData::from_sales(vec![0.0; 5]).unwrap();
        let err = BassEstimator::new().fit(&data).unwrap_err();
        assert!(matches!(err, BassError::UnderdeterminedFit(_)));
    }
}
